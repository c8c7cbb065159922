//! The flattened route table a frozen router dispatches from.
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::BoxHandler;
use crate::method::Method;
use crate::middleware::Chain;
use crate::params::Params;
use crate::path::{Compiled, Matcher};

/// A registration as recorded by the node that owns it.
pub(crate) struct Route {
    /// Position in the registration order of the whole router tree.
    pub(crate) seq: usize,
    pub(crate) method: Method,
    pub(crate) compiled: Compiled,
    pub(crate) handler: BoxHandler,
}

/// A routed handler, already wrapped in the middleware of its owning node.
pub(crate) struct Endpoint {
    pub(crate) pattern: Arc<str>,
    pub(crate) handler: BoxHandler,
}

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The full pattern of the matched route, group prefixes included.
    pub pattern: &'a str,
    /// Parameters bound by the pattern.
    pub params: Params,
}

/// Static routes keyed by exact path, parameterized routes in registration
/// order.
#[derive(Default)]
pub(crate) struct RouteTable {
    statics: HashMap<Method, HashMap<String, Endpoint>>,
    params: Vec<(Method, Matcher, Endpoint)>,
}

impl RouteTable {
    /// Adds a route. Returns the static endpoint it replaced, if any.
    pub(crate) fn insert(&mut self, route: Route, chain: Chain) -> Option<Endpoint> {
        let endpoint = Endpoint {
            pattern: Arc::from(route.compiled.pattern()),
            handler: chain.compose(route.handler),
        };

        match route.compiled {
            Compiled::Literal(path) => self
                .statics
                .entry(route.method)
                .or_default()
                .insert(path, endpoint),
            Compiled::Matcher(matcher) => {
                self.params.push((route.method, matcher, endpoint));
                None
            }
        }
    }

    /// Exact match first, then the first parameterized route accepting `path`.
    pub(crate) fn lookup<'a>(&'a self, method: Method, path: &str) -> Option<(&'a Endpoint, Params)> {
        if let Some(endpoint) = self.statics.get(&method).and_then(|paths| paths.get(path)) {
            return Some((endpoint, Params::new()));
        }

        self.params
            .iter()
            .filter(|(m, _, _)| *m == method)
            .find_map(|(_, matcher, endpoint)| matcher.matches(path).map(|params| (endpoint, params)))
    }

    pub(crate) fn len(&self) -> usize {
        self.statics.values().map(HashMap::len).sum::<usize>() + self.params.len()
    }
}
