//! Route table
//!
//! Static (path, method) -> handler mapping. Built once at startup and
//! read-only afterwards, so lookups need no synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use hyper::Method;

use crate::error::ConfigError;
use crate::handler::Handler;

/// Strip a single trailing slash; `/` is left as is
pub fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// All handlers registered for one path, in registration order
#[derive(Default)]
pub struct Route {
    methods: Vec<(Method, Arc<dyn Handler>)>,
}

impl Route {
    pub fn handler_for(&self, method: &Method) -> Option<&Arc<dyn Handler>> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, handler)| handler)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().map(|(m, _)| m)
    }

    /// Value for the `Allow` header: every registered method
    pub fn allow_header(&self) -> String {
        join_methods(self.methods())
    }

    /// Value for `Access-Control-Allow-Methods`: registered methods minus `OPTIONS`
    pub fn cors_allow_methods(&self) -> String {
        join_methods(self.methods().filter(|m| **m != Method::OPTIONS))
    }
}

fn join_methods<'a>(methods: impl Iterator<Item = &'a Method>) -> String {
    methods.map(Method::as_str).collect::<Vec<_>>().join(", ")
}

/// Immutable-after-startup route table
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every method in `methods` on `path`
    ///
    /// Registration is all-or-nothing: on error the table is unchanged.
    pub fn register(
        &mut self,
        path: &str,
        methods: &[Method],
        handler: Arc<dyn Handler>,
    ) -> Result<(), ConfigError> {
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidRoute {
                path: path.to_string(),
                reason: "path must start with '/'",
            });
        }
        if methods.is_empty() {
            return Err(ConfigError::InvalidRoute {
                path: path.to_string(),
                reason: "at least one method is required",
            });
        }

        let key = normalize_path(path);
        let existing = self.routes.get(key);
        for (i, method) in methods.iter().enumerate() {
            let taken = existing.is_some_and(|route| route.handler_for(method).is_some());
            if taken || methods[..i].contains(method) {
                return Err(ConfigError::DuplicateRoute {
                    path: key.to_string(),
                    method: method.to_string(),
                });
            }
        }

        let route = self.routes.entry(key.to_string()).or_default();
        for method in methods {
            route.methods.push((method.clone(), Arc::clone(&handler)));
        }
        tracing::debug!(path = key, methods = %join_methods(methods.iter()), "route registered");
        Ok(())
    }

    /// Exact, case-sensitive lookup after trailing-slash normalization
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.get(normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
