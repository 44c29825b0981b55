// Router - decides whether a call runs locally or on the upstream provider
//
// The eligible set is an allowlist fixed at construction. Lookups are exact:
// sharing a namespace with an eligible method is not enough to be forwarded.

use std::collections::HashSet;

use super::methods::REMOTE_METHODS;

/// Where a call should execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Local,
    Upstream,
}

/// Immutable RPC method classifier
#[derive(Debug, Clone)]
pub struct Router {
    upstream_enabled: bool,
    remote_eligible: HashSet<String>,
}

impl Router {
    /// Router over the default remote-eligible methods
    pub fn new(upstream_enabled: bool) -> Self {
        Self::with_methods(upstream_enabled, REMOTE_METHODS.iter().copied())
    }

    /// Router over a custom remote-eligible set
    pub fn with_methods<I, M>(upstream_enabled: bool, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            upstream_enabled,
            remote_eligible: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the call must be forwarded upstream
    pub fn route_remote(&self, method: &str) -> bool {
        self.upstream_enabled && self.remote_eligible.contains(method)
    }

    pub fn route(&self, method: &str) -> Route {
        if self.route_remote(method) {
            Route::Upstream
        } else {
            Route::Local
        }
    }

    pub fn upstream_enabled(&self) -> bool {
        self.upstream_enabled
    }

    /// Membership in the eligible set, regardless of upstream mode
    pub fn is_remote_eligible(&self, method: &str) -> bool {
        self.remote_eligible.contains(method)
    }

    pub fn remote_method_count(&self) -> usize {
        self.remote_eligible.len()
    }
}
