// Dispatcher - runs each call locally or forwards it upstream
//
// Routing only looks at the method name. Parameters and ids pass through
// untouched and upstream responses are returned verbatim.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::router::{Route, Router};
use super::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use super::upstream::UpstreamClient;

/// Executes calls against local node state
#[async_trait]
pub trait LocalHandler: Send + Sync {
    async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse;
}

/// Per-call routing between the local node and an upstream provider
pub struct Dispatcher<L, U> {
    router: Arc<Router>,
    local: L,
    upstream: Option<U>,
}

impl<L: LocalHandler, U: UpstreamClient> Dispatcher<L, U> {
    /// Every call runs locally
    pub fn local_only(local: L) -> Self {
        Self {
            router: Arc::new(Router::new(false)),
            local,
            upstream: None,
        }
    }

    /// Eligible calls go to `upstream` when `router` has upstream mode on
    pub fn with_upstream(local: L, upstream: U, router: Arc<Router>) -> Self {
        Self {
            router,
            local,
            upstream: Some(upstream),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle a single JSON-RPC request
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("Invalid JSON-RPC version"),
            );
        }

        let upstream = match self.router.route(&request.method) {
            Route::Upstream => self.upstream.as_ref(),
            Route::Local => None,
        };

        match upstream {
            Some(upstream) => {
                debug!("RPC {} -> upstream", request.method);
                match upstream.forward(&request).await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!("Upstream call {} failed: {}", request.method, e);
                        JsonRpcResponse::error(
                            request.id,
                            JsonRpcError::internal_error(&e.to_string()),
                        )
                    }
                }
            }
            None => {
                debug!("RPC {} -> local", request.method);
                self.local.handle(request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::types::JsonRpcId;
    use crate::rpc::upstream::UpstreamError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLocal {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LocalHandler for CountingLocal {
        async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
            self.calls.fetch_add(1, Ordering::SeqCst);
            JsonRpcResponse::success(request.id, "local")
        }
    }

    struct MockUpstream {
        calls: AtomicUsize,
        fail: bool,
        reply: Option<&'static str>,
    }

    impl MockUpstream {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
                reply: None,
            }
        }

        /// Upstream answering every call with a fixed raw body
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                ..Self::new(false)
            }
        }
    }

    #[async_trait]
    impl UpstreamClient for MockUpstream {
        async fn forward(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UpstreamError::Http(502));
            }
            if let Some(reply) = self.reply {
                return serde_json::from_str(reply).map_err(|e| UpstreamError::Parse(e.to_string()));
            }
            Ok(JsonRpcResponse::success(request.id.clone(), request.params.clone()))
        }
    }

    fn request(method: &str) -> JsonRpcRequest {
        JsonRpcRequest::new(JsonRpcId::Number(1), method, json!(["0xabc", "latest"]))
    }

    #[tokio::test]
    async fn test_eligible_call_forwarded_verbatim() {
        let router = Arc::new(Router::with_methods(true, ["eth_getBalance"]));
        let dispatcher = Dispatcher::with_upstream(CountingLocal::default(), MockUpstream::new(false), router);

        let resp = dispatcher.dispatch(request("eth_getBalance")).await;
        assert_eq!(resp.result, Some(json!(["0xabc", "latest"])));
        assert_eq!(resp.id, JsonRpcId::Number(1));
        assert_eq!(dispatcher.upstream.as_ref().unwrap().calls.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.local.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_null_upstream_result_kept() {
        let router = Arc::new(Router::new(true));
        let upstream = MockUpstream::replying(r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
        let dispatcher = Dispatcher::with_upstream(CountingLocal::default(), upstream, router);

        let resp = dispatcher.dispatch(request("eth_getTransactionReceipt")).await;
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 1, "result": null}));
        assert_eq!(dispatcher.local.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unlisted_call_runs_locally() {
        let router = Arc::new(Router::with_methods(true, ["eth_getBalance"]));
        let dispatcher = Dispatcher::with_upstream(CountingLocal::default(), MockUpstream::new(false), router);

        let resp = dispatcher.dispatch(request("eth_accounts")).await;
        assert_eq!(resp.result, Some(json!("local")));
        assert_eq!(dispatcher.upstream.as_ref().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_disabled_runs_locally() {
        let router = Arc::new(Router::with_methods(false, ["eth_getBalance"]));
        let dispatcher = Dispatcher::with_upstream(CountingLocal::default(), MockUpstream::new(false), router);

        dispatcher.dispatch(request("eth_getBalance")).await;
        assert_eq!(dispatcher.local.calls.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.upstream.as_ref().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_only() {
        let dispatcher: Dispatcher<_, MockUpstream> = Dispatcher::local_only(CountingLocal::default());

        let resp = dispatcher.dispatch(request("eth_getBalance")).await;
        assert_eq!(resp.result, Some(json!("local")));
        assert!(!dispatcher.router().upstream_enabled());
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_rpc_error() {
        let router = Arc::new(Router::new(true));
        let dispatcher = Dispatcher::with_upstream(CountingLocal::default(), MockUpstream::new(true), router);

        let resp = dispatcher.dispatch(request("eth_call")).await;
        let error = resp.error.unwrap();
        assert_eq!(error.code, -32603);
        assert_eq!(resp.id, JsonRpcId::Number(1));
        assert_eq!(dispatcher.local.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_version_rejected() {
        let dispatcher: Dispatcher<_, MockUpstream> = Dispatcher::local_only(CountingLocal::default());
        let mut req = request("eth_call");
        req.jsonrpc = "1.0".to_string();

        let resp = dispatcher.dispatch(req).await;
        assert_eq!(resp.error.unwrap().code, -32600);
        assert_eq!(dispatcher.local.calls.load(Ordering::SeqCst), 0);
    }
}
