// RPC - per-call routing between the local node and an upstream provider

pub mod dispatcher;
pub mod methods;
pub mod router;
pub mod types;
pub mod upstream;

// Re-export commonly used types
pub use dispatcher::{Dispatcher, LocalHandler};
pub use methods::REMOTE_METHODS;
pub use router::{Route, Router};
pub use types::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
pub use upstream::{HttpUpstream, UpstreamClient, UpstreamError};
