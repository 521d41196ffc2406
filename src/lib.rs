pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod merge;
pub mod metadata;
pub mod mock;
pub mod placeholder;
pub mod request;
pub mod response;
pub mod service;

// Re-export commonly used types
pub use config::{RequestConfig, RunMode, Signature, set_run_mode, use_http_client};
pub use error::{ReqstackError, Result};
pub use http::{HttpClient, ReqwestClient};
pub use placeholder::{Symbol, Template};
pub use request::{AnonymousRequest, RequestDescriptor};
pub use response::{ResponseConfig, ValidationError, Validator};
pub use service::{DeclaredMethod, MethodBuilder, Service};
