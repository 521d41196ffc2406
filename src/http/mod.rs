pub mod client;
pub mod transport;
pub mod types;

// Re-export commonly used types for convenient access
pub use client::ReqwestClient;
pub use transport::{HttpClient, NamedRequest, RequestOptions};
pub use types::{BaseUrl, Method};
