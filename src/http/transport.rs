use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::Signature;
use crate::http::types::Method;
use crate::placeholder::HeaderFragment;
use crate::{ReqstackError, Result};

/// 配置对象中除 URL 以外的部分
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub headers: HeaderFragment,
}

/// 具名风格的单一配置对象
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedRequest {
    pub url: String,
    #[serde(flatten)]
    pub options: RequestOptions,
}

fn unsupported(method: Method, signature: Signature) -> ReqstackError {
    ReqstackError::UnsupportedRequestShape(format!(
        "{} with '{}' signature is not implemented by this http client",
        method, signature
    ))
}

/// 传输层约定
///
/// GET/POST 各有位置、具名、混合三种调用风格，进程内由 [`Signature`] 选定一种。
/// 未实现的风格返回 `UnsupportedRequestShape`。
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// 位置风格: `get(url, params, headers)`
    async fn get(&self, _url: String, _params: Option<Value>, _headers: HeaderFragment) -> Result<Value> {
        Err(unsupported(Method::Get, Signature::Position))
    }

    /// 位置风格: `post(url, data, headers)`
    async fn post(&self, _url: String, _data: Option<Value>, _headers: HeaderFragment) -> Result<Value> {
        Err(unsupported(Method::Post, Signature::Position))
    }

    /// 具名风格: `get({ url, params, headers })`
    async fn get_named(&self, _request: NamedRequest) -> Result<Value> {
        Err(unsupported(Method::Get, Signature::Name))
    }

    /// 具名风格: `post({ url, data, headers })`
    async fn post_named(&self, _request: NamedRequest) -> Result<Value> {
        Err(unsupported(Method::Post, Signature::Name))
    }

    /// 混合风格: `get(url, { params, headers })`
    async fn get_mixed(&self, _url: String, _options: RequestOptions) -> Result<Value> {
        Err(unsupported(Method::Get, Signature::Mix))
    }

    /// 混合风格: `post(url, { data, headers })`
    async fn post_mixed(&self, _url: String, _options: RequestOptions) -> Result<Value> {
        Err(unsupported(Method::Post, Signature::Mix))
    }
}
