use thiserror::Error;

use crate::response::ValidationError;

#[derive(Error, Debug)]
pub enum ReqstackError {
    #[error("占位符未绑定: {0} 既没有绑定参数也没有绑定响应")]
    UnboundPlaceholder(String),

    #[error("不支持的请求形式: {0}")]
    UnsupportedRequestShape(String),

    #[error("未注册 HTTP 客户端: 请先调用 use_http_client 或为服务配置客户端")]
    MissingTransport,

    #[error("响应校验失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP 状态异常 {code}: {body}")]
    Status { code: u16, body: String },

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for ReqstackError {
    fn from(err: anyhow::Error) -> Self {
        ReqstackError::Other(err.to_string())
    }
}

impl ReqstackError {
    /// 校验失败时返回校验器产生的原始错误
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ReqstackError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for reqstack crate
pub type Result<T> = std::result::Result<T, ReqstackError>;
