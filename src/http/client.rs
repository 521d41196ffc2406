use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::http::transport::{HttpClient, NamedRequest, RequestOptions};
use crate::http::types::{BaseUrl, Method};
use crate::placeholder::HeaderFragment;
use crate::{ReqstackError, Result};

/// 基于 reqwest 的传输实现，支持全部三种调用风格
#[derive(Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    base_url: BaseUrl,
}

impl ReqwestClient {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: BaseUrl::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    async fn execute(&self, method: Method, url: &str, options: RequestOptions) -> Result<Value> {
        let mut target = self.base_url.join(url)?;
        if let Some(params) = &options.params {
            append_query(&mut target, params);
        }

        let reqwest_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            other => {
                return Err(ReqstackError::UnsupportedRequestShape(format!(
                    "Unsupported request method: {}",
                    other
                )));
            }
        };

        debug!("{} {}", method, target);

        let mut req = self
            .inner
            .request(reqwest_method, target)
            .headers(to_header_map(&options.headers)?);

        if let Some(data) = &options.data {
            req = req.json(data);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReqstackError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(parse_body(&body))
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: String, params: Option<Value>, headers: HeaderFragment) -> Result<Value> {
        let options = RequestOptions {
            params,
            data: None,
            headers,
        };
        self.execute(Method::Get, &url, options).await
    }

    async fn post(&self, url: String, data: Option<Value>, headers: HeaderFragment) -> Result<Value> {
        let options = RequestOptions {
            params: None,
            data,
            headers,
        };
        self.execute(Method::Post, &url, options).await
    }

    async fn get_named(&self, request: NamedRequest) -> Result<Value> {
        self.execute(Method::Get, &request.url, request.options).await
    }

    async fn post_named(&self, request: NamedRequest) -> Result<Value> {
        self.execute(Method::Post, &request.url, request.options).await
    }

    async fn get_mixed(&self, url: String, options: RequestOptions) -> Result<Value> {
        self.execute(Method::Get, &url, options).await
    }

    async fn post_mixed(&self, url: String, options: RequestOptions) -> Result<Value> {
        self.execute(Method::Post, &url, options).await
    }
}

/// 把 params 对象编码进查询字符串
fn append_query(url: &mut url::Url, params: &Value) {
    let Value::Object(fields) = params else {
        return;
    };

    let mut pairs: Vec<(&str, String)> = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.as_str(), scalar_to_string(item))));
            }
            other => pairs.push((key.as_str(), scalar_to_string(other))),
        }
    }

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_header_map(headers: &HeaderFragment) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ReqstackError::Other(format!("Invalid header name '{}': {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ReqstackError::Other(format!("Invalid header value for '{}': {}", key, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// 空 body 视为 null，非 JSON 文本作为字符串返回
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
