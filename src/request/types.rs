use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::Result;
use crate::http::Method;
use crate::placeholder::{HeaderFragment, Template};
use crate::response::ResponseConfig;

/// 匿名请求使用的任意异步操作
pub type SendOperation = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// 准备好的零参数发送操作
pub type SendFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<Value>> + Send>;

/// 声明式 HTTP 请求描述
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    /// 查询参数模板
    pub params: Option<Template>,
    /// 请求体模板，只对 POST 生效
    pub data: Option<Template>,
    /// 静态请求头
    pub headers: HeaderFragment,
    /// 先等待内层调用完成再发请求
    pub wait: bool,
    /// 请求头片段的索引名
    pub key: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            data: None,
            headers: HeaderFragment::new(),
            wait: false,
            key: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn params(mut self, params: impl Into<Template>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn data(mut self, data: impl Into<Template>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn wait(mut self) -> Self {
        self.wait = true;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// 匿名请求：复用任意异步操作代替 URL 模板
#[derive(Clone)]
pub struct AnonymousRequest {
    pub send: SendOperation,
    /// 传给 `send` 的参数模板
    pub send_arguments: Vec<Template>,
    pub wait: bool,
}

impl AnonymousRequest {
    pub fn new<F, Fut>(send: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            send: Arc::new(move |args| send(args).boxed()),
            send_arguments: Vec::new(),
            wait: false,
        }
    }

    pub fn arguments(mut self, arguments: impl IntoIterator<Item = Template>) -> Self {
        self.send_arguments = arguments.into_iter().collect();
        self
    }

    pub fn wait(mut self) -> Self {
        self.wait = true;
        self
    }
}

impl fmt::Debug for AnonymousRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnonymousRequest")
            .field("send_arguments", &self.send_arguments)
            .field("wait", &self.wait)
            .finish()
    }
}

/// 请求种类
#[derive(Debug, Clone)]
pub enum RequestKind {
    Http(RequestDescriptor),
    Anonymous(AnonymousRequest),
}

/// 请求列表中的一项：请求描述及其响应处理配置
#[derive(Debug, Clone)]
pub struct RequestEntry {
    pub request: RequestKind,
    pub response: Arc<ResponseConfig>,
}

impl RequestEntry {
    pub fn new(request: RequestKind, response: ResponseConfig) -> Self {
        Self {
            request,
            response: Arc::new(response),
        }
    }

    pub fn wait(&self) -> bool {
        match &self.request {
            RequestKind::Http(descriptor) => descriptor.wait,
            RequestKind::Anonymous(anonymous) => anonymous.wait,
        }
    }

    /// 响应暂存的键
    pub fn response_key(&self) -> Option<&str> {
        self.response.key.as_deref()
    }

    /// GET 请求的 URL，用于 mock 匹配
    pub fn get_url(&self) -> Option<&str> {
        match &self.request {
            RequestKind::Http(d) if d.method == Method::Get => Some(&d.url),
            _ => None,
        }
    }
}

impl From<RequestDescriptor> for RequestKind {
    fn from(descriptor: RequestDescriptor) -> Self {
        RequestKind::Http(descriptor)
    }
}

impl From<AnonymousRequest> for RequestKind {
    fn from(anonymous: AnonymousRequest) -> Self {
        RequestKind::Anonymous(anonymous)
    }
}

/// 按应用顺序（最内层在前）排列的请求
pub type RequestList = Vec<RequestEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_builder() {
        let descriptor = RequestDescriptor::post("/users")
            .data(Template::object([("name", Template::symbol("name"))]))
            .header("x-trace", "1")
            .wait()
            .key("auth");

        assert_eq!(descriptor.method, Method::Post);
        assert_eq!(descriptor.url, "/users");
        assert!(descriptor.params.is_none());
        assert!(descriptor.data.is_some());
        assert_eq!(descriptor.headers.get("x-trace").map(String::as_str), Some("1"));
        assert!(descriptor.wait);
        assert_eq!(descriptor.key.as_deref(), Some("auth"));
    }

    #[test]
    fn test_entry_accessors() {
        let get = RequestEntry::new(
            RequestDescriptor::get("/users").wait().into(),
            ResponseConfig::new().key("users"),
        );
        assert!(get.wait());
        assert_eq!(get.get_url(), Some("/users"));
        assert_eq!(get.response_key(), Some("users"));

        let post = RequestEntry::new(RequestDescriptor::post("/users").into(), ResponseConfig::new());
        assert_eq!(post.get_url(), None);
        assert_eq!(post.response_key(), None);
    }

    #[tokio::test]
    async fn test_anonymous_send() {
        let anonymous = AnonymousRequest::new(|args| async move { Ok(json!(args.len())) })
            .arguments([Template::literal(1), Template::literal(2)]);

        let entry = RequestEntry::new(anonymous.clone().into(), ResponseConfig::new());
        assert!(!entry.wait());
        assert_eq!(entry.get_url(), None);

        let result = (anonymous.send)(vec![json!(1), json!(2)]).await.unwrap();
        assert_eq!(result, json!(2));
    }
}
