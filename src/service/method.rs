use futures::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{ReqstackError, Result};
use crate::config::RequestConfig;
use crate::http::Method;
use crate::metadata::{self, MemberKey};
use crate::mock::{self, MockFixtures};
use crate::placeholder::{HeaderBinding, ParamBinding, Symbol};
use crate::request::{AnonymousRequest, RequestDescriptor, RequestEntry, RequestKind};
use crate::response::ResponseConfig;
use crate::service::invoke;
use crate::service::types::{DeclaredMethod, Invoker};

/// 响应注入位置的上限，超出时忽略注入声明
const MAX_INJECTION_INDEX: usize = u8::MAX as usize;

/// 成员声明构建器
///
/// 每次调用相当于应用一次注解，立即写入元数据。调用顺序即应用顺序，
/// 先声明的请求在最内层。
pub struct MethodBuilder {
    key: MemberKey,
    original: Invoker,
    current: Invoker,
}

impl MethodBuilder {
    pub(crate) fn new(key: MemberKey) -> Self {
        let original: Invoker = Arc::new(|_| async { Ok::<_, ReqstackError>(Value::Null) }.boxed());
        metadata::info(&key).set(|info| info.original_method = Some(original.clone()));

        Self {
            key,
            current: original.clone(),
            original,
        }
    }

    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    /// 成员本身的实现，必须在任何请求之前声明
    pub fn body<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        if !Arc::ptr_eq(&self.original, &self.current) {
            warn!("Body of {} must be declared before its requests, ignoring", self.key);
            return self;
        }

        let original: Invoker = Arc::new(move |args: Arc<Vec<Value>>| f(args.to_vec()).boxed());
        metadata::info(&self.key).set(|info| info.original_method = Some(original.clone()));
        self.current = original.clone();
        self.original = original;
        self
    }

    /// 把占位符 `name` 绑定到第 `index` 个调用参数
    pub fn param(self, name: &str, index: usize) -> Self {
        self.bind(name, ParamBinding::argument(index))
    }

    /// 绑定调用参数，并在替换前做转换
    pub fn param_with<F>(self, name: &str, index: usize, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.bind(name, ParamBinding::transformed(index, Arc::new(transform)))
    }

    /// 把占位符 `name` 绑定到字面量
    pub fn literal(self, name: &str, value: Value) -> Self {
        self.bind(name, ParamBinding::literal(value))
    }

    fn bind(self, name: &str, binding: ParamBinding) -> Self {
        metadata::params(&self.key).set(|params| {
            params.insert(Symbol::for_key(name), binding);
        });
        self
    }

    /// 第 `index` 个调用参数作为 `key` 对应的请求头片段
    pub fn header(self, key: &str, index: usize) -> Self {
        metadata::headers(&self.key).set(|headers| {
            headers.insert(key.to_string(), HeaderBinding::Argument(index));
        });
        self
    }

    /// 校验器和转换函数收到的调用参数中，第 `index` 个替换为原始响应
    pub fn inject_response(self, index: usize) -> Self {
        if index > MAX_INJECTION_INDEX {
            warn!(
                "Response injection index {} on {} exceeds {}, ignoring",
                index, self.key, MAX_INJECTION_INDEX
            );
            return self;
        }
        metadata::response_injection(&self.key).replace(Some(index));
        self
    }

    /// 声明一个请求及其响应处理
    pub fn request(mut self, request: impl Into<RequestKind>, response: ResponseConfig) -> Self {
        let entry = RequestEntry::new(request.into(), response);
        self.current = invoke::wrap(&self.key, self.current.clone(), entry);
        self
    }

    /// 声明 GET 请求
    pub fn get(self, mut descriptor: RequestDescriptor) -> Self {
        descriptor.method = Method::Get;
        self.request(descriptor, ResponseConfig::default())
    }

    /// 声明 POST 请求
    pub fn post(self, mut descriptor: RequestDescriptor) -> Self {
        descriptor.method = Method::Post;
        self.request(descriptor, ResponseConfig::default())
    }

    /// 声明匿名请求
    pub fn anonymous(self, anonymous: AnonymousRequest, response: ResponseConfig) -> Self {
        self.request(anonymous, response)
    }

    /// 用 `reducer` 合并到目前为止声明的所有请求
    pub fn merge<F>(self, reducer: F) -> Self
    where
        F: Fn(Value, Value) -> Value + Send + Sync + 'static,
    {
        let request_count = metadata::requests(&self.key).get().len();
        metadata::merges(&self.key).set(|chain| {
            chain.register(Arc::new(reducer), request_count);
        });
        debug!("Registered merge over {} request(s) on {}", request_count, self.key);
        self
    }

    /// 成员级请求配置
    pub fn configure(self, config: RequestConfig) -> Self {
        metadata::member_config(&self.key).replace(Some(config));
        self
    }

    /// 为已声明的 GET 请求注册 mock 数据，只在开发模式下生效
    pub fn mock(self, fixtures: &MockFixtures) -> Self {
        mock::register_member(&self.key, fixtures);
        self
    }

    pub fn build(self) -> DeclaredMethod {
        DeclaredMethod {
            key: self.key,
            invoker: self.current,
        }
    }
}
