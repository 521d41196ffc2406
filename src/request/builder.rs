use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::{self, Signature};
use crate::http::{HttpClient, Method, NamedRequest, RequestOptions};
use crate::metadata::{self, MemberKey};
use crate::mock;
use crate::placeholder::{HeaderFragment, PlaceholderResolver};
use crate::request::types::{AnonymousRequest, RequestDescriptor, RequestKind, SendFn};
use crate::{ReqstackError, Result};

/// 请求构建器，把请求描述和调用参数变成一个待执行的发送操作
pub struct RequestBuilder;

impl RequestBuilder {
    /// 准备发送操作
    ///
    /// 占位符在这里解析，绑定取调用时的最新值；未绑定的占位符、缺失的传输
    /// 和不支持的请求形式都在发出任何网络请求之前报错。
    pub fn prepare(key: &MemberKey, request: &RequestKind, args: &[Value]) -> Result<SendFn> {
        match request {
            RequestKind::Http(descriptor) => Self::prepare_http(key, descriptor, args),
            RequestKind::Anonymous(anonymous) => Self::prepare_anonymous(key, anonymous, args),
        }
    }

    fn prepare_anonymous(key: &MemberKey, anonymous: &AnonymousRequest, args: &[Value]) -> Result<SendFn> {
        let bindings = metadata::params(key).get();
        let send_args = PlaceholderResolver::resolve_all(&anonymous.send_arguments, &bindings, args)?;
        let send = anonymous.send.clone();

        debug!("Prepared anonymous request for {} with {} argument(s)", key, send_args.len());

        Ok(Box::new(move || send(send_args)))
    }

    fn prepare_http(key: &MemberKey, descriptor: &RequestDescriptor, args: &[Value]) -> Result<SendFn> {
        let bindings = metadata::params(key).get();

        // GET 只带 params，POST 只带 data
        let template = match descriptor.method {
            Method::Post => &descriptor.data,
            _ => &descriptor.params,
        };
        let resolved = template
            .as_ref()
            .map(|t| PlaceholderResolver::resolve(t, &bindings, args))
            .transpose()?;
        let (params, data) = match descriptor.method {
            Method::Post => (None, resolved),
            _ => (resolved, None),
        };

        let headers = Self::compose_headers(key, descriptor, args);

        if descriptor.method == Method::Get {
            if let Some(fixture) = mock::find(key, &descriptor.url) {
                debug!("Mock hit for {} {}", key, descriptor.url);
                return Ok(Box::new(move || async move { Ok::<_, ReqstackError>(fixture) }.boxed()));
            }
        }

        let config = config::effective_config(key.owner(), Some(key.member()));
        let client = config.client.ok_or(ReqstackError::MissingTransport)?;

        debug!(
            "Prepared {} {} for {} with '{}' signature",
            descriptor.method, descriptor.url, key, config.signature
        );

        Self::dispatch(
            client,
            config.signature,
            descriptor.method,
            descriptor.url.clone(),
            RequestOptions { params, data, headers },
        )
    }

    /// 静态请求头与按 `request.key` 绑定的片段浅合并，后者覆盖前者
    fn compose_headers(key: &MemberKey, descriptor: &RequestDescriptor, args: &[Value]) -> HeaderFragment {
        let mut headers = descriptor.headers.clone();

        if let Some(request_key) = &descriptor.key {
            let bindings = metadata::headers(key).get();
            headers.extend(PlaceholderResolver::resolve_headers(request_key, &bindings, args));
        }

        headers
    }

    fn dispatch(
        client: Arc<dyn HttpClient>,
        signature: Signature,
        method: Method,
        url: String,
        options: RequestOptions,
    ) -> Result<SendFn> {
        let send: SendFn = match (method, signature) {
            (Method::Get, Signature::Position) => Box::new(move || {
                async move { client.get(url, options.params, options.headers).await }.boxed()
            }),
            (Method::Post, Signature::Position) => Box::new(move || {
                async move { client.post(url, options.data, options.headers).await }.boxed()
            }),
            (Method::Get, Signature::Name) => Box::new(move || {
                async move { client.get_named(NamedRequest { url, options }).await }.boxed()
            }),
            (Method::Post, Signature::Name) => Box::new(move || {
                async move { client.post_named(NamedRequest { url, options }).await }.boxed()
            }),
            (Method::Get, Signature::Mix) => Box::new(move || {
                async move { client.get_mixed(url, options).await }.boxed()
            }),
            (Method::Post, Signature::Mix) => Box::new(move || {
                async move { client.post_mixed(url, options).await }.boxed()
            }),
            (other, _) => {
                return Err(ReqstackError::UnsupportedRequestShape(format!(
                    "Unsupported request method: {}",
                    other
                )));
            }
        };

        Ok(send)
    }
}
