use futures::FutureExt;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Once};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::metadata::{self, MemberKey};
use crate::placeholder::{HeaderBinding, ParamBinding, Symbol, header_fragment_from};
use crate::request::{RequestBuilder, RequestEntry};
use crate::response::ResponsePipeline;
use crate::Result;
use crate::service::types::Invoker;

static MISSING_MERGE: Once = Once::new();

/// 堆叠请求中的一层
///
/// 调用时先启动内层，再发出本层请求；两者都完成后把内层结果交给紧挨在本层之上的
/// 合并函数。共享的 `resolve_times` 达到合并函数的请求数时完成合并。
///
/// `resolve_times` 和合并状态按成员保存，同一成员的并发调用会互相干扰。
/// 最外层在调用内层前重置二者，所以顺序调用互不影响。
struct RequestLayer {
    key: MemberKey,
    /// 从 1 开始的层号，等于注册时请求列表的长度
    level: usize,
    entry: RequestEntry,
    /// 注册时已存在的合并函数
    invisible: HashSet<Uuid>,
    inner: Invoker,
}

/// 注册一个请求并包装 `inner`
pub(crate) fn wrap(key: &MemberKey, inner: Invoker, entry: RequestEntry) -> Invoker {
    let level = metadata::requests(key).update(|list| {
        list.push(entry.clone());
        list.len()
    });
    let invisible = metadata::merges(key).get().ids();

    debug!("Registered request #{} on {}", level, key);

    let layer = Arc::new(RequestLayer {
        key: key.clone(),
        level,
        entry,
        invisible,
        inner,
    });

    Arc::new(move |args| Arc::clone(&layer).invoke(args).boxed())
}

impl RequestLayer {
    async fn invoke(self: Arc<Self>, args: Arc<Vec<Value>>) -> Result<Value> {
        let total = metadata::requests(&self.key).get().len();
        let merges = metadata::merges(&self.key);
        let info = metadata::info(&self.key);

        if self.level == total {
            info.set(|i| i.resolve_times = 0);
            merges.set(|chain| chain.reset());
        }

        let active = merges.get().active_for(&self.invisible).map(|entry| entry.id);

        if self.level == total && total >= 2 && active.is_none() {
            MISSING_MERGE.call_once(|| {
                warn!(
                    "{} stacks {} requests without a merge on the outermost one, its response replaces the inner ones. Use merge to combine them.",
                    self.key, total
                );
            });
        }

        let inner = (self.inner)(Arc::clone(&args));

        let (inner_value, response) = if self.entry.wait() {
            let inner_value = inner.await?;
            let response = self.respond(&args).await?;
            (inner_value, response)
        } else {
            futures::try_join!(inner, self.respond(&args))?
        };

        let from_original = info.get().is_original(&self.inner);
        let resolve_times = info.update(|i| {
            i.resolve_times += 1;
            i.resolve_times
        });

        let Some(id) = active else {
            return Ok(response);
        };

        merges.set(|chain| chain.feed(id, inner_value));

        debug!(
            "{} layer {} settled ({}/{} resolved, inner is original: {})",
            self.key, self.level, resolve_times, total, from_original
        );

        match merges.get().get(id) {
            Some(entry) if info.get().resolve_times >= entry.request_count => {
                Ok(entry.reducer.complete(response))
            }
            _ => Ok(response),
        }
    }

    /// 发出本层请求并执行响应流水线
    async fn respond(&self, args: &[Value]) -> Result<Value> {
        let send = RequestBuilder::prepare(&self.key, &self.entry.request, args)?;
        let injection = *metadata::response_injection(&self.key).get();

        let result = ResponsePipeline::run(send(), &self.entry.response, args, injection).await?;

        if let Some(response_key) = self.entry.response_key() {
            stash(&self.key, response_key, &result);
        }

        Ok(result)
    }
}

/// 把结果暂存为占位符字面量；对象结果同时作为请求头片段
fn stash(key: &MemberKey, response_key: &str, result: &Value) {
    debug!("Stashing response of {} under '{}'", key, response_key);

    metadata::params(key).set(|params| {
        params.insert(Symbol::for_key(response_key), ParamBinding::literal(result.clone()));
    });

    if let Value::Object(fields) = result {
        let fragment = header_fragment_from(fields);
        metadata::headers(key).set(|headers| {
            headers.insert(response_key.to_string(), HeaderBinding::Stashed(fragment));
        });
    }
}
