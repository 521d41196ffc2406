use std::fmt;
use std::sync::Arc;

use crate::service::Invoker;

/// owner（服务）名称，进程级配置使用的保留 owner
pub const GLOBAL_OWNER: &str = "__global__";

/// 成员标识：(owner, member)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    owner: Arc<str>,
    member: Arc<str>,
}

impl MemberKey {
    pub fn new(owner: impl AsRef<str>, member: impl AsRef<str>) -> Self {
        Self {
            owner: Arc::from(owner.as_ref()),
            member: Arc::from(member.as_ref()),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn member(&self) -> &str {
        &self.member
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.member)
    }
}

/// 调用信息
///
/// `resolve_times` 按成员计数，而不是按调用计数：同一成员上相互重叠的并发调用会共享它。
#[derive(Clone, Default)]
pub struct InvocationInfo {
    /// 已完成的内层调用次数
    pub resolve_times: usize,
    /// 未经装饰的原始成员
    pub original_method: Option<Invoker>,
}

impl InvocationInfo {
    /// `inner` 是否就是未经装饰的原始成员
    pub fn is_original(&self, inner: &Invoker) -> bool {
        self.original_method
            .as_ref()
            .is_some_and(|original| Arc::ptr_eq(original, inner))
    }
}

impl fmt::Debug for InvocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationInfo")
            .field("resolve_times", &self.resolve_times)
            .field("original_method", &self.original_method.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
