pub mod store;
/// 元数据模块 - 按 (owner, member) 作用域保存声明信息
pub mod types;

use std::sync::Arc;

pub use store::{MetadataHandle, StoreKind, clear, create};
pub use types::{GLOBAL_OWNER, InvocationInfo, MemberKey};

use crate::config::{RequestConfig, RunMode};
use crate::merge::MergeChain;
use crate::mock::MockOverlay;
use crate::placeholder::{HeaderBindings, ParamBindings};
use crate::request::RequestList;

fn member_scoped<T>(kind: StoreKind, key: &MemberKey) -> Arc<MetadataHandle<T>>
where
    T: Clone + Default + Send + Sync + 'static,
{
    create(kind, T::default(), key.owner(), Some(key.member()))
}

/// 占位符绑定
pub fn params(key: &MemberKey) -> Arc<MetadataHandle<ParamBindings>> {
    member_scoped(StoreKind::Param, key)
}

/// 请求头绑定
pub fn headers(key: &MemberKey) -> Arc<MetadataHandle<HeaderBindings>> {
    member_scoped(StoreKind::Header, key)
}

/// 请求列表
pub fn requests(key: &MemberKey) -> Arc<MetadataHandle<RequestList>> {
    member_scoped(StoreKind::Request, key)
}

/// 合并链
pub fn merges(key: &MemberKey) -> Arc<MetadataHandle<MergeChain>> {
    member_scoped(StoreKind::Merge, key)
}

/// 调用信息
pub fn info(key: &MemberKey) -> Arc<MetadataHandle<InvocationInfo>> {
    member_scoped(StoreKind::Info, key)
}

/// 接收原始响应的参数位置
pub fn response_injection(key: &MemberKey) -> Arc<MetadataHandle<Option<usize>>> {
    member_scoped(StoreKind::ResponseInjection, key)
}

/// 成员级请求配置
pub fn member_config(key: &MemberKey) -> Arc<MetadataHandle<Option<RequestConfig>>> {
    member_scoped(StoreKind::Config, key)
}

/// owner 级请求配置
pub fn owner_config(owner: &str) -> Arc<MetadataHandle<Option<RequestConfig>>> {
    create(StoreKind::Config, None, owner, None)
}

/// 进程级请求配置，初始运行模式取自环境变量
pub fn global_config() -> Arc<MetadataHandle<RequestConfig>> {
    create(
        StoreKind::GlobalConfig,
        RequestConfig::default().with_mode(RunMode::from_env()),
        GLOBAL_OWNER,
        None,
    )
}

/// owner 的 mock 数据
pub fn mocks(owner: &str) -> Arc<MetadataHandle<MockOverlay>> {
    create(StoreKind::Mock, MockOverlay::default(), owner, None)
}

/// owner 下已声明的成员，按声明顺序
pub fn members(owner: &str) -> Arc<MetadataHandle<Vec<String>>> {
    create(StoreKind::Members, Vec::new(), owner, None)
}
