pub mod loader;
/// 配置模块 - 进程级传输配置、运行模式和配置文件加载
pub mod types;

use std::sync::Arc;
use tracing::debug;

pub use loader::ConfigLoader;
pub use types::{ClientSettings, Environment, FileConfig, RequestConfig, RunMode, Signature};

use crate::http::HttpClient;
use crate::metadata::{self, MemberKey};

/// 注册进程级 HTTP 客户端，调用风格默认为位置风格
pub fn use_http_client(client: Arc<dyn HttpClient>, signature: Option<Signature>) {
    let signature = signature.unwrap_or_default();
    debug!("Using global http client with '{}' signature", signature);

    metadata::global_config().set(|config| {
        config.client = Some(client);
        config.signature = signature;
    });
}

/// 设置进程级运行模式
pub fn set_run_mode(mode: RunMode) {
    metadata::global_config().set(|config| config.mode = mode);
}

/// 当前进程级配置
pub fn global_config() -> RequestConfig {
    RequestConfig::clone(&metadata::global_config().get())
}

/// 某个成员生效的配置：成员配置优先，其次 owner 配置，最后是进程级配置
pub fn effective_config(owner: &str, member: Option<&str>) -> RequestConfig {
    let member_config = member.and_then(|m| {
        let key = MemberKey::new(owner, m);
        Option::clone(&metadata::member_config(&key).get())
    });

    member_config
        .or_else(|| Option::clone(&metadata::owner_config(owner).get()))
        .unwrap_or_else(global_config)
}
