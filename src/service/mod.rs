mod invoke;
pub mod method;
/// 服务模块 - 声明式入口：`Service` 对应 owner，`MethodBuilder` 对应成员上的注解，
/// `DeclaredMethod` 是最终生成的调用函数
pub mod types;

use std::sync::Arc;

pub use method::MethodBuilder;
pub use types::{DeclaredMethod, Invoker};

use crate::config::RequestConfig;
use crate::metadata::{self, MemberKey};
use crate::mock::{self, MockFixtures};

/// 一组共享配置和 mock 数据的成员
#[derive(Debug, Clone)]
pub struct Service {
    owner: Arc<str>,
}

impl Service {
    pub fn new(owner: impl AsRef<str>) -> Self {
        Self {
            owner: Arc::from(owner.as_ref()),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// owner 级请求配置
    pub fn configure(&self, config: RequestConfig) -> &Self {
        metadata::owner_config(&self.owner).replace(Some(config));
        self
    }

    /// 开始声明一个成员
    pub fn method(&self, member: &str) -> MethodBuilder {
        metadata::members(&self.owner).set(|members| {
            if !members.iter().any(|m| m == member) {
                members.push(member.to_string());
            }
        });
        MethodBuilder::new(MemberKey::new(&*self.owner, member))
    }

    /// 为所有已声明成员的 GET 请求注册 mock 数据，只在开发模式下生效
    pub fn mock(&self, fixtures: &MockFixtures) -> bool {
        mock::register_owner(&self.owner, fixtures)
    }

    /// 已声明的成员名
    pub fn members(&self) -> Vec<String> {
        metadata::members(&self.owner).get().to_vec()
    }
}
