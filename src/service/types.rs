use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::Result;
use crate::metadata::MemberKey;

/// 生成的成员调用函数，每一层请求包装前一层
pub type Invoker = Arc<dyn Fn(Arc<Vec<Value>>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// 声明完成的成员
#[derive(Clone)]
pub struct DeclaredMethod {
    pub(crate) key: MemberKey,
    pub(crate) invoker: Invoker,
}

impl DeclaredMethod {
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    /// 用给定参数调用成员，依次执行所有堆叠的请求
    pub async fn call(&self, args: Vec<Value>) -> Result<Value> {
        (self.invoker)(Arc::new(args)).await
    }
}

impl fmt::Debug for DeclaredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredMethod").field("key", &self.key).finish()
    }
}
