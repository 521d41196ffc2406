use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::ReqstackError;

/// 校验器产生的错误
///
/// 可克隆、可比较：调用方拿到的错误与校验器返回的错误是同一个值。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    /// 逐条的违规描述
    pub details: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }
}

/// 外部 schema 格式的接入点
pub trait Schema: Send + Sync {
    /// 校验数据，失败时返回错误
    fn validate(&self, data: &Value) -> Option<ValidationError>;
}

/// 谓词校验函数: `(data, 调用参数) -> 错误`
pub type Predicate = Arc<dyn Fn(&Value, &[Value]) -> Option<ValidationError> + Send + Sync>;

/// 响应校验器
#[derive(Clone)]
pub enum Validator {
    Schema(Arc<dyn Schema>),
    Predicate(Predicate),
}

impl Validator {
    pub fn schema(schema: impl Schema + 'static) -> Self {
        Validator::Schema(Arc::new(schema))
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Option<ValidationError> + Send + Sync + 'static,
    {
        Validator::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Schema(_) => f.write_str("Validator::Schema"),
            Validator::Predicate(_) => f.write_str("Validator::Predicate"),
        }
    }
}

/// 转换函数: `(data, 调用参数) -> data'`，返回 `Err` 时保留原值
pub type Transformer = Arc<dyn Fn(&Value, &[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// 只读观察钩子
pub type Inspect = Arc<dyn Fn(&Value) + Send + Sync>;

/// 转换前的预处理
pub type Preprocess = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// 兜底函数，把任意失败替换为一个值
pub type Catcher = Arc<dyn Fn(ReqstackError) -> Value + Send + Sync>;

/// 响应处理配置
#[derive(Clone, Default)]
pub struct ResponseConfig {
    pub validators: Vec<Validator>,
    pub transformers: Vec<Transformer>,
    pub before_validate: Vec<Inspect>,
    pub after_validate: Vec<Inspect>,
    pub before_transform: Vec<Preprocess>,
    pub after_transform: Vec<Inspect>,
    pub catcher: Option<Catcher>,
    /// 暂存结果的键，供后续请求使用
    pub key: Option<String>,
}

impl ResponseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transformers.push(Arc::new(f));
        self
    }

    pub fn before_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.before_validate.push(Arc::new(f));
        self
    }

    pub fn after_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.after_validate.push(Arc::new(f));
        self
    }

    pub fn before_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.before_transform.push(Arc::new(f));
        self
    }

    pub fn after_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.after_transform.push(Arc::new(f));
        self
    }

    pub fn catcher<F>(mut self, f: F) -> Self
    where
        F: Fn(ReqstackError) -> Value + Send + Sync + 'static,
    {
        self.catcher = Some(Arc::new(f));
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl fmt::Debug for ResponseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseConfig")
            .field("validators", &self.validators)
            .field("transformers", &self.transformers.len())
            .field("before_validate", &self.before_validate.len())
            .field("after_validate", &self.after_validate.len())
            .field("before_transform", &self.before_transform.len())
            .field("after_transform", &self.after_transform.len())
            .field("catcher", &self.catcher.is_some())
            .field("key", &self.key)
            .finish()
    }
}
