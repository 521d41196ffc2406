use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// 请求头片段：header 名称到取值
pub type HeaderFragment = BTreeMap<String, String>;

/// 参数转换函数，在替换前作用于调用参数
pub type ArgTransform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// 符号占位符
///
/// 同名的符号彼此相等，`Symbol::for_key("name")` 在任意位置创建的都是同一个占位符。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// 按名称获取占位符
    pub fn for_key(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// 请求模板
///
/// 描述 params / data / send 参数的形状，占位符在调用时才被解析。
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// 字面量，原样返回
    Literal(Value),
    /// 符号占位符
    Placeholder(Symbol),
    /// 对象：每个字段独立解析
    Object(BTreeMap<String, Template>),
    /// 数组：逐个元素解析，保持顺序与长度
    Array(Vec<Template>),
}

impl Template {
    pub fn symbol(key: impl AsRef<str>) -> Self {
        Template::Placeholder(Symbol::for_key(key))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Template::Literal(value.into())
    }

    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Template)>,
    {
        Template::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(items: impl IntoIterator<Item = Template>) -> Self {
        Template::Array(items.into_iter().collect())
    }

    /// 模板中引用到的所有占位符
    pub fn placeholders(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_placeholders(&mut out);
        out
    }

    fn collect_placeholders<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        match self {
            Template::Literal(_) => {}
            Template::Placeholder(symbol) => out.push(symbol),
            Template::Object(fields) => fields.values().for_each(|t| t.collect_placeholders(out)),
            Template::Array(items) => items.iter().for_each(|t| t.collect_placeholders(out)),
        }
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Template::Literal(value)
    }
}

impl From<Symbol> for Template {
    fn from(symbol: Symbol) -> Self {
        Template::Placeholder(symbol)
    }
}

/// 占位符绑定
///
/// `index` 与 `value` 同时只有一个有意义；两者都存在时字面量优先。
#[derive(Clone, Default)]
pub struct ParamBinding {
    /// 调用参数位置
    pub index: Option<usize>,
    /// 替换前对参数做的转换
    pub transform: Option<ArgTransform>,
    /// 字面量（例如前一个请求通过 response key 暂存的结果）
    pub value: Option<Value>,
}

impl ParamBinding {
    pub fn argument(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn transformed(index: usize, transform: ArgTransform) -> Self {
        Self {
            index: Some(index),
            transform: Some(transform),
            value: None,
        }
    }

    pub fn literal(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ParamBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamBinding")
            .field("index", &self.index)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .field("value", &self.value)
            .finish()
    }
}

/// 占位符到绑定的映射
pub type ParamBindings = HashMap<Symbol, ParamBinding>;

/// 请求头绑定
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderBinding {
    /// 取调用参数中的对象作为请求头片段
    Argument(usize),
    /// 前一个请求的响应暂存下来的请求头片段
    Stashed(HeaderFragment),
}

/// 按名称索引的请求头绑定
pub type HeaderBindings = HashMap<String, HeaderBinding>;
