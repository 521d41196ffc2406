use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::http::HttpClient;
use crate::ReqstackError;

/// 传输调用风格，进程内选定一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signature {
    /// 单一配置对象
    Name,
    /// `url, params/data, headers`
    #[default]
    Position,
    /// `url` + 配置对象
    Mix,
}

impl FromStr for Signature {
    type Err = ReqstackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Signature::Name),
            "position" => Ok(Signature::Position),
            "mix" => Ok(Signature::Mix),
            _ => Err(ReqstackError::UnsupportedRequestShape(format!(
                "Unsupported HttpClient signature: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signature::Name => "name",
            Signature::Position => "position",
            Signature::Mix => "mix",
        };
        f.write_str(name)
    }
}

/// 运行模式，只有开发模式下 mock 注册才生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    #[default]
    Production,
}

impl RunMode {
    /// 读取模式的环境变量
    pub const ENV_VAR: &'static str = "REQSTACK_ENV";

    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .map(|v| Self::from_name(&v))
            .unwrap_or_default()
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" => RunMode::Development,
            _ => RunMode::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

/// 运行时请求配置
#[derive(Clone, Default)]
pub struct RequestConfig {
    /// 传输实现
    pub client: Option<Arc<dyn HttpClient>>,
    /// 调用风格
    pub signature: Signature,
    /// 运行模式
    pub mode: RunMode,
}

impl RequestConfig {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("client", &self.client.as_ref().map(|_| "<http client>"))
            .field("signature", &self.signature)
            .field("mode", &self.mode)
            .finish()
    }
}

/// `[client]` 配置段
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientSettings {
    /// 服务基础地址，支持 ${VAR}
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub signature: Signature,

    #[serde(default = "ClientSettings::default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub mode: Option<RunMode>,
}

impl ClientSettings {
    fn default_timeout() -> u64 {
        30
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            signature: Signature::default(),
            timeout_secs: Self::default_timeout(),
            mode: None,
        }
    }
}

/// 环境覆盖项
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Environment {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub signature: Option<Signature>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub mode: Option<RunMode>,
}

/// 完整的配置文件
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientSettings,

    /// 所有环境配置
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl FileConfig {
    /// 获取指定环境
    pub fn get_environment(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }
}
