use crate::config::types::{ClientSettings, FileConfig, RequestConfig};
use crate::http::ReqwestClient;
use crate::{ReqstackError, Result};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "reqstack.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
        let content = fs::read_to_string(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| ReqstackError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/reqstack/
    pub fn find_and_load() -> Option<FileConfig> {
        Self::try_load_from_current_dir().or_else(Self::try_load_from_user_dir)
    }

    /// 尝试从当前目录及其父目录加载
    fn try_load_from_current_dir() -> Option<FileConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).ok();
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<FileConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("reqstack").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }

    /// 合并 `[client]` 与指定环境的覆盖项，并解析 ${VAR}
    pub fn build_settings(config: &FileConfig, env_name: Option<&str>) -> ClientSettings {
        let mut settings = config.client.clone();

        if let Some(env) = env_name.and_then(|name| config.get_environment(name)) {
            if let Some(base_url) = &env.base_url {
                settings.base_url = Some(base_url.clone());
            }
            if let Some(signature) = env.signature {
                settings.signature = signature;
            }
            if let Some(timeout) = env.timeout_secs {
                settings.timeout_secs = timeout;
            }
            if let Some(mode) = env.mode {
                settings.mode = Some(mode);
            }
        }

        settings.base_url = settings
            .base_url
            .map(|url| Self::resolve_env_vars(&url));

        settings
    }

    /// 解析并替换系统环境变量 ${VAR}，未设置的变量保持原样
    pub fn resolve_env_vars(text: &str) -> String {
        static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

        re.replace_all(text, |caps: &Captures| {
            let env_name = &caps[1];
            std::env::var(env_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string()
    }
}

impl RequestConfig {
    /// 按配置构建 reqwest 传输
    ///
    /// 未配置 base_url 时不创建客户端，调用时会得到 `MissingTransport`。
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let client = match &settings.base_url {
            Some(base_url) => {
                let timeout = Duration::from_secs(settings.timeout_secs);
                let client: Arc<dyn crate::http::HttpClient> =
                    Arc::new(ReqwestClient::with_timeout(base_url, timeout)?);
                Some(client)
            }
            None => None,
        };

        Ok(Self {
            client,
            signature: settings.signature,
            mode: settings.mode.unwrap_or_else(crate::config::RunMode::from_env),
        })
    }
}
