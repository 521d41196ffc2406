use std::fmt;
use std::str::FromStr;

use crate::{ReqstackError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl FromStr for Method {
    type Err = ReqstackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(ReqstackError::UnsupportedRequestShape(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务基础地址
///
/// 配置文件里的 base_url 支持简写，统一规范化为完整 URL。
#[derive(Debug, Clone, PartialEq)]
pub struct BaseUrl(url::Url);

impl BaseUrl {
    /// 默认 host，当 URL 中未指定 host 时使用
    const DEFAULT_HOST: &'static str = "localhost";
    /// 默认 scheme，当 URL 中未指定 scheme 时使用
    const DEFAULT_SCHEME: &'static str = "http";

    pub fn parse(s: &str) -> Result<Self> {
        let input = s.trim();

        // 处理各种简化格式:
        // 1. ":3000" -> "http://localhost:3000"
        // 2. "localhost:3000" -> "http://localhost:3000"
        // 3. "https://:8080" -> "https://localhost:8080"
        let normalized = if input.starts_with(':') {
            format!("{}://{}{}", Self::DEFAULT_SCHEME, Self::DEFAULT_HOST, input)
        } else if let Some(pos) = input.find("://") {
            let after_scheme = &input[pos + 3..];
            if after_scheme.starts_with(':') {
                format!("{}://{}{}", &input[..pos], Self::DEFAULT_HOST, after_scheme)
            } else {
                input.to_string()
            }
        } else {
            format!("{}://{}", Self::DEFAULT_SCHEME, input)
        };

        let mut url = url::Url::parse(&normalized)?;

        // 保证路径以 / 结尾，否则 join 会吞掉最后一段
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self(url))
    }

    /// 拼接请求路径；绝对 URL 原样使用
    pub fn join(&self, path: &str) -> Result<url::Url> {
        if path.contains("://") {
            return Ok(url::Url::parse(path)?);
        }
        Ok(self.0.join(path.trim_start_matches('/'))?)
    }

    pub fn as_url(&self) -> &url::Url {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
