#![allow(dead_code)]

use async_trait::async_trait;
use reqstack::placeholder::HeaderFragment;
use reqstack::{HttpClient, Result};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 内存中的用户服务
///
/// `GET /users?name=..` 在按名字配置的延迟之后返回 `[{"id", "name"}]`，
/// `GET /token` 返回 `{"authorization": "Bearer <name>"}`，
/// `GET /profile` 原样返回收到的请求头，`POST /users` 原样返回请求体。
#[derive(Default)]
pub struct FakeUsers {
    delays: HashMap<String, u64>,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 名字对应的响应延迟（毫秒）
    pub fn with_delay(mut self, name: &str, millis: u64) -> Self {
        self.delays.insert(name.to_string(), millis);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 响应完成的顺序
    pub fn completed(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn user_id(name: &str) -> u64 {
        match name {
            "Alice" => 1,
            "Bob" => 2,
            "Carol" => 3,
            _ => 0,
        }
    }
}

#[async_trait]
impl HttpClient for FakeUsers {
    async fn get(&self, url: String, params: Option<Value>, headers: HeaderFragment) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let name = params
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if let Some(millis) = self.delays.get(&name) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        self.log.lock().unwrap().push(name.clone());

        Ok(match url.as_str() {
            "/users" => json!([{ "id": Self::user_id(&name), "name": name }]),
            "/token" => json!({ "authorization": format!("Bearer {}", name) }),
            "/profile" => json!(headers),
            other => json!({ "url": other }),
        })
    }

    async fn post(&self, _url: String, data: Option<Value>, _headers: HeaderFragment) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(data.unwrap_or(Value::Null))
    }
}

/// 数组拼接
pub fn concat(a: Value, b: Value) -> Value {
    let mut out = a.as_array().cloned().unwrap_or_default();
    out.extend(b.as_array().cloned().unwrap_or_default());
    Value::Array(out)
}

/// 收集日志输出，供断言使用
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// 安装为全局订阅器，每个测试二进制只能调用一次
    pub fn install(&self) {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .init();
    }

    pub fn count(&self, needle: &str) -> usize {
        String::from_utf8_lossy(&self.0.lock().unwrap()).matches(needle).count()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
