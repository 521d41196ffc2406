use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config;
use crate::metadata::{self, MemberKey};

/// URL 到 mock 数据的映射
///
/// 只在开发模式下注册；URL 匹配的 GET 请求直接返回 mock 数据，不经过传输层。
pub type MockFixtures = HashMap<String, Value>;

/// 单个成员上的一条 mock 记录
#[derive(Debug, Clone, PartialEq)]
pub struct MockFixture {
    pub url: String,
    pub mock_data: Value,
}

/// 成员名到 mock 记录的映射
pub type MockOverlay = HashMap<String, Vec<MockFixture>>;

/// 为单个成员注册 mock 数据
///
/// 只覆盖该成员已声明的 GET 请求；找不到对应 URL 的数据时给出警告。
/// 返回是否生效。
pub fn register_member(key: &MemberKey, fixtures: &MockFixtures) -> bool {
    let mode = config::effective_config(key.owner(), Some(key.member())).mode;
    if !mode.is_development() {
        debug!("Skipping mock for {}: not in development mode", key);
        return false;
    }

    let collected = collect(key, fixtures);
    metadata::mocks(key.owner()).set(|overlay| {
        overlay.insert(key.member().to_string(), collected);
    });
    true
}

/// 为 owner 下所有已声明成员注册 mock 数据
pub fn register_owner(owner: &str, fixtures: &MockFixtures) -> bool {
    let mode = config::effective_config(owner, None).mode;
    if !mode.is_development() {
        debug!("Skipping mock for {}: not in development mode", owner);
        return false;
    }

    let members = metadata::members(owner).get();
    let collected: Vec<(String, Vec<MockFixture>)> = members
        .iter()
        .map(|member| {
            let key = MemberKey::new(owner, member);
            (member.clone(), collect(&key, fixtures))
        })
        .collect();

    metadata::mocks(owner).set(|overlay| overlay.extend(collected));
    true
}

fn collect(key: &MemberKey, fixtures: &MockFixtures) -> Vec<MockFixture> {
    metadata::requests(key)
        .get()
        .iter()
        .filter_map(|entry| entry.get_url())
        .filter_map(|url| match fixtures.get(url) {
            Some(data) => Some(MockFixture {
                url: url.to_string(),
                mock_data: data.clone(),
            }),
            None => {
                warn!("Can not find mock data for {} ({})", url, key);
                None
            }
        })
        .collect()
}

/// 查找成员某个 URL 的 mock 数据
pub fn find(key: &MemberKey, url: &str) -> Option<Value> {
    metadata::mocks(key.owner())
        .get()
        .get(key.member())
        .and_then(|fixtures| fixtures.iter().find(|f| f.url == url))
        .map(|f| f.mock_data.clone())
}
