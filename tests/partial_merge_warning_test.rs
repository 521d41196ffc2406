mod common;

use common::{FakeUsers, LogCapture, concat};
use reqstack::{RequestConfig, RequestDescriptor, Service, Template};
use serde_json::json;
use std::sync::Arc;

fn users_by(symbol: &str) -> RequestDescriptor {
    RequestDescriptor::get("/users").params(Template::object([("name", Template::symbol(symbol))]))
}

/// 最外层请求之上没有合并时，内层的合并结果被丢弃，并给出警告
#[tokio::test]
async fn test_outermost_request_without_merge_is_warned() {
    let logs = LogCapture::default();
    logs.install();

    let service = Service::new("PartialMerge");
    service.configure(RequestConfig::new(Arc::new(FakeUsers::new())));

    let get_users = service
        .method("get_users")
        .param("a", 0)
        .param("b", 1)
        .param("c", 2)
        .get(users_by("a"))
        .get(users_by("b"))
        .merge(concat)
        .get(users_by("c"))
        .build();

    let result = get_users
        .call(vec![json!("Alice"), json!("Bob"), json!("Carol")])
        .await
        .unwrap();

    assert_eq!(result, json!([{"id": 3, "name": "Carol"}]));
    assert_eq!(
        logs.count("PartialMerge::get_users stacks 3 requests without a merge on the outermost one"),
        1
    );
}
