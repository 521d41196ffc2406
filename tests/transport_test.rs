use reqstack::{
    ReqstackError, ReqwestClient, RequestConfig, RequestDescriptor, ResponseConfig, Service,
    Signature, Template, Validator,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(owner: &str, server: &MockServer, signature: Signature) -> Service {
    let client = ReqwestClient::new(&server.uri()).unwrap();
    let service = Service::new(owner);
    service.configure(RequestConfig::new(Arc::new(client)).with_signature(signature));
    service
}

async fn mount_users(server: &MockServer) {
    for (id, name) in [(1, "Alice"), (2, "Bob")] {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": id, "name": name}])))
            .mount(server)
            .await;
    }
}

/// 三种调用风格都能完成同一个合并请求
#[tokio::test]
async fn test_merge_over_http_with_every_signature() {
    let server = MockServer::start().await;
    mount_users(&server).await;

    for (owner, signature) in [
        ("HttpPosition", Signature::Position),
        ("HttpName", Signature::Name),
        ("HttpMix", Signature::Mix),
    ] {
        let get_users = service(owner, &server, signature)
            .method("get_users")
            .param("name1", 0)
            .param("name2", 1)
            .get(RequestDescriptor::get("/api/users").params(Template::object([("name", Template::symbol("name1"))])))
            .get(RequestDescriptor::get("/api/users").params(Template::object([("name", Template::symbol("name2"))])))
            .merge(|a, b| {
                let mut out = a.as_array().cloned().unwrap_or_default();
                out.extend(b.as_array().cloned().unwrap_or_default());
                serde_json::Value::Array(out)
            })
            .build();

        let result = get_users.call(vec![json!("Alice"), json!("Bob")]).await.unwrap();

        assert_eq!(
            result,
            json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]),
            "signature {}",
            signature
        );
    }
}

/// POST 发送解析后的 data 和请求头
#[tokio::test]
async fn test_post_with_data_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("x-request-id", "abc"))
        .and(header("authorization", "Bearer t0ken"))
        .and(body_json(json!({"name": "Carol", "role": "admin"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "Carol"})))
        .expect(1)
        .mount(&server)
        .await;

    let create_user = service("HttpPost", &server, Signature::Position)
        .method("create_user")
        .param_with("name", 0, |v| json!(v.as_str().unwrap_or_default().trim()))
        .header("auth", 1)
        .post(
            RequestDescriptor::post("/api/users")
                .data(Template::object([
                    ("name", Template::symbol("name")),
                    ("role", Template::literal("admin")),
                ]))
                .header("x-request-id", "abc")
                .key("auth"),
        )
        .build();

    let result = create_user
        .call(vec![json!("  Carol "), json!({"authorization": "Bearer t0ken"})])
        .await
        .unwrap();

    assert_eq!(result, json!({"id": 3, "name": "Carol"}));
}

/// 非 2xx 状态返回错误，catcher 可以替换它
#[tokio::test]
async fn test_status_error_and_catcher() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let service = service("HttpStatus", &server, Signature::Mix);

    let plain = service
        .method("plain")
        .get(RequestDescriptor::get("/api/broken"))
        .build();

    match plain.call(vec![]).await {
        Err(ReqstackError::Status { code, body }) => {
            assert_eq!(code, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected status error, got {:?}", other),
    }

    let caught = service
        .method("caught")
        .request(
            RequestDescriptor::get("/api/broken"),
            ResponseConfig::new().catcher(|e| json!({ "error": e.to_string() })),
        )
        .build();

    assert_eq!(
        caught.call(vec![]).await.unwrap(),
        json!({"error": "HTTP 状态异常 500: boom"})
    );
}

/// JSON Schema 校验失败时拒绝，并且不再执行转换
#[tokio::test]
async fn test_schema_validation_over_http() {
    let server = MockServer::start().await;
    mount_users(&server).await;

    let schema = json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["id", "email"]
        }
    });

    let get_user = service("HttpSchema", &server, Signature::Position)
        .method("get_user")
        .param("name", 0)
        .request(
            RequestDescriptor::get("/api/users").params(Template::object([("name", Template::symbol("name"))])),
            ResponseConfig::new()
                .validator(Validator::json_schema(&schema).unwrap())
                .transformer(|_, _| Ok(json!("should not run"))),
        )
        .build();

    let error = get_user.call(vec![json!("Alice")]).await.unwrap_err();
    let validation = error.as_validation().expect("validation error");
    assert!(validation.message.contains("email"));
}

/// 文本响应体按字符串返回，空响应体为 null
#[tokio::test]
async fn test_non_json_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let service = service("HttpBodies", &server, Signature::Name);
    let text = service.method("text").get(RequestDescriptor::get("/api/text")).build();
    let empty = service.method("empty").get(RequestDescriptor::get("/api/empty")).build();

    assert_eq!(text.call(vec![]).await.unwrap(), json!("plain text"));
    assert_eq!(empty.call(vec![]).await.unwrap(), serde_json::Value::Null);
}
