use httpmock::{Method::GET, Method::POST, MockServer};
use reqwest::Method;
use serde::Deserialize;
use uphold::{Client, Config, Error};

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Thing {
    a: String,
}

fn client_for(server: &MockServer) -> Client {
    let cfg = Config::default().with_api_url(&server.base_url()).unwrap();
    Client::new(cfg).unwrap()
}

#[tokio::test]
async fn relative_path_hits_api_base() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/foo").header("accept", "application/json");
            then.status(200).json_body(serde_json::json!({"a": "x"}));
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "foo").unwrap();
    let (thing, res): (Thing, _) = client.execute(req).await.unwrap();
    m.assert_async().await;
    assert_eq!(thing, Thing { a: "x".into() });
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn listing_decodes_in_order() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/things");
            then.status(200)
                .json_body(serde_json::json!([{"a": "one"}, {"a": "two"}]));
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "things").unwrap();
    let (things, _): (Vec<Thing>, _) = client.execute(req).await.unwrap();
    let names: Vec<_> = things.iter().map(|t| t.a.as_str()).collect();
    assert_eq!(names, ["one", "two"]);
}

#[tokio::test]
async fn api_error_carries_body_and_updates_rate() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/me/cards");
            then.status(400)
                .header("x-ratelimit-limit", "300")
                .header("x-ratelimit-remaining", "42")
                .header("x-ratelimit-reset", "1451606400")
                .json_body(serde_json::json!({
                    "message": "Validation failed",
                    "errors": [{"resource": "card", "field": "label", "code": "required"}],
                    "block": {"reason": "kyc", "created_at": "2016-01-01T00:00:00Z"}
                }));
        })
        .await;
    let client = client_for(&server);
    let req = client
        .new_request(Method::POST, "me/cards", Some(&serde_json::json!({"currency": "USD"})))
        .unwrap();
    let err = client.execute::<Thing>(req).await.unwrap_err();

    let Error::Api(api) = &err else {
        panic!("expected API error, got {err:?}");
    };
    assert_eq!(api.response.status(), 400);
    assert_eq!(api.message(), Some("Validation failed"));
    assert_eq!(api.errors()[0].field, "label");
    assert_eq!(api.errors()[0].code, "required");
    assert_eq!(api.block().unwrap().reason.as_deref(), Some("kyc"));
    assert!(err.to_string().contains("400 Bad Request: Validation failed"));

    let rate = client.rate();
    assert_eq!(rate.limit, 300);
    assert_eq!(rate.remaining, 42);
    assert_eq!(rate.reset_at.unwrap().timestamp(), 1_451_606_400);
}

#[tokio::test]
async fn exhausted_429_is_rate_limit_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ticker");
            then.status(429)
                .header("x-ratelimit-limit", "300")
                .header("x-ratelimit-remaining", "0")
                .header("x-ratelimit-reset", "1451606400")
                .header("retry-after", "30")
                .json_body(serde_json::json!({"message": "slow down"}));
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "ticker").unwrap();
    let err = client.execute::<Vec<Thing>>(req).await.unwrap_err();

    let Error::RateLimit(limited) = &err else {
        panic!("expected rate limit error, got {err:?}");
    };
    assert_eq!(limited.rate.remaining, 0);
    assert_eq!(limited.rate.retry_after, 30);
    assert_eq!(limited.error.message(), Some("slow down"));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(429));
    assert!(err.to_string().contains("2016-01-01T00:00:00+00:00"));
    assert_eq!(client.rate().remaining, 0);
}

#[tokio::test]
async fn throttled_429_with_budget_left_is_plain_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ticker");
            then.status(429).header("x-ratelimit-remaining", "5");
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "ticker").unwrap();
    let err = client.execute::<Vec<Thing>>(req).await.unwrap_err();
    assert!(matches!(err, Error::Api(_)));
    assert!(!err.is_rate_limited());
    assert!(err.api_error().unwrap().body.is_none());
}

#[tokio::test]
async fn empty_success_body_decodes_to_default() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/me/contacts");
            then.status(200);
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "me/contacts").unwrap();
    let (things, res): (Vec<Thing>, _) = client.execute(req).await.unwrap();
    assert!(things.is_empty());
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn whitespace_success_body_decodes_to_default() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/me/contacts");
            then.status(200).body(" \r\n");
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "me/contacts").unwrap();
    let (things, _): (Vec<Thing>, _) = client.execute(req).await.unwrap();
    assert!(things.is_empty());
}

#[tokio::test]
async fn truncated_success_body_is_serialization_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/things");
            then.status(200).body(r#"[{"a":"one"},{"a":"tw"#);
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "things").unwrap();
    let err = client.execute::<Vec<Thing>>(req).await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)), "got {err:?}");
}

#[tokio::test]
async fn oversized_error_body_is_capped_but_still_classified() {
    let server = MockServer::start_async().await;
    let huge = format!(r#"{{"message":"{}"}}"#, "x".repeat(64 * 1024));
    server
        .mock_async(|when, then| {
            when.method(GET).path("/me/cards");
            then.status(500)
                .header("x-ratelimit-remaining", "7")
                .body(huge);
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "me/cards").unwrap();
    let err = client.execute::<Vec<Thing>>(req).await.unwrap_err();
    let Error::Api(api) = &err else {
        panic!("expected API error, got {err:?}");
    };
    assert_eq!(api.response.status(), 500);
    // The cut-off body no longer parses as an error document.
    assert!(api.body.is_none());
    assert_eq!(client.rate().remaining, 7);
}

#[tokio::test]
async fn raw_sink_receives_body_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/raw");
            then.status(200).body("not json at all");
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "raw").unwrap();
    let mut sink = Vec::new();
    let res = client.execute_raw(req, &mut sink).await.unwrap();
    assert_eq!(sink, b"not json at all");
    assert_eq!(res.url().path(), "/raw");
}

#[tokio::test]
async fn execute_empty_ignores_body() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST).path("/ping");
            then.status(202).body("{\"ignored\":true}");
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::POST, "ping").unwrap();
    let res = client.execute_empty(req).await.unwrap();
    m.assert_async().await;
    assert_eq!(res.status(), 202);
}

#[tokio::test]
async fn malformed_success_body_is_serialization_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/foo");
            then.status(200).body("{\"a\": 1");
        })
        .await;
    let client = client_for(&server);
    let req = client.new_empty_request(Method::GET, "foo").unwrap();
    let err = client.execute::<Thing>(req).await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)), "got {err:?}");
    assert!(err.response().is_none());
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let cfg = Config::default()
        .with_api_url("http://127.0.0.1:1/v0/")
        .unwrap()
        .with_timeout(5);
    let client = Client::new(cfg).unwrap();
    let req = client.new_empty_request(Method::GET, "ticker").unwrap();
    let err = client.execute::<Vec<Thing>>(req).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert_eq!(client.rate(), uphold::Rate::default());
}

#[tokio::test]
async fn token_and_user_agent_are_sent() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/me/cards")
                .header("authorization", "Bearer secret-token")
                .header("user-agent", "my-app/1.0");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;
    let cfg = Config::default()
        .with_api_url(&server.base_url())
        .unwrap()
        .with_token("secret-token")
        .with_user_agent("my-app/1.0");
    let client = Client::new(cfg).unwrap();
    let req = client.new_empty_request(Method::GET, "me/cards").unwrap();
    let (things, _): (Vec<Thing>, _) = client.execute(req).await.unwrap();
    m.assert_async().await;
    assert!(things.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_leave_a_whole_rate_snapshot() {
    let server = MockServer::start_async().await;
    for (path, remaining) in [("/a", "100"), ("/b", "200")] {
        server
            .mock_async(move |when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .header("x-ratelimit-limit", remaining)
                    .header("x-ratelimit-remaining", remaining)
                    .json_body(serde_json::json!([]));
            })
            .await;
    }
    let client = client_for(&server);

    let mut handles = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let path = if i % 2 == 0 { "a" } else { "b" };
            let req = client.new_empty_request(Method::GET, path).unwrap();
            let (_, res): (Vec<Thing>, _) = client.execute(req).await.unwrap();
            res.rate()
        }));
    }
    for h in handles {
        let rate = h.await.unwrap();
        assert_eq!(rate.limit, rate.remaining);
    }
    let last = client.rate();
    assert_eq!(last.limit, last.remaining);
    assert!(last.remaining == 100 || last.remaining == 200);
}
