//! End-to-end behaviour of `GET /get_quote` against local mock upstreams.

use serde_json::json;

mod common;

const JOKE: &str =
    r#"{"setup":"Why did the chicken cross the road?","punchline":"To get to the other side.","type":"general"}"#;
const QUOTE: &str = r#"{"content":"Just do it.","author":"Anon","tags":["motivational"]}"#;

#[tokio::test]
async fn test_humor_happy_path() {
    let (joke_addr, jokes_seen) = common::start_mock_backend(200, JOKE).await;
    let (quote_addr, quotes_seen) = common::start_mock_backend(200, QUOTE).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config(joke_addr, quote_addr)).await;

    for query in ["?genre=humor", "?genre=%20Fun%20", "?genre=HUMOR"] {
        let body = common::get_quote(gateway, query).await;
        assert_eq!(
            body,
            json!({
                "success": true,
                "quote": "Why did the chicken cross the road? To get to the other side.",
                "author": "general",
                "tags": ["humor"],
                "message": "OK"
            })
        );
    }

    let jokes_seen = jokes_seen.lock().unwrap().clone();
    assert_eq!(jokes_seen.len(), 3);
    assert!(jokes_seen.iter().all(|line| line.starts_with("GET /jokes/random ")));
    assert!(quotes_seen.lock().unwrap().is_empty(), "quote API must not be called for humor");

    shutdown.trigger();
}

#[tokio::test]
async fn test_quote_happy_path_forwards_tags() {
    let (joke_addr, jokes_seen) = common::start_mock_backend(200, JOKE).await;
    let (quote_addr, quotes_seen) = common::start_mock_backend(200, QUOTE).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config(joke_addr, quote_addr)).await;

    let body = common::get_quote(gateway, "?genre=motivational").await;
    assert_eq!(
        body,
        json!({
            "success": true,
            "quote": "Just do it.",
            "author": "Anon",
            "tags": ["motivational"],
            "message": "OK"
        })
    );

    assert_eq!(
        quotes_seen.lock().unwrap().clone(),
        vec!["GET /random?tags=motivational HTTP/1.1".to_string()]
    );
    assert!(jokes_seen.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_and_blank_genre_default_to_inspirational() {
    let (joke_addr, _) = common::start_mock_backend(200, JOKE).await;
    let (quote_addr, quotes_seen) = common::start_mock_backend(200, QUOTE).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config(joke_addr, quote_addr)).await;

    let mut bodies = Vec::new();
    for query in ["", "?genre=", "?genre=%20%20%20", "?genre=+"] {
        bodies.push(common::get_quote(gateway, query).await);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    let seen = quotes_seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|line| line == "GET /random?tags=inspirational HTTP/1.1"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_error_message_is_reported_with_200() {
    let (joke_addr, _) = common::start_mock_backend(404, r#"{"message":"no jokes today"}"#).await;
    let (quote_addr, _) = common::start_mock_backend(404, "Not Found").await;
    let (gateway, shutdown) = common::start_gateway(common::test_config(joke_addr, quote_addr)).await;

    let body = common::get_quote(gateway, "?genre=fun").await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "quote": null,
            "author": null,
            "tags": ["humor"],
            "message": "Joke API error: no jokes today"
        })
    );

    let body = common::get_quote(gateway, "?genre=love").await;
    assert_eq!(body["message"], "Quotable API error: Not Found");
    assert_eq!(body["tags"], json!([]));

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_and_home() {
    let (joke_addr, _) = common::start_mock_backend(200, JOKE).await;
    let (quote_addr, _) = common::start_mock_backend(200, QUOTE).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config(joke_addr, quote_addr)).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("http://{}/health", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.json::<serde_json::Value>().await.unwrap(), json!({ "status": "ok" }));

    let res = client.get(format!("http://{}/", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("<html"));

    shutdown.trigger();
}
