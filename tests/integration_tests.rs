//! Integration tests using wiremock to simulate the posts server.

use postbind::config::ClientConfig;
use postbind::mapping::HttpFailure;
use postbind::{
    Client, ConfiguredClient, Error, Post, PostApi, PostClient, PostQuery, RawTransport,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn posts_client(mock_server: &MockServer) -> PostClient {
    PostClient::new(
        Client::builder()
            .base_url(mock_server.uri())
            .unwrap()
            .build()
            .unwrap(),
    )
}

/// Serves three posts and answers both list and count like the real resource.
async fn three_post_server() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}, {"id": "2"}])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_string("3"))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_list_all_first_page() {
    let mock_server = three_post_server().await;
    let posts = posts_client(&mock_server);

    let items = posts.list_all(&PostQuery::new().limit(2)).await.unwrap();

    assert_eq!(items, vec![Post::new("1"), Post::new("2")]);
    assert!(items.len() <= 2);
}

#[tokio::test]
async fn test_count_all_without_filter() {
    let mock_server = three_post_server().await;
    let posts = posts_client(&mock_server);

    assert_eq!(posts.count_all(None).await.unwrap(), 3);
}

#[tokio::test]
async fn test_get_all_posts_joins_list_and_count() {
    let mock_server = three_post_server().await;
    let posts = posts_client(&mock_server);
    let query = PostQuery::new().offset(0).limit(2);

    let page = posts.get_all_posts(&query).await.unwrap();

    assert_eq!(page.items, vec![Post::new("1"), Post::new("2")]);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.items, posts.list_all(&query).await.unwrap());
    assert_eq!(page.total_count, posts.count_all(None).await.unwrap());
}

#[tokio::test]
async fn test_get_all_posts_fails_with_sub_call_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Unavailable"))
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server)
        .get_all_posts(&PostQuery::default())
        .await;

    match result {
        Err(Error::HttpStatus { status, raw_response, .. }) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(raw_response, "Unavailable");
        }
        _ => panic!("Expected HttpStatus, got {:?}", result),
    }
}

#[tokio::test]
async fn test_filter_is_sent_to_list_and_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "9", "title": "Rust"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = posts_client(&mock_server)
        .get_all_posts(&PostQuery::new().filter("rust"))
        .await
        .unwrap();

    assert_eq!(page.items, vec![Post::new("9").with_title("Rust")]);
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn test_default_paging_matches_explicit_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let posts = posts_client(&mock_server);
    let implicit = posts.list_all(&PostQuery::default()).await.unwrap();
    let explicit = posts
        .list_all(&PostQuery::new().offset(0).limit(10))
        .await
        .unwrap();

    assert_eq!(implicit, explicit);
}

#[tokio::test]
async fn test_list_all_never_exceeds_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "1"}, {"id": "2"}, {"id": "3"}])),
        )
        .mount(&mock_server)
        .await;

    let items = posts_client(&mock_server)
        .list_all(&PostQuery::new().limit(2))
        .await
        .unwrap();

    assert_eq!(items, vec![Post::new("1"), Post::new("2")]);
}

#[tokio::test]
async fn test_zero_limit_is_rejected_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server)
        .list_all(&PostQuery::new().limit(0))
        .await;

    assert!(matches!(result, Err(Error::InvalidQuery(_))));
}

#[tokio::test]
async fn test_get_by_id_known() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "2", "title": "Second", "body": "Hello"})),
        )
        .mount(&mock_server)
        .await;

    let post = posts_client(&mock_server).get_by_id("2").await.unwrap();

    assert_eq!(post.id, "2");
    assert_eq!(post.title, "Second");
    assert_eq!(post.body, "Hello");
}

#[tokio::test]
async fn test_empty_id_is_rejected_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server).get_by_id("").await;

    assert!(matches!(result, Err(Error::InvalidQuery(_))));
}

#[tokio::test]
async fn test_dot_ids_never_reach_collection_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let posts = posts_client(&mock_server);

    for id in [".", ".."] {
        let result = posts.get_by_id(id).await;
        match result {
            Err(Error::InvalidQuery(message)) => assert!(message.contains(id)),
            _ => panic!("Expected InvalidQuery for {:?}, got {:?}", id, result),
        }
    }
}

#[tokio::test]
async fn test_id_count_targets_single_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "count"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let post = posts_client(&mock_server).get_by_id("count").await.unwrap();
    assert_eq!(post.id, "count");
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server).get_by_id("missing").await;

    match result {
        Err(Error::NotFound { id }) => assert_eq!(id, "missing"),
        _ => panic!("Expected NotFound, got {:?}", result),
    }
}

#[tokio::test]
async fn test_not_found_survives_custom_mappers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .status_mapper(|failure: &HttpFailure<'_>| {
            (failure.status.as_u16() == 403).then(|| Error::InvalidQuery("forbidden".to_string()))
        })
        .build()
        .unwrap();

    let err = PostClient::new(client).get_by_id("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_custom_mapper_converts_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/secret"))
        .respond_with(ResponseTemplate::new(403).set_body_string("private post"))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .status_mapper(|failure: &HttpFailure<'_>| {
            (failure.status.as_u16() == 403).then(|| {
                Error::InvalidQuery(format!(
                    "{} is {}",
                    failure.resource_id().unwrap_or("?"),
                    failure.body
                ))
            })
        })
        .build()
        .unwrap();

    let result = PostClient::new(client).get_by_id("secret").await;

    match result {
        Err(Error::InvalidQuery(message)) => assert_eq!(message, "secret is private post"),
        _ => panic!("Expected mapped error, got {:?}", result),
    }
}

#[tokio::test]
async fn test_collection_404_stays_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such collection"))
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server)
        .list_all(&PostQuery::default())
        .await;

    match result {
        Err(Error::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 404),
        _ => panic!("Expected HttpStatus, got {:?}", result),
    }
}

#[tokio::test]
async fn test_count_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("three"))
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server).count_all(None).await;

    match result {
        Err(Error::Decode {
            raw_response,
            status,
            ..
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, "three");
        }
        _ => panic!("Expected Decode, got {:?}", result),
    }
}

#[tokio::test]
async fn test_list_decode_error_on_wrong_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server)
        .list_all(&PostQuery::default())
        .await;

    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_empty_post_id_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": ""})))
        .mount(&mock_server)
        .await;

    let result = posts_client(&mock_server).get_by_id("1").await;

    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_transport_error() {
    // Reserve an ephemeral port, then free it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let posts = PostClient::new(
        Client::builder()
            .base_url(format!("http://127.0.0.1:{}", port))
            .unwrap()
            .build()
            .unwrap(),
    );

    let result = posts.count_all(None).await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("5"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let posts = PostClient::new(
        Client::builder()
            .base_url(format!("{}/api/v1", mock_server.uri()))
            .unwrap()
            .build()
            .unwrap(),
    );

    assert_eq!(posts.count_all(None).await.unwrap(), 5);
}

#[tokio::test]
async fn test_configured_client_sends_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::from_json_str(&format!(
        r#"{{ "clients": {{ "posts": {{ "url": "{}", "headers": {{ "x-api-key": "secret" }} }} }} }}"#,
        mock_server.uri()
    ))
    .unwrap();

    let posts = PostClient::from_factory(&ConfiguredClient::posts(config)).unwrap();

    assert_eq!(posts.count_all(None).await.unwrap(), 2);
}

#[tokio::test]
async fn test_env_style_override_replaces_base_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("4"))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::from_json_str(
        r#"{ "clients": { "posts": { "url": "http://127.0.0.1:9" } } }"#,
    )
    .unwrap()
    .with_overrides("APP", [("APP_POSTS_URL".to_string(), mock_server.uri())]);

    let posts = PostClient::from_factory(&ConfiguredClient::posts(config)).unwrap();

    assert_eq!(posts.count_all(None).await.unwrap(), 4);
}

#[tokio::test]
async fn test_raw_transport_strategy_same_contract() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let factory = RawTransport::new(reqwest::Client::new(), mock_server.uri());
    let posts = PostClient::from_factory(&factory).unwrap();

    let err = posts.get_by_id("gone").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_low_level_client_exposes_response_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/count"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("3")
                .insert_header("x-custom-header", "custom-value"),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();

    let response = client.get::<u64>("/posts/count").await.unwrap();

    assert_eq!(response.data, 3);
    assert_eq!(*response, 3);
    assert_eq!(response.raw_body, "3");
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.header("x-custom-header"), Some("custom-value"));
}
