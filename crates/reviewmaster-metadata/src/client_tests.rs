// SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
mod tests {
    use crate::{LookupError, ShowLookupClient};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_response() -> serde_json::Value {
        serde_json::json!([
            {
                "score": 0.41,
                "show": {
                    "id": 2,
                    "name": "Breaking Bad: Original Minisodes",
                    "genres": ["Drama"],
                    "premiered": "2009-02-17",
                    "rating": {"average": null}
                }
            },
            {
                "score": 0.91,
                "show": {
                    "id": 169,
                    "name": "Breaking Bad",
                    "genres": ["Drama", "Crime", "Thriller"],
                    "premiered": "2008-01-20",
                    "rating": {"average": 9.2}
                }
            }
        ])
    }

    fn cast_response() -> serde_json::Value {
        serde_json::json!([
            {"person": {"id": 14245, "name": "Bryan Cranston"}, "character": {"name": "Walter White"}},
            {"person": {"id": 14246, "name": "Aaron Paul"}, "character": {"name": "Jesse Pinkman"}}
        ])
    }

    fn client_for(server: &MockServer) -> ShowLookupClient {
        ShowLookupClient::builder()
            .base_url(server.uri())
            .request_interval(Duration::ZERO)
            .build()
            .unwrap()
    }

    async fn mount_breaking_bad(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .and(query_param("q", "Breaking Bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shows/169/cast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cast_response()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shows/2/cast"))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_lookup_orders_by_score_and_attaches_cast() {
        let mock_server = MockServer::start().await;
        mount_breaking_bad(&mock_server).await;

        let client = client_for(&mock_server);
        let candidates = client.lookup("Breaking Bad").await.unwrap();

        assert_eq!(candidates.len(), 2);
        let best = &candidates[0];
        assert_eq!(best.external_id, 169);
        assert_eq!(best.title, "Breaking Bad");
        assert_eq!(best.premiere_year, Some(2008));
        assert_eq!(best.cast, vec!["Bryan Cranston", "Aaron Paul"]);
        assert_eq!(best.rating, Some(9.2));

        // A show without a cast listing still comes back.
        assert!(candidates[1].cast.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let mock_server = MockServer::start().await;
        mount_breaking_bad(&mock_server).await;

        let client = client_for(&mock_server);
        client.lookup("Breaking Bad").await.unwrap();
        let requests_after_first = mock_server.received_requests().await.unwrap().len();

        client.lookup("  breaking bad ").await.unwrap();
        let requests_after_second = mock_server.received_requests().await.unwrap().len();
        assert_eq!(requests_after_first, requests_after_second);
    }

    #[tokio::test]
    async fn test_max_candidates_limits_cast_requests() {
        let mock_server = MockServer::start().await;
        mount_breaking_bad(&mock_server).await;

        let client = ShowLookupClient::builder()
            .base_url(mock_server.uri())
            .request_interval(Duration::ZERO)
            .max_candidates(1)
            .build()
            .unwrap();
        let candidates = client.lookup("Breaking Bad").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].external_id, 169);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2, "one search plus one cast request");
    }

    #[tokio::test]
    async fn test_no_matches_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(client.lookup("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_429_is_throttled() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.lookup("Test").await;
        assert!(matches!(result, Err(LookupError::Throttled)));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        match client.lookup("Test").await {
            Err(LookupError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_html_body_is_malformed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/shows"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(matches!(
            client.lookup("Test").await,
            Err(LookupError::Malformed(_))
        ));
    }
}
