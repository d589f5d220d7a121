//! Tests for the gateway client against local HTTP servers

#[cfg(test)]
mod tests {
    use crate::{
        TransactionDetails,
        config::GatewayConfig,
        error::BatchError,
        gateway::{DetailResolver, GatewayClient},
        test_utils::{details, pending},
    };
    use axum::{Json, Router, extract::Path, routing::get};
    use std::time::Duration;

    fn client(url: &str) -> GatewayClient {
        GatewayClient::new(&GatewayConfig {
            url: url.to_string(),
            timeout_ms: 2_000,
        })
        .unwrap()
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    /// Earlier queue entries answer later
    async fn slow_details(Path((_chain, id)): Path<(u64, String)>) -> Json<TransactionDetails> {
        let n: u64 = id.trim_start_matches("multisig_").parse().unwrap();
        tokio::time::sleep(Duration::from_millis(150 - 50 * n)).await;
        Json(details(n))
    }

    #[tokio::test]
    async fn test_resolve_keeps_queue_order_when_answers_arrive_reversed() {
        let url = serve(Router::new().route(
            "/v1/chains/:chain/transactions/:id",
            get(slow_details),
        ))
        .await;

        let resolved = client(&url).resolve(&pending(&[1, 2, 3]), 5).await.unwrap();
        assert_eq!(resolved, vec![details(1), details(2), details(3)]);
    }

    #[tokio::test]
    async fn test_rejected_lookup_keeps_gateway_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/chains/5/transactions/multisig_1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&details(1)).unwrap())
            .create_async()
            .await;
        let missing = server
            .mock("GET", "/v1/chains/5/transactions/multisig_2")
            .with_status(404)
            .with_body(r#"{"code":1337,"message":"Could not find transaction"}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .resolve(&pending(&[1, 2]), 5)
            .await
            .unwrap_err();

        match err {
            BatchError::DetailResolution { tx_id, reason } => {
                assert_eq!(tx_id, "multisig_2");
                assert!(reason.starts_with("404"));
                assert!(reason.contains("Could not find transaction"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_details_are_a_resolution_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/chains/5/transactions/multisig_1")
            .with_status(200)
            .with_body(r#"{"txId":"multisig_1"}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .resolve(&pending(&[1]), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::DetailResolution { ref tx_id, .. } if tx_id == "multisig_1"));
    }
}
