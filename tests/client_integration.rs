//! Integration tests for the high-level client: orderbook refresh and
//! polling, order queries, agent control and the activity log.

mod common;

use common::*;
use futures_util::StreamExt;
use hyperfill_sdk::prelude::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn book(asks: usize) -> serde_json::Value {
    let asks: Vec<_> = (0..asks)
        .map(|i| json!({"price": 2 + i, "amount": 1}))
        .collect();
    json!({"status_code": 1, "orderbook": {"asks": asks, "bids": []}})
}

mod orderbook {
    use super::*;

    #[tokio::test]
    async fn test_late_response_does_not_replace_newer_snapshot() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/orderbook"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(book(1)),
            )
            .up_to_n_times(1)
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/orderbook"))
            .respond_with(ResponseTemplate::new(200).set_body_json(book(2)))
            .mount(&h.server)
            .await;

        let books = h.client.orderbooks();
        let (older, newer) = tokio::join!(books.refresh("A_B"), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            books.refresh("A_B").await
        });

        assert_eq!(newer.unwrap().asks().len(), 2);
        // The older request resolves to the snapshot already in place.
        assert_eq!(older.unwrap().asks().len(), 2);
        assert_eq!(books.snapshot("A_B").await.unwrap().asks().len(), 2);

        // Only the applied snapshot is reported.
        let log = messages(&h.client).await;
        assert_eq!(
            log,
            vec![(LogKind::Info, "Orderbook loaded: 2 asks, 0 bids".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_load_is_logged() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/orderbook"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status_code": 0, "message": "unknown market"})),
            )
            .mount(&h.server)
            .await;

        let err = h.client.orderbooks().refresh("A_B").await.unwrap_err();
        assert!(matches!(err, SdkError::Api { status_code: 0, .. }));
        let log = messages(&h.client).await;
        assert_eq!(
            log,
            vec![(LogKind::Error, "Failed to load orderbook".to_string())]
        );
    }

    #[tokio::test]
    async fn test_poller_yields_each_interval() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/orderbook"))
            .and(body_string_contains("A_B"))
            .respond_with(ResponseTemplate::new(200).set_body_json(book(3)))
            .expect(2)
            .mount(&h.server)
            .await;

        let poller = OrderbookPoller::new(h.client.clone(), "A_B", Duration::from_millis(10));
        let results: Vec<_> = Box::pin(poller.stream()).take(2).collect().await;

        assert_eq!(results.len(), 2);
        for result in results {
            let snapshot = result.unwrap();
            assert_eq!(snapshot.asks().len(), 3);
            assert_eq!(snapshot.asks()[2].total.to_string(), "3");
        }
    }
}

mod orders {
    use super::*;

    #[tokio::test]
    async fn test_cancel_order_sends_payload() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/cancel_order"))
            .and(body_string_contains("\"orderId\":\"42\""))
            .and(body_string_contains("\"side\":\"ask\""))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status_code": 1, "message": "cancelled"})),
            )
            .expect(1)
            .mount(&h.server)
            .await;

        let resp = h
            .client
            .orders()
            .cancel("42", Side::Ask, &addr(BASE), &addr(QUOTE))
            .await
            .unwrap();
        assert_eq!(resp["message"], "cancelled");
    }

    #[tokio::test]
    async fn test_order_lookup_failure_is_api_error() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/order"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status_code": 0, "message": "order not found"})),
            )
            .mount(&h.server)
            .await;

        let err = h.client.orders().get("missing").await.unwrap_err();
        match err {
            SdkError::Api { message, .. } => assert_eq!(message, "order not found"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}

mod agent {
    use super::*;

    #[tokio::test]
    async fn test_start_and_stop() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/start-bot"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success", "message": "bot started"})),
            )
            .expect(1)
            .mount(&h.server)
            .await;

        let agent = h.client.agent();
        assert_eq!(agent.status(), AgentStatus::Stopped);
        agent.start().await.unwrap();
        assert_eq!(agent.status(), AgentStatus::Running);
        assert_eq!(agent.toggle().await.unwrap(), AgentStatus::Stopped);

        let log = messages(&h.client).await;
        assert_eq!(
            log,
            vec![
                (LogKind::Info, "Starting AI agents...".to_string()),
                (LogKind::Success, "AI agents activated".to_string()),
                (LogKind::Info, "AI agents stopped".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_start_failure_keeps_agents_stopped() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/start-bot"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "error", "message": "no liquidity"})),
            )
            .mount(&h.server)
            .await;

        let agent = h.client.agent();
        assert!(agent.start().await.is_err());
        assert_eq!(agent.status(), AgentStatus::Stopped);
        let log = messages(&h.client).await;
        assert_eq!(
            log.last(),
            Some(&(LogKind::Error, "Agent start failed: no liquidity".to_string()))
        );
    }
}

mod activity {
    use super::*;

    #[tokio::test]
    async fn test_log_keeps_most_recent_entries() {
        let client = HyperFillClient::builder().log_capacity(5).build().unwrap();
        for i in 0..12 {
            client.log(format!("entry {}", i), LogKind::Info).await;
        }
        let entries: Vec<_> = client
            .activity()
            .await
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(
            entries,
            ["entry 7", "entry 8", "entry 9", "entry 10", "entry 11"]
        );
    }
}

mod wallet {
    use super::*;
    use std::sync::Arc;

    fn fresh_session(h: &Harness) -> WalletSession {
        let provider: Arc<dyn WalletProvider> = h.wallet.clone();
        WalletSession::new(Some(provider), sei_testnet())
    }

    #[tokio::test]
    async fn test_session_lifecycle_is_logged() {
        let h = harness().await;
        let mut session = fresh_session(&h);

        let account = h.client.connect_wallet(&mut session).await.unwrap();
        assert_eq!(account.address.as_str(), OWNER);

        let mut missing = WalletSession::new(None, sei_testnet());
        let err = h.client.connect_wallet(&mut missing).await.unwrap_err();
        assert_eq!(err, WalletError::ProviderUnavailable);

        h.client
            .apply_wallet_event(&mut session, WalletEvent::ChainChanged(1))
            .await;
        h.client.disconnect_wallet(&mut session).await;
        h.client.disconnect_wallet(&mut session).await;
        assert!(!session.is_connected());

        let log = messages(&h.client).await;
        assert_eq!(
            log,
            vec![
                (LogKind::Success, "Wallet connected: 0x1111...1111".to_string()),
                (
                    LogKind::Error,
                    "Wallet connection failed: No compatible wallet provider found".to_string()
                ),
                (
                    LogKind::Error,
                    "Wrong network: please switch to SEI Testnet".to_string()
                ),
                (LogKind::Info, "Wallet disconnected".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_restore_and_account_change_are_logged() {
        let h = harness().await;
        let mut session = fresh_session(&h);

        let restored = h.client.restore_wallet(&mut session).await.unwrap();
        assert!(restored.is_some());
        h.client
            .apply_wallet_event(
                &mut session,
                WalletEvent::AccountsChanged(vec![WalletAddress::new(
                    "0x2222222222222222222222222222222222222222",
                )]),
            )
            .await;
        h.client
            .apply_wallet_event(&mut session, WalletEvent::AccountsChanged(vec![]))
            .await;

        let log = messages(&h.client).await;
        assert_eq!(
            log,
            vec![
                (LogKind::Success, "Wallet connected: 0x1111...1111".to_string()),
                (LogKind::Info, "Wallet account changed: 0x2222...2222".to_string()),
                (LogKind::Info, "Wallet disconnected".to_string()),
            ]
        );
    }
}
