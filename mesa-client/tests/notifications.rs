// Notification listener against a local TCP bus

use mesa_client::notify::{TcpTransport, Transport};
use mesa_client::{NotificationListener, ReconnectPolicy};
use shared::message::{
    BusMessage, DeskEvent, EventType, HandshakePayload, OrderNotice, PROTOCOL_VERSION,
    PrintNotice, ResponsePayload,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;

fn handshake() -> HandshakePayload {
    HandshakePayload {
        version: PROTOCOL_VERSION,
        client_name: Some("test-desk".into()),
        client_version: None,
        token: Some("test-token".into()),
    }
}

fn fast_policy(max_attempts: u32) -> ReconnectPolicy {
    ReconnectPolicy {
        max_attempts,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
    }
}

#[tokio::test]
async fn forwards_desk_events_after_handshake() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let transport = TcpTransport::from_stream(stream);

        let hello = transport.read_message().await.unwrap();
        assert_eq!(hello.event_type, EventType::Handshake);
        let payload: HandshakePayload = hello.parse_payload().unwrap();
        assert_eq!(payload.token.as_deref(), Some("test-token"));
        transport
            .write_message(
                &BusMessage::response(&ResponsePayload::success("welcome"))
                    .unwrap()
                    .with_correlation_id(hello.request_id),
            )
            .await
            .unwrap();

        let events = [
            DeskEvent::NewOrder(OrderNotice {
                order_id: "o1".into(),
                order_number: "1001".into(),
                table_number: Some("4".into()),
            }),
            DeskEvent::PrintRequested(PrintNotice {
                order_id: "o1".into(),
                order_number: "1001".into(),
                table_number: Some("4".into()),
                printer: Some("kitchen".into()),
            }),
        ];
        for event in &events {
            transport
                .write_message(&BusMessage::notification(event).unwrap())
                .await
                .unwrap();
        }
        // keep the connection open until the client is done
        tokio::time::sleep(Duration::from_millis(500)).await;
    });

    let notify = NotificationListener::spawn(addr, handshake(), fast_policy(3));
    let mut rx = notify.subscribe();

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first, DeskEvent::NewOrder(ref n) if n.order_number == "1001"));

    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.to_string(), "print order #1001 on kitchen");

    notify.stop().await;
    server.await.unwrap();
}

#[tokio::test]
async fn gives_up_after_configured_attempts_and_closes_channel() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let notify = NotificationListener::spawn(addr, handshake(), fast_policy(3));
    let mut rx = notify.subscribe();

    let result = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert!(matches!(result, Err(RecvError::Closed)));

    tokio::time::timeout(Duration::from_secs(1), async {
        while !notify.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn rejected_handshake_counts_as_failed_attempt() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let mut accepted = 0u32;
        // two attempts, both rejected
        while accepted < 2 {
            let (stream, _) = listener.accept().await.unwrap();
            accepted += 1;
            let transport = TcpTransport::from_stream(stream);
            let _hello = transport.read_message().await.unwrap();
            transport
                .write_message(
                    &BusMessage::response(&ResponsePayload::error(
                        "invalid token",
                        Some("TOKEN_INVALID".into()),
                    ))
                    .unwrap(),
                )
                .await
                .unwrap();
        }
        accepted
    });

    let notify = NotificationListener::spawn(addr, handshake(), fast_policy(2));
    let mut rx = notify.subscribe();

    let result = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert!(matches!(result, Err(RecvError::Closed)));
    assert_eq!(server.await.unwrap(), 2);
}
