//! Tests for the per-connection state machine

use std::time::Duration;

use beacon::dispatch::Dispatcher;
use beacon::http::connection::Connection;
use beacon::store::{Backend, MemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn exchange(dispatcher: &Dispatcher<MemoryStore>, request: &[u8], max_size: usize) -> String {
    let (mut client, server) = tokio::io::duplex(16 * 1024);

    client.write_all(request).await.unwrap();

    let mut conn = Connection::new(server, dispatcher, max_size, Duration::from_secs(5));
    conn.run().await.unwrap();
    drop(conn);

    let mut response = String::new();
    client.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_connection_serves_index() {
    let dispatcher = Dispatcher::new(MemoryStore::new());

    let response = exchange(&dispatcher, b"GET /index HTTP/1.0\r\n\r\n", 8000).await;

    assert_eq!(
        response,
        "HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 14\r\n\r\nBeacon Server\n"
    );
}

#[tokio::test]
async fn test_connection_put_stores_value() {
    let dispatcher = Dispatcher::new(MemoryStore::new());

    let response = exchange(
        &dispatcher,
        b"PUT /ibeacons/data HTTP/1.0\r\nContent-Length: 13\r\n\r\nval=5&key=foo",
        8000,
    )
    .await;

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.ends_with("PUT Complete\n"));
    assert_eq!(dispatcher.backend().fetch("foo").unwrap(), Some("5".to_string()));
}

#[tokio::test]
async fn test_connection_too_large_gets_413() {
    let dispatcher = Dispatcher::new(MemoryStore::new());

    let response = exchange(
        &dispatcher,
        b"PUT /ibeacons/data HTTP/1.0\r\nContent-Length: 500\r\n\r\nval=5&key=foo",
        128,
    )
    .await;

    assert!(response.starts_with("HTTP/1.0 413 Payload Too Large\r\n"));
    assert!(dispatcher.backend().is_empty());
}

#[tokio::test]
async fn test_connection_overflowing_length_gets_413() {
    let dispatcher = Dispatcher::new(MemoryStore::new());
    let request = format!(
        "PUT /ibeacons/data HTTP/1.0\r\nContent-Length: {}\r\n\r\nval=1&key=a",
        usize::MAX
    );

    let response = exchange(&dispatcher, request.as_bytes(), 8000).await;

    assert!(response.starts_with("HTTP/1.0 413 Payload Too Large\r\n"));
    assert!(dispatcher.backend().is_empty());
}

#[tokio::test]
async fn test_connection_unknown_method_gets_400() {
    let dispatcher = Dispatcher::new(MemoryStore::new());

    let response = exchange(&dispatcher, b"DELETE /ibeacons/data?foo HTTP/1.0\r\n\r\n", 8000).await;

    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_connection_incomplete_request_gets_400() {
    let dispatcher = Dispatcher::new(MemoryStore::new());
    let (mut client, server) = tokio::io::duplex(1024);

    client.write_all(b"GET /index HTTP/1.0\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    let mut conn = Connection::new(server, &dispatcher, 8000, Duration::from_secs(5));
    conn.run().await.unwrap();
    drop(conn);

    let mut response = String::new();
    client.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_connection_read_timeout() {
    let dispatcher = Dispatcher::new(MemoryStore::new());
    let (mut client, server) = tokio::io::duplex(1024);

    client.write_all(b"GET /index HTTP/1.0\r\n").await.unwrap();

    let mut conn = Connection::new(server, &dispatcher, 8000, Duration::from_millis(50));
    let result = conn.run().await;

    assert!(result.is_err());
    drop(client);
}
