//! End-to-end tests: a real listener on an ephemeral port, driven by the client

use std::path::PathBuf;

use beacon::client::Client;
use beacon::config::Config;
use beacon::http::response::StatusCode;
use beacon::server::{Server, bind};
use beacon::store::{FileStore, MemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        reuse_address: true,
        ..Config::default()
    }
}

async fn start(store: MemoryStore) -> (Client, oneshot::Sender<()>, JoinHandle<()>) {
    let cfg = test_config();
    let listener = bind(&cfg).await.unwrap();
    let server = Server::new(listener, store, &cfg);
    let addr = server.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server.run(rx).await;
    });

    (Client::new(addr.to_string()), tx, handle)
}

#[tokio::test]
async fn test_server_index() {
    let (client, shutdown, handle) = start(MemoryStore::new()).await;

    let response = client.index().await.unwrap();

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.body_text().contains("Beacon Server"));

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_server_put_get_round_trip() {
    let store = MemoryStore::new();
    let (client, shutdown, handle) = start(store.clone()).await;

    let put = client.put("foo", "5").await.unwrap();
    assert_eq!(put.status, StatusCode::Ok);

    let get = client.get("foo").await.unwrap();
    assert_eq!(get.body_text(), "5");

    let missing = client.get("bar").await.unwrap();
    assert_eq!(missing.status, StatusCode::Ok);
    assert_eq!(missing.body_text(), "Not found");

    client.put("bar", "7").await.unwrap();
    let all = client.get_all().await.unwrap();
    assert_eq!(all.body_text(), "bar:7\nfoo:5");

    assert_eq!(store.len(), 2);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_server_survives_bad_requests() {
    let (client, shutdown, handle) = start(MemoryStore::new()).await;

    // Malformed request line
    let mut stream = TcpStream::connect(client.addr()).await.unwrap();
    stream.write_all(b"GARBAGE\r\n\r\n").await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));

    // Peer that hangs up without sending anything
    drop(TcpStream::connect(client.addr()).await.unwrap());

    // Unknown method
    let mut stream = TcpStream::connect(client.addr()).await.unwrap();
    stream.write_all(b"DELETE / HTTP/1.0\r\n\r\n").await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));

    // Still serving
    let response = client.index().await.unwrap();
    assert_eq!(response.status, StatusCode::Ok);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let (client, shutdown, handle) = start(MemoryStore::new()).await;

    shutdown.send(()).unwrap();
    handle.await.unwrap();

    assert!(client.index().await.is_err());
}

#[tokio::test]
async fn test_server_with_file_store() {
    let path: PathBuf =
        std::env::temp_dir().join(format!("beacon-e2e-{}", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let cfg = test_config();
    let listener = bind(&cfg).await.unwrap();
    let server = Server::new(listener, FileStore::new(&path), &cfg);
    let client = Client::new(server.local_addr().unwrap().to_string());

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move { server.run(rx).await });

    client.put("beacon-1", "49.28,-123.11").await.unwrap();
    let response = client.get("beacon-1").await.unwrap();
    assert_eq!(response.body_text(), "49.28,-123.11");

    tx.send(()).unwrap();
    handle.await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("beacon-1"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_client_from_url() {
    let client = Client::from_url("http://localhost:9000").unwrap();
    assert_eq!(client.addr(), "localhost:9000");

    let client = Client::from_url("http://example.com").unwrap();
    assert_eq!(client.addr(), "example.com:80");

    assert!(Client::from_url("not a url").is_err());
}

#[tokio::test]
async fn test_client_rejects_reserved_characters() {
    let client = Client::new("127.0.0.1:1");

    assert!(client.get("a b").await.is_err());
    assert!(client.put("k", "a&b").await.is_err());
    assert!(client.put("", "v").await.is_err());
}
