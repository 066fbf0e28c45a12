use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use chat_bridge::reply::ReplyGenerator;
use chat_bridge::routes::configure_routes;
use chat_bridge::state::AppState;

/// Pick a free local port
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

/// Start the chat server on a free port and return its base URL once
/// `/health` answers.
pub async fn spawn_server(api_key: Option<&str>, generator: Arc<dyn ReplyGenerator>) -> String {
    let state = AppState {
        api_key: api_key.map(Arc::from),
        generator,
        reply_timeout: None,
    };
    let port = free_port();
    tokio::spawn(warp::serve(configure_routes(state)).run(([127, 0, 0, 1], port)));

    let base = format!("http://127.0.0.1:{}", port);
    wait_until_ready(&format!("{}/health", base)).await;
    base
}

/// Poll `url` until it responds, for up to 5 seconds
pub async fn wait_until_ready(url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("{} did not come up within 5s", url);
}

/// Send a hand-written HTTP/1.1 request (which should carry
/// `Connection: close`) and return the status code and response body.
pub async fn send_raw(base: &str, request: &str) -> (u16, String) {
    let addr = base.trim_start_matches("http://");
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(request.as_bytes()).await.expect("write request");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read response");
    let raw = String::from_utf8_lossy(&raw).into_owned();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("status line");
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}
