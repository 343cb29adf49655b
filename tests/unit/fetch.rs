use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::*;

/// Serve one canned HTTP response on a loopback port and return its base URL.
async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = sock.read(&mut buf).await;
        let head = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: image/png\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        sock.write_all(head.as_bytes()).await.unwrap();
        sock.write_all(&body).await.unwrap();
        let _ = sock.shutdown().await;
    });
    format!("http://{addr}")
}

/// Accept connections on a loopback port and never answer them.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });
    format!("http://{addr}")
}

fn loopback_fetcher(opts: &ImprintOpts) -> HttpFetcher {
    let client = reqwest::Client::builder()
        .timeout(opts.fetch_timeout)
        .no_proxy()
        .build()
        .unwrap();
    HttpFetcher::with_client(client, opts)
}

fn opts() -> ImprintOpts {
    ImprintOpts {
        fetch_timeout: Duration::from_secs(5),
        ..ImprintOpts::default()
    }
}

#[tokio::test]
async fn success_returns_body() {
    let base = serve_once("200 OK", b"pixels".to_vec()).await;
    let fetcher = loopback_fetcher(&opts());
    let bytes = fetcher.fetch(&format!("{base}/bg.png")).await.unwrap();
    assert_eq!(bytes, b"pixels");
}

#[tokio::test]
async fn non_success_status_names_the_url() {
    let base = serve_once("404 Not Found", Vec::new()).await;
    let url = format!("{base}/missing.png");
    let fetcher = loopback_fetcher(&opts());
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, ImprintError::Fetch(_)));
    assert!(err.to_string().contains(&url));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let base = serve_once("200 OK", vec![0u8; 64]).await;
    let fetcher = loopback_fetcher(&ImprintOpts {
        max_background_bytes: 16,
        ..opts()
    });
    let err = fetcher.fetch(&format!("{base}/big.png")).await.unwrap_err();
    assert!(err.to_string().contains("exceeds 16 bytes"));
}

#[tokio::test]
async fn unreachable_host_names_the_url() {
    let url = "http://imprint-no-such-host.invalid/bg.png";
    let fetcher = HttpFetcher::new(&opts()).unwrap();
    let err = fetcher.fetch(url).await.unwrap_err();
    assert!(matches!(err, ImprintError::Fetch(_)));
    assert!(err.to_string().contains(url));
}

#[tokio::test]
async fn silent_server_times_out_naming_the_url() {
    let base = silent_server().await;
    let url = format!("{base}/slow.png");
    let fetcher = loopback_fetcher(&ImprintOpts {
        fetch_timeout: Duration::from_millis(200),
        ..ImprintOpts::default()
    });
    let started = std::time::Instant::now();
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(err, ImprintError::Fetch(_)));
    let msg = err.to_string();
    assert!(msg.contains(&url), "{msg}");
    assert!(msg.contains("timed out"), "{msg}");
}
