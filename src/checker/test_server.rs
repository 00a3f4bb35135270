// src/checker/test_server.rs
// =============================================================================
// A tiny HTTP responder for tests, so link checks never hit the internet.
//
// Routes:
//   /status/{code}  -> empty response with that status
//   /slow/{ms}      -> waits {ms} milliseconds, then 200
//   /hang           -> reads the request and never answers
//
// It also tracks how many requests were seen and the highest number being
// served at the same moment.
// =============================================================================

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Default)]
struct Stats {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_user_agent: Mutex<Option<String>>,
}

pub struct TestServer {
    addr: SocketAddr,
    stats: Arc<Stats>,
}

impl TestServer {
    pub async fn spawn() -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stats = Arc::new(Stats::default());

        let accept_stats = Arc::clone(&stats);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&accept_stats)));
            }
        });

        TestServer { addr, stats }
    }

    /// An address nothing is listening on.
    pub async fn unused_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> usize {
        self.stats.hits.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.stats.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_user_agent(&self) -> Option<String> {
        self.stats.last_user_agent.lock().unwrap().clone()
    }
}

async fn serve(mut stream: TcpStream, stats: Arc<Stats>) {
    let Some(head) = read_head(&mut stream).await else {
        return;
    };
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();
    let agent = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("user-agent").then(|| value.trim().to_string())
        });

    stats.hits.fetch_add(1, Ordering::SeqCst);
    *stats.last_user_agent.lock().unwrap() = agent;
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

    let code = if let Some(code) = path.strip_prefix("/status/") {
        code.parse().unwrap_or(500)
    } else if let Some(ms) = path.strip_prefix("/slow/") {
        tokio::time::sleep(Duration::from_millis(ms.parse().unwrap_or(0))).await;
        200
    } else if path == "/hang" {
        tokio::time::sleep(Duration::from_secs(30)).await;
        200
    } else {
        404
    };

    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        code
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}
