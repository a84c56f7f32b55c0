//! Loopback HTTP server that records requests and answers with canned responses.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_compression::tokio::bufread::GzipDecoder;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::{StreamExt as _, stream};
use tokio::io::AsyncReadExt as _;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub async fn json(&self) -> serde_json::Value {
        let mut decoder = GzipDecoder::new(self.body.as_slice());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).await.expect("gzip body");
        serde_json::from_slice(&out).expect("json body")
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
    /// Content-Length to advertise before sending `body` and dropping the connection.
    pub truncate_at: Option<usize>,
}

impl Reply {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
            delay: Duration::ZERO,
            truncate_at: None,
        }
    }

    pub fn no_content() -> Self {
        Self::new(204, "")
    }

    pub fn ok() -> Self {
        Self::new(200, "")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn truncated(mut self, declared: usize) -> Self {
        self.truncate_at = Some(declared);
        self
    }

    fn into_response(self) -> Response {
        let Some(declared) = self.truncate_at else {
            return (self.status, self.body).into_response();
        };

        // the pause lets the head and the partial body reach the client before the reset
        let partial = self.body.into_bytes();
        let chunks = stream::once(async move { Ok::<_, std::io::Error>(partial) }).chain(stream::once(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Err::<Vec<u8>, _>(std::io::Error::other("connection dropped mid-body"))
        }));
        Response::builder()
            .status(self.status)
            .header(header::CONTENT_LENGTH, declared)
            .body(Body::from_stream(chunks))
            .expect("response")
    }
}

type Responder = Arc<dyn Fn(&CapturedRequest) -> Reply + Send + Sync>;

struct Shared {
    requests: Mutex<Vec<CapturedRequest>>,
    hits: AtomicUsize,
    responder: Responder,
}

pub struct StubServer {
    pub addr: SocketAddr,
    shared: Arc<Shared>,
}

impl StubServer {
    pub async fn start(reply: Reply) -> Self {
        Self::start_with(move |_| reply.clone()).await
    }

    pub async fn start_with<F>(responder: F) -> Self
    where
        F: Fn(&CapturedRequest) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let shared = Arc::new(Shared {
            requests: Mutex::new(Vec::new()),
            hits: AtomicUsize::new(0),
            responder: Arc::new(responder),
        });

        let app = Router::new().fallback(capture).with_state(shared.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, shared }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, including ones still waiting on a delayed reply.
    pub fn hits(&self) -> usize {
        self.shared.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }
}

async fn capture(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    shared.hits.fetch_add(1, Ordering::SeqCst);

    let request = CapturedRequest {
        method: method.to_string(),
        target: uri.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).to_string()))
            .collect(),
        body: body.to_vec(),
    };
    let reply = (shared.responder)(&request);
    shared.requests.lock().unwrap().push(request);

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    reply.into_response()
}
