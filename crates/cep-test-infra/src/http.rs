use crate::Result;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the stub answers a request for one path.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Reply with the given status and raw body.
    Body { status: u16, body: String },
    /// Wait, then reply with the given status and body.
    Delayed {
        delay: Duration,
        status: u16,
        body: String,
    },
    /// Send the status line, then abort the connection before any body.
    Hangup,
}

impl StubResponse {
    /// A `200 OK` response with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self::Body {
            status: 200,
            body: body.into(),
        }
    }

    /// An empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self::Body {
            status,
            body: String::new(),
        }
    }
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, StubResponse>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

/// An axum server answering GET requests with canned responses and
/// counting hits per path.
///
/// Paths without a configured response get an empty `404`.
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Binds to an ephemeral local port and starts serving.
    pub async fn start<I, P>(routes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, StubResponse)>,
        P: Into<String>,
    {
        let state = StubState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(path, response)| (path.into(), response))
                    .collect(),
            ),
            hits: Arc::new(Mutex::new(HashMap::new())),
        };
        let hits = Arc::clone(&state.hits);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new().fallback(canned_handler).with_state(state);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, hits, handle })
    }

    /// Base URL of the server, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().get(path).copied().unwrap_or(0)
    }

    /// Number of requests received for any path.
    pub fn total_hits(&self) -> usize {
        self.hits.lock().values().sum()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn canned_handler(State(state): State<StubState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    *state.hits.lock().entry(path.clone()).or_insert(0) += 1;

    match state.routes.get(&path).cloned() {
        Some(StubResponse::Body { status, body }) => json_response(status, body),
        Some(StubResponse::Delayed {
            delay,
            status,
            body,
        }) => {
            tokio::time::sleep(delay).await;
            json_response(status, body)
        }
        Some(StubResponse::Hangup) => hangup_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn json_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// A response whose body stream fails, which makes hyper drop the
/// connection mid-response.
fn hangup_response() -> Response {
    let broken = futures::stream::once(async {
        Err::<Bytes, _>(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "stub hung up",
        ))
    });
    Response::new(Body::from_stream(broken))
}
