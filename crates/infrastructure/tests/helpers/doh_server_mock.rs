#![allow(dead_code)]
use super::ResponseBuilder;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use dnsbench_domain::{DnsQuery, RecordType};
use dnsbench_infrastructure::WireCodec;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub enum DohBehavior {
    /// `application/dns-json` body.
    Json(serde_json::Value),
    /// `application/dns-message` body answering the incoming query.
    Wire(ResponseBuilder),
    Status(StatusCode),
    Raw {
        content_type: &'static str,
        body: &'static [u8],
    },
    /// Sleeps before answering with an empty JSON document.
    Slow(Duration),
}

struct MockState {
    get: DohBehavior,
    post: DohBehavior,
    get_hits: AtomicUsize,
    post_hits: AtomicUsize,
}

/// Loopback HTTP endpoint at `/dns-query` with separate behaviour per method.
pub struct MockDohServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl MockDohServer {
    pub async fn start(get_behavior: DohBehavior, post_behavior: DohBehavior) -> Self {
        let state = Arc::new(MockState {
            get: get_behavior,
            post: post_behavior,
            get_hits: AtomicUsize::new(0),
            post_hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/dns-query", get(handle_get).post(handle_post))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock DoH listener");
        let addr = listener.local_addr().expect("mock DoH address");

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    pub fn url(&self) -> String {
        format!("http://{}/dns-query", self.addr)
    }

    pub fn get_hits(&self) -> usize {
        self.state.get_hits.load(Ordering::SeqCst)
    }

    pub fn post_hits(&self) -> usize {
        self.state.post_hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockDohServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_get(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.get_hits.fetch_add(1, Ordering::SeqCst);
    let name = params.get("name").cloned().unwrap_or_default();
    let record_type = RecordType::parse_or_default(params.get("type").map(String::as_str).unwrap_or("A"));
    let query = WireCodec::encode(&DnsQuery::new(name.as_str(), record_type)).unwrap_or_default();
    respond(&state.get, &query).await
}

async fn handle_post(State(state): State<Arc<MockState>>, body: Bytes) -> Response {
    state.post_hits.fetch_add(1, Ordering::SeqCst);
    respond(&state.post, &body).await
}

async fn respond(behavior: &DohBehavior, query: &[u8]) -> Response {
    match behavior {
        DohBehavior::Json(value) => (
            [(header::CONTENT_TYPE, "application/dns-json")],
            value.to_string(),
        )
            .into_response(),
        DohBehavior::Wire(builder) => (
            [(header::CONTENT_TYPE, "application/dns-message")],
            builder.build(query),
        )
            .into_response(),
        DohBehavior::Status(status) => (*status).into_response(),
        DohBehavior::Raw { content_type, body } => {
            ([(header::CONTENT_TYPE, *content_type)], *body).into_response()
        }
        DohBehavior::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            (
                [(header::CONTENT_TYPE, "application/dns-json")],
                "{\"Status\":0}",
            )
                .into_response()
        }
    }
}
