//! Shared helpers for integration tests
//!
//! `FakeCatalog` is an in-process stand-in for the catalog REST API: an
//! axum server on a random port of 127.0.0.1 whose responses are scripted
//! per collection.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot, Mutex};

use folio_client::{
    client::{CollectionShape, ResourceClient},
    config::{ApiConfig, AppConfig},
    models::{Record, SearchQuery},
    FetchError,
};

#[derive(Clone)]
struct Scripted {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct CatalogState {
    lists: HashMap<String, Scripted>,
    reject_creates: Option<StatusCode>,
    next_id: i64,
    /// (collection, raw query string) of every GET
    queries: Vec<(String, Option<String>)>,
    created: Vec<serde_json::Value>,
}

pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(CatalogState {
            next_id: 1,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/:collection", get(list).post(create))
            .with_state(state.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                base_url: self.base_url(),
                timeout_secs: 5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub async fn respond(&self, collection: &str, status: u16, body: impl Into<String>) {
        self.respond_after(collection, status, body, None).await;
    }

    pub async fn respond_json(&self, collection: &str, body: serde_json::Value) {
        self.respond(collection, 200, body.to_string()).await;
    }

    pub async fn respond_after(
        &self,
        collection: &str,
        status: u16,
        body: impl Into<String>,
        delay: Option<Duration>,
    ) {
        let scripted = Scripted {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.into(),
            delay,
        };
        self.state.lock().await.lists.insert(collection.to_string(), scripted);
    }

    pub async fn reject_creates(&self, status: u16) {
        self.state.lock().await.reject_creates = Some(StatusCode::from_u16(status).expect("valid status"));
    }

    pub async fn queries(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().await.queries.clone()
    }

    pub async fn created(&self) -> Vec<serde_json::Value> {
        self.state.lock().await.created.clone()
    }
}

async fn list(
    State(state): State<Arc<Mutex<CatalogState>>>,
    Path(collection): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let scripted = {
        let mut state = state.lock().await;
        state.queries.push((collection.clone(), query));
        state.lists.get(&collection).cloned()
    };

    match scripted {
        Some(scripted) => {
            if let Some(delay) = scripted.delay {
                tokio::time::sleep(delay).await;
            }
            (
                scripted.status,
                [("content-type", "application/json")],
                scripted.body,
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(
    State(state): State<Arc<Mutex<CatalogState>>>,
    Path(_collection): Path<String>,
    body: Bytes,
) -> Response {
    let mut state = state.lock().await;
    if let Some(status) = state.reject_creates {
        return (status, r#"{"detail":"Empty field"}"#).into_response();
    }

    let mut value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let id = state.next_id;
    state.next_id += 1;
    value["id"] = serde_json::json!(id);
    state.created.push(value.clone());

    (
        StatusCode::OK,
        [("content-type", "application/json")],
        value.to_string(),
    )
        .into_response()
}

pub fn record(value: serde_json::Value) -> Record {
    Record::try_from(value).expect("test record must be an object")
}

pub type Responder = oneshot::Sender<Result<Vec<Record>, FetchError>>;

/// A pending POST: the record sent and the channel that answers it
pub type CreateCall = (Record, oneshot::Sender<Result<Record, FetchError>>);

/// Resource client whose fetches stay pending until the test answers them,
/// in whatever order it likes. Creates echo the record back unless
/// `with_scripted_creates` is used.
pub struct ScriptedClient {
    calls: mpsc::UnboundedSender<Responder>,
    creates: Option<mpsc::UnboundedSender<CreateCall>>,
}

impl ScriptedClient {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Responder>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Self { calls, creates: None }, rx)
    }

    /// Creates also wait for the test to answer them
    pub fn with_scripted_creates() -> (
        Self,
        mpsc::UnboundedReceiver<Responder>,
        mpsc::UnboundedReceiver<CreateCall>,
    ) {
        let (calls, rx) = mpsc::unbounded_channel();
        let (creates, creates_rx) = mpsc::unbounded_channel();
        (
            Self {
                calls,
                creates: Some(creates),
            },
            rx,
            creates_rx,
        )
    }
}

#[async_trait::async_trait]
impl ResourceClient for ScriptedClient {
    async fn fetch_collection(
        &self,
        _url: &str,
        _query: &SearchQuery,
        _shape: &CollectionShape,
    ) -> Result<Vec<Record>, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.calls
            .send(tx)
            .map_err(|_| FetchError::Network("test finished".to_string()))?;
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("responder dropped".to_string())))
    }

    async fn create_record(&self, _url: &str, record: &Record) -> Result<Record, FetchError> {
        let Some(creates) = &self.creates else {
            return Ok(record.clone());
        };
        let (tx, rx) = oneshot::channel();
        creates
            .send((record.clone(), tx))
            .map_err(|_| FetchError::Network("test finished".to_string()))?;
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("responder dropped".to_string())))
    }
}
