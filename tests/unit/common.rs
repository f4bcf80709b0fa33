use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use termlens::store::MemoryQueryStore;
use termlens::{create_router, AnalyticsGateway, AppState};
use termlens_db::{ClientManager, ClientPool, ExecutionFailure, RawResult, WarehouseClient};
use termlens_query::{AnalyticalQuerySpec, Catalog};

/// Scripted warehouse shared by every client the fake manager hands out.
#[derive(Default)]
pub struct FakeWarehouse {
    result: Mutex<Option<Result<RawResult, ExecutionFailure>>>,
    seen: Mutex<Vec<AnalyticalQuerySpec>>,
}

impl FakeWarehouse {
    pub fn respond(&self, result: Result<RawResult, ExecutionFailure>) {
        *self.result.lock().unwrap() = Some(result);
    }

    pub fn rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        self.respond(Ok(RawResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }));
    }

    pub fn seen(&self) -> Vec<AnalyticalQuerySpec> {
        self.seen.lock().unwrap().clone()
    }
}

pub struct FakeClient(Arc<FakeWarehouse>);

#[async_trait::async_trait]
impl WarehouseClient for FakeClient {
    async fn run(&self, spec: &AnalyticalQuerySpec) -> Result<RawResult, ExecutionFailure> {
        self.0.seen.lock().unwrap().push(spec.clone());
        self.0
            .result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(RawResult::default()))
    }
}

pub struct FakeManager {
    pub warehouse: Arc<FakeWarehouse>,
    pub created: AtomicUsize,
    pub fail_with: Option<String>,
}

#[async_trait::async_trait]
impl ClientManager for FakeManager {
    type Client = FakeClient;

    async fn create(&self) -> termlens_db::Result<FakeClient> {
        if let Some(msg) = &self.fail_with {
            return Err(termlens_db::Error::Generic(msg.clone()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(FakeClient(Arc::clone(&self.warehouse)))
    }
}

pub struct TestApp {
    pub router: Router,
    pub warehouse: Arc<FakeWarehouse>,
    pub gateway: Arc<AnalyticsGateway<FakeManager>>,
}

pub fn catalog() -> Catalog {
    Catalog::new("google_trends", "top_terms", "top_rising_terms").unwrap()
}

pub fn test_app() -> TestApp {
    app_with(None)
}

pub fn app_with(fail_with: Option<&str>) -> TestApp {
    let warehouse = Arc::new(FakeWarehouse::default());
    let manager = FakeManager {
        warehouse: Arc::clone(&warehouse),
        created: AtomicUsize::new(0),
        fail_with: fail_with.map(str::to_string),
    };
    let gateway = Arc::new(AnalyticsGateway::new(catalog(), ClientPool::new(manager)));
    let state = AppState {
        analytics: gateway.clone(),
        store: Arc::new(MemoryQueryStore::new()),
    };
    TestApp {
        router: create_router(state),
        warehouse,
        gateway,
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::post(uri).body(Body::empty()).unwrap()).await
}
