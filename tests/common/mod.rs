#![allow(dead_code)]

use axum::extract::ConnectInfo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::Layer;

use shortlink_pipeline::application::services::{
    AllocatorConfig, ClickIngestor, IngestConfig, LinkService,
};
use shortlink_pipeline::domain::click_worker::ClickWorkerPool;
use shortlink_pipeline::domain::entities::{Link, NewLink};
use shortlink_pipeline::domain::repositories::LinkRepository;
use shortlink_pipeline::infrastructure::persistence::InMemoryStore;
use shortlink_pipeline::routes::app_router;
use shortlink_pipeline::state::AppState;
use shortlink_pipeline::utils::code_generator::RandomCodeGenerator;

pub const BASE_URL: &str = "http://short.test";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

/// Application state over an in-memory store, with the click pipeline running.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub workers: ClickWorkerPool,
}

impl TestApp {
    pub fn router(&self) -> axum::Router {
        app_router(self.state.clone()).layer(MockConnectInfoLayer)
    }

    /// Stops the workers, flushing queued clicks into the store.
    pub async fn flush(self) -> Arc<InMemoryStore> {
        self.workers.shutdown(Duration::from_secs(5)).await;
        self.store
    }
}

pub fn link_service(store: Arc<InMemoryStore>) -> Arc<LinkService> {
    Arc::new(LinkService::new(
        store,
        Arc::new(RandomCodeGenerator),
        AllocatorConfig::default(),
    ))
}

pub fn create_test_app(config: IngestConfig) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let (ingestor, workers) =
        ClickIngestor::start(config, store.clone(), CancellationToken::new());

    TestApp {
        state: AppState::new(link_service(store.clone()), ingestor, BASE_URL),
        store,
        workers,
    }
}

/// State whose clicks are written inline, with no queue.
pub fn create_sync_state() -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let ingestor = ClickIngestor::synchronous(store.clone());

    (
        AppState::new(link_service(store.clone()), ingestor, BASE_URL),
        store,
    )
}

pub async fn create_test_link(store: &InMemoryStore, code: &str, url: &str) -> Link {
    store
        .create(NewLink {
            code: code.to_string(),
            long_url: url.to_string(),
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap()
}

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
