//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router and middleware stack
//! - Acquire a connection permit per request (backpressure + load signal)
//! - Invoke the classifier and publish the priority variable
//! - Act on the label: forward, throttle, or reject
//! - Forward requests to upstream pools

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{
        uri::{Authority, Scheme},
        HeaderName, HeaderValue, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::classify::{Classifier, PriorityVariable};
use crate::config::ProxyConfig;
use crate::headers::HeaderView;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::load::ConnectionGauge;
use crate::observability::metrics;
use crate::routing::{LabelRouter, RouteAction, Throttle};
use crate::upstream::PoolManager;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub gauge: Arc<ConnectionGauge>,
    pub router: Arc<LabelRouter>,
    pub pools: Arc<PoolManager>,
    pub throttle: Arc<Throttle>,
    pub client: Client<HttpConnector, Body>,
    pub variable_name: Arc<str>,
    pub variable_header: HeaderName,
}

/// HTTP server for the priority proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let gauge = Arc::new(ConnectionGauge::new(config.listener.max_connections));
        let classifier = Arc::new(Classifier::from_config(&config.policy, gauge.clone()));
        let router = Arc::new(LabelRouter::from_config(&config.routes));
        let pools = Arc::new(PoolManager::new(&config.upstreams));
        let throttle = Arc::new(Throttle::new(&config.throttle));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        // Validation rejects unusable header names before we get here.
        let variable_header = HeaderName::from_bytes(config.variable.header.as_bytes())
            .unwrap_or_else(|_| HeaderName::from_static("x-priority-label"));

        let state = AppState {
            classifier,
            gauge,
            router,
            pools,
            throttle,
            client,
            variable_name: Arc::from(config.variable.name.as_str()),
            variable_header,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.policy.mode,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Classifies the request, publishes the variable, and acts on the label.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().to_string();

    // One permit per in-flight request. The gauge holding these permits is
    // also the classifier's load provider, so the sample below sees this
    // request as active, matching the original connection accounting.
    let _permit = match state.gauge.try_acquire() {
        Some(permit) => permit,
        None => {
            tracing::warn!(request_id = %request_id, "connection capacity exhausted");
            metrics::record_rejected("capacity");
            metrics::record_request(&method, 503, "none", start);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "Connection capacity exhausted",
            )
                .into_response();
        }
    };

    // Classify against a fresh load sample; recomputed per request, never
    // reused (the variable is non-cacheable).
    let classification = {
        let view = HeaderView::from(request.headers());
        state.classifier.classify(&request_id, &view)
    };
    metrics::record_classification(state.classifier.policy_name(), &classification.label);

    let label = classification.label.clone();
    let label_value = HeaderValue::from_str(&label).ok();

    tracing::debug!(
        request_id = %request_id,
        variable = %state.variable_name,
        label = %label,
        "priority variable published"
    );

    // Publish for in-process readers.
    request
        .extensions_mut()
        .insert(PriorityVariable::new(state.variable_name.clone(), classification));

    let action = state.router.resolve(&label).clone();
    let response = match action {
        RouteAction::Reject { status } => {
            tracing::debug!(
                request_id = %request_id,
                status = %status,
                "request rejected by priority policy"
            );
            metrics::record_rejected("policy");
            metrics::record_request(&method, status.as_u16(), "none", start);
            (status, "Rejected by priority policy").into_response()
        }
        RouteAction::Throttle { pool } => {
            let client_key = addr.ip().to_string();
            if state.throttle.check(&client_key) {
                forward(
                    &state,
                    request,
                    &request_id,
                    label_value.clone(),
                    &pool,
                    &method,
                    start,
                )
                .await
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    client = %client_key,
                    "throttle limit exceeded"
                );
                metrics::record_rejected("throttle");
                metrics::record_request(&method, 429, &pool, start);
                (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response()
            }
        }
        RouteAction::Forward { pool } => {
            forward(
                &state,
                request,
                &request_id,
                label_value.clone(),
                &pool,
                &method,
                start,
            )
            .await
        }
    };

    attach_label(response, &state.variable_header, label_value)
}

/// Forward a request to a server from the named pool.
async fn forward(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
    label_value: Option<HeaderValue>,
    pool: &str,
    method: &str,
    start: Instant,
) -> Response {
    // The guard holds one upstream connection slot until the response
    // headers are back.
    let upstream = match state.pools.get(pool) {
        Some(guard) => guard,
        None => {
            tracing::warn!(request_id = %request_id, pool = %pool, "no available upstream");
            metrics::record_request(method, 503, pool, start);
            return (StatusCode::SERVICE_UNAVAILABLE, "No available upstream").into_response();
        }
    };

    let (parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Authority::from_str(&upstream.addr.to_string()).ok();
    let uri = Uri::from_parts(uri_parts).unwrap_or_else(|_| parts.uri.clone());

    let mut builder = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        // The upstream sees the published label too.
        if let Some(value) = label_value {
            headers.insert(state.variable_header.clone(), value);
        }
    }

    let outbound = match builder.body(body) {
        Ok(outbound) => outbound,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "failed to build upstream request");
            metrics::record_request(method, 500, pool, start);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build upstream request",
            )
                .into_response();
        }
    };

    match state.client.request(outbound).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(method, status.as_u16(), pool, start);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "upstream request failed");
            metrics::record_request(method, 502, pool, start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Attach the published label to the client-facing response.
fn attach_label(mut response: Response, header: &HeaderName, value: Option<HeaderValue>) -> Response {
    if let Some(value) = value {
        response.headers_mut().insert(header.clone(), value);
    }
    response
}
