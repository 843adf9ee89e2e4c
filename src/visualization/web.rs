//! Web front end for queuelab.
//!
//! Stateless HTTP endpoints plus a WebSocket that answers each
//! `{seq, lambda, mu}` request with a snapshot tagged by the same `seq`.
//! The page drops replies older than its latest request, so a slow answer
//! never overwrites a newer one.
//!
//! This module is only available with the `web` feature.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::dashboard::DashboardSnapshot;
use crate::error::{QueueError, QueueResult};
use crate::queue::{
    HealthThresholds, OccupancyDistribution, QueueMetrics, QueueMetricsCalculator,
    QueueParameters, SweepGrid, UtilizationSweep,
};

/// Shared state for the web server. Read-only after startup.
#[derive(Debug, Clone)]
pub struct WebState {
    config: Arc<DashboardConfig>,
    calculator: QueueMetricsCalculator,
    thresholds: HealthThresholds,
}

impl Default for WebState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl WebState {
    /// Create state from validated configuration.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            calculator: QueueMetricsCalculator::from_config(&config),
            thresholds: config.thresholds(),
            config: Arc::new(config),
        }
    }

    /// Configuration the server was started with.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Compute a snapshot for (λ, μ), tagged with `seq`.
    ///
    /// # Errors
    ///
    /// `Unstable` if μ ≤ λ, `InvalidParameter` for non-positive rates.
    pub fn snapshot(&self, seq: u64, lambda: f64, mu: f64) -> QueueResult<DashboardSnapshot> {
        DashboardSnapshot::compute(
            &self.calculator,
            &self.thresholds,
            QueueParameters::new(lambda, mu),
            seq,
        )
    }
}

/// Build the router.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/metrics", get(metrics_handler))
        .route("/api/distribution", get(distribution_handler))
        .route("/api/sweep", get(sweep_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails.
pub async fn serve(config: DashboardConfig) -> QueueResult<()> {
    let addr = format!(
        "{}:{}",
        config.visualization.web.bind, config.visualization.web.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "queuelab web dashboard listening");
    axum::serve(listener, router(WebState::new(config))).await?;
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable kind: `unstable`, `invalid_parameter` or `internal`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorBody {
    fn from_error(err: &QueueError) -> (StatusCode, Self) {
        let (status, kind) = match err {
            QueueError::Unstable { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "unstable"),
            QueueError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, "invalid_parameter"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        (
            status,
            Self {
                error: kind.to_string(),
                message: err.to_string(),
            },
        )
    }
}

/// Handler error mapping [`QueueError`] onto an HTTP status.
#[derive(Debug)]
pub struct ApiError(pub QueueError);

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = ErrorBody::from_error(&self.0);
        tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// HTTP handlers
// ============================================================================

/// Query for endpoints taking (λ, μ).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatesQuery {
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ.
    pub mu: f64,
}

/// Query for `/api/distribution`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DistributionQuery {
    /// Utilization ρ.
    pub rho: f64,
    /// Number of levels; the configured length when absent.
    pub max_n: Option<usize>,
}

/// Query for `/api/sweep`. Absent fields fall back to the configured grid.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SweepQuery {
    /// Fixed service rate μ.
    pub mu: Option<f64>,
    /// Smallest sampled utilization.
    pub rho_min: Option<f64>,
    /// Largest sampled utilization.
    pub rho_max: Option<f64>,
    /// Number of samples.
    pub steps: Option<usize>,
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics_handler(
    State(state): State<WebState>,
    Query(q): Query<RatesQuery>,
) -> ApiResult<QueueMetrics> {
    let metrics = state
        .calculator
        .compute(&QueueParameters::new(q.lambda, q.mu))?;
    Ok(Json(metrics))
}

async fn distribution_handler(
    State(state): State<WebState>,
    Query(q): Query<DistributionQuery>,
) -> ApiResult<OccupancyDistribution> {
    let max_n = q.max_n.unwrap_or(state.calculator.max_n);
    Ok(Json(state.calculator.occupancy_distribution(q.rho, max_n)?))
}

async fn sweep_handler(
    State(state): State<WebState>,
    Query(q): Query<SweepQuery>,
) -> ApiResult<UtilizationSweep> {
    let base = state.calculator.grid;
    let grid = SweepGrid {
        service_rate: q.mu.unwrap_or(base.service_rate),
        rho_min: q.rho_min.unwrap_or(base.rho_min),
        rho_max: q.rho_max.unwrap_or(base.rho_max),
        steps: q.steps.unwrap_or(base.steps),
    };
    grid.check()?;
    Ok(Json(state.calculator.utilization_sweep(
        grid.service_rate,
        grid.rho_min,
        grid.rho_max,
        grid.steps,
    )))
}

async fn dashboard_handler(
    State(state): State<WebState>,
    Query(q): Query<RatesQuery>,
) -> ApiResult<DashboardSnapshot> {
    Ok(Json(state.snapshot(0, q.lambda, q.mu)?))
}

// ============================================================================
// WebSocket
// ============================================================================

/// Request sent by the page on every slider change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WsRequest {
    /// Client-side sequence number of the request.
    pub seq: u64,
    /// Arrival rate λ.
    pub lambda: f64,
    /// Service rate μ.
    pub mu: f64,
}

/// Reply to a [`WsRequest`]. Exactly one of `snapshot` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsReply {
    /// Sequence number of the request this answers.
    pub seq: u64,
    /// Snapshot when the inputs are stable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<DashboardSnapshot>,
    /// Error when they are not, or the request was malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl WsReply {
    /// Answer one text frame.
    #[must_use]
    pub fn answer(state: &WebState, text: &str) -> Self {
        let request: WsRequest = match serde_json::from_str(text) {
            Ok(r) => r,
            Err(e) => {
                return Self {
                    seq: 0,
                    snapshot: None,
                    error: Some(ErrorBody {
                        error: "bad_request".to_string(),
                        message: format!("expected {{seq, lambda, mu}}: {e}"),
                    }),
                }
            }
        };

        match state.snapshot(request.seq, request.lambda, request.mu) {
            Ok(snapshot) => Self {
                seq: request.seq,
                snapshot: Some(snapshot),
                error: None,
            },
            Err(e) => Self {
                seq: request.seq,
                snapshot: None,
                error: Some(ErrorBody::from_error(&e).1),
            },
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: WebState) {
    tracing::debug!("websocket client connected");

    while let Some(result) = socket.recv().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = WsReply::answer(&state, &text);
                let json = match serde_json::to_string(&reply) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to serialize websocket reply");
                        break;
                    }
                };
                if socket.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    tracing::debug!("websocket client disconnected");
}

/// Single-page dashboard.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>queuelab - M/M/1 Dashboard</title>
    <style>
        body { font-family: monospace; background: #1a1a2e; color: #eee; padding: 20px; }
        .metric { margin: 6px 0; }
        .value { color: #00ff88; }
        .healthy { color: #00ff88; }
        .warning { color: #ffd166; }
        .critical { color: #ff6b6b; }
        #status { color: #ff6b6b; }
        #status.connected { color: #00ff88; }
        input[type=range] { width: 320px; }
    </style>
</head>
<body>
    <h1>M/M/1 Queue Dashboard</h1>
    <div id="status">Disconnected</div>
    <div class="metric">Arrival rate λ: <input id="lambda" type="range" min="1" max="100" value="30"> <span id="lambda-v" class="value">30</span> /h</div>
    <div class="metric">Service rate μ: <input id="mu" type="range" min="1" max="100" value="35"> <span id="mu-v" class="value">35</span> /h</div>
    <h2 id="health"></h2>
    <p id="recommendation"></p>
    <div class="metric">Utilization ρ: <span id="rho" class="value">-</span></div>
    <div class="metric">Customers in system L: <span id="l" class="value">-</span></div>
    <div class="metric">Customers in line Lq: <span id="lq" class="value">-</span></div>
    <div class="metric">Time in system W: <span id="w" class="value">-</span> min</div>
    <div class="metric">Wait in line Wq: <span id="wq" class="value">-</span> min</div>
    <script>
        const ws = new WebSocket(`ws://${location.host}/ws`);
        let seq = 0;
        let latest = 0;
        const $ = (id) => document.getElementById(id);
        const send = () => {
            seq += 1;
            latest = seq;
            $('lambda-v').textContent = $('lambda').value;
            $('mu-v').textContent = $('mu').value;
            ws.send(JSON.stringify({ seq, lambda: +$('lambda').value, mu: +$('mu').value }));
        };
        ws.onopen = () => {
            $('status').textContent = 'Connected';
            $('status').className = 'connected';
            send();
        };
        ws.onclose = () => {
            $('status').textContent = 'Disconnected';
            $('status').className = '';
        };
        ws.onmessage = (e) => {
            const reply = JSON.parse(e.data);
            if (reply.seq < latest) return;
            if (reply.error) {
                $('health').textContent = reply.error.message;
                $('health').className = 'critical';
                $('recommendation').textContent = '';
                for (const id of ['rho', 'l', 'lq', 'w', 'wq']) $(id).textContent = '-';
                return;
            }
            const s = reply.snapshot;
            const m = s.metrics;
            $('health').textContent = s.health;
            $('health').className = s.health;
            $('recommendation').textContent = s.recommendation;
            $('rho').textContent = (m.utilization * 100).toFixed(1) + '%';
            $('l').textContent = m.mean_in_system.toFixed(2);
            $('lq').textContent = m.mean_in_queue.toFixed(2);
            $('w').textContent = (m.mean_time_in_system * 60).toFixed(2);
            $('wq').textContent = (m.mean_wait_in_queue * 60).toFixed(2);
        };
        $('lambda').oninput = send;
        $('mu').oninput = send;
    </script>
</body>
</html>"#;
