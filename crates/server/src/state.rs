use crate::config::ServerConfig;
use crate::error::ServerResult;
use dashmap::DashMap;
use lostfound::LostFoundConfig;
use matcher::SmartMatcher;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use store::ItemStore;
use subtle::ConstantTimeEq;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Admin sessions: token -> expiry
    pub sessions: Arc<DashMap<String, Instant>>,

    /// Item store (shared across requests)
    pub store: Arc<ItemStore>,

    /// Matcher instance (shared across requests)
    pub matcher: Arc<SmartMatcher>,

    /// Prometheus exporter, when installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state from the pipeline YAML named in `config`,
    /// or from defaults (in-memory store with sample data) when none is set.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let pipeline = match &config.pipeline_config {
            Some(path) => LostFoundConfig::load_from_file(path)
                .map_err(lostfound::PipelineError::from)?,
            None => LostFoundConfig::default(),
        };
        let store = pipeline.open_store()?;
        let matcher = pipeline.build_matcher()?;
        Ok(Self::with_components(config, store, matcher))
    }

    pub fn with_components(config: ServerConfig, store: ItemStore, matcher: SmartMatcher) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(DashMap::new()),
            store: Arc::new(store),
            matcher: Arc::new(matcher),
            metrics_handle: None,
        }
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Constant-time comparison against the configured admin password.
    pub fn verify_admin_password(&self, candidate: &str) -> bool {
        candidate
            .as_bytes()
            .ct_eq(self.config.admin_password.as_bytes())
            .into()
    }

    /// Start an admin session and return its token.
    pub fn create_session(&self) -> String {
        self.purge_expired_sessions();
        let token = uuid::Uuid::new_v4().to_string();
        let expires_at = Instant::now() + self.config.admin_session_ttl();
        self.sessions.insert(token.clone(), expires_at);
        token
    }

    /// Check if a session token is live; expired tokens are dropped.
    pub fn is_valid_session(&self, token: &str) -> bool {
        let now = Instant::now();
        let live = match self.sessions.get(token) {
            Some(expires_at) => *expires_at > now,
            None => return false,
        };
        if !live {
            self.sessions.remove(token);
        }
        live
    }

    pub fn end_session(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn purge_expired_sessions(&self) {
        let now = Instant::now();
        self.sessions.retain(|_, expires_at| *expires_at > now);
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
