use {courier_config::CourierConfig, std::sync::Arc};

/// Shared by every handler. Configuration is loaded once at startup and never
/// mutated; each request builds its own session from it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CourierConfig>,
    pub http: reqwest::Client,
    pub version: &'static str,
}

impl AppState {
    pub fn new(config: CourierConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.http.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            config: Arc::new(config),
            http: builder.build()?,
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}
