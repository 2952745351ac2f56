use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::ConfigService;
use crate::interfaces::http::{add_log, start_server, LogEntry};

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config_service = ConfigService::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let state = crate::infrastructure::bootstrap::setup(&config_service, &logs);

    let http = &config_service.config().http;
    let server = start_server(state, logs.clone(), &http.host, http.port).map_err(|err| {
        error!(error = %err, host = %http.host, port = http.port, "Failed to bind HTTP server");
        err
    })?;

    add_log(
        &logs,
        "INFO",
        "System",
        &format!("Server running at http://{}:{}", http.host, http.port),
    );
    info!(host = %http.host, port = http.port, "Verdict registry API listening");

    server.await
}
