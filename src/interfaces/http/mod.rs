use crate::domain::case::Ruling;
use crate::domain::error::AppError;
use crate::domain::requests::{parse_case_id, CreateCaseRequest, SubmitVerdictRequest};
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{
    dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::warn;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app_state: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVerdictBody {
    pub verdict: Ruling,
    pub reasoning: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        AppError::ValidationError(_) => HttpResponse::BadRequest().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::WalletRejected(_) => HttpResponse::Forbidden().json(body),
        AppError::ConfigError(_) | AppError::WalletUnavailable(_) => {
            HttpResponse::ServiceUnavailable().json(body)
        }
        AppError::RpcError(_) | AppError::ParseError(_) => HttpResponse::BadGateway().json(body),
        AppError::Internal(_) | AppError::IoError(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn failed(data: &HttpState, action: &str, err: AppError) -> HttpResponse {
    warn!(action, error = %err, "Request failed");
    add_log(
        &data.logs,
        "ERROR",
        "HttpApi",
        &format!("{} failed: {}", action, err),
    );
    error_response(&err)
}

#[post("/cases")]
async fn create_case(data: web::Data<HttpState>, req: web::Json<CreateCaseRequest>) -> impl Responder {
    add_log(&data.logs, "INFO", "HttpApi", "Submitting case to blockchain");

    match data
        .app_state
        .case_actions
        .create_case(req.into_inner())
        .await
    {
        Ok(created) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Case created successfully! Case ID: {}", created.case_id),
            );
            HttpResponse::Ok().json(created)
        }
        Err(e) => failed(&data, "Create case", e),
    }
}

#[get("/cases/next-id")]
async fn next_case_id(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.case_actions.next_case_id().await {
        Ok(next) => HttpResponse::Ok().json(json!({ "nextCaseId": next })),
        Err(e) => failed(&data, "Fetch next case id", e),
    }
}

#[get("/cases/{id}")]
async fn get_case(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let case_id = match parse_case_id(&path) {
        Ok(id) => id,
        Err(e) => return failed(&data, "Load case", e),
    };

    match data.app_state.case_actions.load_case(case_id).await {
        Ok(case) => HttpResponse::Ok().json(case),
        Err(e) => failed(&data, "Load case", e),
    }
}

#[post("/cases/{id}/verdict")]
async fn submit_verdict(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<SubmitVerdictBody>,
) -> impl Responder {
    let case_id = match parse_case_id(&path) {
        Ok(id) => id,
        Err(e) => return failed(&data, "Submit verdict", e),
    };
    let body = body.into_inner();

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Submitting verdict {} for case {}", body.verdict.as_wire(), case_id),
    );

    let request = SubmitVerdictRequest {
        case_id,
        verdict: body.verdict,
        reasoning: body.reasoning,
    };
    match data.app_state.case_actions.submit_verdict(request).await {
        Ok(tx_hash) => HttpResponse::Ok().json(json!({ "txHash": tx_hash })),
        Err(e) => failed(&data, "Submit verdict", e),
    }
}

#[post("/cases/{id}/ai-judge")]
async fn request_ai_judgment(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let case_id = match parse_case_id(&path) {
        Ok(id) => id,
        Err(e) => return failed(&data, "Request AI judgment", e),
    };

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Requesting AI judgment for case {}", case_id),
    );

    match data.app_state.case_actions.request_ai_judgment(case_id).await {
        Ok(tx_hash) => HttpResponse::Ok().json(json!({ "txHash": tx_hash })),
        Err(e) => failed(&data, "Request AI judgment", e),
    }
}

#[get("/wallet")]
async fn wallet_status(data: web::Data<HttpState>) -> impl Responder {
    let account = data.app_state.case_actions.wallet_status().await;
    HttpResponse::Ok().json(json!({ "account": account }))
}

#[post("/wallet/connect")]
async fn connect_wallet(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.case_actions.connect_wallet().await {
        Ok(account) => {
            add_log(
                &data.logs,
                "INFO",
                "Wallet",
                &format!("Connected {}", account),
            );
            HttpResponse::Ok().json(json!({ "account": account }))
        }
        Err(e) => failed(&data, "Connect wallet", e),
    }
}

#[post("/wallet/network")]
async fn ensure_network(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.case_actions.ensure_network().await {
        Ok(chain) => HttpResponse::Ok().json(json!({
            "chainId": chain.chain_id_hex(),
            "chainName": chain.chain_name,
        })),
        Err(e) => failed(&data, "Switch network", e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

/// Body that fails to deserialize gets the same `{error}` shape as every other failure.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let app_err = AppError::ValidationError(format!("Invalid request body: {}", err));
    let response = match req.app_data::<web::Data<HttpState>>() {
        Some(data) => failed(data, "Parse request", app_err),
        None => error_response(&app_err),
    };
    InternalError::from_response(err, response).into()
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .service(create_case)
            .service(next_case_id)
            .service(get_case)
            .service(submit_verdict)
            .service(request_ai_judgment)
            .service(wallet_status)
            .service(connect_wallet)
            .service(ensure_network)
            .service(get_logs),
    );
}

pub fn start_server(
    app_state: Arc<AppState>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { app_state, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // The browser UI is served from another origin.

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
