//! HTTP route handlers for the draw backend.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use luckydraw::core::generate::{draw_lotto, draw_pension};
use luckydraw::core::phone::PhoneNumber;
use luckydraw::core::share_text::NothingToShare;
use luckydraw::io::remote::{DrawResponse, LOTTO_PATH, PENSION_PATH};
use luckydraw::io::sms::{SmsRequest, SmsResponse};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Build the router with the draw endpoints and the SMS API.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(LOTTO_PATH, get(generate_lotto))
        .route(PENSION_PATH, get(generate_pension))
        .nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new().route("/send-sms", post(send_sms))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /generate-lotto - one sorted 6/45 set.
async fn generate_lotto() -> Json<DrawResponse<u8>> {
    let set = draw_lotto(&mut rand::thread_rng());
    debug!(%set, "lotto drawn");
    Json(DrawResponse::ok(set.numbers().to_vec()))
}

/// GET /generate-pension - one `"<group>조 <serial>"` ticket.
async fn generate_pension() -> Json<DrawResponse<String>> {
    let draw = draw_pension(&mut rand::thread_rng());
    debug!(%draw, "pension drawn");
    Json(DrawResponse::ok(vec![draw.to_string()]))
}

/// POST /api/send-sms - validate and forward to the configured transport.
///
/// Lotto sets are validated while the body is decoded; a malformed set is
/// rejected by the extractor before this handler runs.
async fn send_sms(
    State(state): State<AppState>,
    Json(request): Json<SmsRequest>,
) -> (StatusCode, Json<SmsResponse>) {
    if request.lotto_sets.is_empty() && request.pension_sets.is_empty() {
        return refuse(StatusCode::BAD_REQUEST, NothingToShare.to_string());
    }
    let phone = match PhoneNumber::parse(&request.phone_number) {
        Ok(phone) => phone,
        Err(err) => return refuse(StatusCode::BAD_REQUEST, err.to_string()),
    };
    let request = SmsRequest::new(&phone, &request.lotto_sets, &request.pension_sets);

    let transport = Arc::clone(&state.sms);
    match tokio::task::spawn_blocking(move || transport.send(&request)).await {
        Ok(Ok(response)) => {
            info!(phone = %phone, success = response.success, "sms forwarded");
            (StatusCode::OK, Json(response))
        }
        Ok(Err(err)) => {
            warn!(error = %format!("{err:#}"), "sms transport failed");
            refuse(StatusCode::BAD_GATEWAY, format!("{err:#}"))
        }
        Err(err) => {
            warn!(error = %err, "sms task failed");
            refuse(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn refuse(status: StatusCode, message: String) -> (StatusCode, Json<SmsResponse>) {
    (
        status,
        Json(SmsResponse {
            success: false,
            message: Some(message),
        }),
    )
}
