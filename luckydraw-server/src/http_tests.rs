//! Blocking HTTP clients from the library driven against live servers.
//!
//! Each test binds a router on `127.0.0.1:0`, then runs the blocking client on
//! `spawn_blocking` so the runtime keeps serving while it waits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use luckydraw::core::collect::{SetCount, collect_sets};
use luckydraw::core::types::{DrawError, LottoSet};
use luckydraw::io::config::ShareConfig;
use luckydraw::io::remote::{DrawResponse, LOTTO_PATH, PENSION_PATH, RemoteSource};
use luckydraw::io::share::{KakaoShare, ShareCapability, ShareError, ShareMessage};
use luckydraw::io::sms::{
    HttpSmsTransport, LoggingSmsTransport, SmsRequest, SmsResponse, SmsTransport,
};
use luckydraw::io::source::DrawSource;

use crate::routes;
use crate::state::AppState;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn serve_backend() -> String {
    let state = AppState::new(Arc::new(LoggingSmsTransport));
    serve(routes::router().with_state(state)).await
}

fn sample_request(phone: &str) -> SmsRequest {
    SmsRequest {
        phone_number: phone.to_string(),
        lotto_sets: vec![LottoSet::from_values([1, 2, 3, 4, 5, 6]).expect("set")],
        pension_sets: Vec::new(),
    }
}

#[derive(Default)]
struct Counters {
    lotto: AtomicUsize,
    pension: AtomicUsize,
}

/// Call k (from 1) answers an unsorted set whose smallest number is k.
async fn counting_lotto(State(counters): State<Arc<Counters>>) -> Json<DrawResponse<i64>> {
    let k = counters.lotto.fetch_add(1, Ordering::SeqCst) as i64 + 1;
    Json(DrawResponse::ok(vec![45, 40, 30, 20, 10, k]))
}

/// First call succeeds, every later call reports failure.
async fn pension_then_sold_out(
    State(counters): State<Arc<Counters>>,
) -> Json<DrawResponse<String>> {
    match counters.pension.fetch_add(1, Ordering::SeqCst) {
        0 => Json(DrawResponse::ok(vec!["1조 000001".to_string()])),
        _ => Json(DrawResponse::failed("sold out")),
    }
}

async fn serve_counting_backend() -> (String, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let app = Router::new()
        .route(LOTTO_PATH, get(counting_lotto))
        .route(PENSION_PATH, get(pension_then_sold_out))
        .with_state(Arc::clone(&counters));
    (serve(app).await, counters)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn remote_source_reads_generated_draws() {
    let base = serve_backend().await;
    let (lotto, pension) = tokio::task::spawn_blocking(move || {
        let mut source = RemoteSource::new(&base, TIMEOUT).expect("client");
        (source.lotto(), source.pension())
    })
    .await
    .expect("join");

    let lotto = lotto.expect("lotto draw");
    assert!(lotto.numbers().windows(2).all(|pair| pair[0] < pair[1]));
    let pension = pension.expect("pension draw");
    assert!((1..=5).contains(&pension.group()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sequential_remote_draws_keep_request_order() {
    let (base, counters) = serve_counting_backend().await;
    let collection = tokio::task::spawn_blocking(move || {
        let mut source = RemoteSource::new(&base, TIMEOUT).expect("client");
        let count = SetCount::new(4, 5).expect("count");
        collect_sets(count.get(), || source.lotto())
    })
    .await
    .expect("join");

    assert!(!collection.is_partial());
    let smallest: Vec<u8> = collection
        .draws()
        .iter()
        .map(|set| set.numbers()[0])
        .collect();
    assert_eq!(smallest, vec![1, 2, 3, 4]);
    assert_eq!(
        collection.draws()[0].numbers(),
        &[1, 10, 20, 30, 40, 45]
    );
    assert_eq!(counters.lotto.load(Ordering::SeqCst), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn remote_failure_stops_collection_after_produced_draws() {
    let (base, counters) = serve_counting_backend().await;
    let collection = tokio::task::spawn_blocking(move || {
        let mut source = RemoteSource::new(&base, TIMEOUT).expect("client");
        collect_sets(3, || source.pension())
    })
    .await
    .expect("join");

    assert_eq!(collection.produced(), 1);
    assert_eq!(collection.draws()[0].to_string(), "1조 000001");
    assert_eq!(
        collection.failure(),
        Some(&DrawError::Source("sold out".to_string()))
    );
    assert_eq!(counters.pension.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn remote_http_error_is_source_failure() {
    let base = serve(Router::new()).await;
    let result = tokio::task::spawn_blocking(move || {
        RemoteSource::new(&base, TIMEOUT).expect("client").lotto()
    })
    .await
    .expect("join");
    assert!(matches!(result, Err(DrawError::Source(message)) if message.contains("404")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_sms_round_trips_through_backend() {
    let base = serve_backend().await;
    let (accepted, refused) = tokio::task::spawn_blocking(move || {
        let transport =
            HttpSmsTransport::new(&format!("{base}/api/send-sms"), TIMEOUT).expect("client");
        (
            transport.send(&sample_request("01012345678")),
            transport.send(&sample_request("0101234abcd")),
        )
    })
    .await
    .expect("join");

    let accepted = accepted.expect("accepted");
    assert!(accepted.success);
    assert_eq!(
        accepted.message.as_deref(),
        Some("실제 발송은 백엔드 연동 후 가능")
    );

    // 400 with success=false comes back as a refusal, not a transport error.
    let refused = refused.expect("refusal decoded");
    assert!(!refused.success);
    assert!(
        refused
            .message
            .as_deref()
            .is_some_and(|m| m.contains("유효한 휴대폰 번호"))
    );
}

async fn refuse_quota() -> (StatusCode, Json<SmsResponse>) {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(SmsResponse {
            success: false,
            message: Some("quota exceeded".to_string()),
        }),
    )
}

async fn broken_success() -> (StatusCode, Json<SmsResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SmsResponse {
            success: true,
            message: None,
        }),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_sms_distinguishes_refusal_from_inconsistent_reply() {
    let app = Router::new()
        .route("/refuse", post(refuse_quota))
        .route("/broken", post(broken_success));
    let base = serve(app).await;
    let (refused, broken) = tokio::task::spawn_blocking(move || {
        let request = sample_request("01012345678");
        let refuse = HttpSmsTransport::new(&format!("{base}/refuse"), TIMEOUT).expect("client");
        let broken = HttpSmsTransport::new(&format!("{base}/broken"), TIMEOUT).expect("client");
        (refuse.send(&request), broken.send(&request))
    })
    .await
    .expect("join");

    assert_eq!(
        refused.expect("refusal decoded"),
        SmsResponse {
            success: false,
            message: Some("quota exceeded".to_string()),
        }
    );
    let err = broken.expect_err("5xx with success=true");
    assert!(err.to_string().contains("success=true"), "{err:#}");
}

#[derive(Default)]
struct KakaoInbox {
    requests: Mutex<Vec<(Option<String>, String)>>,
}

/// Accepts only the `good-token` bearer, like the memo API's result codes.
async fn kakao_memo(
    State(inbox): State<Arc<KakaoInbox>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let code = if auth.as_deref() == Some("Bearer good-token") {
        0
    } else {
        -401
    };
    let template = form.get("template_object").cloned().unwrap_or_default();
    inbox.requests.lock().expect("lock").push((auth, template));
    Json(serde_json::json!({ "result_code": code }))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn kakao_share_posts_template_with_bearer_token() {
    let inbox = Arc::new(KakaoInbox::default());
    let app = Router::new()
        .route("/memo", post(kakao_memo))
        .with_state(Arc::clone(&inbox));
    let base = serve(app).await;

    let (sent, rejected) = tokio::task::spawn_blocking(move || {
        let message = ShareMessage::text("행운 번호", "http://localhost:3000/");
        let mut config = ShareConfig {
            kakao_endpoint: format!("{base}/memo"),
            kakao_access_token: Some("good-token".to_string()),
            ..ShareConfig::default()
        };
        let good = KakaoShare::init(&config);
        assert!(good.is_initialized());
        let sent = good.send_default(&message);

        config.kakao_access_token = Some("stale-token".to_string());
        let rejected = KakaoShare::init(&config).send_default(&message);
        (sent, rejected)
    })
    .await
    .expect("join");

    sent.expect("share accepted");
    assert!(matches!(rejected, Err(ShareError::Failed(reason)) if reason.contains("-401")));

    let requests = inbox.requests.lock().expect("lock");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0.as_deref(), Some("Bearer good-token"));
    let template: serde_json::Value =
        serde_json::from_str(&requests[0].1).expect("template_object is json");
    assert_eq!(
        template,
        serde_json::json!({
            "object_type": "text",
            "text": "행운 번호",
            "link": {
                "web_url": "http://localhost:3000/",
                "mobile_web_url": "http://localhost:3000/"
            }
        })
    );
}
