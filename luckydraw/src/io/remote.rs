//! Remote draw source backed by `GET /generate-lotto` and `GET /generate-pension`.
//!
//! Each call issues one request and waits for its response before returning,
//! so a batch of N draws is N sequential round trips in request order.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::core::types::{DrawError, LottoSet, PensionDraw};
use crate::io::source::DrawSource;

pub const LOTTO_PATH: &str = "/generate-lotto";
pub const PENSION_PATH: &str = "/generate-pension";

/// Wire shape shared by both draw endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResponse<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub numbers: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DrawResponse<T> {
    pub fn ok(numbers: Vec<T>) -> Self {
        Self {
            success: true,
            numbers,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            numbers: Vec::new(),
            message: Some(message.into()),
        }
    }

    fn into_numbers(self) -> Result<Vec<T>, DrawError> {
        if !self.success {
            let message = self
                .message
                .unwrap_or_else(|| "remote source reported failure".to_string());
            return Err(DrawError::Source(message));
        }
        Ok(self.numbers)
    }
}

/// Validate a lotto response. Numbers are re-sorted and checked.
pub fn decode_lotto(response: DrawResponse<i64>) -> Result<LottoSet, DrawError> {
    LottoSet::from_values(response.into_numbers()?)
}

/// Validate a pension response carrying exactly one `"<group>조 <serial>"` string.
pub fn decode_pension(response: DrawResponse<String>) -> Result<PensionDraw, DrawError> {
    let mut numbers = response.into_numbers()?;
    match numbers.len() {
        0 => Err(DrawError::Empty),
        1 => numbers.remove(0).parse(),
        n => Err(DrawError::MalformedPension(format!(
            "expected one pension draw, got {n}"
        ))),
    }
}

/// Draw source that asks a backend for every draw.
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build draw source http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<DrawResponse<T>, DrawError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                warn!(error = %err, "draw request failed");
                DrawError::Source(err.to_string())
            })?;
        let body = response.json::<DrawResponse<T>>().map_err(|err| {
            warn!(error = %err, "draw response unreadable");
            DrawError::Source(format!("invalid response body: {err}"))
        })?;
        debug!(success = body.success, count = body.numbers.len(), "draw response");
        Ok(body)
    }
}

impl DrawSource for RemoteSource {
    fn lotto(&mut self) -> Result<LottoSet, DrawError> {
        decode_lotto(self.fetch(LOTTO_PATH)?)
    }

    fn pension(&mut self) -> Result<PensionDraw, DrawError> {
        decode_pension(self.fetch(PENSION_PATH)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lotto_response_is_validated_and_sorted() {
        let body = r#"{"success":true,"numbers":[44,2,17,9,30,1]}"#;
        let response: DrawResponse<i64> = serde_json::from_str(body).expect("json");
        let set = decode_lotto(response).expect("valid");
        assert_eq!(set.numbers(), &[1, 2, 9, 17, 30, 44]);
    }

    #[test]
    fn unsuccessful_response_is_source_failure() {
        let body = r#"{"success":false,"message":"maintenance"}"#;
        let response: DrawResponse<i64> = serde_json::from_str(body).expect("json");
        assert_eq!(
            decode_lotto(response),
            Err(DrawError::Source("maintenance".to_string()))
        );

        let response: DrawResponse<String> =
            serde_json::from_str(r#"{"success":false}"#).expect("json");
        assert!(matches!(decode_pension(response), Err(DrawError::Source(_))));
    }

    #[test]
    fn empty_numbers_map_to_empty_draw() {
        assert_eq!(decode_lotto(DrawResponse::ok(Vec::new())), Err(DrawError::Empty));
        assert_eq!(
            decode_pension(DrawResponse::ok(Vec::new())),
            Err(DrawError::Empty)
        );
    }

    #[test]
    fn pension_response_accepts_legacy_form() {
        let response = DrawResponse::ok(vec!["2조004321".to_string()]);
        let draw = decode_pension(response).expect("valid");
        assert_eq!(draw.to_string(), "2조 004321");
    }

    #[test]
    fn pension_response_must_hold_exactly_one_draw() {
        let response = DrawResponse::ok(vec!["1조 000001".to_string(), "2조 000002".to_string()]);
        assert_eq!(
            decode_pension(response),
            Err(DrawError::MalformedPension(
                "expected one pension draw, got 2".to_string()
            ))
        );
    }

    #[test]
    fn failed_response_serializes_message() {
        let json = serde_json::to_value(DrawResponse::<i64>::failed("down")).expect("json");
        assert_eq!(
            json,
            serde_json::json!({"success": false, "numbers": [], "message": "down"})
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source = RemoteSource::new("http://localhost:3000/", Duration::from_secs(1))
            .expect("client");
        assert_eq!(source.base_url(), "http://localhost:3000");
    }

    #[test]
    fn unreachable_backend_is_source_failure() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let mut source =
            RemoteSource::new("http://127.0.0.1:9", Duration::from_millis(500)).expect("client");
        assert!(matches!(source.lotto(), Err(DrawError::Source(_))));
    }
}
