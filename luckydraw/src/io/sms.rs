//! SMS transport for sending displayed draws to a phone number.
//!
//! [`HttpSmsTransport`] posts to an `/api/send-sms` style endpoint.
//! [`LoggingSmsTransport`] only logs the payload and is used when no endpoint
//! is configured.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::core::phone::PhoneNumber;
use crate::core::types::{LottoSet, PensionDraw};

/// Request body for `/api/send-sms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsRequest {
    pub phone_number: String,
    pub lotto_sets: Vec<LottoSet>,
    pub pension_sets: Vec<PensionDraw>,
}

impl SmsRequest {
    pub fn new(phone: &PhoneNumber, lotto: &[LottoSet], pension: &[PensionDraw]) -> Self {
        Self {
            phone_number: phone.as_str().to_string(),
            lotto_sets: lotto.to_vec(),
            pension_sets: pension.to_vec(),
        }
    }
}

/// Response body of `/api/send-sms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Abstraction over SMS delivery backends.
pub trait SmsTransport {
    /// Deliver the request. `Err` means the transport itself failed; a
    /// backend refusal comes back as `success: false`.
    fn send(&self, request: &SmsRequest) -> Result<SmsResponse>;
}

/// Posts JSON to a configured endpoint.
pub struct HttpSmsTransport {
    client: Client,
    endpoint: String,
}

impl HttpSmsTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build sms http client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl SmsTransport for HttpSmsTransport {
    #[instrument(
        skip_all,
        fields(
            endpoint = %self.endpoint,
            lotto = request.lotto_sets.len(),
            pension = request.pension_sets.len()
        )
    )]
    fn send(&self, request: &SmsRequest) -> Result<SmsResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .with_context(|| format!("post {}", self.endpoint))?;
        let status = response.status();
        let body: SmsResponse = response
            .json()
            .with_context(|| format!("decode sms response (status {status})"))?;
        if !status.is_success() && body.success {
            return Err(anyhow!("sms endpoint returned {status} with success=true"));
        }
        if !body.success {
            warn!(%status, message = ?body.message, "sms endpoint refused request");
        }
        Ok(body)
    }
}

/// Inert transport: logs what would be sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSmsTransport;

impl SmsTransport for LoggingSmsTransport {
    fn send(&self, request: &SmsRequest) -> Result<SmsResponse> {
        let payload = serde_json::to_string(request).context("serialize sms request")?;
        info!(phone = %request.phone_number, %payload, "sms send simulated");
        Ok(SmsResponse {
            success: true,
            message: Some("실제 발송은 백엔드 연동 후 가능".to_string()),
        })
    }
}
