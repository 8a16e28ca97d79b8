//! Social-share capability.
//!
//! Lifecycle is `init → ready-check → use`: a capability is built once from
//! configuration, reports whether it is usable through
//! [`ShareCapability::is_initialized`], and refuses to send with
//! [`ShareError::NotInitialized`] when it is not.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::io::config::ShareConfig;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("카카오 공유 기능이 초기화되지 않았어요. 액세스 토큰을 확인해주세요! 😭")]
    NotInitialized,
    #[error("카카오톡 공유 요청이 실패했어요: {0}")]
    Failed(String),
}

/// Default "text" share object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMessage {
    pub object_type: String,
    pub text: String,
    pub link: ShareLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub web_url: String,
    pub mobile_web_url: String,
}

impl ShareMessage {
    pub fn text(text: impl Into<String>, url: &str) -> Self {
        Self {
            object_type: "text".to_string(),
            text: text.into(),
            link: ShareLink {
                web_url: url.to_string(),
                mobile_web_url: url.to_string(),
            },
        }
    }
}

/// Abstraction over share backends.
pub trait ShareCapability {
    fn is_initialized(&self) -> bool;
    fn send_default(&self, message: &ShareMessage) -> Result<(), ShareError>;
}

/// REST flavour of the text template (snake_case keys).
#[derive(Serialize)]
struct KakaoTextTemplate<'a> {
    object_type: &'a str,
    text: &'a str,
    link: KakaoLink<'a>,
}

#[derive(Serialize)]
struct KakaoLink<'a> {
    web_url: &'a str,
    mobile_web_url: &'a str,
}

#[derive(Deserialize)]
struct KakaoResult {
    result_code: i64,
}

struct KakaoSession {
    client: Client,
    access_token: String,
}

/// Kakao "send to me" default template via the REST API.
pub struct KakaoShare {
    endpoint: String,
    session: Option<KakaoSession>,
}

impl KakaoShare {
    /// Build the capability. Missing credentials leave it uninitialized.
    pub fn init(config: &ShareConfig) -> Self {
        let session = match config.kakao_access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {
                match Client::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .build()
                {
                    Ok(client) => Some(KakaoSession {
                        client,
                        access_token: token.to_string(),
                    }),
                    Err(err) => {
                        error!(error = %err, "kakao share client init failed");
                        None
                    }
                }
            }
            _ => {
                error!("kakao share not initialized: no access token configured");
                None
            }
        };
        if session.is_some() {
            info!(endpoint = %config.kakao_endpoint, "kakao share initialized");
        }
        Self {
            endpoint: config.kakao_endpoint.clone(),
            session,
        }
    }
}

impl ShareCapability for KakaoShare {
    fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    fn send_default(&self, message: &ShareMessage) -> Result<(), ShareError> {
        let session = self.session.as_ref().ok_or(ShareError::NotInitialized)?;
        let template = KakaoTextTemplate {
            object_type: &message.object_type,
            text: &message.text,
            link: KakaoLink {
                web_url: &message.link.web_url,
                mobile_web_url: &message.link.mobile_web_url,
            },
        };
        let template_object = serde_json::to_string(&template)
            .map_err(|err| ShareError::Failed(format!("serialize template: {err}")))?;

        let response = session
            .client
            .post(&self.endpoint)
            .bearer_auth(&session.access_token)
            .form(&[("template_object", template_object.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| ShareError::Failed(err.to_string()))?;
        let result: KakaoResult = response
            .json()
            .map_err(|err| ShareError::Failed(format!("decode response: {err}")))?;
        if result.result_code != 0 {
            return Err(ShareError::Failed(format!(
                "result_code {}",
                result.result_code
            )));
        }
        debug!("kakao share sent");
        Ok(())
    }
}

/// Prints the share payload as JSON to stdout instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunShare;

impl ShareCapability for DryRunShare {
    fn is_initialized(&self) -> bool {
        true
    }

    fn send_default(&self, message: &ShareMessage) -> Result<(), ShareError> {
        let json = serde_json::to_string_pretty(message)
            .map_err(|err| ShareError::Failed(err.to_string()))?;
        println!("{json}");
        Ok(())
    }
}
