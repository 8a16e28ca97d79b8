//! Orchestration for the user actions of one draw session.
//!
//! A [`Session`] holds what is currently displayed: the last lotto and pension
//! collections and the status line. Every action either succeeds and posts a
//! normal status, or fails, posts the error as an error status, and leaves the
//! session in a usable state. Collaborators (draw source, SMS transport, share
//! capability) are passed into each action; the clock is fixed at
//! construction.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::core::collect::{SetCollection, SetCount, SetCountError, collect_sets};
use crate::core::phone::{PhoneError, PhoneNumber};
use crate::core::render::render_collection;
use crate::core::share_text::{NothingToShare, ShareTemplate};
use crate::core::status::{Clock, Severity, StatusLine, StatusMessage, SystemClock};
use crate::core::types::{DrawError, DrawKind, LottoSet, PensionDraw};
use crate::exit_codes;
use crate::io::config::LuckyConfig;
use crate::io::share::{ShareCapability, ShareError, ShareMessage};
use crate::io::sms::{SmsRequest, SmsTransport};
use crate::io::source::DrawSource;

pub const WELCOME: &str = "안녕하세요! 행운 번호를 뽑아보세요! 😊";

/// Why a user action did not fully succeed.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("세트 수는 1~{}개 중에서 골라주세요! ({})", .0.max, .0.requested)]
    InvalidCount(#[from] SetCountError),
    #[error(transparent)]
    Phone(#[from] PhoneError),
    #[error(transparent)]
    NothingGenerated(#[from] NothingToShare),
    /// Generation stopped early; the produced draws are still displayed.
    #[error("{} 번호 생성에 실패했어요 ({produced}/{requested}세트 생성): {reason} 🥲", .kind.label())]
    Generation {
        kind: DrawKind,
        produced: usize,
        requested: usize,
        reason: DrawError,
    },
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error("번호 전송 실패: {0} 😭")]
    SmsRejected(String),
    #[error("SMS 전송 중 오류가 발생했어요. 다시 시도해주세요. 🥺 ({0})")]
    SmsTransport(String),
}

impl ActionError {
    /// Stable CLI exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ActionError::InvalidCount(_)
            | ActionError::Phone(_)
            | ActionError::NothingGenerated(_) => exit_codes::INVALID,
            ActionError::Generation { .. } => exit_codes::PARTIAL,
            ActionError::Share(_) | ActionError::SmsRejected(_) | ActionError::SmsTransport(_) => {
                exit_codes::UNAVAILABLE
            }
        }
    }
}

/// Displayed state of one draw page.
#[derive(Debug, Clone)]
pub struct Session<C = SystemClock> {
    clock: C,
    lotto: SetCollection<LottoSet>,
    pension: SetCollection<PensionDraw>,
    status: StatusLine,
    max_sets: u8,
    template: ShareTemplate,
    link_url: String,
}

impl Session {
    pub fn new(config: &LuckyConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(config: &LuckyConfig, clock: C) -> Self {
        let mut status = StatusLine::new(config.status_clear_after());
        status.post(WELCOME, Severity::Normal, clock.now());
        Self {
            clock,
            lotto: SetCollection::empty(),
            pension: SetCollection::empty(),
            status,
            max_sets: config.max_sets,
            template: config.share.template.clone(),
            link_url: config.share.link_url.clone(),
        }
    }

    pub fn lotto(&self) -> &SetCollection<LottoSet> {
        &self.lotto
    }

    pub fn pension(&self) -> &SetCollection<PensionDraw> {
        &self.pension
    }

    pub fn max_sets(&self) -> u8 {
        self.max_sets
    }

    /// Status message still on screen, if any.
    pub fn status(&mut self) -> Option<&StatusMessage> {
        let now = self.clock.now();
        self.status.expire(now);
        self.status.visible(now)
    }

    /// Most recent status message, ignoring the auto-clear delay.
    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.status.latest()
    }

    pub fn render_lotto(&self) -> Vec<String> {
        render_collection(DrawKind::Lotto, &self.lotto)
    }

    pub fn render_pension(&self) -> Vec<String> {
        render_collection(DrawKind::Pension, &self.pension)
    }

    /// Replace the displayed lotto sets with `requested` fresh draws.
    #[instrument(skip(self, source))]
    pub fn generate_lotto<S: DrawSource + ?Sized>(
        &mut self,
        source: &mut S,
        requested: u32,
    ) -> Result<usize, ActionError> {
        let result = SetCount::new(requested, self.max_sets)
            .map_err(ActionError::from)
            .and_then(|count| {
                let collection = collect_sets(count.get(), || source.lotto());
                let outcome = generation_outcome(DrawKind::Lotto, &collection);
                self.lotto = collection;
                outcome
            })
            .map(|produced| {
                let message =
                    format!("로또 번호 {produced}세트가 생성되었어요! 행운을 빌어요! 😄");
                (produced, message)
            });
        self.finish(result)
    }

    /// Replace the displayed pension draws with `requested` fresh draws.
    #[instrument(skip(self, source))]
    pub fn generate_pension<S: DrawSource + ?Sized>(
        &mut self,
        source: &mut S,
        requested: u32,
    ) -> Result<usize, ActionError> {
        let result = SetCount::new(requested, self.max_sets)
            .map_err(ActionError::from)
            .and_then(|count| {
                let collection = collect_sets(count.get(), || source.pension());
                let outcome = generation_outcome(DrawKind::Pension, &collection);
                self.pension = collection;
                outcome
            })
            .map(|produced| {
                let message =
                    format!("연금복권 번호 {produced}세트가 생성되었어요! 부자되세요~! 💰");
                (produced, message)
            });
        self.finish(result)
    }

    /// Send the displayed draws to `raw_phone` through `transport`.
    #[instrument(skip_all)]
    pub fn send_sms<T: SmsTransport + ?Sized>(
        &mut self,
        raw_phone: &str,
        transport: &T,
    ) -> Result<(), ActionError> {
        let result = self.build_sms_request(raw_phone).and_then(|request| {
            debug!(
                lotto = request.lotto_sets.len(),
                pension = request.pension_sets.len(),
                "sending sms"
            );
            let response = transport
                .send(&request)
                .map_err(|err| ActionError::SmsTransport(format!("{err:#}")))?;
            if !response.success {
                let reason = response
                    .message
                    .unwrap_or_else(|| "알 수 없는 오류".to_string());
                return Err(ActionError::SmsRejected(reason));
            }
            let mut message = format!("{} (으)로 번호 전송 성공! 🎉", request.phone_number);
            if let Some(note) = response.message {
                message.push_str(&format!(" ({note})"));
            }
            Ok(((), message))
        });
        self.finish(result)
    }

    /// Share the displayed draws through `capability`.
    #[instrument(skip_all)]
    pub fn share<S: ShareCapability + ?Sized>(
        &mut self,
        capability: &S,
    ) -> Result<(), ActionError> {
        let result = self.share_message().and_then(|message| {
            if !capability.is_initialized() {
                return Err(ShareError::NotInitialized.into());
            }
            capability.send_default(&message)?;
            Ok((
                (),
                "카카오톡 공유를 보냈어요! 친구에게 행운을 나눠주세요! 📱".to_string(),
            ))
        });
        self.finish(result)
    }

    /// Share text for what is currently displayed.
    pub fn share_text(&self) -> Result<String, NothingToShare> {
        self.template
            .compose(self.lotto.draws(), self.pension.draws())
    }

    fn share_message(&self) -> Result<ShareMessage, ActionError> {
        let text = self.share_text()?;
        Ok(ShareMessage::text(text, &self.link_url))
    }

    fn build_sms_request(&self, raw_phone: &str) -> Result<SmsRequest, ActionError> {
        if self.lotto.is_empty() && self.pension.is_empty() {
            return Err(NothingToShare.into());
        }
        let phone = PhoneNumber::parse(raw_phone)?;
        Ok(SmsRequest::new(
            &phone,
            self.lotto.draws(),
            self.pension.draws(),
        ))
    }

    /// Post the outcome of an action to the status line.
    fn finish<T>(&mut self, result: Result<(T, String), ActionError>) -> Result<T, ActionError> {
        let now = self.clock.now();
        match result {
            Ok((value, message)) => {
                info!(%message, "action succeeded");
                self.status.post(message, Severity::Normal, now);
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "action failed");
                self.status.post(err.to_string(), Severity::Error, now);
                Err(err)
            }
        }
    }
}

fn generation_outcome<D>(
    kind: DrawKind,
    collection: &SetCollection<D>,
) -> Result<usize, ActionError> {
    match collection.failure() {
        None => Ok(collection.produced()),
        Some(reason) => Err(ActionError::Generation {
            kind,
            produced: collection.produced(),
            requested: collection.requested(),
            reason: reason.clone(),
        }),
    }
}
