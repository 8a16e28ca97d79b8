//! Test-only collaborators: scripted draw sources and recording transports.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};

use crate::core::status::Clock;
use crate::core::types::{DrawError, LottoSet, PensionDraw};
use crate::io::share::{ShareCapability, ShareError, ShareMessage};
use crate::io::sms::{SmsRequest, SmsResponse, SmsTransport};
use crate::io::source::DrawSource;

/// Build a lotto set from literal values.
pub fn lotto(values: [i64; 6]) -> LottoSet {
    LottoSet::from_values(values).expect("valid lotto literal")
}

/// Build a pension draw from its canonical text.
pub fn pension(text: &str) -> PensionDraw {
    text.parse().expect("valid pension literal")
}

/// Draw source that replays queued results, then reports `DrawError::Empty`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lotto: VecDeque<Result<LottoSet, DrawError>>,
    pension: VecDeque<Result<PensionDraw, DrawError>>,
    pub lotto_calls: usize,
    pub pension_calls: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lotto(mut self, results: Vec<Result<LottoSet, DrawError>>) -> Self {
        self.lotto.extend(results);
        self
    }

    pub fn with_pension(mut self, results: Vec<Result<PensionDraw, DrawError>>) -> Self {
        self.pension.extend(results);
        self
    }
}

impl DrawSource for ScriptedSource {
    fn lotto(&mut self) -> Result<LottoSet, DrawError> {
        self.lotto_calls += 1;
        self.lotto.pop_front().unwrap_or(Err(DrawError::Empty))
    }

    fn pension(&mut self) -> Result<PensionDraw, DrawError> {
        self.pension_calls += 1;
        self.pension.pop_front().unwrap_or(Err(DrawError::Empty))
    }
}

/// What a [`RecordingSms`] answers with.
#[derive(Debug, Clone)]
pub enum SmsReply {
    Accept,
    Refuse(String),
    Unreachable,
}

/// SMS transport that records every request.
#[derive(Debug)]
pub struct RecordingSms {
    reply: SmsReply,
    pub sent: RefCell<Vec<SmsRequest>>,
}

impl RecordingSms {
    pub fn new(reply: SmsReply) -> Self {
        Self {
            reply,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl SmsTransport for RecordingSms {
    fn send(&self, request: &SmsRequest) -> Result<SmsResponse> {
        self.sent.borrow_mut().push(request.clone());
        match &self.reply {
            SmsReply::Accept => Ok(SmsResponse {
                success: true,
                message: None,
            }),
            SmsReply::Refuse(message) => Ok(SmsResponse {
                success: false,
                message: Some(message.clone()),
            }),
            SmsReply::Unreachable => Err(anyhow!("connection refused")),
        }
    }
}

/// Share capability that records messages instead of sending them.
#[derive(Debug)]
pub struct RecordingShare {
    initialized: bool,
    pub sent: RefCell<Vec<ShareMessage>>,
}

impl RecordingShare {
    pub fn ready() -> Self {
        Self {
            initialized: true,
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl ShareCapability for RecordingShare {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn send_default(&self, message: &ShareMessage) -> Result<(), ShareError> {
        if !self.initialized {
            return Err(ShareError::NotInitialized);
        }
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
