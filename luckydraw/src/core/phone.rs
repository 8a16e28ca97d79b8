//! Phone number validation for the SMS path.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub const MIN_DIGITS: usize = 10;
pub const MAX_DIGITS: usize = 11;

/// Why a phone number was rejected. Each maps to its own user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("휴대폰 번호를 입력해주세요! 🚨")]
    Empty,
    #[error("유효한 휴대폰 번호를 입력해주세요! (숫자 10-11자리) 🚫")]
    Length(usize),
    #[error("유효한 휴대폰 번호를 입력해주세요! (숫자 10-11자리) 🚫")]
    NonDigit,
}

/// 10 or 11 ASCII digits, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Trim and validate raw input.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        static DIGITS_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex"));

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }
        let len = trimmed.chars().count();
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&len) {
            return Err(PhoneError::Length(len));
        }
        if !DIGITS_RE.is_match(trimmed) {
            return Err(PhoneError::NonDigit);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
