//! Share-text formatting for the SMS and social-share paths.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{LottoSet, PensionDraw};

pub const DEFAULT_HEADER: &str = "💖 다은이와 다솜이가 추천하는 행운 번호! 💖";
pub const DEFAULT_FOOTER: &str = "오늘의 행운을 잡으세요! 😉";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("생성된 번호가 없어요! 먼저 번호를 뽑아주세요! 🙏")]
pub struct NothingToShare;

/// Fixed framing around the numbered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareTemplate {
    pub header: String,
    pub footer: String,
}

impl Default for ShareTemplate {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl ShareTemplate {
    /// Build the share text. Empty sections are left out entirely.
    pub fn compose(
        &self,
        lotto: &[LottoSet],
        pension: &[PensionDraw],
    ) -> Result<String, NothingToShare> {
        if lotto.is_empty() && pension.is_empty() {
            return Err(NothingToShare);
        }

        let mut text = String::new();
        text.push_str(&self.header);
        text.push('\n');
        if !lotto.is_empty() {
            push_section(&mut text, "🍀 로또 번호", lotto);
        }
        if !pension.is_empty() {
            push_section(&mut text, "💰 연금복권 번호", pension);
        }
        text.push('\n');
        text.push_str(&self.footer);
        Ok(text)
    }
}

fn push_section<D: std::fmt::Display>(text: &mut String, title: &str, draws: &[D]) {
    // Writing into a String cannot fail.
    let _ = writeln!(text, "\n{title} ({}세트):", draws.len());
    for (i, draw) in draws.iter().enumerate() {
        let _ = writeln!(text, "  {}세트: {draw}", i + 1);
    }
}
