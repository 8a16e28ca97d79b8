//! Draw types shared by the generation core.
//!
//! Values of these types are always canonical: a `LottoSet` is sorted and
//! duplicate-free, a `PensionDraw` renders in the spaced `"<group>조 <serial>"`
//! form. Anything that arrives from outside (remote responses, CLI input) goes
//! through the checked constructors below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOTTO_PICKS: usize = 6;
pub const LOTTO_MIN: u8 = 1;
pub const LOTTO_MAX: u8 = 45;

pub const PENSION_GROUPS: u8 = 5;
pub const PENSION_SERIAL_MAX: u32 = 999_999;

/// Why a single draw could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// The source produced nothing (the "generation failed" display state).
    #[error("draw produced no numbers")]
    Empty,
    #[error("expected 6 lotto numbers, got {0}")]
    WrongCount(usize),
    #[error("lotto number {0} outside 1..=45")]
    OutOfRange(i64),
    #[error("duplicate lotto number {0}")]
    Duplicate(u8),
    #[error("pension group {0} outside 1..=5")]
    GroupOutOfRange(u32),
    #[error("malformed pension draw {0:?}")]
    MalformedPension(String),
    /// Remote source reported failure or could not be reached.
    #[error("draw source failed: {0}")]
    Source(String),
}

/// Which kind of draw a collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawKind {
    Lotto,
    Pension,
}

impl DrawKind {
    /// Korean label used in status messages.
    pub fn label(self) -> &'static str {
        match self {
            DrawKind::Lotto => "로또",
            DrawKind::Pension => "연금복권",
        }
    }
}

/// Six distinct numbers in `1..=45`, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct LottoSet([u8; LOTTO_PICKS]);

impl LottoSet {
    /// Canonicalize arbitrary values into a lotto set.
    ///
    /// Values are sorted; an empty input maps to [`DrawError::Empty`].
    pub fn from_values<I>(values: I) -> Result<Self, DrawError>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut raw: Vec<i64> = values.into_iter().collect();
        if raw.is_empty() {
            return Err(DrawError::Empty);
        }
        if raw.len() != LOTTO_PICKS {
            return Err(DrawError::WrongCount(raw.len()));
        }
        raw.sort_unstable();

        let mut numbers = [0u8; LOTTO_PICKS];
        for (slot, value) in numbers.iter_mut().zip(&raw) {
            if !(i64::from(LOTTO_MIN)..=i64::from(LOTTO_MAX)).contains(value) {
                return Err(DrawError::OutOfRange(*value));
            }
            *slot = *value as u8;
        }
        if let Some(pair) = numbers.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(DrawError::Duplicate(pair[0]));
        }
        Ok(Self(numbers))
    }

    /// Wrap numbers already known to be sorted, distinct and in range.
    pub(crate) fn from_sorted(numbers: [u8; LOTTO_PICKS]) -> Self {
        debug_assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8; LOTTO_PICKS] {
        &self.0
    }
}

impl TryFrom<Vec<i64>> for LottoSet {
    type Error = DrawError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_values(values)
    }
}

impl From<LottoSet> for Vec<u8> {
    fn from(set: LottoSet) -> Self {
        set.0.to_vec()
    }
}

impl fmt::Display for LottoSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

/// One pension lottery ticket: a group (조) and a six digit serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PensionDraw {
    group: u8,
    serial: u32,
}

impl PensionDraw {
    pub fn new(group: u32, serial: u32) -> Result<Self, DrawError> {
        if !(1..=u32::from(PENSION_GROUPS)).contains(&group) {
            return Err(DrawError::GroupOutOfRange(group));
        }
        if serial > PENSION_SERIAL_MAX {
            return Err(DrawError::MalformedPension(format!("{group}조 {serial}")));
        }
        Ok(Self {
            group: group as u8,
            serial,
        })
    }

    pub(crate) fn from_parts(group: u8, serial: u32) -> Self {
        debug_assert!((1..=PENSION_GROUPS).contains(&group) && serial <= PENSION_SERIAL_MAX);
        Self { group, serial }
    }

    pub fn group(&self) -> u8 {
        self.group
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Zero-padded six character serial.
    pub fn serial_text(&self) -> String {
        format!("{:06}", self.serial)
    }
}

impl fmt::Display for PensionDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}조 {:06}", self.group, self.serial)
    }
}

/// Accepts `"3조 012345"` and the older spaceless `"3조012345"`.
impl FromStr for PensionDraw {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DrawError::Empty);
        }
        let malformed = || DrawError::MalformedPension(trimmed.to_string());
        let (group, serial) = trimmed.split_once('조').ok_or_else(malformed)?;
        let serial = serial.trim_start();
        if serial.len() != 6 || !serial.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let group = match group.trim().as_bytes() {
            [digit] if digit.is_ascii_digit() => u32::from(digit - b'0'),
            _ => return Err(malformed()),
        };
        let serial: u32 = serial.parse().map_err(|_| malformed())?;
        Self::new(group, serial)
    }
}

impl TryFrom<String> for PensionDraw {
    type Error = DrawError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PensionDraw> for String {
    fn from(draw: PensionDraw) -> Self {
        draw.to_string()
    }
}
