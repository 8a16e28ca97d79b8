//! Set-collection assembly.

use thiserror::Error;

use crate::core::types::DrawError;

/// Upper bound on selectable set counts when nothing is configured.
pub const DEFAULT_MAX_SETS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("set count {requested} outside 1..={max}")]
pub struct SetCountError {
    pub requested: u32,
    pub max: u8,
}

/// A user-selectable number of sets, `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SetCount(u8);

impl SetCount {
    pub fn new(requested: u32, max: u8) -> Result<Self, SetCountError> {
        if requested == 0 || requested > u32::from(max) {
            return Err(SetCountError { requested, max });
        }
        Ok(Self(requested as u8))
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

/// Draws produced by one generation request, in request order.
///
/// `requested` is what the user asked for; `draws.len()` may be lower when the
/// source failed part-way, in which case `failure` holds the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCollection<D> {
    draws: Vec<D>,
    requested: usize,
    failure: Option<DrawError>,
}

impl<D> SetCollection<D> {
    pub fn empty() -> Self {
        Self {
            draws: Vec::new(),
            requested: 0,
            failure: None,
        }
    }

    pub fn draws(&self) -> &[D] {
        &self.draws
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn produced(&self) -> usize {
        self.draws.len()
    }

    pub fn failure(&self) -> Option<&DrawError> {
        self.failure.as_ref()
    }

    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl<D> Default for SetCollection<D> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Invoke `next` up to `count` times, stopping at the first failure.
///
/// Draws produced before the failure are kept in order; the generator is
/// never retried.
pub fn collect_sets<D, F>(count: usize, mut next: F) -> SetCollection<D>
where
    F: FnMut() -> Result<D, DrawError>,
{
    let mut draws = Vec::with_capacity(count);
    let mut failure = None;
    for _ in 0..count {
        match next() {
            Ok(draw) => draws.push(draw),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }
    SetCollection {
        draws,
        requested: count,
        failure,
    }
}
