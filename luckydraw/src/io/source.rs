//! Draw source abstraction.
//!
//! The [`DrawSource`] trait lets one generation pipeline run against the local
//! RNG or a remote backend. Tests use scripted sources that fail on demand.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::core::generate::{draw_lotto, draw_pension};
use crate::core::types::{DrawError, LottoSet, PensionDraw};

/// Produces one draw per call.
pub trait DrawSource {
    fn lotto(&mut self) -> Result<LottoSet, DrawError>;
    fn pension(&mut self) -> Result<PensionDraw, DrawError>;
}

impl<S: DrawSource + ?Sized> DrawSource for Box<S> {
    fn lotto(&mut self) -> Result<LottoSet, DrawError> {
        (**self).lotto()
    }

    fn pension(&mut self) -> Result<PensionDraw, DrawError> {
        (**self).pension()
    }
}

/// Draws generated in-process. Never fails.
#[derive(Debug, Clone)]
pub struct LocalSource<R> {
    rng: R,
}

impl<R: Rng> LocalSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl LocalSource<ThreadRng> {
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl LocalSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DrawSource for LocalSource<R> {
    fn lotto(&mut self) -> Result<LottoSet, DrawError> {
        Ok(draw_lotto(&mut self.rng))
    }

    fn pension(&mut self) -> Result<PensionDraw, DrawError> {
        Ok(draw_pension(&mut self.rng))
    }
}
