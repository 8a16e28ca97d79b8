//! Deterministic, pure logic for drawing and presenting numbers.
//!
//! Core modules must be free of I/O side effects. Randomness comes in as an
//! `Rng` argument and time as an `Instant`, so everything here is testable
//! with a seeded generator and a fixed clock.

pub mod collect;
pub mod generate;
pub mod phone;
pub mod render;
pub mod share_text;
pub mod status;
pub mod types;
