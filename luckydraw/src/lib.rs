//! Lottery number generation and sharing.
//!
//! Draws Lotto 6/45 sets and pension lottery tickets, renders them, and sends
//! them on through an SMS transport or a social-share capability. The crate is
//! split the same way throughout:
//!
//! - **[`core`]**: Pure logic (draw algorithms, set collection, validation,
//!   formatting, status line). Randomness and time are passed in.
//! - **[`io`]**: Configuration, draw sources and transports. Every external
//!   collaborator sits behind a trait so tests can script it.
//!
//! [`session`] ties the two together for one user-facing page of actions and
//! [`shell`] drives a session from line input.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
pub mod shell;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
