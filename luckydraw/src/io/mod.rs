//! Side-effecting collaborators: configuration, draw sources and transports.

pub mod config;
pub mod remote;
pub mod share;
pub mod sms;
pub mod source;
