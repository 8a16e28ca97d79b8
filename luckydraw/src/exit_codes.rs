//! Stable exit codes for luckydraw CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid input, invalid config, or nothing generated to send.
pub const INVALID: i32 = 1;
/// Generation stopped early; the produced sets were still printed.
pub const PARTIAL: i32 = 2;
/// Share capability not initialized, or the SMS/share transport failed.
pub const UNAVAILABLE: i32 = 3;
