//! Failure reporting for states the simulation treats as unreachable.
//! Expected absences use `Option`; load-time input errors live next to their loaders.

use std::fmt;

pub const INTERNAL_CONSISTENCY_TAG: &str = "internal-consistency";

/// Logs and aborts the turn. Continuing with a corrupted actor or map would
/// silently desynchronize every later turn.
#[track_caller]
pub fn invariant_violation(message: fmt::Arguments<'_>) -> ! {
    log::error!("[{INTERNAL_CONSISTENCY_TAG}] {message}");
    panic!("[{INTERNAL_CONSISTENCY_TAG}] {message}");
}
