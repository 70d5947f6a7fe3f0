//! Connection metrics
//!
//! Counters are recorded through the `metrics` facade; nothing is exported
//! unless the application installs a recorder.

pub mod counters;
pub mod labels;

#[cfg(test)]
pub(crate) mod testing;
