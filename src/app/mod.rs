//! Binary-local application orchestration.
//!
//! `entry` wires settings, credentials, and the remote client together;
//! `commands` renders the outcome of each task command.

pub(crate) mod commands;
pub(crate) mod entry;
