//! CLI command implementations for pairclass.
//!
//! Each submodule implements one subcommand:
//!
//! - [`classify`] - Classify read pairs by insert size and orientation

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

pub mod classify;
pub mod command;
