//! Terminal user interface (TUI) for flash.
//!
//! ## Entry points
//!
//! - [`wizard::run`]: the interactive two-step compose/review wizard.

pub mod wizard;
