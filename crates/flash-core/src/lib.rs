//! flash-core: text-to-structured-field extraction and the draft wizard.
//!
//! A user types a free-form request ("Need a charger at Student Center
//! around 5pm"); this crate turns it into structured fields (category,
//! time, location) and runs the two-step compose/review flow around them:
//! debounced re-extraction on edit, per-field dirty tracking so auto-fills
//! never clobber explicit user input, and session-scoped persistence that
//! survives restarts.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` at I/O seams; extraction and
//!   classification never fail, and persistence failures degrade to an
//!   empty draft.
//! - **Logging**: `tracing` macros (`warn!`, `debug!`).

pub mod classify;
pub mod config;
pub mod debounce;
pub mod draft;
pub mod extract;
pub mod store;
pub mod wizard;
