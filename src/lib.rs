//! SOP Maker - author Standard Operating Procedure documents in the terminal
//!
//! The core lives in [`sop`]: the editing session ([`sop::StepEditor`]) and
//! the JSON document store ([`sop::DocumentStore`]). The [`ui`] and [`app`]
//! modules are the terminal front end that drives them.

pub mod app;
pub mod config;
pub mod logging;
pub mod sop;
pub mod ui;

pub use sop::{Document, DocumentStore, SopError, Step, StepEditor};
