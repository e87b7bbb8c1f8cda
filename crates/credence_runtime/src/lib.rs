//! Runtime shell for the Credence probabilistic concept base.
//!
//! This crate provides:
//! - [`Session`] - The operations façade binding caller identity to mutations
//! - [`Clock`] / [`SystemClock`] / [`FixedClock`] - Time sources for audit stamps
//! - [`serialize`] - `MessagePack` snapshot persistence
//! - [`Repl`] - The interactive shell

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod editor;
pub mod repl;
pub mod serialize;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use repl::Repl;
pub use session::Session;
