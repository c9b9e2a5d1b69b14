//! Inventory search core for AutoPick.
//!
//! Turns a free-text chat query into a `FilterSpec`, evaluates records
//! against it, and classifies completion replies that should offer a
//! human manager. Everything here is pure and synchronous: no I/O, no
//! shared state, and no input (however malformed) produces an error.
//!
//! - `extract`: ordered rule list (mileage, year, price, vocabulary, keywords).
//! - `matcher`: fail-closed record predicate.
//! - `query`: capped first-N search in structured or free-text mode.
//! - `escalation`: trigger-phrase detection on fallback replies.

pub mod escalation;
pub mod extract;
pub mod matcher;
pub mod query;
pub mod tokenize;

pub use escalation::needs_escalation;
pub use extract::extract;
pub use matcher::matches;
pub use query::{QueryEngine, query};
pub use ap_protocol::SearchMode;
