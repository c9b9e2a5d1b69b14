//! Inventory record sources for AutoPick.
//!
//! The assistant only sees the `RecordSource` trait. `SheetsSource` reads a
//! Google Sheets worksheet over HTTP; `MockRecordSource` serves a fixed
//! inventory for tests and local runs.

pub mod error;
pub mod mock;
pub mod sheets;
pub mod source;

pub use error::{SheetError, SheetResult};
pub use mock::MockRecordSource;
pub use sheets::{SheetsConfig, SheetsSource};
pub use source::RecordSource;
