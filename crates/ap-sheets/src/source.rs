//! Record source abstraction.

use async_trait::async_trait;

use ap_protocol::Record;

use crate::error::SheetResult;

/// Supplies the current inventory.
///
/// Implementations fetch fresh rows on every call; nothing is cached, so a
/// sheet edit is visible on the next message.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All inventory rows in sheet order.
    async fn fetch_all(&self) -> SheetResult<Vec<Record>>;

    /// First row whose identifier equals `id` (trimmed, case-sensitive).
    async fn find_by_id(&self, id: &str) -> SheetResult<Option<Record>> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        let records = self.fetch_all().await?;
        Ok(records.into_iter().find(|r| r.id() == Some(id)))
    }

    /// Short label for logs.
    fn source_name(&self) -> &str;
}
