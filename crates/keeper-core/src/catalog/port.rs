use async_trait::async_trait;

use crate::{catalog::types::MediaItem, Result};

/// Media-catalog port.
///
/// Plex is the first implementation; the core only ever searches titles and
/// deletes resolved items.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>>;
    async fn delete(&self, item: &MediaItem) -> Result<()>;
}
