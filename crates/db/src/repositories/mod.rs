use async_trait::async_trait;
use thiserror::Error;

use estoque_core::domain::{ItemId, LocationHit};

pub mod memory;
pub mod stock;

pub use memory::{InMemoryStockRepository, UpsertCall};
pub use stock::SqlStockRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Persistence collaborator for the voice dialogue: location lookup and
/// stock upsert. No-match lookups return an empty list, never an error.
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Substring, case-insensitive match on the item name.
    async fn find_by_name_fragment(
        &self,
        fragment: &str,
    ) -> Result<Vec<LocationHit>, RepositoryError>;

    /// Case-insensitive exact-name upsert: an existing item gains
    /// `quantidade` and is reassigned to the (lazily created) location for
    /// `setor`; a new name is inserted with that quantity and location. One
    /// transaction per call. The caller identifiers are accepted for audit
    /// logging at the webhook edge; the schema does not persist them.
    async fn upsert_stock(
        &self,
        nome: &str,
        quantidade: i64,
        setor: i64,
        user_id: Option<&str>,
        device_id: Option<&str>,
    ) -> Result<ItemId, RepositoryError>;
}
