//! Seed helpers for integration-style tests.

use crate::repositories::{RepositoryError, SqlStockRepository, StockRepository};
use crate::DbPool;

/// Seed `(nome, quantidade, setor)` triples through the real upsert path so
/// the locations are created exactly the way production turns create them.
pub async fn seed_stock(pool: &DbPool, items: &[(&str, i64, i64)]) -> Result<(), RepositoryError> {
    let repo = SqlStockRepository::new(pool.clone());
    for (nome, quantidade, setor) in items {
        repo.upsert_stock(nome, *quantidade, *setor, None, None).await?;
    }
    Ok(())
}
