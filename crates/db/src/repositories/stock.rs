use estoque_core::domain::{ItemId, LocationHit};

use super::{RepositoryError, StockRepository};
use crate::DbPool;

pub struct SqlStockRepository {
    pool: DbPool,
}

impl SqlStockRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StockRepository for SqlStockRepository {
    async fn find_by_name_fragment(
        &self,
        fragment: &str,
    ) -> Result<Vec<LocationHit>, RepositoryError> {
        let pattern = format!("%{}%", fragment.trim());
        let rows = sqlx::query_as::<_, (String, Option<i64>)>(
            "SELECT p.nome, l.setor
             FROM produtos AS p
             LEFT JOIN localizacoes AS l ON p.localizacao_id = l.id
             WHERE p.nome LIKE ?1
             ORDER BY p.nome",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(nome, setor)| LocationHit { nome, setor }).collect())
    }

    async fn upsert_stock(
        &self,
        nome: &str,
        quantidade: i64,
        setor: i64,
        _user_id: Option<&str>,
        _device_id: Option<&str>,
    ) -> Result<ItemId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Locate-or-create the sector's canonical location inside the same
        // transaction as the item upsert; lowest id wins when duplicates
        // exist.
        let localizacao_id = match sqlx::query_scalar::<_, i64>(
            "SELECT id FROM localizacoes WHERE setor = ?1 ORDER BY id LIMIT 1",
        )
        .bind(setor)
        .fetch_optional(&mut *tx)
        .await?
        {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO localizacoes (setor) VALUES (?1) RETURNING id",
                )
                .bind(setor)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let existing = sqlx::query_as::<_, (i64, i64)>(
            "SELECT id, quantidade FROM produtos
             WHERE nome = ?1 COLLATE NOCASE
             ORDER BY id LIMIT 1",
        )
        .bind(nome)
        .fetch_optional(&mut *tx)
        .await?;

        let item_id = match existing {
            Some((id, atual)) => {
                sqlx::query(
                    "UPDATE produtos SET quantidade = ?1, localizacao_id = ?2 WHERE id = ?3",
                )
                .bind(atual + quantidade)
                .bind(localizacao_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
                id
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO produtos (nome, quantidade, preco, localizacao_id)
                     VALUES (?1, ?2, 0, ?3)
                     RETURNING id",
                )
                .bind(nome)
                .bind(quantidade)
                .bind(localizacao_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(item_id)
    }
}
