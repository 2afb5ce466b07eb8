//! In-memory repository double for dialogue and webhook tests.

use std::sync::Mutex;

use estoque_core::domain::{ItemId, LocationHit};

use super::{RepositoryError, StockRepository};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpsertCall {
    pub nome: String,
    pub quantidade: i64,
    pub setor: i64,
    pub user_id: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    items: Vec<StoredItem>,
    upsert_calls: Vec<UpsertCall>,
    fail_requests: bool,
}

#[derive(Debug)]
struct StoredItem {
    id: ItemId,
    nome: String,
    quantidade: i64,
    setor: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryStockRepository {
    inner: Mutex<Inner>,
}

impl InMemoryStockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: &[(&str, i64, i64)]) -> Self {
        let repo = Self::new();
        {
            let mut inner = repo.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            for (nome, quantidade, setor) in items {
                inner.next_id += 1;
                let id = inner.next_id;
                inner.items.push(StoredItem {
                    id,
                    nome: nome.to_string(),
                    quantidade: *quantidade,
                    setor: *setor,
                });
            }
        }
        repo
    }

    /// Make every subsequent call fail with a decode error, for exercising
    /// the spoken-apology paths.
    pub fn fail_requests(&self, fail: bool) {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).fail_requests = fail;
    }

    pub fn upsert_calls(&self) -> Vec<UpsertCall> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).upsert_calls.clone()
    }

    pub fn quantity_of(&self, nome: &str) -> Option<i64> {
        let inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner
            .items
            .iter()
            .find(|item| item.nome.eq_ignore_ascii_case(nome))
            .map(|item| item.quantidade)
    }
}

#[async_trait::async_trait]
impl StockRepository for InMemoryStockRepository {
    async fn find_by_name_fragment(
        &self,
        fragment: &str,
    ) -> Result<Vec<LocationHit>, RepositoryError> {
        let inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.fail_requests {
            return Err(RepositoryError::Decode("in-memory repository set to fail".to_string()));
        }

        let needle = fragment.trim().to_lowercase();
        Ok(inner
            .items
            .iter()
            .filter(|item| item.nome.to_lowercase().contains(&needle))
            .map(|item| LocationHit { nome: item.nome.clone(), setor: Some(item.setor) })
            .collect())
    }

    async fn upsert_stock(
        &self,
        nome: &str,
        quantidade: i64,
        setor: i64,
        user_id: Option<&str>,
        device_id: Option<&str>,
    ) -> Result<ItemId, RepositoryError> {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.fail_requests {
            return Err(RepositoryError::Decode("in-memory repository set to fail".to_string()));
        }

        inner.upsert_calls.push(UpsertCall {
            nome: nome.to_string(),
            quantidade,
            setor,
            user_id: user_id.map(str::to_string),
            device_id: device_id.map(str::to_string),
        });

        if let Some(item) =
            inner.items.iter_mut().find(|item| item.nome.eq_ignore_ascii_case(nome))
        {
            item.quantidade += quantidade;
            item.setor = setor;
            return Ok(item.id);
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.items.push(StoredItem { id, nome: nome.to_string(), quantidade, setor });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryStockRepository, StockRepository};

    #[tokio::test]
    async fn double_mirrors_the_sql_upsert_contract() {
        let repo = InMemoryStockRepository::new();

        let first = repo.upsert_stock("cabo", 10, 4, None, None).await.expect("upsert");
        let second = repo.upsert_stock("CABO", 5, 7, None, None).await.expect("upsert");

        assert_eq!(first, second);
        assert_eq!(repo.quantity_of("cabo"), Some(15));
        assert_eq!(repo.upsert_calls().len(), 2);
    }

    #[tokio::test]
    async fn failure_toggle_poisons_both_operations() {
        let repo = InMemoryStockRepository::with_items(&[("Parafuso M6", 3, 3)]);
        repo.fail_requests(true);

        assert!(repo.find_by_name_fragment("parafuso").await.is_err());
        assert!(repo.upsert_stock("cabo", 1, 1, None, None).await.is_err());
        assert!(repo.upsert_calls().is_empty(), "failed calls are not recorded");
    }
}
