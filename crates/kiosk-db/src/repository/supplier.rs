//! # Supplier Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kiosk_core::validation::validate_supplier_name;
use kiosk_core::Supplier;

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Adds a supplier and returns its id. Names are unique.
    pub async fn create(&self, name: &str) -> DbResult<i64> {
        validate_supplier_name(name)?;
        debug!(name = %name, "Creating supplier");

        let id = sqlx::query("INSERT INTO suppliers (name) VALUES (?1)")
            .bind(name.trim())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(id)
    }

    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT id, name FROM suppliers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(suppliers)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT id, name FROM suppliers WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_create_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let suppliers = db.suppliers();

        assert!(suppliers.list().await.unwrap().is_empty());

        let sur = suppliers.create("Distribuidora Sur").await.unwrap();
        suppliers.create("Arcor").await.unwrap();

        let names: Vec<String> = suppliers
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Arcor", "Distribuidora Sur"]);

        let found = suppliers.get_by_id(sur).await.unwrap().unwrap();
        assert_eq!(found.name, "Distribuidora Sur");
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.suppliers().create("Arcor").await.unwrap();

        let err = db.suppliers().create("Arcor").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
