//! Database configuration module for store-ledger.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Production points `DATABASE_URL` at the hosted Postgres instance;
//! local runs and tests use `SQLite`.

use crate::config::settings::StoreConfig;
use crate::entities::{
    Customer, Expense, OtherTransaction, Purchase, Sale, Store, StudioLedger, Vendor, store,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set};
use std::path::Path;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/store_ledger.sqlite?mode=rwc";

/// Gets the database URL from `DATABASE_URL` or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection using [`get_database_url`].
///
/// For a local `SQLite` file the parent directory is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    Database::connect(&database_url).await.map_err(Into::into)
}

fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates every table that does not exist yet, from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Store),
        schema.create_table_from_entity(Vendor),
        schema.create_table_from_entity(Sale),
        schema.create_table_from_entity(Purchase),
        schema.create_table_from_entity(Expense),
        schema.create_table_from_entity(OtherTransaction),
        schema.create_table_from_entity(StudioLedger),
        schema.create_table_from_entity(Customer),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

/// Inserts configured stores that are missing. Existing rows are left alone.
///
/// Returns the number of stores inserted.
pub async fn seed_stores(db: &DatabaseConnection, stores: &[StoreConfig]) -> Result<usize> {
    let mut inserted = 0;
    for config in stores {
        if Store::find_by_id(config.store_id).one(db).await?.is_some() {
            continue;
        }
        let model = store::ActiveModel {
            store_id: Set(config.store_id),
            store_name: Set(config.store_name.clone()),
        };
        Store::insert(model).exec(db).await?;
        info!(
            store_id = config.store_id,
            "Seeded store {}", config.store_name
        );
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CustomerModel, ExpenseModel, OtherTransactionModel, PurchaseModel, SaleModel, StoreModel,
        StudioLedgerModel, VendorModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<StoreModel> = Store::find().limit(1).all(&db).await?;
        let _: Vec<VendorModel> = Vendor::find().limit(1).all(&db).await?;
        let _: Vec<SaleModel> = Sale::find().limit(1).all(&db).await?;
        let _: Vec<PurchaseModel> = Purchase::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<OtherTransactionModel> = OtherTransaction::find().limit(1).all(&db).await?;
        let _: Vec<StudioLedgerModel> = StudioLedger::find().limit(1).all(&db).await?;
        let _: Vec<CustomerModel> = Customer::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/store_ledger.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://ledger.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("postgres://user@host/db"), None);
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_stores_skips_existing() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let stores = vec![
            StoreConfig {
                store_id: 1001,
                store_name: "본점".to_string(),
            },
            StoreConfig {
                store_id: 2001,
                store_name: "원룸".to_string(),
            },
        ];

        assert_eq!(seed_stores(&db, &stores).await?, 2);
        assert_eq!(seed_stores(&db, &stores).await?, 0);

        let all = Store::find().all(&db).await?;
        assert_eq!(all.len(), 2);
        Ok(())
    }
}
