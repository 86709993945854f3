//! Shared test utilities for store-ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    entities::{customer, expense, other_transaction, purchase, sale, store, studio_ledger, vendor},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a store with the given business id.
pub async fn create_test_store(
    db: &DatabaseConnection,
    store_id: i64,
    store_name: &str,
) -> Result<store::Model> {
    let model = store::ActiveModel {
        store_id: Set(store_id),
        store_name: Set(store_name.to_string()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a vendor with no store, category or memo.
pub async fn create_test_vendor(db: &DatabaseConnection, name: &str) -> Result<vendor::Model> {
    let model = vendor::ActiveModel {
        vendor_id: NotSet,
        vendor_name: Set(name.to_string()),
        store_id: Set(None),
        category: Set(None),
        memo: Set(None),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a daily sales row.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    store_id: i64,
    date: &str,
    total_amount: Option<f64>,
) -> Result<sale::Model> {
    let model = sale::ActiveModel {
        id: NotSet,
        store_id: Set(store_id),
        sales_date: Set(date.to_string()),
        total_amount: Set(total_amount),
        memo: Set(None),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a purchase row with no vendor or item.
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    store_id: i64,
    date: &str,
    amount: Option<f64>,
) -> Result<purchase::Model> {
    let model = purchase::ActiveModel {
        id: NotSet,
        store_id: Set(store_id),
        purchase_date: Set(date.to_string()),
        vendor_id: Set(None),
        item_name: Set(None),
        amount: Set(amount),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a fixed expense booked for `year`/`month`.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    store_id: i64,
    vendor_id: Option<i64>,
    year: i32,
    month: i32,
    amount: Option<f64>,
) -> Result<expense::Model> {
    let model = expense::ActiveModel {
        id: NotSet,
        store_id: Set(store_id),
        vendor_id: Set(vendor_id),
        year: Set(year),
        month: Set(month),
        amount: Set(amount),
        memo: Set(None),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a miscellaneous transaction.
pub async fn create_test_other(
    db: &DatabaseConnection,
    store_id: i64,
    date: &str,
    amount: Option<f64>,
) -> Result<other_transaction::Model> {
    let model = other_transaction::ActiveModel {
        id: NotSet,
        store_id: Set(store_id),
        date: Set(date.to_string()),
        amount: Set(amount),
        detail: Set(None),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a studio deposit.
///
/// # Defaults
/// * `description`: None
/// * `real_month`: None
pub async fn create_test_ledger(
    db: &DatabaseConnection,
    date: &str,
    amount_in: Option<f64>,
    real_sales: Option<f64>,
    room: Option<i32>,
) -> Result<studio_ledger::Model> {
    let model = studio_ledger::ActiveModel {
        id: NotSet,
        date: Set(date.to_string()),
        description: Set(None),
        amount_in: Set(amount_in),
        real_sales: Set(real_sales),
        room: Set(room),
        real_month: Set(None),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a customer.
///
/// # Defaults
/// * `phone`: "010-0000-0000"
/// * `monthly_rent`: 400000
/// * everything else: None
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
    room: Option<i32>,
) -> Result<customer::Model> {
    let model = customer::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        phone: Set(Some("010-0000-0000".to_string())),
        room: Set(room),
        check_in: Set(None),
        check_out: Set(None),
        deposit: Set(None),
        monthly_rent: Set(Some(400_000.0)),
        memo: Set(None),
    };
    model.insert(db).await.map_err(Into::into)
}
