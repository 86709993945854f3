//! Vendor entity - counterparties for fixed recurring expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vendor database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    /// Unique identifier for the vendor
    #[sea_orm(primary_key)]
    pub vendor_id: i64,
    /// Vendor name shown in expense breakdowns
    pub vendor_name: String,
    /// Store the vendor is usually billed to, if any
    pub store_id: Option<i64>,
    /// Free-form grouping such as "임대료" or "관리비"
    pub category: Option<String>,
    /// Free-text note
    pub memo: Option<String>,
}

/// Defines relationships between Vendor and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One vendor has many fixed expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
