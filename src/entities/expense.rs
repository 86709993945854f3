//! Fixed expense entity - recurring monthly costs keyed by store, vendor, year and month.
//!
//! Unlike sales and purchases these rows carry explicit `year`/`month` columns instead
//! of a date. At most one row per (store, vendor, year, month) is expected but the
//! table does not enforce it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning store
    pub store_id: i64,
    /// Vendor billed, if known
    pub vendor_id: Option<i64>,
    /// Fiscal year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: i32,
    /// Amount; NULL counts as zero
    pub amount: Option<f64>,
    /// Free-text note
    pub memo: Option<String>,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense may belong to one vendor
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::VendorId"
    )]
    Vendor,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
