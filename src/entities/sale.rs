//! Sales entity - daily sales totals per store.
//!
//! Dates are stored as text (`YYYY-MM-DD`) exactly as entered in the sales screen;
//! the aggregator parses them and skips rows it cannot read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning store
    pub store_id: i64,
    /// Sales day as entered
    pub sales_date: String,
    /// Day total; NULL counts as zero
    pub total_amount: Option<f64>,
    /// Free-text note
    pub memo: Option<String>,
}

/// No relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
