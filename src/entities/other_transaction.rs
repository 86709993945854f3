//! Miscellaneous transaction entity - one-off costs that are neither purchases nor fixed expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Miscellaneous transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "other_transactions")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning store
    pub store_id: i64,
    /// Transaction day as entered (`YYYY-MM-DD`)
    pub date: String,
    /// Amount; NULL counts as zero
    pub amount: Option<f64>,
    /// Free-text description
    pub detail: Option<String>,
}

/// No relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
