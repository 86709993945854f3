//! Purchase entity - goods bought for a store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning store
    pub store_id: i64,
    /// Purchase day as entered (`YYYY-MM-DD`)
    pub purchase_date: String,
    /// Supplying vendor, when recorded
    pub vendor_id: Option<i64>,
    /// What was bought
    pub item_name: Option<String>,
    /// Purchase amount; NULL counts as zero
    pub amount: Option<f64>,
}

/// No relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
