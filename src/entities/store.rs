//! Store entity - one physical or logical business unit (shop or studio).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Store database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    /// Business-assigned store number (e.g. 1001, 2001 for the studio)
    #[sea_orm(primary_key, auto_increment = false)]
    pub store_id: i64,
    /// Display name
    pub store_name: String,
}

/// No relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
