//! Customer entity - studio tenants and their room assignment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant name
    pub name: String,
    /// Contact number
    pub phone: Option<String>,
    /// Assigned room, 1-15
    pub room: Option<i32>,
    /// Move-in date (`YYYY-MM-DD`)
    pub check_in: Option<String>,
    /// Move-out date (`YYYY-MM-DD`)
    pub check_out: Option<String>,
    /// Security deposit in won
    pub deposit: Option<f64>,
    /// Rent in won
    pub monthly_rent: Option<f64>,
    /// Free-text note
    pub memo: Option<String>,
}

/// No relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
