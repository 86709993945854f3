//! Studio ledger entity - bank-statement style deposits for the studio business line.
//!
//! Deposits can land in a different month than the rent they pay for, so the
//! office fills in `real_sales` and `real_month` to correct attribution. Both
//! columns override the literal deposit when present.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Studio ledger database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "studio_ledger")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Deposit date as it appears on the statement
    pub date: String,
    /// Depositor / statement memo
    pub description: Option<String>,
    /// Literal deposited amount
    pub amount_in: Option<f64>,
    /// Corrected sales amount, overrides `amount_in`
    pub real_sales: Option<f64>,
    /// Room the deposit is for, 1-15
    pub room: Option<i32>,
    /// Corrected attribution month, 1-12
    pub real_month: Option<i32>,
}

/// No relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
