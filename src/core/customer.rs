//! Studio customer operations - listing tenants and editing their details.

use crate::{
    entities::{Customer, customer},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Deserializer};

/// Highest room number in the studio building.
pub const MAX_ROOM: i32 = 15;

/// Partial customer update. Absent fields stay untouched; explicit `null`
/// clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdate {
    /// New name; must not be blank
    pub name: Option<String>,
    /// Contact number
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    /// Room number, 1-15
    #[serde(default, deserialize_with = "nullable")]
    pub room: Option<Option<i32>>,
    /// Move-in date
    #[serde(default, deserialize_with = "nullable")]
    pub check_in: Option<Option<String>>,
    /// Move-out date
    #[serde(default, deserialize_with = "nullable")]
    pub check_out: Option<Option<String>>,
    /// Security deposit in won
    #[serde(default, deserialize_with = "nullable")]
    pub deposit: Option<Option<f64>>,
    /// Rent in won
    #[serde(default, deserialize_with = "nullable")]
    pub monthly_rent: Option<Option<f64>>,
    /// Free-text note
    #[serde(default, deserialize_with = "nullable")]
    pub memo: Option<Option<String>>,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// All customers, by room then id. Customers without a room sort last.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    let mut customers = Customer::find()
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?;
    customers.sort_by_key(|c| (c.room.is_none(), c.room, c.id));
    Ok(customers)
}

/// Finds a customer by id.
pub async fn get_customer(db: &DatabaseConnection, id: i64) -> Result<Option<customer::Model>> {
    Customer::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Applies `update` to customer `id` and returns the stored row.
///
/// # Errors
/// [`Error::NotFound`] for an unknown id, [`Error::Validation`] for an empty
/// name or a room outside 1-15.
pub async fn update_customer(
    db: &DatabaseConnection,
    id: i64,
    update: CustomerUpdate,
) -> Result<customer::Model> {
    let existing = get_customer(db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "customer",
            id,
        })?;

    if let Some(Some(room)) = update.room {
        if !(1..=MAX_ROOM).contains(&room) {
            return Err(Error::Validation {
                message: format!("room must be between 1 and {MAX_ROOM}, got {room}"),
            });
        }
    }

    let mut active: customer::ActiveModel = existing.into();
    if let Some(name) = update.name {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                message: "customer name cannot be empty".to_string(),
            });
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(phone) = update.phone {
        active.phone = Set(phone);
    }
    if let Some(room) = update.room {
        active.room = Set(room);
    }
    if let Some(check_in) = update.check_in {
        active.check_in = Set(check_in);
    }
    if let Some(check_out) = update.check_out {
        active.check_out = Set(check_out);
    }
    if let Some(deposit) = update.deposit {
        active.deposit = Set(deposit);
    }
    if let Some(monthly_rent) = update.monthly_rent {
        active.monthly_rent = Set(monthly_rent);
    }
    if let Some(memo) = update.memo {
        active.memo = Set(memo);
    }

    active.update(db).await.map_err(Into::into)
}
