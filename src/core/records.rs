//! Domain records consumed by the aggregator.
//!
//! These are detached from the sea-orm models so the aggregation pass stays a
//! pure function over plain data. Conversions from the entity models live at the
//! bottom of the module.

use crate::core::period::{checked_month, resolve_year_month};
use crate::entities::{
    expense, other_transaction, purchase, sale, store, studio_ledger, vendor,
};
use serde::{Deserialize, Serialize};

/// Store id of the studio business line in the default roster.
pub const DEFAULT_STUDIO_STORE_ID: i64 = 2001;

/// Vendor label used when an expense has no joined vendor.
pub const UNKNOWN_VENDOR: &str = "기타";

/// Treats missing and non-finite amounts as zero.
#[must_use]
pub fn amount_or_zero(amount: Option<f64>) -> f64 {
    amount.filter(|a| a.is_finite()).unwrap_or(0.0)
}

/// Reference entry for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    /// Primary key
    pub store_id: i64,
    /// Display name
    pub store_name: String,
}

/// One day of sales for a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Owning store
    pub store_id: i64,
    /// `YYYY-MM-DD`
    pub sales_date: String,
    /// Day total in won
    pub total_amount: Option<f64>,
}

/// One purchase for a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Owning store
    pub store_id: i64,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    /// Cost in won
    pub amount: Option<f64>,
}

/// One fixed expense, with the vendor name joined in when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Owning store
    pub store_id: i64,
    /// Vendor row, if linked
    pub vendor_id: Option<i64>,
    /// Billing year
    pub year: i32,
    /// Billing month, 1-12
    pub month: i32,
    /// Cost in won
    pub amount: Option<f64>,
    /// Joined vendor name
    pub vendor_name: Option<String>,
}

impl ExpenseRecord {
    /// Joined vendor name, or [`UNKNOWN_VENDOR`].
    #[must_use]
    pub fn vendor_label(&self) -> &str {
        self.vendor_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_VENDOR)
    }
}

/// One miscellaneous transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherTransactionRecord {
    /// Owning store
    pub store_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Signed amount in won
    pub amount: Option<f64>,
    /// Free-text description
    pub detail: Option<String>,
}

/// One studio deposit as it appears on the bank statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioLedgerEntry {
    /// Deposit date, `YYYY-MM-DD`
    pub date: String,
    /// Amount received
    pub amount_in: Option<f64>,
    /// Revenue to book instead of `amount_in`
    pub real_sales: Option<f64>,
    /// Room the deposit pays for
    pub room: Option<i32>,
    /// Month of the deposit's own year the payment belongs to
    pub real_month: Option<i32>,
}

/// Records carrying a store, a text date and an amount.
pub trait DatedRecord {
    /// Owning store
    fn store_id(&self) -> i64;
    /// Raw date text
    fn date(&self) -> &str;
    /// Amount with missing values read as zero
    fn amount(&self) -> f64;
}

impl DatedRecord for SalesRecord {
    fn store_id(&self) -> i64 {
        self.store_id
    }
    fn date(&self) -> &str {
        &self.sales_date
    }
    fn amount(&self) -> f64 {
        amount_or_zero(self.total_amount)
    }
}

impl DatedRecord for PurchaseRecord {
    fn store_id(&self) -> i64 {
        self.store_id
    }
    fn date(&self) -> &str {
        &self.purchase_date
    }
    fn amount(&self) -> f64 {
        amount_or_zero(self.amount)
    }
}

impl DatedRecord for OtherTransactionRecord {
    fn store_id(&self) -> i64 {
        self.store_id
    }
    fn date(&self) -> &str {
        &self.date
    }
    fn amount(&self) -> f64 {
        amount_or_zero(self.amount)
    }
}

/// Where a revenue figure comes from.
///
/// Generic stores report sales through the sales table. The studio reports
/// through its deposit ledger instead, with its own override columns.
#[derive(Debug, Clone, Copy)]
pub enum RevenueSource<'a> {
    /// A row of the sales table
    GenericSale(&'a SalesRecord),
    /// A studio deposit attributed to the studio store
    StudioLedgerDeposit {
        /// Ledger row
        entry: &'a StudioLedgerEntry,
        /// Store the deposit is credited to
        store_id: i64,
    },
}

/// A revenue row with its attribution resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRevenue {
    /// Store credited
    pub store_id: i64,
    /// Calendar year of the record's date
    pub year: i32,
    /// Month used by the full-year trend arrays
    pub trend_month: u32,
    /// Month used by range totals
    pub range_month: u32,
    /// Revenue in won
    pub amount: f64,
}

impl RevenueSource<'_> {
    /// Resolves store, year, months and amount. `None` when the date is unreadable.
    ///
    /// For studio deposits the trend month is always the deposit's calendar month,
    /// while `real_month` only moves the deposit for range totals. The year is
    /// always the deposit's own year, even when `real_month` points at a
    /// month that has not happened yet in it.
    #[must_use]
    pub fn resolve(&self) -> Option<ResolvedRevenue> {
        match *self {
            Self::GenericSale(sale) => {
                let (year, month) = resolve_year_month(sale.date())?;
                Some(ResolvedRevenue {
                    store_id: sale.store_id,
                    year,
                    trend_month: month,
                    range_month: month,
                    amount: sale.amount(),
                })
            }
            Self::StudioLedgerDeposit { entry, store_id } => {
                let (year, month) = resolve_year_month(&entry.date)?;
                let range_month = entry.real_month.and_then(checked_month).unwrap_or(month);
                let amount = if entry.real_sales.is_some() {
                    amount_or_zero(entry.real_sales)
                } else {
                    amount_or_zero(entry.amount_in)
                };
                Some(ResolvedRevenue {
                    store_id,
                    year,
                    trend_month: month,
                    range_month,
                    amount,
                })
            }
        }
    }
}

/// Every revenue source for one aggregation pass.
///
/// Sales rows of the studio store are dropped; the studio's revenue comes only
/// from its ledger.
pub fn revenue_sources<'a>(
    sales: &'a [SalesRecord],
    ledger: &'a [StudioLedgerEntry],
    studio_store_id: i64,
) -> impl Iterator<Item = RevenueSource<'a>> {
    let generic = sales
        .iter()
        .filter(move |sale| sale.store_id != studio_store_id)
        .map(RevenueSource::GenericSale);
    let studio = ledger
        .iter()
        .map(move |entry| RevenueSource::StudioLedgerDeposit {
            entry,
            store_id: studio_store_id,
        });
    generic.chain(studio)
}

impl From<store::Model> for StoreRef {
    fn from(model: store::Model) -> Self {
        Self {
            store_id: model.store_id,
            store_name: model.store_name,
        }
    }
}

impl From<sale::Model> for SalesRecord {
    fn from(model: sale::Model) -> Self {
        Self {
            store_id: model.store_id,
            sales_date: model.sales_date,
            total_amount: model.total_amount,
        }
    }
}

impl From<purchase::Model> for PurchaseRecord {
    fn from(model: purchase::Model) -> Self {
        Self {
            store_id: model.store_id,
            purchase_date: model.purchase_date,
            amount: model.amount,
        }
    }
}

impl From<(expense::Model, Option<vendor::Model>)> for ExpenseRecord {
    fn from((model, vendor): (expense::Model, Option<vendor::Model>)) -> Self {
        Self {
            store_id: model.store_id,
            vendor_id: model.vendor_id,
            year: model.year,
            month: model.month,
            amount: model.amount,
            vendor_name: vendor.map(|v| v.vendor_name),
        }
    }
}

impl From<other_transaction::Model> for OtherTransactionRecord {
    fn from(model: other_transaction::Model) -> Self {
        Self {
            store_id: model.store_id,
            date: model.date,
            amount: model.amount,
            detail: model.detail,
        }
    }
}

impl From<studio_ledger::Model> for StudioLedgerEntry {
    fn from(model: studio_ledger::Model) -> Self {
        Self {
            date: model.date,
            amount_in: model.amount_in,
            real_sales: model.real_sales,
            room: model.room,
            real_month: model.real_month,
        }
    }
}
