//! Period aggregation - the numbers behind the dashboard and the summary cards.
//!
//! [`aggregate`] is a pure function over an already-fetched [`Snapshot`]. It never
//! performs I/O and keeps no state between calls; callers rerun it whenever the
//! snapshot or the selected month range changes.
//!
//! Two filters are in play and they are deliberately different:
//! - the monthly trend arrays only check the year ([`in_trend`]);
//! - every total checks the year and the month range ([`in_range`]).

use crate::core::period::{MonthRange, checked_month, resolve_year_month};
use crate::core::records::{DatedRecord, ExpenseRecord, amount_or_zero, revenue_sources};
use crate::core::snapshot::Snapshot;
use serde::Serialize;
use std::collections::HashMap;

/// Fixed-expense contribution of one vendor to one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorExpense {
    /// Vendor display name
    pub vendor_name: String,
    /// Summed over the range
    pub amount: f64,
}

/// Range totals for one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    /// Store primary key
    pub store_id: i64,
    /// Display name from the reference list
    pub store_name: String,
    /// Revenue
    pub sales: f64,
    /// Purchases
    pub purchases: f64,
    /// Fixed expenses
    pub expenses: f64,
    /// Other transactions
    pub others: f64,
    /// `sales - purchases - expenses - others`
    pub profit: f64,
    /// Fixed expenses by vendor, in first-seen order
    pub vendor_expenses: Vec<VendorExpense>,
}

impl StoreSummary {
    fn empty(store_id: i64, store_name: String) -> Self {
        Self {
            store_id,
            store_name,
            sales: 0.0,
            purchases: 0.0,
            expenses: 0.0,
            others: 0.0,
            profit: 0.0,
            vendor_expenses: Vec::new(),
        }
    }

    fn add_vendor_expense(&mut self, vendor_name: &str, amount: f64) {
        if let Some(existing) = self
            .vendor_expenses
            .iter_mut()
            .find(|v| v.vendor_name == vendor_name)
        {
            existing.amount += amount;
        } else {
            self.vendor_expenses.push(VendorExpense {
                vendor_name: vendor_name.to_string(),
                amount,
            });
        }
    }
}

/// Grand totals over the selected range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Revenue of every store, including unknown ids
    pub sales: f64,
    /// Purchases
    pub purchases: f64,
    /// Fixed expenses
    pub expenses: f64,
    /// Other transactions
    pub others: f64,
}

impl Totals {
    /// `sales - purchases - expenses - others`
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.sales - self.purchases - self.expenses - self.others
    }
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Selected year
    pub year: i32,
    /// Selected month range within `year`
    pub range: MonthRange,
    /// Sales per calendar month of `year`, ignoring the range
    pub monthly_sales: [f64; 12],
    /// Purchases per calendar month of `year`, ignoring the range
    pub monthly_purchases: [f64; 12],
    /// Grand totals over the range
    pub totals: Totals,
    /// One entry per reference store, ascending by id
    pub stores: Vec<StoreSummary>,
}

impl AggregateResult {
    /// Grand profit over the range.
    #[must_use]
    pub fn total_profit(&self) -> f64 {
        self.totals.profit()
    }

    /// Summary for a single store, if it is in the reference list.
    #[must_use]
    pub fn store(&self, store_id: i64) -> Option<&StoreSummary> {
        self.stores.iter().find(|s| s.store_id == store_id)
    }
}

/// Year gate for the trend arrays. Returns the 0-based month slot.
fn in_trend(year: i32, month: u32, target_year: i32) -> Option<usize> {
    if year != target_year || !(1..=12).contains(&month) {
        return None;
    }
    usize::try_from(month - 1).ok()
}

/// Year and range gate for totals.
fn in_range(year: i32, month: u32, target_year: i32, range: MonthRange) -> bool {
    year == target_year && range.contains(month)
}

/// Aggregates one snapshot for `year` and `range`.
///
/// Records whose store is not in `snapshot.stores` still count towards the
/// grand totals but are left out of the per-store breakdown, so the per-store
/// sums can be lower than the grand totals.
#[must_use]
pub fn aggregate(
    snapshot: &Snapshot,
    studio_store_id: i64,
    year: i32,
    range: MonthRange,
) -> AggregateResult {
    let mut monthly_sales = [0.0; 12];
    let mut monthly_purchases = [0.0; 12];
    let mut totals = Totals::default();
    let mut stores: HashMap<i64, StoreSummary> = snapshot
        .stores
        .iter()
        .map(|s| (s.store_id, StoreSummary::empty(s.store_id, s.store_name.clone())))
        .collect();

    // Sales: generic sales (minus the studio) plus studio ledger deposits
    for source in revenue_sources(&snapshot.sales, &snapshot.studio_ledger, studio_store_id) {
        let Some(revenue) = source.resolve() else {
            continue;
        };
        if let Some(slot) = in_trend(revenue.year, revenue.trend_month, year) {
            monthly_sales[slot] += revenue.amount;
        }
        if in_range(revenue.year, revenue.range_month, year, range) {
            totals.sales += revenue.amount;
            if let Some(store) = stores.get_mut(&revenue.store_id) {
                store.sales += revenue.amount;
            }
        }
    }

    // Purchases
    for purchase in &snapshot.purchases {
        let Some((p_year, p_month)) = resolve_year_month(purchase.date()) else {
            continue;
        };
        let amount = purchase.amount();
        if let Some(slot) = in_trend(p_year, p_month, year) {
            monthly_purchases[slot] += amount;
        }
        if in_range(p_year, p_month, year, range) {
            totals.purchases += amount;
            if let Some(store) = stores.get_mut(&purchase.store_id) {
                store.purchases += amount;
            }
        }
    }

    // Fixed expenses carry explicit year/month columns
    for expense in &snapshot.expenses {
        if !expense_in_range(expense, year, range) {
            continue;
        }
        let amount = amount_or_zero(expense.amount);
        totals.expenses += amount;
        if let Some(store) = stores.get_mut(&expense.store_id) {
            store.expenses += amount;
            store.add_vendor_expense(expense.vendor_label(), amount);
        }
    }

    // Miscellaneous transactions: range totals only
    for other in &snapshot.others {
        let Some((o_year, o_month)) = resolve_year_month(other.date()) else {
            continue;
        };
        if in_range(o_year, o_month, year, range) {
            let amount = other.amount();
            totals.others += amount;
            if let Some(store) = stores.get_mut(&other.store_id) {
                store.others += amount;
            }
        }
    }

    let mut stores: Vec<StoreSummary> = stores
        .into_values()
        .map(|mut store| {
            store.profit = store.sales - store.purchases - store.expenses - store.others;
            store
        })
        .collect();
    stores.sort_by_key(|s| s.store_id);

    AggregateResult {
        year,
        range,
        monthly_sales,
        monthly_purchases,
        totals,
        stores,
    }
}

fn expense_in_range(expense: &ExpenseRecord, year: i32, range: MonthRange) -> bool {
    expense.year == year && checked_month(expense.month).is_some_and(|m| range.contains(m))
}
