//! Store grouping for the dashboard subtotal cards.
//!
//! Stores are partitioned into configured groups plus a remainder group holding
//! every store no group claims. Subtotals are re-derived from the per-store
//! summaries of an [`AggregateResult`], never from raw records.

use crate::core::aggregate::{AggregateResult, StoreSummary};
use serde::{Deserialize, Serialize};

/// One configured group of stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreGroup {
    /// Card title, e.g. "직영점"
    pub label: String,
    /// Member store ids
    pub store_ids: Vec<i64>,
}

/// Partition policy: explicit groups first, then everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreGrouping {
    /// Groups in display order
    #[serde(default)]
    pub groups: Vec<StoreGroup>,
    /// Title of the card for unclaimed stores
    #[serde(default = "default_remainder_label")]
    pub remainder_label: String,
}

fn default_remainder_label() -> String {
    "기타 매장".to_string()
}

impl Default for StoreGrouping {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            remainder_label: default_remainder_label(),
        }
    }
}

/// Subtotal card for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSubtotal {
    /// Card title
    pub label: String,
    /// Stores that actually contributed, ascending
    pub store_ids: Vec<i64>,
    /// Summed member sales
    pub sales: f64,
    /// Summed member purchases
    pub purchases: f64,
    /// Summed member fixed expenses
    pub expenses: f64,
    /// Summed member other transactions
    pub others: f64,
    /// Summed member profit
    pub profit: f64,
}

impl GroupSubtotal {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            store_ids: Vec::new(),
            sales: 0.0,
            purchases: 0.0,
            expenses: 0.0,
            others: 0.0,
            profit: 0.0,
        }
    }

    fn add(&mut self, store: &StoreSummary) {
        self.store_ids.push(store.store_id);
        self.sales += store.sales;
        self.purchases += store.purchases;
        self.expenses += store.expenses;
        self.others += store.others;
        self.profit += store.profit;
    }
}

/// Computes one subtotal per configured group followed by the remainder group.
///
/// A store listed in several groups is counted in the first one only, so the
/// groups always form a partition of `result.stores`.
#[must_use]
pub fn group_subtotals(result: &AggregateResult, grouping: &StoreGrouping) -> Vec<GroupSubtotal> {
    let mut subtotals: Vec<GroupSubtotal> = grouping
        .groups
        .iter()
        .map(|g| GroupSubtotal::new(&g.label))
        .collect();
    let mut remainder = GroupSubtotal::new(&grouping.remainder_label);

    for store in &result.stores {
        let owner = grouping
            .groups
            .iter()
            .position(|g| g.store_ids.contains(&store.store_id));
        match owner {
            Some(idx) => subtotals[idx].add(store),
            None => remainder.add(store),
        }
    }

    subtotals.push(remainder);
    subtotals
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::aggregate::aggregate;
    use crate::core::period::MonthRange;
    use crate::core::records::{ExpenseRecord, SalesRecord, StoreRef};
    use crate::core::snapshot::Snapshot;

    fn snapshot() -> Snapshot {
        let stores = [1001, 1002, 1003, 2001]
            .into_iter()
            .map(|id| StoreRef {
                store_id: id,
                store_name: format!("매장{id}"),
            })
            .collect();
        let sales = [(1001, 100.0), (1002, 200.0), (1003, 400.0), (1002, 50.0)]
            .into_iter()
            .map(|(id, amount)| SalesRecord {
                store_id: id,
                sales_date: "2024-05-05".to_string(),
                total_amount: Some(amount),
            })
            .collect();
        let expenses = vec![ExpenseRecord {
            store_id: 1003,
            vendor_id: None,
            year: 2024,
            month: 5,
            amount: Some(40.0),
            vendor_name: None,
        }];
        Snapshot {
            stores,
            sales,
            expenses,
            ..Snapshot::default()
        }
    }

    fn grouping() -> StoreGrouping {
        StoreGrouping {
            groups: vec![StoreGroup {
                label: "직영점".to_string(),
                store_ids: vec![1001, 1002],
            }],
            remainder_label: "기타 매장".to_string(),
        }
    }

    #[test]
    fn test_group_subtotals_partition_stores() {
        let result = aggregate(&snapshot(), 2001, 2024, MonthRange::single(5).unwrap());
        let subtotals = group_subtotals(&result, &grouping());

        assert_eq!(subtotals.len(), 2);
        assert_eq!(subtotals[0].label, "직영점");
        assert_eq!(subtotals[0].store_ids, vec![1001, 1002]);
        assert_eq!(subtotals[0].sales, 350.0);
        assert_eq!(subtotals[1].label, "기타 매장");
        assert_eq!(subtotals[1].store_ids, vec![1003, 2001]);
        assert_eq!(subtotals[1].sales, 400.0);
        assert_eq!(subtotals[1].expenses, 40.0);
        assert_eq!(subtotals[1].profit, 360.0);
    }

    #[test]
    fn test_group_subtotals_sum_to_store_totals() {
        let result = aggregate(&snapshot(), 2001, 2024, MonthRange::full_year());
        let subtotals = group_subtotals(&result, &grouping());

        let group_sales: f64 = subtotals.iter().map(|g| g.sales).sum();
        let store_sales: f64 = result.stores.iter().map(|s| s.sales).sum();
        assert_eq!(group_sales, store_sales);

        let group_profit: f64 = subtotals.iter().map(|g| g.profit).sum();
        assert_eq!(group_profit, result.total_profit());
    }

    #[test]
    fn test_store_in_two_groups_counts_once() {
        let mut overlapping = grouping();
        overlapping.groups.push(StoreGroup {
            label: "중복".to_string(),
            store_ids: vec![1002, 1003],
        });

        let result = aggregate(&snapshot(), 2001, 2024, MonthRange::full_year());
        let subtotals = group_subtotals(&result, &overlapping);

        assert_eq!(subtotals.len(), 3);
        assert_eq!(subtotals[0].store_ids, vec![1001, 1002]);
        assert_eq!(subtotals[1].store_ids, vec![1003]);
        assert_eq!(subtotals[2].store_ids, vec![2001]);
    }

    #[test]
    fn test_empty_grouping_puts_everything_in_remainder() {
        let result = aggregate(&snapshot(), 2001, 2024, MonthRange::full_year());
        let subtotals = group_subtotals(&result, &StoreGrouping::default());

        assert_eq!(subtotals.len(), 1);
        assert_eq!(subtotals[0].label, "기타 매장");
        assert_eq!(subtotals[0].store_ids.len(), 4);
        assert_eq!(subtotals[0].sales, 750.0);
    }
}
