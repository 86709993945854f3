//! Snapshot fetching - loads every raw collection the aggregator needs for one year.
//!
//! The six reads are independent and issued concurrently. The snapshot is all or
//! nothing: if any read fails the whole fetch fails, and [`fetch_with_retry`]
//! retries it with exponential backoff.

use crate::{
    core::records::{
        ExpenseRecord, OtherTransactionRecord, PurchaseRecord, SalesRecord, StoreRef,
        StudioLedgerEntry,
    },
    entities::{
        Expense, OtherTransaction, Purchase, Sale, Store, StudioLedger, Vendor, expense,
        other_transaction, purchase, sale, store, studio_ledger,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, prelude::*};
use std::{future::Future, time::Duration};
use tracing::{debug, info, warn};

/// Every raw record needed to aggregate one year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Every store, regardless of year
    pub stores: Vec<StoreRef>,
    /// Sales of the year
    pub sales: Vec<SalesRecord>,
    /// Purchases of the year
    pub purchases: Vec<PurchaseRecord>,
    /// Fixed expenses booked for the year
    pub expenses: Vec<ExpenseRecord>,
    /// Other transactions of the year
    pub others: Vec<OtherTransactionRecord>,
    /// Studio deposits of the year
    pub studio_ledger: Vec<StudioLedgerEntry>,
}

/// Read access to the raw records, scoped to a year where the table has dates.
///
/// Implemented for [`DatabaseConnection`]; tests substitute their own sources.
pub trait RecordSource: Send + Sync {
    /// Reference list of stores
    fn fetch_stores(&self) -> impl Future<Output = Result<Vec<StoreRef>>> + Send;
    /// Sales dated in `year`
    fn fetch_sales(&self, year: i32) -> impl Future<Output = Result<Vec<SalesRecord>>> + Send;
    /// Purchases dated in `year`
    fn fetch_purchases(
        &self,
        year: i32,
    ) -> impl Future<Output = Result<Vec<PurchaseRecord>>> + Send;
    /// Fixed expenses booked for `year`, vendor name joined
    fn fetch_expenses(&self, year: i32)
    -> impl Future<Output = Result<Vec<ExpenseRecord>>> + Send;
    /// Miscellaneous transactions dated in `year`
    fn fetch_others(
        &self,
        year: i32,
    ) -> impl Future<Output = Result<Vec<OtherTransactionRecord>>> + Send;
    /// Studio deposits dated in `year`
    fn fetch_studio_ledger(
        &self,
        year: i32,
    ) -> impl Future<Output = Result<Vec<StudioLedgerEntry>>> + Send;
}

fn year_prefix(year: i32) -> String {
    format!("{year:04}-")
}

impl RecordSource for DatabaseConnection {
    async fn fetch_stores(&self) -> Result<Vec<StoreRef>> {
        let stores = Store::find()
            .order_by_asc(store::Column::StoreId)
            .all(self)
            .await?;
        Ok(stores.into_iter().map(Into::into).collect())
    }

    async fn fetch_sales(&self, year: i32) -> Result<Vec<SalesRecord>> {
        let rows = Sale::find()
            .filter(sale::Column::SalesDate.starts_with(year_prefix(year)))
            .order_by_asc(sale::Column::SalesDate)
            .all(self)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_purchases(&self, year: i32) -> Result<Vec<PurchaseRecord>> {
        let rows = Purchase::find()
            .filter(purchase::Column::PurchaseDate.starts_with(year_prefix(year)))
            .order_by_asc(purchase::Column::PurchaseDate)
            .all(self)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_expenses(&self, year: i32) -> Result<Vec<ExpenseRecord>> {
        let rows = Expense::find()
            .filter(expense::Column::Year.eq(year))
            .order_by_asc(expense::Column::Month)
            .order_by_asc(expense::Column::Id)
            .find_also_related(Vendor)
            .all(self)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_others(&self, year: i32) -> Result<Vec<OtherTransactionRecord>> {
        let rows = OtherTransaction::find()
            .filter(other_transaction::Column::Date.starts_with(year_prefix(year)))
            .order_by_asc(other_transaction::Column::Date)
            .all(self)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_studio_ledger(&self, year: i32) -> Result<Vec<StudioLedgerEntry>> {
        let rows = StudioLedger::find()
            .filter(studio_ledger::Column::Date.starts_with(year_prefix(year)))
            .order_by_asc(studio_ledger::Column::Date)
            .all(self)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Fetches one year's snapshot, issuing all reads concurrently.
///
/// # Errors
/// Returns the first read error; no partial snapshot is produced.
pub async fn fetch_snapshot<S: RecordSource>(source: &S, year: i32) -> Result<Snapshot> {
    let (stores, sales, purchases, expenses, others, studio_ledger) = tokio::try_join!(
        source.fetch_stores(),
        source.fetch_sales(year),
        source.fetch_purchases(year),
        source.fetch_expenses(year),
        source.fetch_others(year),
        source.fetch_studio_ledger(year),
    )?;

    debug!(
        year,
        stores = stores.len(),
        sales = sales.len(),
        purchases = purchases.len(),
        expenses = expenses.len(),
        others = others.len(),
        studio_ledger = studio_ledger.len(),
        "Snapshot fetched"
    );

    Ok(Snapshot {
        stores,
        sales,
        purchases,
        expenses,
        others,
        studio_ledger,
    })
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each further retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt number `attempt` (0-based). Zero for the first attempt.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt - 1))
    }
}

/// Fetches a snapshot, retrying failed attempts per `policy`.
///
/// # Errors
/// Returns [`Error::FetchExhausted`] carrying the last failure once every attempt failed.
pub async fn fetch_with_retry<S: RecordSource>(
    source: &S,
    year: i32,
    policy: RetryPolicy,
) -> Result<Snapshot> {
    let attempts = policy.max_attempts.max(1);
    let mut last_error: Option<Error> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = policy.delay_before(attempt);
            info!(year, "Retry {}/{} after {:?}", attempt, attempts - 1, delay);
            tokio::time::sleep(delay).await;
        }

        match fetch_snapshot(source, year).await {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) => {
                warn!(year, attempt = attempt + 1, "Snapshot fetch failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    Err(Error::FetchExhausted {
        attempts,
        message: last_error.map_or_else(|| "no attempt made".to_string(), |e| e.to_string()),
    })
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Record source that fails a fixed number of times before serving a snapshot.
    pub struct FlakySource {
        pub failures_left: AtomicU32,
        pub calls: AtomicU32,
        pub snapshot: Snapshot,
    }

    impl FlakySource {
        pub fn new(failures: u32, snapshot: Snapshot) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
                snapshot,
            }
        }
    }

    impl RecordSource for FlakySource {
        async fn fetch_stores(&self) -> Result<Vec<StoreRef>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failed = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err(Error::Database(DbErr::Custom("connection reset".to_string())));
            }
            Ok(self.snapshot.stores.clone())
        }

        async fn fetch_sales(&self, _year: i32) -> Result<Vec<SalesRecord>> {
            Ok(self.snapshot.sales.clone())
        }

        async fn fetch_purchases(&self, _year: i32) -> Result<Vec<PurchaseRecord>> {
            Ok(self.snapshot.purchases.clone())
        }

        async fn fetch_expenses(&self, _year: i32) -> Result<Vec<ExpenseRecord>> {
            Ok(self.snapshot.expenses.clone())
        }

        async fn fetch_others(&self, _year: i32) -> Result<Vec<OtherTransactionRecord>> {
            Ok(self.snapshot.others.clone())
        }

        async fn fetch_studio_ledger(&self, _year: i32) -> Result<Vec<StudioLedgerEntry>> {
            Ok(self.snapshot.studio_ledger.clone())
        }
    }

    pub fn sample_snapshot() -> Snapshot {
        Snapshot {
            stores: vec![StoreRef {
                store_id: 1001,
                store_name: "본점".to_string(),
            }],
            sales: vec![SalesRecord {
                store_id: 1001,
                sales_date: "2024-03-15".to_string(),
                total_amount: Some(1000.0),
            }],
            ..Snapshot::default()
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_retry_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(0), Duration::ZERO);
        assert_eq!(policy.delay_before(1), Duration::from_millis(500));
        assert_eq!(policy.delay_before(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_before(3), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_fetch_with_retry_recovers_after_two_failures() -> Result<()> {
        let flaky = FlakySource::new(2, sample_snapshot());
        let steady = FlakySource::new(0, sample_snapshot());

        let recovered = fetch_with_retry(&flaky, 2024, fast_policy()).await?;
        let immediate = fetch_with_retry(&steady, 2024, fast_policy()).await?;

        assert_eq!(recovered, immediate);
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
        assert_eq!(steady.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_with_retry_gives_up() {
        let source = FlakySource::new(5, sample_snapshot());

        let result = fetch_with_retry(&source, 2024, fast_policy()).await;

        assert!(matches!(
            result,
            Err(Error::FetchExhausted { attempts: 3, .. })
        ));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_snapshot_from_database_scopes_by_year() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_store(&db, 1001, "본점").await?;
        create_test_store(&db, 2001, "원룸").await?;
        let vendor = create_test_vendor(&db, "한국전력").await?;

        create_test_sale(&db, 1001, "2024-03-15", Some(1000.0)).await?;
        create_test_sale(&db, 1001, "2023-12-31", Some(5.0)).await?;
        create_test_purchase(&db, 1001, "2024-01-02", Some(300.0)).await?;
        create_test_expense(&db, 1001, Some(vendor.vendor_id), 2024, 3, Some(200.0)).await?;
        create_test_expense(&db, 1001, None, 2024, 4, Some(20.0)).await?;
        create_test_expense(&db, 1001, None, 2023, 4, Some(20.0)).await?;
        create_test_other(&db, 1001, "2024-05-01", Some(10.0)).await?;
        create_test_ledger(&db, "2024-02-03", Some(450_000.0), None, Some(2)).await?;
        create_test_ledger(&db, "2025-01-03", Some(450_000.0), None, None).await?;

        let snapshot = fetch_snapshot(&db, 2024).await?;

        assert_eq!(snapshot.stores.len(), 2);
        assert_eq!(snapshot.stores[0].store_id, 1001);
        assert_eq!(snapshot.sales.len(), 1);
        assert_eq!(snapshot.purchases.len(), 1);
        assert_eq!(snapshot.expenses.len(), 2);
        assert_eq!(snapshot.expenses[0].vendor_name.as_deref(), Some("한국전력"));
        assert_eq!(snapshot.expenses[1].vendor_name, None);
        assert_eq!(snapshot.others.len(), 1);
        assert_eq!(snapshot.studio_ledger.len(), 1);
        assert_eq!(snapshot.studio_ledger[0].room, Some(2));
        Ok(())
    }
}
