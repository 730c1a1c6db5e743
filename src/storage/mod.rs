//! Snapshot storage for Fiscally
//!
//! The engine only ever sees snapshots. These traits are the seams where the
//! external collaborator plugs in; `JsonSnapshotStore` implements all of them
//! over the local data directory.

pub mod file_io;
pub mod init;
pub mod snapshot;

pub use file_io::{read_json, read_json_optional, write_json_atomic};
pub use init::initialize_storage;
pub use snapshot::JsonSnapshotStore;

use serde::Serialize;

use crate::error::FiscallyResult;
use crate::models::{CategoryId, DateRange, Goal, GoalId, Money, Profile, Transaction};

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Page size used by `fetch_all`
const FETCH_ALL_PAGE_SIZE: usize = 200;

/// Filter and window for `TransactionSource::list_transactions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub limit: usize,
    pub offset: usize,
    pub date_range: Option<DateRange>,
    pub category: Option<CategoryId>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            date_range: None,
            category: None,
        }
    }
}

impl TransactionQuery {
    pub fn in_range(date_range: DateRange) -> Self {
        Self {
            date_range: Some(date_range),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check whether a transaction passes the filters (ignores the window)
    pub fn matches(&self, txn: &Transaction) -> bool {
        let in_range = self
            .date_range
            .map_or(true, |range| range.contains(txn.created_at));
        let in_category = self
            .category
            .as_ref()
            .map_or(true, |c| &txn.category_or_other() == c);
        in_range && in_category
    }
}

/// One page of transactions, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    /// Matching transactions across all pages
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Read access to transaction snapshots
pub trait TransactionSource {
    fn list_transactions(&self, query: &TransactionQuery) -> FiscallyResult<TransactionPage>;
}

/// Goal persistence owned by the external collaborator
pub trait GoalStore {
    fn list_goals(&self) -> FiscallyResult<Vec<Goal>>;

    /// Replace the stored goals, returning how many were written
    fn sync_goals(&self, goals: Vec<Goal>) -> FiscallyResult<usize>;

    /// Add `amount` to a goal's saved amount and return the updated goal
    fn save_to_goal(&self, goal_id: &GoalId, amount: Money) -> FiscallyResult<Goal>;
}

/// Read access to the income/budget profile
pub trait ProfileSource {
    fn load_profile(&self) -> FiscallyResult<Profile>;
}

/// Page through every transaction in `date_range`
pub fn fetch_all<S>(source: &S, date_range: DateRange) -> FiscallyResult<Vec<Transaction>>
where
    S: TransactionSource + ?Sized,
{
    let mut query = TransactionQuery::in_range(date_range).with_limit(FETCH_ALL_PAGE_SIZE);
    let mut transactions = Vec::new();

    loop {
        let page = source.list_transactions(&query)?;
        let fetched = page.transactions.len();
        transactions.extend(page.transactions);

        if !page.has_more || fetched == 0 {
            break;
        }
        query.offset += fetched;
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Month;
    use chrono::{TimeZone, Utc};

    /// Serves a fixed list in pages of three
    struct PagedSource(Vec<Transaction>);

    impl TransactionSource for PagedSource {
        fn list_transactions(&self, query: &TransactionQuery) -> FiscallyResult<TransactionPage> {
            let matching: Vec<_> = self.0.iter().filter(|t| query.matches(t)).cloned().collect();
            let page: Vec<_> = matching.iter().skip(query.offset).take(3).cloned().collect();
            Ok(TransactionPage {
                has_more: query.offset + page.len() < matching.len(),
                total: matching.len(),
                limit: 3,
                offset: query.offset,
                transactions: page,
            })
        }
    }

    fn txn(day: u32, category: &str) -> Transaction {
        Transaction::new(
            Money::from_minor(100),
            Some(category.into()),
            Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_fetch_all_walks_every_page() {
        let source = PagedSource((1..=8).map(|d| txn(d, "food")).collect());
        let all = fetch_all(&source, Month::new(2025, 1).unwrap().range()).unwrap();
        assert_eq!(all.len(), 8);
    }

    #[test]
    fn test_query_matches_category_and_range() {
        let jan = Month::new(2025, 1).unwrap();
        let query = TransactionQuery::in_range(jan.range()).with_category("food");

        assert!(query.matches(&txn(3, "food")));
        assert!(!query.matches(&txn(3, "transport")));

        let feb = Month::new(2025, 2).unwrap();
        assert!(!TransactionQuery::in_range(feb.range()).matches(&txn(3, "food")));
    }
}
