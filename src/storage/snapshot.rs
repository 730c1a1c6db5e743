//! JSON-backed snapshot store
//!
//! Serves transactions, goals and the profile from the data directory.
//! Everything is loaded on open and held behind `RwLock`s; goal writes go
//! straight back to disk with an atomic rename.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::file_io::{read_json, read_json_optional, write_json_atomic};
use super::{GoalStore, ProfileSource, TransactionPage, TransactionQuery, TransactionSource};
use crate::analytics::CategoryTaxonomy;
use crate::config::FiscallyPaths;
use crate::error::{FiscallyError, FiscallyResult};
use crate::models::{Category, Goal, GoalId, Money, Profile, Transaction};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GoalData {
    goals: Vec<Goal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

fn read_lock<T>(lock: &RwLock<T>) -> FiscallyResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| FiscallyError::Storage(format!("Failed to acquire read lock: {}", e)))
}

fn write_lock<T>(lock: &RwLock<T>) -> FiscallyResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| FiscallyError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Snapshot store over `transactions.json`, `goals.json` and `profile.json`
pub struct JsonSnapshotStore {
    paths: FiscallyPaths,
    transactions: RwLock<Vec<Transaction>>,
    goals: RwLock<Vec<Goal>>,
    profile: RwLock<Profile>,
}

impl JsonSnapshotStore {
    /// Open the store and load every snapshot file
    pub fn open(paths: FiscallyPaths) -> FiscallyResult<Self> {
        paths.ensure_directories()?;

        let store = Self {
            paths,
            transactions: RwLock::new(Vec::new()),
            goals: RwLock::new(Vec::new()),
            profile: RwLock::new(Profile::default()),
        };
        store.load()?;
        Ok(store)
    }

    pub fn paths(&self) -> &FiscallyPaths {
        &self.paths
    }

    /// Reload every snapshot from disk
    pub fn load(&self) -> FiscallyResult<()> {
        let txn_data: TransactionData = read_json(self.paths.transactions_file())?;
        let goal_data: GoalData = read_json(self.paths.goals_file())?;
        let profile: Profile = read_json(self.paths.profile_file())?;

        let transactions: Vec<Transaction> = txn_data
            .transactions
            .into_iter()
            .filter(|t| match t.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(transaction = %t.id, error = %e, "skipping invalid transaction");
                    false
                }
            })
            .collect();

        debug!(
            transactions = transactions.len(),
            goals = goal_data.goals.len(),
            "loaded snapshot"
        );

        *write_lock(&self.transactions)? = transactions;
        *write_lock(&self.goals)? = goal_data.goals;
        *write_lock(&self.profile)? = profile;
        Ok(())
    }

    /// Write goals back to disk
    pub fn save_goals(&self) -> FiscallyResult<()> {
        let goals = read_lock(&self.goals)?;
        self.persist_goals(&goals)
    }

    fn persist_goals(&self, goals: &[Goal]) -> FiscallyResult<()> {
        write_json_atomic(
            self.paths.goals_file(),
            &GoalData {
                goals: goals.to_vec(),
            },
        )
    }

    /// Replace and persist the profile
    pub fn save_profile(&self, profile: Profile) -> FiscallyResult<()> {
        write_json_atomic(self.paths.profile_file(), &profile)?;
        *write_lock(&self.profile)? = profile;
        Ok(())
    }

    /// Replace and persist the transaction snapshot
    pub fn replace_transactions(&self, transactions: Vec<Transaction>) -> FiscallyResult<()> {
        write_json_atomic(
            self.paths.transactions_file(),
            &TransactionData {
                transactions: transactions.clone(),
            },
        )?;
        *write_lock(&self.transactions)? = transactions;
        Ok(())
    }

    /// The taxonomy from `categories.json`, or the built-in one
    ///
    /// Invalid entries are skipped with a warning.
    pub fn load_taxonomy(&self) -> FiscallyResult<CategoryTaxonomy> {
        let Some(data) = read_json_optional::<CategoryData, _>(self.paths.categories_file())?
        else {
            return Ok(CategoryTaxonomy::default());
        };

        let categories = data.categories.into_iter().filter(|c| match c.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(category = %c.id, error = %e, "skipping invalid category");
                false
            }
        });

        Ok(CategoryTaxonomy::from_categories(categories))
    }
}

impl TransactionSource for JsonSnapshotStore {
    fn list_transactions(&self, query: &TransactionQuery) -> FiscallyResult<TransactionPage> {
        let transactions = read_lock(&self.transactions)?;

        let mut matching: Vec<&Transaction> =
            transactions.iter().filter(|t| query.matches(t)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = matching.len();
        let page: Vec<Transaction> = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();

        Ok(TransactionPage {
            has_more: query.offset + page.len() < total,
            total,
            limit: query.limit,
            offset: query.offset,
            transactions: page,
        })
    }
}

impl GoalStore for JsonSnapshotStore {
    fn list_goals(&self) -> FiscallyResult<Vec<Goal>> {
        Ok(read_lock(&self.goals)?.clone())
    }

    fn sync_goals(&self, goals: Vec<Goal>) -> FiscallyResult<usize> {
        for goal in &goals {
            goal.validate()
                .map_err(|e| FiscallyError::Validation(format!("{}: {}", goal.id, e)))?;
        }

        let count = goals.len();
        let mut current = write_lock(&self.goals)?;
        self.persist_goals(&goals)?;
        *current = goals;
        Ok(count)
    }

    fn save_to_goal(&self, goal_id: &GoalId, amount: Money) -> FiscallyResult<Goal> {
        if !amount.is_positive() {
            return Err(FiscallyError::Validation(
                "Amount to save must be positive".into(),
            ));
        }

        let mut current = write_lock(&self.goals)?;
        let mut goals = current.clone();
        let goal = goals
            .iter_mut()
            .find(|g| &g.id == goal_id)
            .ok_or_else(|| FiscallyError::goal_not_found(goal_id.as_str()))?;
        goal.add_savings(amount);
        let updated = goal.clone();

        // Memory only changes once the new goals are on disk
        self.persist_goals(&goals)?;
        *current = goals;
        Ok(updated)
    }
}

impl ProfileSource for JsonSnapshotStore {
    fn load_profile(&self) -> FiscallyResult<Profile> {
        Ok(read_lock(&self.profile)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Month;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonSnapshotStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FiscallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = JsonSnapshotStore::open(paths).unwrap();
        (temp_dir, store)
    }

    fn txn(day: u32, amount: i64) -> Transaction {
        Transaction::new(
            Money::from_minor(amount),
            Some("food".into()),
            Utc.with_ymd_and_hms(2025, 1, day, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_store() {
        let (_temp_dir, store) = setup();
        let page = store.list_transactions(&TransactionQuery::default()).unwrap();
        assert_eq!(page.total, 0);
        assert!(!page.has_more);
        assert!(store.list_goals().unwrap().is_empty());
        assert_eq!(store.load_profile().unwrap(), Profile::default());
    }

    #[test]
    fn test_paging_newest_first() {
        let (_temp_dir, store) = setup();
        store
            .replace_transactions((1..=5).map(|d| txn(d, 100 * d as i64)).collect())
            .unwrap();

        let query = TransactionQuery::in_range(Month::new(2025, 1).unwrap().range()).with_limit(2);
        let first = store.list_transactions(&query).unwrap();
        assert_eq!(first.total, 5);
        assert!(first.has_more);
        assert_eq!(first.transactions[0].amount, Money::from_minor(500));

        let last = store.list_transactions(&query.clone().with_offset(4)).unwrap();
        assert_eq!(last.transactions.len(), 1);
        assert!(!last.has_more);
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let (temp_dir, store) = setup();
        store.replace_transactions(vec![txn(2, 900)]).unwrap();
        store
            .save_profile(Profile::new(Money::from_minor(80_000), Money::from_minor(50_000)))
            .unwrap();
        drop(store);

        let paths = FiscallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = JsonSnapshotStore::open(paths).unwrap();
        assert_eq!(
            reopened.list_transactions(&TransactionQuery::default()).unwrap().total,
            1
        );
        assert_eq!(reopened.load_profile().unwrap().budget(), Money::from_minor(50_000));
    }

    #[test]
    fn test_sync_and_save_to_goal() {
        let (_temp_dir, store) = setup();
        let goals = vec![
            Goal::new("laptop", "Laptop", 1, Money::from_minor(80_000)),
            Goal::new("trip", "Trip", 2, Money::from_minor(50_000)),
        ];
        assert_eq!(store.sync_goals(goals).unwrap(), 2);

        let updated = store
            .save_to_goal(&"trip".into(), Money::from_minor(5_000))
            .unwrap();
        assert_eq!(updated.saved_amount, Money::from_minor(5_000));

        store.load().unwrap();
        let trip = store
            .list_goals()
            .unwrap()
            .into_iter()
            .find(|g| g.id.as_str() == "trip")
            .unwrap();
        assert_eq!(trip.saved_amount, Money::from_minor(5_000));
    }

    #[test]
    fn test_failed_goal_write_keeps_memory_unchanged() {
        let (_temp_dir, store) = setup();
        store
            .sync_goals(vec![Goal::new("fund", "Fund", 1, Money::from_minor(1_000))])
            .unwrap();

        // A directory in place of goals.json makes the rename fail
        let goals_file = store.paths().goals_file();
        std::fs::remove_file(&goals_file).unwrap();
        std::fs::create_dir(&goals_file).unwrap();

        assert!(store.save_to_goal(&"fund".into(), Money::from_minor(300)).is_err());
        assert!(store.sync_goals(Vec::new()).is_err());

        let goals = store.list_goals().unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].saved_amount, Money::zero());
    }

    #[test]
    fn test_load_skips_invalid_transactions() {
        let (_temp_dir, store) = setup();
        let mut bad = txn(3, 700);
        bad.currency = "  ".into();
        store.replace_transactions(vec![txn(2, 900), bad]).unwrap();

        store.load().unwrap();
        let page = store.list_transactions(&TransactionQuery::default()).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].amount, Money::from_minor(900));
    }

    #[test]
    fn test_save_to_unknown_goal() {
        let (_temp_dir, store) = setup();
        let err = store
            .save_to_goal(&"ghost".into(), Money::from_minor(100))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_requires_positive_amount() {
        let (_temp_dir, store) = setup();
        store
            .sync_goals(vec![Goal::new("fund", "Fund", 1, Money::from_minor(1_000))])
            .unwrap();
        let err = store.save_to_goal(&"fund".into(), Money::zero()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_sync_rejects_invalid_goal() {
        let (_temp_dir, store) = setup();
        let bad = Goal::new("bad", "  ", 1, Money::from_minor(1_000));
        assert!(store.sync_goals(vec![bad]).unwrap_err().is_validation());
    }

    #[test]
    fn test_custom_taxonomy_file() {
        let (_temp_dir, store) = setup();
        assert!(store.load_taxonomy().unwrap().get(&"food".into()).is_some());

        let data = CategoryData {
            categories: vec![
                Category::top_level("home", "Home", "house", "#222222"),
                Category::top_level("", "Nameless", "x", "#000000"),
            ],
        };
        write_json_atomic(store.paths().categories_file(), &data).unwrap();

        let taxonomy = store.load_taxonomy().unwrap();
        assert!(taxonomy.get(&"home".into()).is_some());
        assert!(taxonomy.get(&"food".into()).is_none());
        // home + other
        assert_eq!(taxonomy.len(), 2);
    }
}
