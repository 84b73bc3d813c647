#![forbid(unsafe_code)]

//! JSON-backed persistence for the portfolio and settings.
//!
//! One file per concern (`portfolio.json`, `settings.json`) under the
//! data directory. Saves are atomic: write to a sibling temp file, then
//! rename over the target. A missing file is a first run; a corrupted
//! file degrades to defaults with a logged warning rather than refusing
//! to start.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::types::{Loan, Settings, Snapshot, StakePosition, Trade, TradeSide};

const PORTFOLIO_FILE: &str = "portfolio.json";
const SETTINGS_FILE: &str = "settings.json";

/// Errors from store operations.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error during file operations.
    Io(io::Error),
    /// Serialization or deserialization failure.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// On-disk portfolio payload.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PortfolioData {
    next_id: u64,
    trades: Vec<Trade>,
    stakes: Vec<StakePosition>,
    loans: Vec<Loan>,
    snapshots: Vec<Snapshot>,
}

/// Owns every persistent collection and the data directory they live in.
pub struct PortfolioStore {
    path: PathBuf,
    data: PortfolioData,
}

impl PortfolioStore {
    /// Open the store in `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(PORTFOLIO_FILE);
        let data = load_or_default(&path);
        Ok(Self { path, data })
    }

    /// Every trade, both sides, in insertion order.
    #[must_use]
    pub fn all_trades(&self) -> &[Trade] {
        &self.data.trades
    }

    /// Trades on one side of the book, in insertion order.
    #[must_use]
    pub fn trades(&self, side: TradeSide) -> Vec<&Trade> {
        self.data
            .trades
            .iter()
            .filter(|t| t.side == side)
            .collect()
    }

    /// Record and persist a trade. The asset symbol is uppercased.
    pub fn record_trade(
        &mut self,
        side: TradeSide,
        asset: &str,
        amount: f64,
        unit_price: f64,
    ) -> StoreResult<Trade> {
        let trade = Trade {
            id: self.take_id(),
            side,
            asset: asset.trim().to_uppercase(),
            amount,
            unit_price,
            timestamp: Utc::now(),
        };
        self.data.trades.push(trade.clone());
        self.save()?;
        Ok(trade)
    }

    /// Remove a trade by id. Returns false when no such trade exists.
    pub fn remove_trade(&mut self, id: u64) -> StoreResult<bool> {
        self.remove_by_id(id, |data| &mut data.trades, |t| t.id)
    }

    /// All staking positions.
    #[must_use]
    pub fn stakes(&self) -> &[StakePosition] {
        &self.data.stakes
    }

    /// Record and persist a staking position.
    pub fn record_stake(&mut self, asset: &str, amount: f64, apy: f64) -> StoreResult<StakePosition> {
        let stake = StakePosition {
            id: self.take_id(),
            asset: asset.trim().to_uppercase(),
            amount,
            apy,
            started: Utc::now(),
        };
        self.data.stakes.push(stake.clone());
        self.save()?;
        Ok(stake)
    }

    /// Remove a staking position by id.
    pub fn remove_stake(&mut self, id: u64) -> StoreResult<bool> {
        self.remove_by_id(id, |data| &mut data.stakes, |s| s.id)
    }

    /// All loans.
    #[must_use]
    pub fn loans(&self) -> &[Loan] {
        &self.data.loans
    }

    /// Record and persist a loan.
    pub fn record_loan(
        &mut self,
        asset: &str,
        principal: f64,
        rate: f64,
        counterparty: &str,
    ) -> StoreResult<Loan> {
        let loan = Loan {
            id: self.take_id(),
            asset: asset.trim().to_uppercase(),
            principal,
            rate,
            counterparty: counterparty.trim().to_string(),
            opened: Utc::now(),
        };
        self.data.loans.push(loan.clone());
        self.save()?;
        Ok(loan)
    }

    /// Remove a loan by id.
    pub fn remove_loan(&mut self, id: u64) -> StoreResult<bool> {
        self.remove_by_id(id, |data| &mut data.loans, |l| l.id)
    }

    /// All snapshots, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.data.snapshots
    }

    /// Record and persist a snapshot of the given total value.
    pub fn record_snapshot(&mut self, total_value: f64) -> StoreResult<Snapshot> {
        let snapshot = Snapshot {
            id: self.take_id(),
            taken: Utc::now(),
            total_value,
        };
        self.data.snapshots.push(snapshot.clone());
        self.save()?;
        Ok(snapshot)
    }

    /// Remove a snapshot by id.
    pub fn remove_snapshot(&mut self, id: u64) -> StoreResult<bool> {
        self.remove_by_id(id, |data| &mut data.snapshots, |s| s.id)
    }

    /// Persist the current state atomically.
    pub fn save(&self) -> StoreResult<()> {
        write_json(&self.path, &self.data)
    }

    fn take_id(&mut self) -> u64 {
        self.data.next_id += 1;
        self.data.next_id
    }

    fn remove_by_id<T>(
        &mut self,
        id: u64,
        items: impl Fn(&mut PortfolioData) -> &mut Vec<T>,
        item_id: impl Fn(&T) -> u64,
    ) -> StoreResult<bool> {
        let list = items(&mut self.data);
        let before = list.len();
        list.retain(|item| item_id(item) != id);
        let removed = list.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}

impl Settings {
    /// Load settings from `dir`, falling back to defaults.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        load_or_default(&dir.join(SETTINGS_FILE))
    }

    /// Persist settings to `dir` atomically.
    pub fn save(&self, dir: &Path) -> StoreResult<()> {
        fs::create_dir_all(dir)?;
        write_json(&dir.join(SETTINGS_FILE), self)
    }
}

/// Read and deserialize `path`; missing or corrupt files yield the
/// default value (corruption is logged, not fatal).
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file yet, starting empty");
            return T::default();
        }
        Err(e) => {
            warn!(path = %path.display(), "failed to read data file: {e}");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(e) => {
            warn!(path = %path.display(), "corrupt data file, starting empty: {e}");
            T::default()
        }
    }
}

/// Serialize `value` to `path` via a temp file and rename.
fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_on_empty_dir_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = PortfolioStore::open(dir.path()).unwrap();
        assert!(store.all_trades().is_empty());
        assert!(store.stakes().is_empty());
        assert!(store.snapshots().is_empty());
    }

    #[test]
    fn trades_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = PortfolioStore::open(dir.path()).unwrap();
            store
                .record_trade(TradeSide::Buy, "btc", 0.25, 48_000.0)
                .unwrap();
            store
                .record_trade(TradeSide::Sell, "ETH", 2.0, 2_500.0)
                .unwrap();
        }
        let store = PortfolioStore::open(dir.path()).unwrap();
        assert_eq!(store.all_trades().len(), 2);
        // Symbols are normalized on entry.
        assert_eq!(store.all_trades()[0].asset, "BTC");
        assert_eq!(store.trades(TradeSide::Sell).len(), 1);
    }

    #[test]
    fn ids_stay_unique_across_reopen() {
        let dir = TempDir::new().unwrap();
        let first_id = {
            let mut store = PortfolioStore::open(dir.path()).unwrap();
            store
                .record_trade(TradeSide::Buy, "BTC", 1.0, 1.0)
                .unwrap()
                .id
        };
        let mut store = PortfolioStore::open(dir.path()).unwrap();
        let second_id = store.record_stake("ETH", 1.0, 4.0).unwrap().id;
        assert_ne!(first_id, second_id);
    }

    #[test]
    fn remove_reports_whether_anything_matched() {
        let dir = TempDir::new().unwrap();
        let mut store = PortfolioStore::open(dir.path()).unwrap();
        let trade = store
            .record_trade(TradeSide::Buy, "BTC", 1.0, 1.0)
            .unwrap();
        assert!(store.remove_trade(trade.id).unwrap());
        assert!(!store.remove_trade(trade.id).unwrap());
        assert!(store.all_trades().is_empty());
    }

    #[test]
    fn corrupt_portfolio_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PORTFOLIO_FILE), "{not json").unwrap();
        let store = PortfolioStore::open(dir.path()).unwrap();
        assert!(store.all_trades().is_empty());
    }

    #[test]
    fn settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            currency: crate::portfolio::types::Currency::Gbp,
            decimals: 4,
        };
        settings.save(dir.path()).unwrap();
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn missing_settings_are_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }
}
