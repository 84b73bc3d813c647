#![forbid(unsafe_code)]

//! The price book: spot prices and recorded history per symbol.
//!
//! Loaded once at startup from `prices.json` in the data directory; when
//! the file is missing or corrupt a built-in seed keeps the UI usable.
//! Fetching fresh prices is out of scope for the application itself.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const PRICES_FILE: &str = "prices.json";

/// One priced asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Ticker symbol, uppercase.
    pub symbol: String,
    /// Full coin name.
    pub name: String,
    /// Latest known fiat price per unit.
    pub spot: f64,
    /// Recorded price series, oldest first. May be empty.
    #[serde(default)]
    pub history: Vec<f64>,
}

/// All known prices, sorted by symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceBook {
    entries: Vec<PriceEntry>,
}

impl PriceBook {
    /// Load the price book from `dir`, falling back to the built-in seed.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(PRICES_FILE);
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<PriceBook>(&raw) {
                Ok(mut book) => {
                    book.normalize();
                    info!(entries = book.entries.len(), "loaded price book");
                    book
                }
                Err(e) => {
                    warn!(path = %path.display(), "corrupt price book, using seed: {e}");
                    Self::seeded()
                }
            },
            Err(_) => Self::seeded(),
        }
    }

    /// Built-in seed so a fresh install has something to browse.
    #[must_use]
    pub fn seeded() -> Self {
        let entries = [
            ("BTC", "Bitcoin", 67_400.0, &[58_200.0, 61_100.0, 59_800.0, 63_500.0, 66_900.0, 65_200.0, 67_400.0][..]),
            ("ETH", "Ethereum", 3_520.0, &[3_050.0, 3_180.0, 2_990.0, 3_240.0, 3_410.0, 3_360.0, 3_520.0][..]),
            ("SOL", "Solana", 158.0, &[132.0, 140.0, 127.0, 149.0, 161.0, 155.0, 158.0][..]),
            ("ADA", "Cardano", 0.62, &[0.55, 0.58, 0.52, 0.57, 0.61, 0.60, 0.62][..]),
            ("DOT", "Polkadot", 7.8, &[6.9, 7.2, 6.6, 7.0, 7.5, 7.4, 7.8][..]),
            ("ATOM", "Cosmos", 9.4, &[8.1, 8.6, 8.0, 8.8, 9.1, 9.0, 9.4][..]),
            ("AVAX", "Avalanche", 38.5, &[33.0, 35.1, 31.8, 34.6, 37.2, 36.4, 38.5][..]),
            ("LINK", "Chainlink", 18.2, &[15.4, 16.1, 15.0, 16.8, 17.5, 17.1, 18.2][..]),
            ("XMR", "Monero", 162.0, &[148.0, 151.0, 144.0, 153.0, 158.0, 156.0, 162.0][..]),
            ("DOGE", "Dogecoin", 0.14, &[0.11, 0.12, 0.10, 0.12, 0.13, 0.13, 0.14][..]),
        ];
        let mut book = Self {
            entries: entries
                .into_iter()
                .map(|(symbol, name, spot, history)| PriceEntry {
                    symbol: symbol.to_string(),
                    name: name.to_string(),
                    spot,
                    history: history.to_vec(),
                })
                .collect(),
        };
        book.normalize();
        book
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.symbol = entry.symbol.to_uppercase();
        }
        self.entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    }

    /// All entries, sorted by symbol.
    #[must_use]
    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }

    /// Lookup one entry by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&PriceEntry> {
        let symbol = symbol.to_uppercase();
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Latest spot price for a symbol.
    #[must_use]
    pub fn spot(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|e| e.spot)
    }

    /// Case-insensitive substring search over symbol and name. An empty
    /// query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&PriceEntry> {
        let query = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                query.is_empty()
                    || e.symbol.to_lowercase().contains(&query)
                    || e.name.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn seed_is_sorted_and_nonempty() {
        let book = PriceBook::seeded();
        assert!(!book.entries().is_empty());
        let symbols: Vec<&str> = book.entries().iter().map(|e| e.symbol.as_str()).collect();
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        assert_eq!(symbols, sorted);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let book = PriceBook::seeded();
        assert_eq!(book.spot("btc"), book.spot("BTC"));
        assert!(book.spot("BTC").is_some());
        assert_eq!(book.spot("NOPE"), None);
    }

    #[test]
    fn search_matches_symbol_and_name() {
        let book = PriceBook::seeded();
        let by_symbol = book.search("sol");
        assert!(by_symbol.iter().any(|e| e.symbol == "SOL"));
        let by_name = book.search("bitcoin");
        assert!(by_name.iter().any(|e| e.symbol == "BTC"));
        assert_eq!(book.search("").len(), book.entries().len());
        assert!(book.search("zzzz").is_empty());
    }

    #[test]
    fn load_falls_back_to_seed_on_missing_or_corrupt() {
        let dir = TempDir::new().unwrap();
        let missing = PriceBook::load(dir.path());
        assert_eq!(missing.entries().len(), PriceBook::seeded().entries().len());

        std::fs::write(dir.path().join(PRICES_FILE), "[broken").unwrap();
        let corrupt = PriceBook::load(dir.path());
        assert!(corrupt.spot("BTC").is_some());
    }

    #[test]
    fn custom_file_overrides_seed() {
        let dir = TempDir::new().unwrap();
        let raw = r#"{"entries":[{"symbol":"pepe","name":"Pepe","spot":0.00001}]}"#;
        std::fs::write(dir.path().join(PRICES_FILE), raw).unwrap();
        let book = PriceBook::load(dir.path());
        assert_eq!(book.entries().len(), 1);
        // Symbols are normalized to uppercase, history defaults empty.
        assert!(book.get("PEPE").is_some());
        assert!(book.get("PEPE").unwrap().history.is_empty());
    }
}
