#![forbid(unsafe_code)]

//! Portfolio domain model: trades, staking, loans, snapshots, settings,
//! the JSON-backed store, and the price book.

pub mod prices;
pub mod store;
pub mod types;

pub use prices::PriceBook;
pub use store::{PortfolioStore, StoreError, StoreResult};
pub use types::{Currency, Loan, Settings, Snapshot, StakePosition, Trade, TradeSide};

/// Aggregated position for one asset across both ledgers.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSummary {
    /// Asset symbol.
    pub asset: String,
    /// Net holdings: buys minus sells.
    pub net_amount: f64,
    /// Net fiat invested: buy cost minus sell proceeds.
    pub invested: f64,
    /// Current market value, when the price book knows the asset.
    pub market_value: Option<f64>,
    /// Unrealized profit/loss (`market_value - invested`).
    pub unrealized: Option<f64>,
}

/// Summarize every asset that appears in the trade ledgers, sorted by
/// symbol. Assets whose net amount and net invested are both zero are
/// dropped (fully closed positions).
#[must_use]
pub fn summarize(store: &PortfolioStore, prices: &PriceBook) -> Vec<AssetSummary> {
    let mut assets: Vec<String> = store
        .all_trades()
        .iter()
        .map(|t| t.asset.clone())
        .collect();
    assets.sort_unstable();
    assets.dedup();

    let mut out = Vec::with_capacity(assets.len());
    for asset in assets {
        let mut net_amount = 0.0;
        let mut invested = 0.0;
        for trade in store.all_trades() {
            if trade.asset != asset {
                continue;
            }
            match trade.side {
                TradeSide::Buy => {
                    net_amount += trade.amount;
                    invested += trade.total();
                }
                TradeSide::Sell => {
                    net_amount -= trade.amount;
                    invested -= trade.total();
                }
            }
        }
        if net_amount.abs() < f64::EPSILON && invested.abs() < f64::EPSILON {
            continue;
        }
        let market_value = prices.spot(&asset).map(|spot| net_amount * spot);
        let unrealized = market_value.map(|mv| mv - invested);
        out.push(AssetSummary {
            asset,
            net_amount,
            invested,
            market_value,
            unrealized,
        });
    }
    out
}

/// Total portfolio value: net ledger positions plus staked amounts, both
/// priced at spot. Assets without a known price contribute nothing.
#[must_use]
pub fn total_value(store: &PortfolioStore, prices: &PriceBook) -> f64 {
    let ledger: f64 = summarize(store, prices)
        .iter()
        .filter_map(|s| s.market_value)
        .sum();
    let staked: f64 = store
        .stakes()
        .iter()
        .filter_map(|p| prices.spot(&p.asset).map(|spot| p.amount * spot))
        .sum();
    ledger + staked
}
