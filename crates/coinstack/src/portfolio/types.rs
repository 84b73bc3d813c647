#![forbid(unsafe_code)]

//! Persistent domain records and user settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which ledger a trade belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Ledger title fragment ("Buy" / "Sell").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }

    /// Past-tense verb for status messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            TradeSide::Buy => "bought",
            TradeSide::Sell => "sold",
        }
    }
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub side: TradeSide,
    /// Asset symbol, uppercased on entry.
    pub asset: String,
    pub amount: f64,
    /// Fiat price per unit at execution time.
    pub unit_price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// Fiat total for this trade.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.amount * self.unit_price
    }
}

/// An open staking position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakePosition {
    pub id: u64,
    pub asset: String,
    pub amount: f64,
    /// Annual percentage yield, e.g. `5.0` for 5%.
    pub apy: f64,
    pub started: DateTime<Utc>,
}

impl StakePosition {
    /// Estimated reward accrued between `started` and `now`, linear APY.
    #[must_use]
    pub fn accrued(&self, now: DateTime<Utc>) -> f64 {
        let days = (now - self.started).num_days().max(0) as f64;
        self.amount * (self.apy / 100.0) * (days / 365.0)
    }
}

/// An outstanding loan against the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: u64,
    pub asset: String,
    pub principal: f64,
    /// Annual interest rate, e.g. `8.5` for 8.5%.
    pub rate: f64,
    pub counterparty: String,
    pub opened: DateTime<Utc>,
}

impl Loan {
    /// Simple interest accrued between `opened` and `now`.
    #[must_use]
    pub fn accrued_interest(&self, now: DateTime<Utc>) -> f64 {
        let days = (now - self.opened).num_days().max(0) as f64;
        self.principal * (self.rate / 100.0) * (days / 365.0)
    }
}

/// A point-in-time valuation of the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: u64,
    pub taken: DateTime<Utc>,
    pub total_value: f64,
}

/// Display currency for fiat amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// All currencies in cycle order.
    pub const ALL: &[Currency] = &[Currency::Usd, Currency::Eur, Currency::Gbp];

    /// Currency symbol prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    /// ISO-ish label for the settings view.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Next currency in cycle order (wraps).
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous currency in cycle order (wraps).
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// User-tunable application settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: Currency,
    /// Fractional digits when formatting fiat amounts (0–8).
    pub decimals: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::Usd,
            decimals: 2,
        }
    }
}

impl Settings {
    /// Upper bound for the decimals setting.
    pub const MAX_DECIMALS: u8 = 8;

    /// Format a fiat amount with the configured currency and precision.
    #[must_use]
    pub fn format_money(&self, value: f64) -> String {
        format!(
            "{}{:.*}",
            self.currency.symbol(),
            self.decimals as usize,
            value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn trade_total_is_amount_times_price() {
        let trade = Trade {
            id: 1,
            side: TradeSide::Buy,
            asset: "BTC".into(),
            amount: 0.5,
            unit_price: 40_000.0,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
        };
        assert!((trade.total() - 20_000.0).abs() < 1e-9);
    }

    #[test]
    fn stake_accrual_is_linear_in_time() {
        let started = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let stake = StakePosition {
            id: 1,
            asset: "ETH".into(),
            amount: 10.0,
            apy: 3.65,
            started,
        };
        let later = started + chrono::Duration::days(100);
        // 10 * 3.65% * 100/365 = 0.1
        assert!((stake.accrued(later) - 0.1).abs() < 1e-9);
        // Clock skew: never negative.
        assert_eq!(stake.accrued(started - chrono::Duration::days(5)), 0.0);
    }

    #[test]
    fn currency_cycle_wraps_both_ways() {
        assert_eq!(Currency::Usd.next(), Currency::Eur);
        assert_eq!(Currency::Gbp.next(), Currency::Usd);
        assert_eq!(Currency::Usd.prev(), Currency::Gbp);
    }

    #[test]
    fn money_formatting_respects_settings() {
        let settings = Settings {
            currency: Currency::Eur,
            decimals: 0,
        };
        assert_eq!(settings.format_money(1234.56), "€1235");
        assert_eq!(Settings::default().format_money(2.5), "$2.50");
    }
}
