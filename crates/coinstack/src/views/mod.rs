#![forbid(unsafe_code)]

//! View modules and the static view registry.
//!
//! Every interactive surface implements the [`View`] trait and is listed
//! in [`VIEW_REGISTRY`], the single source of truth for view metadata:
//! titles, loading placeholders, contextual help, and the menu action
//! string that activates each destination.

pub mod coin_history;
pub mod input;
pub mod ledger;
pub mod loan;
pub mod menu;
pub mod settings;
pub mod snapshots;
pub mod stake;
pub mod summary;
pub mod ticker;

use coinstack_core::event::Event;
use coinstack_runtime::Cmd;

use crate::app::AppMsg;

/// Identifies a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    /// Navigation hub; the initial view and the universal fallback.
    Menu,
    /// Aggregated holdings, valuations, and unrealized P/L.
    Summary,
    /// Buy-side trade ledger.
    Buy,
    /// Sell-side trade ledger.
    Sell,
    /// Staking positions.
    Stake,
    /// Outstanding loans.
    Loan,
    /// Point-in-time portfolio valuations.
    Snapshots,
    /// Application settings.
    Settings,
    /// Ticker symbol search.
    Ticker,
    /// Price history for one coin, reached from the ticker search.
    CoinHistory,
}

impl ViewId {
    /// All views in registry order.
    pub const ALL: &[ViewId] = &[
        Self::Menu,
        Self::Summary,
        Self::Buy,
        Self::Sell,
        Self::Stake,
        Self::Loan,
        Self::Snapshots,
        Self::Settings,
        Self::Ticker,
        Self::CoinHistory,
    ];
}

/// Static metadata for one view.
#[derive(Debug, Clone, Copy)]
pub struct ViewMeta {
    /// View this entry describes.
    pub id: ViewId,
    /// Display title.
    pub title: &'static str,
    /// Placeholder shown while the view has no live instance. `None`
    /// marks a destination with no lazy-load semantics; the controller
    /// shows the coming-soon box for those instead.
    pub loading: Option<&'static str>,
    /// Contextual help for the status bar's right-hand segment.
    pub help: &'static str,
    /// Menu action string that activates this view, if it is a menu
    /// destination.
    pub menu_action: Option<&'static str>,
}

/// Single source of truth for view ordering and metadata.
pub const VIEW_REGISTRY: &[ViewMeta] = &[
    ViewMeta {
        id: ViewId::Menu,
        title: "Menu",
        loading: None,
        help: "j/k: move · enter: open · q: quit",
        menu_action: None,
    },
    ViewMeta {
        id: ViewId::Summary,
        title: "Summary",
        loading: Some("Crunching the numbers…"),
        help: "j/k: move · esc: menu",
        menu_action: Some("summary"),
    },
    ViewMeta {
        id: ViewId::Buy,
        title: "Buys",
        loading: Some("Opening the buy ledger…"),
        help: "a: add · d: delete · esc: menu",
        menu_action: Some("buy"),
    },
    ViewMeta {
        id: ViewId::Sell,
        title: "Sells",
        loading: Some("Opening the sell ledger…"),
        help: "a: add · d: delete · esc: menu",
        menu_action: Some("sell"),
    },
    ViewMeta {
        id: ViewId::Stake,
        title: "Staking",
        loading: Some("Loading staking positions…"),
        help: "a: add · d: delete · esc: menu",
        menu_action: Some("stake"),
    },
    ViewMeta {
        id: ViewId::Loan,
        title: "Loans",
        loading: Some("Loading loans…"),
        help: "a: add · d: delete · esc: menu",
        menu_action: Some("loan"),
    },
    ViewMeta {
        id: ViewId::Snapshots,
        title: "Snapshots",
        loading: Some("Loading snapshots…"),
        help: "s: snapshot · d: delete · esc: menu",
        menu_action: Some("snapshots"),
    },
    ViewMeta {
        id: ViewId::Settings,
        title: "Settings",
        loading: None,
        help: "j/k: move · h/l: change · esc: menu",
        menu_action: Some("settings"),
    },
    ViewMeta {
        id: ViewId::Ticker,
        title: "Ticker Search",
        loading: Some("Loading ticker data…"),
        help: "type to filter · enter: history · esc: menu",
        menu_action: Some("ticker"),
    },
    ViewMeta {
        id: ViewId::CoinHistory,
        title: "Coin History",
        loading: Some("Loading price history…"),
        help: "esc: menu",
        menu_action: None,
    },
];

/// Lookup metadata by view. Falls back to the menu entry for ids missing
/// from the table, which cannot happen for the shipped registry.
#[must_use]
pub fn view_meta(id: ViewId) -> &'static ViewMeta {
    VIEW_REGISTRY
        .iter()
        .find(|meta| meta.id == id)
        .unwrap_or(&VIEW_REGISTRY[0])
}

/// Resolve a menu action string to its view. Linear scan across the
/// configured actions; unknown actions resolve to `None`.
#[must_use]
pub fn view_for_action(action: &str) -> Option<ViewId> {
    VIEW_REGISTRY
        .iter()
        .find(|meta| meta.menu_action == Some(action))
        .map(|meta| meta.id)
}

/// Convenience: title for a view.
#[must_use]
pub fn view_title(id: ViewId) -> &'static str {
    view_meta(id).title
}

/// Menu destinations in registry order: `(title, action)` pairs.
#[must_use]
pub fn menu_entries() -> Vec<(&'static str, &'static str)> {
    VIEW_REGISTRY
        .iter()
        .filter_map(|meta| meta.menu_action.map(|action| (meta.title, action)))
        .collect()
}

/// Capability contract every view satisfies.
///
/// Views own their state, react to events, and render their own frame;
/// they know nothing about the global status bar or about each other.
pub trait View {
    /// Called once per activation-after-absence, before the first event.
    fn init(&mut self) -> Cmd<AppMsg> {
        Cmd::none()
    }

    /// Handle an event, returning any deferred command.
    fn update(&mut self, event: &Event) -> Cmd<AppMsg>;

    /// Render the current frame for this view only.
    fn render(&self) -> String;

    /// Content views lay out their own full-screen presentation and are
    /// stacked directly above the status bar. Non-content views (the
    /// menu) are centered in the remaining vertical space instead.
    fn content_view(&self) -> bool {
        true
    }
}
