#![forbid(unsafe_code)]

//! Top-level application model: message routing and view navigation.
//!
//! [`AppModel`] implements the Elm architecture via [`Model`]. It owns the
//! current view identifier, the live view instances, the terminal size,
//! and the transient status/error text; it interprets global keys itself
//! and forwards everything else to the active view through the registry.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use coinstack_core::event::Event;
use coinstack_runtime::{Cmd, Model};
use tracing::{debug, info};

use crate::chrome::{self, StatusLine};
use crate::keymap;
use crate::portfolio::{PortfolioStore, PriceBook, Settings, StoreResult, TradeSide};
use crate::registry::ViewRegistry;
use crate::views::coin_history::CoinHistoryView;
use crate::views::ledger::LedgerView;
use crate::views::loan::LoanView;
use crate::views::menu::MenuView;
use crate::views::settings::SettingsView;
use crate::views::snapshots::SnapshotsView;
use crate::views::stake::StakeView;
use crate::views::summary::SummaryView;
use crate::views::ticker::TickerView;
use crate::views::{View, ViewId, view_for_action, view_meta};

// ---------------------------------------------------------------------------
// AppMsg
// ---------------------------------------------------------------------------

/// Top-level application message.
#[derive(Debug)]
pub enum AppMsg {
    /// A raw terminal event for the active view.
    ViewEvent(Event),
    /// A menu item was selected, carrying its action string.
    MenuSelect(String),
    /// Leave the current view and return to the menu.
    ReturnToMenu,
    /// Open the history panel for the given symbol.
    OpenCoinHistory(String),
    /// Replace the status-bar message.
    Status(String),
    /// Record a sticky error; shown until the next status or error.
    Error(String),
    /// Terminal size change.
    Resize {
        /// New terminal width.
        width: u16,
        /// New terminal height.
        height: u16,
    },
    /// Quit the application.
    Quit,
}

impl From<Event> for AppMsg {
    fn from(event: Event) -> Self {
        match event {
            Event::Resize { width, height } => AppMsg::Resize { width, height },
            other => AppMsg::ViewEvent(other),
        }
    }
}

// ---------------------------------------------------------------------------
// AppModel
// ---------------------------------------------------------------------------

/// Top-level application state.
pub struct AppModel {
    /// Currently active view.
    current: ViewId,
    /// Terminal width; 0 until the first resize event.
    width: u16,
    /// Terminal height; 0 until the first resize event.
    height: u16,
    /// Transient status text, cleared on navigation.
    status: Option<String>,
    /// Sticky error text; overrides status until overwritten.
    error: Option<String>,
    /// Terminal state: once true, no further event mutates anything.
    quitting: bool,
    /// Live view instances.
    views: ViewRegistry,
    store: Rc<RefCell<PortfolioStore>>,
    prices: Rc<PriceBook>,
    settings: Rc<RefCell<Settings>>,
    data_dir: PathBuf,
}

impl AppModel {
    /// Build the controller over already-opened collaborators. The menu
    /// is installed eagerly; every other view is created on first visit.
    #[must_use]
    pub fn new(
        store: Rc<RefCell<PortfolioStore>>,
        prices: Rc<PriceBook>,
        settings: Rc<RefCell<Settings>>,
        data_dir: PathBuf,
    ) -> Self {
        let mut views = ViewRegistry::new();
        views.set(ViewId::Menu, Some(Box::new(MenuView::new())));
        Self {
            current: ViewId::Menu,
            width: 0,
            height: 0,
            status: None,
            error: None,
            quitting: false,
            views,
            store,
            prices,
            settings,
            data_dir,
        }
    }

    /// Open the stores under `data_dir` and build the controller.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let store = Rc::new(RefCell::new(PortfolioStore::open(data_dir)?));
        let prices = Rc::new(PriceBook::load(data_dir));
        let settings = Rc::new(RefCell::new(Settings::load(data_dir)));
        info!(data_dir = %data_dir.display(), "opened data directory");
        Ok(Self::new(store, prices, settings, data_dir.to_path_buf()))
    }

    /// Currently active view.
    #[must_use]
    pub fn current(&self) -> ViewId {
        self.current
    }

    /// Last known terminal size.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Current status message, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Current error text, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once the quit key has been seen.
    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// The live view instances.
    #[must_use]
    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Mutable access to the live view instances.
    pub fn views_mut(&mut self) -> &mut ViewRegistry {
        &mut self.views
    }

    /// Rows available to content views: one row is reserved for the
    /// status bar, and the content region never collapses below one row.
    fn content_height(&self) -> u16 {
        self.height.saturating_sub(1).max(1)
    }

    /// The resize event a view should see: the menu lays out full-screen
    /// and gets the raw size, content views get the adjusted one.
    fn resize_event_for(&self, id: ViewId) -> Event {
        if id == ViewId::Menu {
            Event::Resize {
                width: self.width,
                height: self.height,
            }
        } else {
            Event::Resize {
                width: self.width,
                height: self.content_height(),
            }
        }
    }

    /// Construct the instance for a view, if it has an implementation.
    ///
    /// `CoinHistory` is absent here: it needs a symbol and is installed
    /// directly by the `OpenCoinHistory` handler.
    fn build_view(&self, id: ViewId) -> Option<Box<dyn View>> {
        match id {
            ViewId::Menu => Some(Box::new(MenuView::new())),
            ViewId::Summary => Some(Box::new(SummaryView::new(
                Rc::clone(&self.store),
                Rc::clone(&self.prices),
                Rc::clone(&self.settings),
            ))),
            ViewId::Buy => Some(Box::new(LedgerView::new(
                TradeSide::Buy,
                Rc::clone(&self.store),
                Rc::clone(&self.settings),
            ))),
            ViewId::Sell => Some(Box::new(LedgerView::new(
                TradeSide::Sell,
                Rc::clone(&self.store),
                Rc::clone(&self.settings),
            ))),
            ViewId::Stake => Some(Box::new(StakeView::new(Rc::clone(&self.store)))),
            ViewId::Loan => Some(Box::new(LoanView::new(Rc::clone(&self.store)))),
            ViewId::Snapshots => Some(Box::new(SnapshotsView::new(
                Rc::clone(&self.store),
                Rc::clone(&self.prices),
                Rc::clone(&self.settings),
            ))),
            ViewId::Settings => Some(Box::new(SettingsView::new(
                Rc::clone(&self.settings),
                self.data_dir.clone(),
            ))),
            ViewId::Ticker => Some(Box::new(TickerView::new(
                Rc::clone(&self.prices),
                Rc::clone(&self.settings),
            ))),
            ViewId::CoinHistory => None,
        }
    }

    /// Make `id` current, lazily creating its instance.
    fn activate(&mut self, id: ViewId) -> Cmd<AppMsg> {
        self.current = id;
        self.status = None;
        if self.views.has(id) {
            return Cmd::none();
        }
        match self.build_view(id) {
            Some(view) => {
                self.views.set(id, Some(view));
                self.prime(id)
            }
            None => {
                debug!(?id, "no implementation for destination");
                Cmd::none()
            }
        }
    }

    /// Initialize a freshly installed instance and, when the terminal
    /// size is already known, deliver a synthesized resize so the view
    /// lays out correctly before its first render.
    fn prime(&mut self, id: ViewId) -> Cmd<AppMsg> {
        let init_cmd = self.views.init(id);
        let resize_cmd = if self.width > 0 && self.height > 0 {
            let event = self.resize_event_for(id);
            self.views.update(id, &event)
        } else {
            Cmd::none()
        };
        Cmd::batch([init_cmd, resize_cmd])
    }

    fn return_to_menu(&mut self) -> Cmd<AppMsg> {
        if self.current == ViewId::Summary {
            // Summary depends on mutations made in other views; evict so
            // the next visit reloads.
            self.views.set(ViewId::Summary, None);
        }
        self.current = ViewId::Menu;
        self.status = None;
        if self.width > 0 && self.height > 0 {
            let event = self.resize_event_for(ViewId::Menu);
            self.views.update(ViewId::Menu, &event)
        } else {
            Cmd::none()
        }
    }

    fn forward_event(&mut self, event: Event) -> Cmd<AppMsg> {
        if let Event::Key(key) = &event
            && key.is_press()
        {
            if keymap::is_force_quit(key) {
                self.quitting = true;
                return Cmd::quit();
            }
            if self.current == ViewId::Menu && keymap::is_menu_quit(key) {
                self.quitting = true;
                return Cmd::quit();
            }
            // Destination without an implementation: any key bounces
            // back to the menu.
            if self.current != ViewId::Menu && !self.views.has(self.current) {
                return self.return_to_menu();
            }
        }
        self.views.update(self.current, &event)
    }

    fn handle_msg(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        if self.quitting {
            return Cmd::none();
        }
        match msg {
            AppMsg::Quit => {
                self.quitting = true;
                Cmd::quit()
            }
            AppMsg::Resize { width, height } => {
                self.width = width;
                self.height = height;
                let event = self.resize_event_for(self.current);
                self.views.update(self.current, &event)
            }
            AppMsg::MenuSelect(action) => match view_for_action(&action) {
                Some(id) => {
                    debug!(?id, action = %action, "menu selection");
                    self.activate(id)
                }
                None => {
                    debug!(action = %action, "ignoring unknown menu action");
                    Cmd::none()
                }
            },
            AppMsg::ReturnToMenu => self.return_to_menu(),
            AppMsg::OpenCoinHistory(symbol) => {
                let view =
                    CoinHistoryView::new(&symbol, &self.prices, Rc::clone(&self.settings));
                self.views.set(ViewId::CoinHistory, Some(Box::new(view)));
                self.current = ViewId::CoinHistory;
                self.status = None;
                self.prime(ViewId::CoinHistory)
            }
            AppMsg::Status(text) => {
                self.status = Some(text);
                self.error = None;
                Cmd::none()
            }
            AppMsg::Error(text) => {
                self.error = Some(text);
                Cmd::none()
            }
            AppMsg::ViewEvent(event) => self.forward_event(event),
        }
    }

    /// Compose the full frame: view content plus the status bar.
    #[must_use]
    pub fn render(&self) -> String {
        if self.quitting {
            return String::new();
        }

        let meta = view_meta(self.current);
        let has_instance = self.views.has(self.current);

        // A destination with no instance and no loading semantics is
        // deliberately unimplemented, as opposed to not-yet-visited.
        let content = if !has_instance && self.current != ViewId::Menu && meta.loading.is_none() {
            chrome::coming_soon(meta.title, self.width)
        } else {
            self.views.render(self.current)
        };

        // Before the first size event there is nothing to lay out
        // against; return the bare content.
        if self.width == 0 || self.height == 0 {
            return content;
        }

        let rows = self.content_height() as usize;
        let is_content_view = self
            .views
            .get(self.current)
            .is_some_and(|view| view.content_view());
        let body = if is_content_view {
            chrome::stack(&content, rows)
        } else {
            chrome::center_in(&content, rows)
        };

        let bar = chrome::status_bar(
            &StatusLine {
                error: self.error.as_deref(),
                status: self.status.as_deref(),
                help: keymap::help_for(self.current),
            },
            self.width,
        );

        format!("{body}\n{bar}")
    }
}

impl Model for AppModel {
    type Message = AppMsg;

    fn init(&mut self) -> Cmd<AppMsg> {
        self.views.init(ViewId::Menu)
    }

    fn update(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        self.handle_msg(msg)
    }

    fn view(&self) -> String {
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinstack_core::event::{KeyCode, KeyEvent, Modifiers};
    use tempfile::TempDir;

    fn app() -> (TempDir, AppModel) {
        let dir = TempDir::new().unwrap();
        let model = AppModel::open(dir.path()).unwrap();
        (dir, model)
    }

    fn key(model: &mut AppModel, code: KeyCode) -> Cmd<AppMsg> {
        model.update(AppMsg::ViewEvent(Event::Key(KeyEvent::new(code))))
    }

    #[test]
    fn starts_on_the_menu_with_unknown_size() {
        let (_dir, model) = app();
        assert_eq!(model.current(), ViewId::Menu);
        assert_eq!(model.size(), (0, 0));
        assert!(model.views().has(ViewId::Menu));
        assert!(!model.views().has(ViewId::Summary));
    }

    #[test]
    fn menu_select_activates_and_clears_status() {
        let (_dir, mut model) = app();
        model.update(AppMsg::Status("hello".to_string()));
        assert_eq!(model.status(), Some("hello"));

        model.update(AppMsg::MenuSelect("buy".to_string()));
        assert_eq!(model.current(), ViewId::Buy);
        assert_eq!(model.status(), None);
        assert!(model.views().has(ViewId::Buy));
    }

    #[test]
    fn unknown_menu_action_is_ignored() {
        let (_dir, mut model) = app();
        let cmd = model.update(AppMsg::MenuSelect("teleport".to_string()));
        assert!(cmd.is_none());
        assert_eq!(model.current(), ViewId::Menu);
    }

    #[test]
    fn view_state_survives_navigation_away_and_back() {
        let (_dir, mut model) = app();
        model.update(AppMsg::MenuSelect("ticker".to_string()));
        key(&mut model, KeyCode::Char('b'));
        model.update(AppMsg::ReturnToMenu);
        model.update(AppMsg::MenuSelect("ticker".to_string()));
        // Still the same instance: the typed filter is preserved.
        let frame = model.views().render(ViewId::Ticker);
        assert!(frame.contains('b'));
    }

    #[test]
    fn leaving_summary_evicts_it() {
        let (_dir, mut model) = app();
        model.update(AppMsg::MenuSelect("summary".to_string()));
        assert!(model.views().has(ViewId::Summary));
        model.update(AppMsg::ReturnToMenu);
        assert!(!model.views().has(ViewId::Summary));
        assert_eq!(model.current(), ViewId::Menu);
    }

    #[test]
    fn leaving_other_views_preserves_them() {
        let (_dir, mut model) = app();
        model.update(AppMsg::MenuSelect("stake".to_string()));
        model.update(AppMsg::ReturnToMenu);
        assert!(model.views().has(ViewId::Stake));
    }

    #[test]
    fn force_quit_works_from_any_state() {
        let (_dir, mut model) = app();
        model.update(AppMsg::MenuSelect("loan".to_string()));
        let chord = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        let cmd = model.update(AppMsg::ViewEvent(Event::Key(chord)));
        assert!(matches!(cmd, Cmd::Quit));
        assert!(model.is_quitting());
        assert_eq!(model.render(), "");

        // Once quitting, nothing mutates state.
        model.update(AppMsg::MenuSelect("buy".to_string()));
        assert_eq!(model.current(), ViewId::Loan);
        model.update(AppMsg::Status("late".to_string()));
        assert_eq!(model.status(), None);
    }

    #[test]
    fn q_quits_only_on_the_menu() {
        let (_dir, mut model) = app();
        model.update(AppMsg::MenuSelect("snapshots".to_string()));
        key(&mut model, KeyCode::Char('q'));
        assert!(!model.is_quitting());

        model.update(AppMsg::ReturnToMenu);
        let cmd = key(&mut model, KeyCode::Char('q'));
        assert!(matches!(cmd, Cmd::Quit));
        assert!(model.is_quitting());
    }

    #[test]
    fn resize_is_stored_and_menu_gets_the_raw_size() {
        let (_dir, mut model) = app();
        model.update(AppMsg::Resize {
            width: 80,
            height: 24,
        });
        assert_eq!(model.size(), (80, 24));
        // Raw size reaches the menu instance unmodified.
        let frame = model.render();
        assert!(frame.contains("coinstack"));
    }

    #[test]
    fn status_and_error_precedence() {
        let (_dir, mut model) = app();
        model.update(AppMsg::Resize {
            width: 80,
            height: 24,
        });
        model.update(AppMsg::Error("disk full".to_string()));
        assert!(model.render().contains("disk full"));

        // A later status overwrites the sticky error.
        model.update(AppMsg::Status("saved".to_string()));
        assert_eq!(model.error(), None);
        assert!(model.render().contains("saved"));
    }

    #[test]
    fn error_survives_navigation_but_status_does_not() {
        let (_dir, mut model) = app();
        model.update(AppMsg::Status("transient".to_string()));
        model.update(AppMsg::Error("sticky".to_string()));
        model.update(AppMsg::MenuSelect("buy".to_string()));
        assert_eq!(model.status(), None);
        assert_eq!(model.error(), Some("sticky"));
    }

    #[test]
    fn render_before_first_resize_is_bare_content() {
        let (_dir, model) = app();
        let frame = model.render();
        // No status bar: the branding line only appears once composed.
        assert!(!frame.contains(chrome::BRAND));
    }

    #[test]
    fn open_coin_history_replaces_the_instance() {
        let (_dir, mut model) = app();
        model.update(AppMsg::OpenCoinHistory("BTC".to_string()));
        assert_eq!(model.current(), ViewId::CoinHistory);
        assert!(model.views().render(ViewId::CoinHistory).contains("BTC"));

        model.update(AppMsg::OpenCoinHistory("ETH".to_string()));
        let frame = model.views().render(ViewId::CoinHistory);
        assert!(frame.contains("ETH"));
        assert!(!frame.contains("BTC"));
    }

    #[test]
    fn content_views_stack_above_the_status_bar() {
        let (_dir, mut model) = app();
        model.update(AppMsg::Resize {
            width: 80,
            height: 24,
        });
        model.update(AppMsg::MenuSelect("buy".to_string()));
        let frame = model.render();
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 24);
        // Content starts on the first row, no centering gap.
        assert!(lines[0].contains("Buy Ledger"));
    }
}
