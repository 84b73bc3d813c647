#![forbid(unsafe_code)]

//! Live view instances, keyed by [`ViewId`].
//!
//! The registry distinguishes "never activated" (no entry; render falls
//! back to the view's configured loading text) from "activated" (entry
//! present; state is preserved across navigations away and back). An
//! entry can be evicted to force re-initialization on the next
//! activation, which is how stale summary data gets refreshed.

use std::collections::HashMap;

use coinstack_core::event::Event;
use coinstack_runtime::Cmd;
use tracing::debug;

use crate::app::AppMsg;
use crate::views::{View, ViewId, view_meta};

/// Placeholder when a view has no configured loading text.
const DEFAULT_LOADING: &str = "Loading…";

/// Holds zero-or-one live instance per view.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<ViewId, Box<dyn View>>,
}

impl ViewRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the instance for `id`. Passing `None` evicts
    /// the entry, forcing the next activation to re-initialize.
    pub fn set(&mut self, id: ViewId, view: Option<Box<dyn View>>) {
        match view {
            Some(view) => {
                self.views.insert(id, view);
            }
            None => {
                if self.views.remove(&id).is_some() {
                    debug!(?id, "evicted view instance");
                }
            }
        }
    }

    /// True iff a live instance is installed for `id`.
    #[must_use]
    pub fn has(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    /// Direct access to the instance, for callers that need more than the
    /// standard dispatch path.
    #[must_use]
    pub fn get(&self, id: ViewId) -> Option<&dyn View> {
        self.views.get(&id).map(Box::as_ref)
    }

    /// Forward an event to the instance for `id`.
    ///
    /// Events for uninstalled views are dropped: an event addressed to a
    /// view that does not exist is not meaningful, and eviction can race
    /// a deferred command's eventual delivery.
    pub fn update(&mut self, id: ViewId, event: &Event) -> Cmd<AppMsg> {
        match self.views.get_mut(&id) {
            Some(view) => view.update(event),
            None => {
                debug!(?id, "dropped event for uninstalled view");
                Cmd::none()
            }
        }
    }

    /// Render the instance for `id`, or its configured loading text (or a
    /// generic fallback) when none is installed.
    #[must_use]
    pub fn render(&self, id: ViewId) -> String {
        match self.views.get(&id) {
            Some(view) => view.render(),
            None => view_meta(id).loading.unwrap_or(DEFAULT_LOADING).to_string(),
        }
    }

    /// Run the instance's initialization, if one is installed.
    pub fn init(&mut self, id: ViewId) -> Cmd<AppMsg> {
        match self.views.get_mut(&id) {
            Some(view) => view.init(),
            None => Cmd::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinstack_core::event::{KeyCode, KeyEvent};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Test double that counts lifecycle calls.
    struct ProbeView {
        inits: Rc<Cell<usize>>,
        events: Rc<Cell<usize>>,
    }

    impl View for ProbeView {
        fn init(&mut self) -> Cmd<AppMsg> {
            self.inits.set(self.inits.get() + 1);
            Cmd::none()
        }

        fn update(&mut self, _event: &Event) -> Cmd<AppMsg> {
            self.events.set(self.events.get() + 1);
            Cmd::msg(AppMsg::ReturnToMenu)
        }

        fn render(&self) -> String {
            format!("probe ({} events)", self.events.get())
        }
    }

    fn probe() -> (Box<ProbeView>, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let inits = Rc::new(Cell::new(0));
        let events = Rc::new(Cell::new(0));
        let view = Box::new(ProbeView {
            inits: Rc::clone(&inits),
            events: Rc::clone(&events),
        });
        (view, inits, events)
    }

    #[test]
    fn absent_views_render_configured_loading_text() {
        let registry = ViewRegistry::new();
        assert_eq!(registry.render(ViewId::Summary), "Crunching the numbers…");
        // Settings has no configured loading text.
        assert_eq!(registry.render(ViewId::Settings), "Loading…");
    }

    #[test]
    fn installed_views_render_themselves() {
        let mut registry = ViewRegistry::new();
        let (view, _, _) = probe();
        registry.set(ViewId::Summary, Some(view));
        assert!(registry.has(ViewId::Summary));
        assert_eq!(registry.render(ViewId::Summary), "probe (0 events)");
    }

    #[test]
    fn update_dispatches_only_to_installed_views() {
        let mut registry = ViewRegistry::new();
        let event = Event::Key(KeyEvent::new(KeyCode::Enter));

        let cmd = registry.update(ViewId::Buy, &event);
        assert!(cmd.is_none());

        let (view, _, events) = probe();
        registry.set(ViewId::Buy, Some(view));
        let cmd = registry.update(ViewId::Buy, &event);
        assert!(matches!(cmd, Cmd::Msg(AppMsg::ReturnToMenu)));
        assert_eq!(events.get(), 1);
    }

    #[test]
    fn eviction_forces_reinit_on_next_install() {
        let mut registry = ViewRegistry::new();
        let (view, inits, _) = probe();
        registry.set(ViewId::Summary, Some(view));
        registry.init(ViewId::Summary);
        assert_eq!(inits.get(), 1);

        registry.set(ViewId::Summary, None);
        assert!(!registry.has(ViewId::Summary));

        let (view, inits, _) = probe();
        registry.set(ViewId::Summary, Some(view));
        registry.init(ViewId::Summary);
        assert_eq!(inits.get(), 1);
    }

    #[test]
    fn init_without_instance_is_a_noop() {
        let mut registry = ViewRegistry::new();
        assert!(registry.init(ViewId::Stake).is_none());
    }
}
