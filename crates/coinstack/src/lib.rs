#![forbid(unsafe_code)]

//! coinstack: a full-screen terminal portfolio tracker.
//!
//! One persistent process multiplexes independent views (menu, summary,
//! trade ledgers, staking, loans, snapshots, settings, ticker search)
//! behind a single Elm-style update/render cycle. The [`app`] module
//! owns navigation; [`views`] holds the per-view state machines;
//! [`portfolio`] is the persistent domain model.

pub mod app;
pub mod chrome;
pub mod cli;
pub mod keymap;
pub mod portfolio;
pub mod registry;
pub mod theme;
pub mod views;
