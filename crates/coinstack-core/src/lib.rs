#![forbid(unsafe_code)]

//! Core types shared by the coinstack runtime and application:
//! canonical input events and ANSI-aware text measurement.

pub mod event;
pub mod text;

pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PasteEvent};
