#![forbid(unsafe_code)]

//! Bubbletea/Elm-style runtime for coinstack.
//!
//! The program runtime owns the update/view loop: it reads terminal events,
//! feeds them to the application [`Model`], executes returned [`Cmd`]s, and
//! presents each rendered frame through the [`terminal_writer`]. State lives
//! in the model; rendering is a pure function of that state.

pub mod program;
pub mod terminal_writer;

pub use program::{
    Cmd, CommandOutcome, Model, Program, ProgramConfig, ProgramError, ProgramResult, run_commands,
};
pub use terminal_writer::TerminalWriter;
