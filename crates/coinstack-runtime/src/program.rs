#![forbid(unsafe_code)]

//! The program loop: model trait, deferred commands, and event pump.
//!
//! One event is processed to completion before the next is accepted; the
//! only asynchronous element is the [`Cmd`] value an update may return,
//! which the loop executes after the update that produced it.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use coinstack_core::event::Event;
use crossterm::event as cte;
use tracing::debug;

use crate::terminal_writer::TerminalWriter;

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model. Must be convertible from terminal
    /// events so the pump can feed raw input straight into `update`.
    type Message: From<Event>;

    /// Initialize the model with startup commands.
    ///
    /// Called once before the first frame. Return commands to perform
    /// initial work such as loading data.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands for
    /// side effects the runtime should execute.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state as a full frame.
    fn view(&self) -> String;
}

/// Commands represent deferred effects, returned from `init()` and
/// `update()` and executed by the runtime. Opaque to the model that
/// merely plumbs them upward.
#[derive(Debug, Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Quit the application.
    Quit,
    /// Feed a message back into the model.
    Msg(M),
    /// Execute several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Deliver an [`Event::Tick`] after the given delay.
    Tick(Duration),
}

impl<M> Cmd<M> {
    /// The no-op command.
    #[must_use]
    pub const fn none() -> Self {
        Cmd::None
    }

    /// Command that terminates the program loop.
    #[must_use]
    pub const fn quit() -> Self {
        Cmd::Quit
    }

    /// Command that feeds `msg` back into the model.
    #[must_use]
    pub fn msg(msg: M) -> Self {
        Cmd::Msg(msg)
    }

    /// Combine commands, dropping no-ops. An empty batch collapses to
    /// [`Cmd::None`]; a single survivor is returned unwrapped.
    #[must_use]
    pub fn batch(cmds: impl IntoIterator<Item = Cmd<M>>) -> Self {
        let mut kept: Vec<Cmd<M>> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match kept.len() {
            0 => Cmd::None,
            1 => kept.remove(0),
            _ => Cmd::Batch(kept),
        }
    }

    /// Command that schedules a tick after `delay`.
    #[must_use]
    pub const fn tick(delay: Duration) -> Self {
        Cmd::Tick(delay)
    }

    /// True iff this is the no-op command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}

/// Errors surfaced by the program loop.
#[derive(Debug)]
pub enum ProgramError {
    /// I/O error from the terminal backend.
    Io(io::Error),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Io(e) => write!(f, "terminal I/O error: {e}"),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for ProgramError {
    fn from(e: io::Error) -> Self {
        ProgramError::Io(e)
    }
}

/// Result type for program operations.
pub type ProgramResult<T> = Result<T, ProgramError>;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Run in the alternate screen (full-screen) rather than inline.
    pub alt_screen: bool,
    /// Recurring tick interval, if any. One-shot ticks are requested via
    /// [`Cmd::Tick`] regardless of this setting.
    pub tick_interval: Option<Duration>,
    /// How long a single poll waits for input before re-checking timers.
    pub poll_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alt_screen: true,
            tick_interval: None,
            poll_timeout: Duration::from_millis(100),
        }
    }
}

/// Result of executing a command tree against a model.
///
/// Exposed so tests (and the pump itself) can run the command feedback
/// loop without a live terminal.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// A [`Cmd::Quit`] was encountered.
    pub quit: bool,
    /// Tick delays requested while draining, in encounter order.
    pub ticks: Vec<Duration>,
}

/// Execute a command tree to completion: messages produced by [`Cmd::Msg`]
/// are fed back into the model and their follow-up commands are executed
/// in turn, breadth-first, until the tree is drained.
pub fn run_commands<M: Model>(model: &mut M, cmd: Cmd<M::Message>) -> CommandOutcome {
    let mut outcome = CommandOutcome::default();
    let mut pending: VecDeque<Cmd<M::Message>> = VecDeque::new();
    pending.push_back(cmd);
    while let Some(cmd) = pending.pop_front() {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => outcome.quit = true,
            Cmd::Msg(msg) => {
                let next = model.update(msg);
                pending.push_back(next);
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    pending.push_back(c);
                }
            }
            Cmd::Tick(delay) => outcome.ticks.push(delay),
        }
    }
    outcome
}

/// The program runtime: owns the model, the terminal writer, and the loop.
pub struct Program<M: Model> {
    model: M,
    writer: TerminalWriter,
    config: ProgramConfig,
    next_tick: Option<Instant>,
    running: bool,
}

impl<M: Model> Program<M> {
    /// Create a program with default configuration.
    pub fn new(model: M) -> ProgramResult<Self> {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program with explicit configuration.
    pub fn with_config(model: M, config: ProgramConfig) -> ProgramResult<Self> {
        Ok(Self {
            model,
            writer: TerminalWriter::new(config.alt_screen),
            config,
            next_tick: None,
            running: false,
        })
    }

    /// Run the update/view loop until the model quits.
    ///
    /// The terminal is restored before returning, on error as well as on
    /// clean exit (the writer also restores on drop as a backstop).
    pub fn run(&mut self) -> ProgramResult<()> {
        self.writer.enter()?;
        self.running = true;

        if let Some(interval) = self.config.tick_interval {
            self.next_tick = Some(Instant::now() + interval);
        }

        let init_cmd = self.model.init();
        let outcome = run_commands(&mut self.model, init_cmd);
        self.absorb(outcome);
        self.writer.present(&self.model.view())?;

        while self.running {
            let timeout = self.poll_budget();
            let mut dirty = false;

            if cte::poll(timeout)? {
                let raw = cte::read()?;
                if let Some(event) = Event::from_crossterm(raw) {
                    self.dispatch(event);
                    dirty = true;
                }
            }

            if self.tick_due() {
                self.dispatch(Event::Tick);
                self.schedule_recurring_tick();
                dirty = true;
            }

            if dirty {
                self.writer.present(&self.model.view())?;
            }
        }

        debug!("program loop finished");
        self.writer.leave()?;
        Ok(())
    }

    fn dispatch(&mut self, event: Event) {
        let cmd = self.model.update(M::Message::from(event));
        let outcome = run_commands(&mut self.model, cmd);
        self.absorb(outcome);
    }

    fn absorb(&mut self, outcome: CommandOutcome) {
        if outcome.quit {
            self.running = false;
        }
        for delay in outcome.ticks {
            let at = Instant::now() + delay;
            self.next_tick = Some(match self.next_tick {
                Some(existing) => existing.min(at),
                None => at,
            });
        }
    }

    fn poll_budget(&self) -> Duration {
        match self.next_tick {
            Some(at) => at
                .saturating_duration_since(Instant::now())
                .min(self.config.poll_timeout),
            None => self.config.poll_timeout,
        }
    }

    fn tick_due(&self) -> bool {
        self.next_tick.is_some_and(|at| Instant::now() >= at)
    }

    fn schedule_recurring_tick(&mut self) {
        self.next_tick = self
            .config
            .tick_interval
            .map(|interval| Instant::now() + interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: i32,
        cascade: bool,
    }

    enum CounterMsg {
        Add(i32),
        Cascade,
        Quit,
        Noop,
    }

    impl From<Event> for CounterMsg {
        fn from(_: Event) -> Self {
            CounterMsg::Noop
        }
    }

    impl Model for Counter {
        type Message = CounterMsg;

        fn update(&mut self, msg: CounterMsg) -> Cmd<CounterMsg> {
            match msg {
                CounterMsg::Add(n) => {
                    self.count += n;
                    Cmd::none()
                }
                CounterMsg::Cascade => {
                    // One message that fans out into more messages.
                    self.cascade = true;
                    Cmd::batch([Cmd::msg(CounterMsg::Add(1)), Cmd::msg(CounterMsg::Add(2))])
                }
                CounterMsg::Quit => Cmd::quit(),
                CounterMsg::Noop => Cmd::none(),
            }
        }

        fn view(&self) -> String {
            format!("count: {}", self.count)
        }
    }

    fn model() -> Counter {
        Counter {
            count: 0,
            cascade: false,
        }
    }

    #[test]
    fn batch_collapses_noops() {
        let cmd: Cmd<CounterMsg> = Cmd::batch([Cmd::none(), Cmd::none()]);
        assert!(cmd.is_none());

        let cmd: Cmd<CounterMsg> = Cmd::batch([Cmd::none(), Cmd::quit()]);
        assert!(matches!(cmd, Cmd::Quit));
    }

    #[test]
    fn run_commands_drains_message_feedback() {
        let mut m = model();
        let outcome = run_commands(&mut m, Cmd::msg(CounterMsg::Cascade));
        assert!(m.cascade);
        assert_eq!(m.count, 3);
        assert!(!outcome.quit);
    }

    #[test]
    fn run_commands_reports_quit_and_ticks() {
        let mut m = model();
        let outcome = run_commands(
            &mut m,
            Cmd::batch([
                Cmd::tick(Duration::from_millis(250)),
                Cmd::msg(CounterMsg::Quit),
            ]),
        );
        assert!(outcome.quit);
        assert_eq!(outcome.ticks, vec![Duration::from_millis(250)]);
    }

    #[test]
    fn view_reflects_updates() {
        let mut m = model();
        run_commands(&mut m, Cmd::msg(CounterMsg::Add(5)));
        assert_eq!(m.view(), "count: 5");
    }
}
