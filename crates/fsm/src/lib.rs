//! Table-driven finite state machine
//!
//! A [`Machine`] walks a static table of [`Transition`]s. Each entry says
//! "in state `from`, on `event`, go to `to`", optionally running an exit
//! callback before the state changes and an enter callback after it. The
//! table is scanned in order and the first matching entry wins.
//!
//! The machine does not own the data its callbacks mutate. The caller hands
//! a `&mut C` context to every [`Machine::process_event`] and
//! [`Machine::update`] call, which keeps game models free of back pointers.
//!
//! # Automatic transitions
//!
//! Events whose [`Event::is_automatic`] returns `true` are never raised by a
//! host. [`Machine::update`] follows the first automatic transition defined
//! for the current state, which covers unconditional and timer-gated moves.
//!
//! # Re-entrancy
//!
//! Callbacks must not drive the machine that invoked them. A nested
//! `process_event`/`update` issued while a transition is running is rejected
//! with [`FsmError::Reentrant`] and changes nothing.
//!
//! # Example
//!
//! ```
//! use brickgame_fsm::{Event, Machine, Transition};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Light { Red, Green }
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Signal { Go, Timeout }
//!
//! impl Event for Signal {
//!     fn is_automatic(&self) -> bool {
//!         matches!(self, Signal::Timeout)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Counter { greens: u32 }
//!
//! fn count_green(c: &mut Counter) {
//!     c.greens += 1;
//! }
//!
//! static TABLE: [Transition<Light, Signal, Counter>; 2] = [
//!     Transition::new(Light::Red, Signal::Go, Light::Green, None, Some(count_green)),
//!     Transition::new(Light::Green, Signal::Timeout, Light::Red, None, None),
//! ];
//!
//! let machine = Machine::new(&TABLE, Light::Red).unwrap();
//! let mut ctx = Counter::default();
//!
//! assert_eq!(machine.process_event(&mut ctx, Signal::Go), Ok(Light::Green));
//! assert_eq!(machine.update(&mut ctx), Ok(Light::Red));
//! assert_eq!(ctx.greens, 1);
//! // Red has no transition for Timeout.
//! assert!(machine.process_event(&mut ctx, Signal::Timeout).is_err());
//! ```

use std::cell::Cell;
use std::fmt::Debug;

use thiserror::Error;

/// Callback run when leaving or entering a state
pub type Callback<C> = fn(&mut C);

/// Marker for state identifiers
pub trait State: Copy + Eq + Debug + 'static {}

impl<T: Copy + Eq + Debug + 'static> State for T {}

/// Event identifiers
pub trait Event: Copy + Eq + Debug + 'static {
    /// `true` for signals that are taken without an external trigger
    fn is_automatic(&self) -> bool {
        false
    }
}

/// Why a machine refused to act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("transition table is empty")]
    EmptyTable,

    #[error("no transition matches the current state and event")]
    NoTransition,

    #[error("machine is already processing a transition")]
    Reentrant,
}

/// One row of a transition table
#[derive(Debug)]
pub struct Transition<S, E, C> {
    pub from: S,
    pub event: E,
    pub to: S,
    pub on_exit: Option<Callback<C>>,
    pub on_enter: Option<Callback<C>>,
}

impl<S, E, C> Transition<S, E, C> {
    pub const fn new(
        from: S,
        event: E,
        to: S,
        on_exit: Option<Callback<C>>,
        on_enter: Option<Callback<C>>,
    ) -> Self {
        Self {
            from,
            event,
            to,
            on_exit,
            on_enter,
        }
    }
}

/// Clears the processing flag when a transition finishes or unwinds
struct Processing<'a>(&'a Cell<bool>);

impl<'a> Processing<'a> {
    fn enter(flag: &'a Cell<bool>) -> Result<Self, FsmError> {
        if flag.replace(true) {
            return Err(FsmError::Reentrant);
        }
        Ok(Self(flag))
    }
}

impl Drop for Processing<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// State machine over a static transition table
///
/// State lives in [`Cell`]s so a machine can be shared (for example behind
/// an `Rc`) and still detect a callback trying to drive it recursively.
pub struct Machine<S: State, E: Event, C: 'static> {
    table: &'static [Transition<S, E, C>],
    start: S,
    current: Cell<S>,
    processing: Cell<bool>,
}

impl<S: State, E: Event, C: 'static> Machine<S, E, C> {
    /// Create a machine positioned at `start`
    ///
    /// No callback runs for the start state.
    pub fn new(table: &'static [Transition<S, E, C>], start: S) -> Result<Self, FsmError> {
        if table.is_empty() {
            return Err(FsmError::EmptyTable);
        }
        Ok(Self {
            table,
            start,
            current: Cell::new(start),
            processing: Cell::new(false),
        })
    }

    /// Current state
    pub fn current(&self) -> S {
        self.current.get()
    }

    /// `true` while a transition's callbacks are running
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// Fire `event` and return the resulting state
    ///
    /// On [`FsmError::NoTransition`] neither the state nor the context has
    /// been touched.
    pub fn process_event(&self, ctx: &mut C, event: E) -> Result<S, FsmError> {
        let _guard = Processing::enter(&self.processing)?;
        let current = self.current.get();
        match self
            .table
            .iter()
            .find(|t| t.from == current && t.event == event)
        {
            Some(t) => Ok(self.run(ctx, t)),
            None => {
                log::trace!("fsm: {:?} ignores {:?}", current, event);
                Err(FsmError::NoTransition)
            }
        }
    }

    /// Follow the first automatic transition out of the current state
    pub fn update(&self, ctx: &mut C) -> Result<S, FsmError> {
        let _guard = Processing::enter(&self.processing)?;
        let current = self.current.get();
        match self
            .table
            .iter()
            .find(|t| t.from == current && t.event.is_automatic())
        {
            Some(t) => Ok(self.run(ctx, t)),
            None => Err(FsmError::NoTransition),
        }
    }

    fn run(&self, ctx: &mut C, t: &Transition<S, E, C>) -> S {
        log::debug!("fsm: {:?} --{:?}--> {:?}", t.from, t.event, t.to);
        if let Some(on_exit) = t.on_exit {
            on_exit(ctx);
        }
        self.current.set(t.to);
        if let Some(on_enter) = t.on_enter {
            on_enter(ctx);
        }
        t.to
    }
}

impl<S: State, E: Event, C: 'static> Debug for Machine<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current.get())
            .field("start", &self.start)
            .field("transitions", &self.table.len())
            .field("processing", &self.processing.get())
            .finish()
    }
}
