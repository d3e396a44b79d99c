//! The transition primitive.
//!
//! A [`Machine`] tracks one current state over a compiled
//! [`TransitionTable`] and fires events through a fixed sequence of
//! [`Phase`]s. The caller's callback sees every phase and may cancel the
//! transition by returning an error, in which case the current state is
//! left where it was.

use crate::compiler::{AFTER_EVENT, BEFORE_EVENT, ENTER_STATE, Transition, TransitionTable, after_key, before_key, enter_key};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BeforeEvent,
    Before,
    Enter,
    EnterState,
    After,
    AfterEvent,
}

impl Phase {
    pub const ORDER: [Phase; 6] = [
        Phase::BeforeEvent,
        Phase::Before,
        Phase::Enter,
        Phase::EnterState,
        Phase::After,
        Phase::AfterEvent,
    ];

    /// Hook key for this phase of `event` moving into `target`.
    pub fn key(self, event: &str, target: &str) -> String {
        match self {
            Phase::BeforeEvent => BEFORE_EVENT.to_string(),
            Phase::Before => before_key(event),
            Phase::Enter => enter_key(target),
            Phase::EnterState => ENTER_STATE.to_string(),
            Phase::After => after_key(event),
            Phase::AfterEvent => AFTER_EVENT.to_string(),
        }
    }

    /// Phases from here on run with the destination already current.
    pub fn is_committed(self) -> bool {
        !matches!(self, Phase::BeforeEvent | Phase::Before)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::BeforeEvent => "before_event",
            Phase::Before => "before",
            Phase::Enter => "enter",
            Phase::EnterState => "enter_state",
            Phase::After => "after",
            Phase::AfterEvent => "after_event",
        };
        write!(f, "{}", name)
    }
}

/// What a callback is told about the phase being fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook<'a> {
    pub phase: Phase,
    pub key: String,
    pub event: &'a str,
    pub source: &'a str,
    pub target: &'a str,
}

#[derive(Debug)]
pub enum FireError<E> {
    NotAdmissible { event: String, state: String },
    Cancelled { phase: Phase, error: E },
}

impl<E: fmt::Display> fmt::Display for FireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireError::NotAdmissible { event, state } => {
                write!(f, "cannot fire '{}' from state '{}'", event, state)
            }
            FireError::Cancelled { phase, error } => {
                write!(f, "transition cancelled during {}: {}", phase, error)
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for FireError<E> {}

#[derive(Debug, Clone)]
pub struct Machine<'t> {
    table: &'t TransitionTable,
    current: String,
}

impl<'t> Machine<'t> {
    pub fn new(table: &'t TransitionTable, initial: impl Into<String>) -> Self {
        Self { table, current: initial.into() }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn can(&self, event: &str) -> bool {
        self.table.get(event, &self.current).is_some()
    }

    /// Fires `event`, calling `callback` once per [`Phase`] in
    /// [`Phase::ORDER`].
    ///
    /// The destination becomes current before the first committed phase. If
    /// the callback fails, no later phase runs and the source is restored.
    /// A phase whose key equals the previous phase's key is skipped, so an
    /// event named `event` or a state named `state` still runs each hook once.
    pub fn fire<E, F>(&mut self, event: &str, mut callback: F) -> Result<&'t Transition, FireError<E>>
    where
        F: FnMut(&Hook<'_>) -> Result<(), E>,
    {
        let table = self.table;
        let transition = table.get(event, &self.current).ok_or_else(|| FireError::NotAdmissible {
            event: event.to_string(),
            state: self.current.clone(),
        })?;

        let mut previous: Option<String> = None;
        for phase in Phase::ORDER {
            if phase.is_committed() && self.current != transition.target {
                self.current = transition.target.clone();
            }
            let key = phase.key(&transition.event, &transition.target);
            if previous.as_deref() == Some(key.as_str()) {
                continue;
            }
            previous = Some(key.clone());
            let hook = Hook {
                phase,
                key,
                event: &transition.event,
                source: &transition.source,
                target: &transition.target,
            };
            if let Err(error) = callback(&hook) {
                self.current = transition.source.clone();
                return Err(FireError::Cancelled { phase, error });
            }
        }

        Ok(transition)
    }
}
