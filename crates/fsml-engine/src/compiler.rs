//! Compiles a [`Schema`] into the two tables the engine runs on.
//!
//! * [`TransitionTable`]: `(event, source) -> target`, plus one synthetic
//!   `<event>_failed` entry per event that declares an error state.
//! * [`HookTable`]: hook key -> ordered task names.
//!
//! Hook keys:
//!
//! | Key | Filled from |
//! |-----|-------------|
//! | `before_event` | global `OnBeforeEvent` |
//! | `after_event` | global `OnAfterEvent` |
//! | `enter_state` | global `OnStateSet` |
//! | `enter_<state>` | the state's `OnStateSet` |
//! | `before_<event>` | each declaring state's `OnBeforeEvent`, then the event's own tasks |
//! | `after_<event>` | each declaring state's `OnAfterEvent` |

use crate::schema::Schema;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const BEFORE_EVENT: &str = "before_event";
pub const AFTER_EVENT: &str = "after_event";
pub const ENTER_STATE: &str = "enter_state";

pub fn before_key(event: &str) -> String {
    format!("before_{}", event)
}

pub fn after_key(event: &str) -> String {
    format!("after_{}", event)
}

pub fn enter_key(state: &str) -> String {
    format!("enter_{}", state)
}

/// Name of the synthetic transition fired when `event`'s hooks abort.
pub fn fallback_event(event: &str) -> String {
    format!("{}_failed", event)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Declared in the document; may be fired by the host.
    Regular,
    /// `<event>_failed`; only fired by the engine after an abort.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub event: String,
    pub source: String,
    pub target: String,
    pub error_state: Option<String>,
    pub kind: TransitionKind,
}

impl Transition {
    pub fn is_fallback(&self) -> bool {
        self.kind == TransitionKind::Fallback
    }
}

/// Every transition in declaration order, indexed by `(event, source)`.
///
/// When two entries share a key the later one wins the lookup; both stay in
/// the ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
    #[serde(skip)]
    index: HashMap<(String, String), usize>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, transition: Transition) {
        let key = (transition.event.clone(), transition.source.clone());
        self.index.insert(key, self.transitions.len());
        self.transitions.push(transition);
    }

    pub fn get(&self, event: &str, source: &str) -> Option<&Transition> {
        self.index
            .get(&(event.to_string(), source.to_string()))
            .map(|&i| &self.transitions[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Events the host may fire from `source`, in declaration order.
    pub fn events_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.transitions
            .iter()
            .filter(move |t| t.source == source && !t.is_fallback())
            .map(|t| t.event.as_str())
    }
}

/// Hook key to ordered task names. Keys with no tasks are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct HookTable(BTreeMap<String, Vec<String>>);

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, tasks: &[String]) {
        if tasks.is_empty() {
            return;
        }
        self.0.entry(key.into()).or_default().extend_from_slice(tasks);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every distinct task name referenced by any hook, sorted.
    pub fn task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

pub fn transition_table(schema: &Schema) -> TransitionTable {
    let mut table = TransitionTable::new();
    for (state, event) in schema.events() {
        table.insert(Transition {
            event: event.name.clone(),
            source: state.name.clone(),
            target: event.target_state.clone(),
            error_state: event.error_state.clone(),
            kind: TransitionKind::Regular,
        });
        if let Some(error_state) = &event.error_state {
            table.insert(Transition {
                event: fallback_event(&event.name),
                source: state.name.clone(),
                target: error_state.clone(),
                error_state: None,
                kind: TransitionKind::Fallback,
            });
        }
    }
    table
}

pub fn hook_table(schema: &Schema) -> HookTable {
    let mut hooks = HookTable::new();
    let global = &schema.default_events;

    hooks.append(BEFORE_EVENT, &global.before);
    hooks.append(AFTER_EVENT, &global.after);
    hooks.append(ENTER_STATE, &global.on_enter);

    for state in &schema.states {
        hooks.append(enter_key(&state.name), &state.default_events.on_enter);
        for event in &state.events {
            let before = before_key(&event.name);
            hooks.append(before.clone(), &state.default_events.before);
            hooks.append(before, &event.tasks);
            hooks.append(after_key(&event.name), &state.default_events.after);
        }
    }
    hooks
}
