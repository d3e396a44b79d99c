//! Normalized view of a validated document.
//!
//! [`build`] projects the parse tree into a [`Schema`]: global default hooks
//! plus an ordered list of [`State`]s, each with its own default hooks and
//! custom events. The builder trusts its input; run
//! [`validator::validate`](crate::validator::validate) first.

use fsml_syntax::ast::{Node, NodeKind, tags};
use serde::Serialize;

/// The three hook containers allowed at schema and state scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultHook {
    Before,
    After,
    OnEnter,
}

impl DefaultHook {
    pub const ALL: [DefaultHook; 3] = [DefaultHook::Before, DefaultHook::After, DefaultHook::OnEnter];

    pub fn tag(self) -> &'static str {
        match self {
            DefaultHook::Before => tags::ON_BEFORE_EVENT,
            DefaultHook::After => tags::ON_AFTER_EVENT,
            DefaultHook::OnEnter => tags::ON_STATE_SET,
        }
    }

    pub fn from_tag(name: &str) -> Option<Self> {
        DefaultHook::ALL.into_iter().find(|hook| hook.tag() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DefaultEvents {
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub on_enter: Vec<String>,
}

impl DefaultEvents {
    pub fn tasks(&self, hook: DefaultHook) -> &[String] {
        match hook {
            DefaultHook::Before => &self.before,
            DefaultHook::After => &self.after,
            DefaultHook::OnEnter => &self.on_enter,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.on_enter.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomEvent {
    pub name: String,
    /// Empty when the document omits `targetState`.
    pub target_state: String,
    pub error_state: Option<String>,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub name: String,
    pub default_events: DefaultEvents,
    pub events: Vec<CustomEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub default_events: DefaultEvents,
    pub states: Vec<State>,
}

impl Schema {
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Every `(state, event)` pair in declaration order.
    pub fn events(&self) -> impl Iterator<Item = (&State, &CustomEvent)> {
        self.states
            .iter()
            .flat_map(|state| state.events.iter().map(move |event| (state, event)))
    }
}

/// Projects a validated tree into a [`Schema`].
pub fn build(root: &Node) -> Schema {
    Schema {
        default_events: build_default_events(root),
        states: root
            .child(tags::STATES)
            .map(|states| states.element_children().map(build_state).collect())
            .unwrap_or_default(),
    }
}

fn build_state(node: &Node) -> State {
    State {
        name: node.name.clone(),
        default_events: build_default_events(node),
        events: node
            .child(tags::EVENTS)
            .map(build_custom_events)
            .unwrap_or_default(),
    }
}

fn build_default_events(node: &Node) -> DefaultEvents {
    let mut events = DefaultEvents::default();
    for child in &node.children {
        match DefaultHook::from_tag(&child.name) {
            Some(DefaultHook::Before) => events.before = build_tasks(child),
            Some(DefaultHook::After) => events.after = build_tasks(child),
            Some(DefaultHook::OnEnter) => events.on_enter = build_tasks(child),
            None => {}
        }
    }
    events
}

fn build_custom_events(events: &Node) -> Vec<CustomEvent> {
    events
        .children
        .iter()
        .filter(|child| child.kind != NodeKind::Text && DefaultHook::from_tag(&child.name).is_none())
        .map(|child| CustomEvent {
            name: child.name.clone(),
            target_state: child.attribute(tags::TARGET_STATE).unwrap_or_default().to_string(),
            error_state: child
                .attribute(tags::ERROR_STATE)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            tasks: build_tasks(child),
        })
        .collect()
}

fn build_tasks(node: &Node) -> Vec<String> {
    node.children_named(tags::TASK)
        .filter_map(Node::text_content)
        .map(str::to_string)
        .collect()
}
