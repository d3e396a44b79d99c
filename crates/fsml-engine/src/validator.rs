//! Structural validation of a parsed document.
//!
//! The tree is walked breadth-first, one level at a time. When a `States`
//! node is visited its element children are declared as states *before* the
//! next level is visited, so every placement rule on that level and below
//! sees the complete set of states declared above it.

use crate::compiler::{BEFORE_EVENT, ENTER_STATE, before_key, enter_key};
use crate::error::ValidationErrors;
use crate::schema::{DefaultHook, Schema};
use fsml_syntax::ast::{Node, NodeKind, is_structural_tag, tags};
use std::collections::{BTreeSet, HashSet};

/// Names of every state declared under a `States` node.
pub type DeclaredStates = BTreeSet<String>;

struct Visit<'a> {
    node: &'a Node,
    parent: Option<&'a Node>,
}

impl Visit<'_> {
    fn parent_is_root(&self) -> bool {
        self.parent.is_some_and(|p| p.kind == NodeKind::Root)
    }

    fn parent_is_state(&self, declared: &DeclaredStates) -> bool {
        self.parent
            .is_some_and(|p| p.kind == NodeKind::Element && declared.contains(&p.name))
    }
}

type Rule = fn(&Visit<'_>, &DeclaredStates) -> Option<String>;

const RULES: &[Rule] = &[root_is_schema, default_events_placement, events_placement];

fn root_is_schema(visit: &Visit<'_>, _: &DeclaredStates) -> Option<String> {
    (visit.node.kind == NodeKind::Root && visit.node.name != tags::SCHEMA)
        .then(|| format!("root node is not {}", tags::SCHEMA))
}

fn default_events_placement(visit: &Visit<'_>, declared: &DeclaredStates) -> Option<String> {
    let applies = visit.node.kind == NodeKind::Element && DefaultHook::from_tag(&visit.node.name).is_some();
    (applies && !visit.parent_is_root() && !visit.parent_is_state(declared))
        .then(|| "default events must be a direct child of Schema or a State node".to_string())
}

fn events_placement(visit: &Visit<'_>, declared: &DeclaredStates) -> Option<String> {
    (visit.node.name == tags::EVENTS && !visit.parent_is_state(declared))
        .then(|| "Events node must be inside a State node".to_string())
}

fn closing_tag_matches(visit: &Visit<'_>, _: &DeclaredStates) -> Option<String> {
    (visit.node.kind == NodeKind::Unknown)
        .then(|| format!("mismatched closing tag for <{}>", visit.node.name))
}

/// Checks placement rules and returns the declared state names.
///
/// With `strict` set, elements whose closing tag did not match are rejected
/// as well. All violations are reported together.
pub fn validate(root: &Node, strict: bool) -> Result<DeclaredStates, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut declared = DeclaredStates::new();
    let mut visited: HashSet<&str> = HashSet::new();

    let mut level = vec![Visit { node: root, parent: None }];
    while !level.is_empty() {
        let mut next = Vec::new();
        for visit in &level {
            visited.insert(visit.node.name.as_str());

            for rule in RULES {
                if let Some(message) = rule(visit, &declared) {
                    errors.push(message);
                }
            }
            if strict && let Some(message) = closing_tag_matches(visit, &declared) {
                errors.push(message);
            }

            if visit.node.name == tags::STATES {
                declared.extend(visit.node.element_children().map(|c| c.name.clone()));
            }
            next.extend(
                visit
                    .node
                    .children
                    .iter()
                    .map(|child| Visit { node: child, parent: Some(visit.node) }),
            );
        }
        level = next;
    }

    for required in [tags::SCHEMA, tags::STATES] {
        if !visited.contains(required) {
            errors.push(format!("missing {} node", required));
        }
    }

    errors.into_result(declared)
}

/// Strict-mode checks that need the built schema: every event must target a
/// declared state, and state or event names may not reuse structural tags or
/// the keys of the global hooks.
pub fn check_references(schema: &Schema, declared: &DeclaredStates) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for state in &schema.states {
        if is_structural_tag(&state.name) {
            errors.push(format!("state '{}' uses a reserved tag name", state.name));
        }
        if enter_key(&state.name) == ENTER_STATE {
            errors.push(format!("state '{}' shares its hook key with {}", state.name, ENTER_STATE));
        }
    }

    for (state, event) in schema.events() {
        if before_key(&event.name) == BEFORE_EVENT {
            errors.push(format!(
                "event '{}' in state '{}' shares its hook keys with {}",
                event.name, state.name, BEFORE_EVENT
            ));
        }
        if event.target_state.is_empty() {
            errors.push(format!("event '{}' in state '{}' has no {}", event.name, state.name, tags::TARGET_STATE));
        } else if !declared.contains(&event.target_state) {
            errors.push(format!(
                "event '{}' in state '{}' targets undeclared state '{}'",
                event.name, state.name, event.target_state
            ));
        }
        if let Some(error_state) = &event.error_state
            && !declared.contains(error_state)
        {
            errors.push(format!(
                "event '{}' in state '{}' falls back to undeclared state '{}'",
                event.name, state.name, error_state
            ));
        }
    }

    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use fsml_syntax::parse_source;

    fn check(source: &str) -> Result<DeclaredStates, ValidationErrors> {
        validate(&parse_source(source).unwrap().root, false)
    }

    #[test]
    fn collects_declared_states() {
        let states = check("<Schema><States><new></new><done></done></States></Schema>").unwrap();
        assert_eq!(states.into_iter().collect::<Vec<_>>(), vec!["done", "new"]);
    }

    #[test]
    fn wrong_root_and_missing_nodes_reported_together() {
        let err = check("<Machine></Machine>").unwrap_err();
        assert_eq!(
            err.messages(),
            ["root node is not Schema", "missing Schema node", "missing States node"]
        );
    }

    #[test]
    fn default_events_allowed_at_root_and_state() {
        let ok = check(
            r#"<Schema>
                <OnBeforeEvent></OnBeforeEvent>
                <States><new><OnStateSet></OnStateSet></new></States>
            </Schema>"#,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn default_events_rejected_elsewhere() {
        let err = check(
            r#"<Schema><States>
                <OnAfterEvent></OnAfterEvent>
                <new><Events><Go targetState="new"><OnStateSet></OnStateSet></Go></Events></new>
            </States></Schema>"#,
        )
        .unwrap_err();
        assert_eq!(err.messages().len(), 2);
        assert!(err
            .messages()
            .iter()
            .all(|m| m == "default events must be a direct child of Schema or a State node"));
    }

    #[test]
    fn events_must_sit_in_a_state() {
        let err = check("<Schema><Events></Events><States></States></Schema>").unwrap_err();
        assert_eq!(err.messages(), ["Events node must be inside a State node"]);
    }

    #[test]
    fn states_nested_deeper_are_still_declared() {
        let states = check(
            "<Schema><States><outer><States><inner><Events></Events></inner></States></outer></States></Schema>",
        )
        .unwrap();
        assert!(states.contains("outer"));
        assert!(states.contains("inner"));
    }

    #[test]
    fn unknown_nodes_only_fail_in_strict_mode() {
        let root = parse_source("<Schema><States><new></old></States></Schema>").unwrap().root;
        assert!(validate(&root, false).is_ok());
        let err = validate(&root, true).unwrap_err();
        assert_eq!(err.messages(), ["mismatched closing tag for <new>"]);
    }

    #[test]
    fn reference_checks() {
        let root = parse_source(
            r#"<Schema><States>
                <new><Events>
                    <Go targetState="gone" errorState="nowhere"></Go>
                    <Stay></Stay>
                </Events></new>
                <Task></Task>
            </States></Schema>"#,
        )
        .unwrap()
        .root;
        let declared = validate(&root, true).unwrap();
        let err = check_references(&schema::build(&root), &declared).unwrap_err();
        assert_eq!(
            err.messages(),
            [
                "state 'Task' uses a reserved tag name",
                "event 'Go' in state 'new' targets undeclared state 'gone'",
                "event 'Go' in state 'new' falls back to undeclared state 'nowhere'",
                "event 'Stay' in state 'new' has no targetState",
            ]
        );
    }

    #[test]
    fn global_hook_keys_are_reserved_in_strict_mode() {
        let root = parse_source(
            r#"<Schema><States>
                <new><Events><event targetState="state"></event></Events></new>
                <state></state>
            </States></Schema>"#,
        )
        .unwrap()
        .root;
        let declared = validate(&root, true).unwrap();
        let err = check_references(&schema::build(&root), &declared).unwrap_err();
        assert_eq!(
            err.messages(),
            [
                "state 'state' shares its hook key with enter_state",
                "event 'event' in state 'new' shares its hook keys with before_event",
            ]
        );
    }
}
