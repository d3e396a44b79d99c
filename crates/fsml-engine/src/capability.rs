//! Capabilities the host provides: entities that carry a state name and tasks
//! that run against them.

use std::any::Any;
use std::fmt;

/// Read and write access to an entity's current state name.
pub trait Stateful {
    fn state(&self) -> &str;
    fn set_state(&mut self, state: &str) -> anyhow::Result<()>;
}

/// An opaque host object passed to [`Engine::trigger`](crate::Engine::trigger).
///
/// Only entities that return `Some` from [`Entity::stateful`] can be
/// transitioned; everything else is rejected with
/// [`EngineError::MissingCapability`](crate::EngineError::MissingCapability).
///
/// ```
/// use fsml_engine::{Entity, Stateful};
///
/// struct Order { state: String }
///
/// impl Stateful for Order {
///     fn state(&self) -> &str { &self.state }
///     fn set_state(&mut self, state: &str) -> anyhow::Result<()> {
///         self.state = state.to_string();
///         Ok(())
///     }
/// }
///
/// impl Entity for Order {
///     fn stateful(&mut self) -> Option<&mut dyn Stateful> { Some(self) }
/// }
/// ```
pub trait Entity: Any + 'static {
    fn stateful(&mut self) -> Option<&mut dyn Stateful> {
        None
    }
}

impl dyn Entity {
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }
}

/// A named unit of side-effecting work run at a hook.
pub trait Task: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, entity: &mut dyn Entity) -> anyhow::Result<()>;
}

type TaskFn = Box<dyn Fn(&mut dyn Entity) -> anyhow::Result<()> + Send + Sync>;

/// A [`Task`] backed by a closure.
pub struct FnTask {
    name: String,
    run: TaskFn,
}

impl FnTask {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut dyn Entity) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self { name: name.into(), run: Box::new(run) }
    }
}

impl Task for FnTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, entity: &mut dyn Entity) -> anyhow::Result<()> {
        (self.run)(entity)
    }
}

impl fmt::Debug for FnTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        state: String,
        hits: u32,
    }

    impl Stateful for Counter {
        fn state(&self) -> &str {
            &self.state
        }

        fn set_state(&mut self, state: &str) -> anyhow::Result<()> {
            self.state = state.to_string();
            Ok(())
        }
    }

    impl Entity for Counter {
        fn stateful(&mut self) -> Option<&mut dyn Stateful> {
            Some(self)
        }
    }

    struct Opaque;

    impl Entity for Opaque {}

    #[test]
    fn stateful_capability_resolves() {
        let mut counter = Counter { state: "new".to_string(), hits: 0 };
        let entity: &mut dyn Entity = &mut counter;
        let stateful = entity.stateful().unwrap();
        stateful.set_state("done").unwrap();
        assert_eq!(counter.state, "done");
    }

    #[test]
    fn opaque_entity_has_no_capability() {
        let mut opaque = Opaque;
        let entity: &mut dyn Entity = &mut opaque;
        assert!(entity.stateful().is_none());
    }

    #[test]
    fn fn_task_downcasts_entity() {
        let task = FnTask::new("bump", |entity| {
            let counter = entity
                .downcast_mut::<Counter>()
                .ok_or_else(|| anyhow::anyhow!("wrong entity type"))?;
            counter.hits += 1;
            Ok(())
        });

        let mut counter = Counter { state: "new".to_string(), hits: 0 };
        task.execute(&mut counter).unwrap();
        task.execute(&mut counter).unwrap();
        assert_eq!(counter.hits, 2);
        assert_eq!(task.name(), "bump");

        let err = task.execute(&mut Opaque).unwrap_err();
        assert_eq!(err.to_string(), "wrong entity type");
    }
}
