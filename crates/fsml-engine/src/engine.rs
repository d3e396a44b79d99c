//! The compiled state machine and its hook protocol.

use crate::capability::{Entity, Task};
use crate::compiler::{self, HookTable, Transition, TransitionKind, TransitionTable, fallback_event};
use crate::config::EngineConfig;
use crate::error::{CompileError, EngineError, RegistryError};
use crate::machine::{FireError, Machine};
use crate::registry::TaskRegistry;
use crate::schema::{self, Schema};
use crate::validator::{self, DeclaredStates};
use parking_lot::RwLock;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful [`Engine::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub event: String,
    pub from: String,
    pub to: String,
    /// True when the requested event aborted and `<event>_failed` ran instead.
    pub fell_back: bool,
    /// Message of the failure that triggered the fallback.
    pub cause: Option<String>,
}

/// A compiled document plus the tasks its hooks run.
///
/// The compiled tables are immutable after [`Engine::compile`]; only the task
/// registry changes, behind a lock, so one engine can be shared across
/// threads.
#[derive(Debug)]
pub struct Engine {
    schema: Schema,
    states: DeclaredStates,
    transitions: TransitionTable,
    hooks: HookTable,
    registry: RwLock<TaskRegistry>,
    config: EngineConfig,
}

impl Engine {
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        Self::compile_with(source, EngineConfig::default())
    }

    pub fn compile_with(source: &str, config: EngineConfig) -> Result<Self, CompileError> {
        let output = fsml_syntax::parse_source(source)?;
        for warning in &output.warnings {
            warn!("{}", warning);
        }

        let states = validator::validate(&output.root, config.strict)?;
        let schema = schema::build(&output.root);
        if config.strict {
            validator::check_references(&schema, &states)?;
        }

        let transitions = compiler::transition_table(&schema);
        let hooks = compiler::hook_table(&schema);
        info!(
            "Compiled {} states, {} transitions, {} hooks",
            schema.states.len(),
            transitions.len(),
            hooks.len()
        );

        Ok(Self {
            schema,
            states,
            transitions,
            hooks,
            registry: RwLock::new(TaskRegistry::new()),
            config,
        })
    }

    /// Reads the whole document from `reader` and compiles it with the
    /// default configuration.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CompileError> {
        Self::from_reader_with(reader, EngineConfig::default())
    }

    pub fn from_reader_with<R: Read>(mut reader: R, config: EngineConfig) -> Result<Self, CompileError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Self::compile_with(&source, config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        Self::from_path_with(path, EngineConfig::default())
    }

    pub fn from_path_with(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self, CompileError> {
        let path = path.as_ref();
        debug!("Reading document {:?}", path);
        let source = std::fs::read_to_string(path)?;
        Self::compile_with(&source, config)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn states(&self) -> &DeclaredStates {
        &self.states
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn add_task(&self, task: impl Task + 'static) -> Result<(), RegistryError> {
        self.add_shared(Arc::new(task))
    }

    pub fn add_shared(&self, task: Arc<dyn Task>) -> Result<(), RegistryError> {
        self.registry.write().add(task)
    }

    pub fn remove_task(&self, name: &str) -> Result<Arc<dyn Task>, RegistryError> {
        self.registry.write().remove(name)
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    pub fn task_names(&self) -> Vec<String> {
        self.registry.read().names().into_iter().map(str::to_string).collect()
    }

    /// True if the host may fire `event` from the entity's current state.
    pub fn can(&self, event: &str, entity: &mut dyn Entity) -> bool {
        entity
            .stateful()
            .is_some_and(|stateful| self.admissible(event, stateful.state()).is_some())
    }

    pub fn trigger(&self, event: &str, entity: &mut dyn Entity) -> Result<(), EngineError> {
        self.apply(event, entity).map(|_| ())
    }

    /// Fires `event` against `entity` and reports where it ended up.
    ///
    /// If any hook fails and the event declares an error state, the
    /// `<event>_failed` transition runs from the original state instead. When
    /// that also fails, the first failure is returned and the entity keeps
    /// its state.
    pub fn apply(&self, event: &str, entity: &mut dyn Entity) -> Result<Outcome, EngineError> {
        let source = entity
            .stateful()
            .ok_or(EngineError::MissingCapability)?
            .state()
            .to_string();

        if self.admissible(event, &source).is_none() {
            return Err(EngineError::NotAdmissible { event: event.to_string(), state: source });
        }

        let cause = match self.run(event, &source, entity) {
            Ok(to) => {
                info!("{}: {} -> {}", event, source, to);
                return Ok(Outcome { event: event.to_string(), from: source, to, fell_back: false, cause: None });
            }
            Err(err) if err.is_hook_failure() && self.config.fallback => err,
            Err(err) => return Err(err),
        };

        let failed = fallback_event(event);
        let has_fallback = self
            .transitions
            .get(&failed, &source)
            .is_some_and(Transition::is_fallback);
        if !has_fallback {
            warn!("{} aborted in state {}: {}", event, source, cause);
            return Err(cause);
        }

        warn!("{} aborted in state {}, falling back: {}", event, source, cause);
        match self.run(&failed, &source, entity) {
            Ok(to) => {
                info!("{}: {} -> {}", failed, source, to);
                Ok(Outcome {
                    event: event.to_string(),
                    from: source,
                    to,
                    fell_back: true,
                    cause: Some(cause.to_string()),
                })
            }
            Err(err) => {
                warn!("{} failed as well: {}", failed, err);
                Err(cause)
            }
        }
    }

    fn admissible(&self, event: &str, state: &str) -> Option<&Transition> {
        self.transitions
            .get(event, state)
            .filter(|t| t.kind == TransitionKind::Regular)
    }

    /// Runs one transition's hooks and commits the destination to the entity.
    fn run(&self, event: &str, source: &str, entity: &mut dyn Entity) -> Result<String, EngineError> {
        let mut machine = Machine::new(&self.transitions, source);
        machine
            .fire(event, |hook| self.run_hook(&hook.key, &mut *entity))
            .map_err(|err| match err {
                FireError::NotAdmissible { event, state } => EngineError::NotAdmissible { event, state },
                FireError::Cancelled { error, .. } => error,
            })?;

        let target = machine.current().to_string();
        entity
            .stateful()
            .ok_or(EngineError::MissingCapability)?
            .set_state(&target)
            .map_err(|source| EngineError::SetState { state: target.clone(), source })?;
        Ok(target)
    }

    fn run_hook(&self, key: &str, entity: &mut dyn Entity) -> Result<(), EngineError> {
        let Some(tasks) = self.hooks.get(key) else {
            return Ok(());
        };

        for name in tasks {
            let task = self.registry.read().get(name).map_err(|_| EngineError::TaskNotFound {
                task: name.clone(),
                hook: key.to_string(),
            })?;
            debug!("Running task {} for {}", name, key);
            task.execute(entity).map_err(|source| EngineError::TaskFailed {
                task: name.clone(),
                hook: key.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}
