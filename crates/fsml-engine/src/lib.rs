//! # FSML Engine
//!
//! Compiles an FSML document into a transition table and hook table, then
//! drives host entities through it.
//!
//! ```text
//! Source ─ parse ─> Node ─ validate ─> DeclaredStates
//!                     └── build ──> Schema ─ compile ─> TransitionTable + HookTable
//!                                                              ↓
//!                                           Engine::trigger(event, entity)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fsml_engine::{Engine, Entity, FnTask, Stateful};
//!
//! struct Order { state: String }
//!
//! impl Stateful for Order {
//!     fn state(&self) -> &str { &self.state }
//!     fn set_state(&mut self, state: &str) -> anyhow::Result<()> {
//!         self.state = state.to_string();
//!         Ok(())
//!     }
//! }
//!
//! impl Entity for Order {
//!     fn stateful(&mut self) -> Option<&mut dyn Stateful> { Some(self) }
//! }
//!
//! let engine = Engine::compile(r#"
//!     <Schema>
//!         <States>
//!             <new>
//!                 <Events>
//!                     <Pay targetState="paid"><Task>charge</Task></Pay>
//!                 </Events>
//!             </new>
//!             <paid></paid>
//!         </States>
//!     </Schema>
//! "#).expect("valid document");
//!
//! engine.add_task(FnTask::new("charge", |_| Ok(()))).unwrap();
//!
//! let mut order = Order { state: "new".to_string() };
//! engine.trigger("Pay", &mut order).unwrap();
//! assert_eq!(order.state, "paid");
//! ```

pub mod capability;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod machine;
pub mod registry;
pub mod schema;
pub mod validator;

pub use capability::{Entity, FnTask, Stateful, Task};
pub use compiler::{HookTable, Transition, TransitionKind, TransitionTable};
pub use config::EngineConfig;
pub use engine::{Engine, Outcome};
pub use error::{CompileError, EngineError, RegistryError, ValidationErrors};
pub use machine::{FireError, Hook, Machine, Phase};
pub use registry::TaskRegistry;
pub use schema::{CustomEvent, DefaultEvents, DefaultHook, Schema, State};
pub use validator::DeclaredStates;
