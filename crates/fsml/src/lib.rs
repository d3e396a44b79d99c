pub use fsml_syntax::{Node, NodeKind, ParseError, SyntaxErrors, parse_source, tokenize};
pub use fsml_engine::{
    CompileError, Engine, EngineConfig, EngineError, Entity, FnTask, Outcome, RegistryError, Schema,
    Stateful, Task,
};
pub use fsml_syntax;
pub use fsml_engine;
pub use anyhow;

pub mod prelude {
    pub use crate::{Engine, EngineConfig, Entity, FnTask, Stateful, Task};
    pub use crate::{CompileError, EngineError, Outcome};
}
