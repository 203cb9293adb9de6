pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod expander;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod tokens;
pub mod types;

#[macro_use]
extern crate lazy_static;

mod core;
mod special_forms;

pub use environment::{Bindings, Scope};
pub use interpreter::evaluate;
pub use types::{Cons, ExternalMap, Procedure, Symbol, Value};
