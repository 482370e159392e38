//! Files generated from the selected stack rather than copied from a template

pub mod compose;
pub mod env;
pub mod gitignore;
pub mod module;

pub use module::{generate_module, BackendKind, GeneratedModule, ModuleError, ModuleName};
