//! xpgen Engine - Template execution and output materialization
//!
//! Wraps MiniJinja behind the generator's external-input contract:
//! assemble `ExternalInputs` once per resource, execute the generation
//! script, and write the resulting documents to disk idempotently.

pub mod engine;
pub mod error;
pub mod filters;
pub mod inputs;
pub mod output;

pub use engine::{DEFAULT_SCRIPT, Engine, resolve_script};
pub use error::{EngineError, Result};
pub use inputs::ExternalInputs;
pub use output::{WriteSummary, write_documents};
