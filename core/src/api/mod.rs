//! Public API: the [`Engine`] and its configuration and error types.

pub mod engine;
pub mod environment;
pub mod error;
pub mod options;

pub use engine::Engine;
pub use environment::{Environment, VarFactory};
pub use error::{ErrorCode, ParserError};
pub use options::EngineOptions;
