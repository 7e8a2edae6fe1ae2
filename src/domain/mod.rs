//! Domain layer containing the deployment building blocks.
//!
//! This module contains:
//! - Declared application settings and the collected record
//! - Secret generation
//! - `.env` rendering
//! - Subprocess invocation
//! - Console styling and the debug logger

pub mod command;
pub mod env_file;
mod error;
pub mod fields;
pub mod logger;
pub mod secret;
pub mod style;

pub use command::{CommandRunner, CommandSpec, SystemRunner};
pub use error::DeployError;
pub use fields::{ConfigRecord, FieldSpec, FIELDS};
