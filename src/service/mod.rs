//! Service layer: the provisioning steps and the workflow tying them together.

pub mod collector;
pub mod compose;
mod deploy_service;
pub mod docker_installer;
pub mod health;
pub mod preflight;
pub mod summary;

pub use deploy_service::{DeployOptions, DeployService};
