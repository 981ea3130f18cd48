pub mod config;
pub mod logging;

pub mod manifest;
pub mod orchestrator;
pub mod plan;
pub mod reference;
pub mod transport;
pub mod workspace;
