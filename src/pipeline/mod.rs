//! The render operation: configuration, state machine and the frame-driving orchestrator.

/// Render configuration.
pub mod opts;
/// The render orchestrator.
pub mod orchestrator;
/// Render session states.
pub mod state;
