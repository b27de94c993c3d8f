//! External collaborators (transcription, translation, speech) and the workflows around them.
//!
//! The pipeline only depends on the traits in [`collaborator`]; concrete providers live with
//! the application that owns their credentials.

/// Capability traits.
pub mod collaborator;
/// Parsing of structured collaborator output.
pub mod response;
/// Operation wrappers: validation, truncation, error tagging.
pub mod workflow;
