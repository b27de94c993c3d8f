/// Lifecycle of one render: `Idle -> Preparing -> Encoding -> {Completed | Aborted | Failed}`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RenderState {
    /// No render has started.
    #[default]
    Idle,
    /// Resolving metadata, allocating the surface, preparing audio and negotiating the format.
    Preparing,
    /// Driving the frame loop.
    Encoding,
    /// Finished and handed back a blob.
    Completed,
    /// Cancelled by the caller.
    Aborted,
    /// Failed with a human-readable message.
    Failed(String),
}

impl RenderState {
    /// `true` for `Completed`, `Aborted` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted | Self::Failed(_))
    }

    /// `true` while a render is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Preparing | Self::Encoding)
    }
}

impl std::fmt::Display for RenderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Preparing => f.write_str("preparing"),
            Self::Encoding => f.write_str("encoding"),
            Self::Completed => f.write_str("completed"),
            Self::Aborted => f.write_str("aborted"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}
