//! Physics errors
//!
//! Failures are reported to the caller of the specific creation call; the
//! world is left untouched when any of these is returned.

use thiserror::Error;

use super::body::BodyHandle;

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Dynamic bodies need a finite, strictly positive mass.
    #[error("invalid mass {0} for a dynamic body (must be finite and > 0)")]
    InvalidMass(f32),

    #[error("invalid restitution {0} (must be within 0..=1)")]
    InvalidRestitution(f32),

    /// Box extents or sphere radius that are not finite and positive.
    #[error("invalid collider shape: {0}")]
    InvalidShape(String),

    #[error("no body for handle {0:?}")]
    UnknownBody(BodyHandle),

    #[error("invalid physics config: {0}")]
    InvalidConfig(String),

    #[error("failed to read physics config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse physics config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
