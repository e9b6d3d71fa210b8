//! Planning pipeline error types.

use std::fmt;

use thiserror::Error;

/// Result type for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// The uploaded artifact an input error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Keyword list (JSON)
    Keywords,
    /// SEO recommendations (plain text)
    SeoInsights,
    /// Ideal Customer Profile (JSON object)
    IcpData,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keywords => write!(f, "keywords"),
            Self::SeoInsights => write!(f, "SEO insights"),
            Self::IcpData => write!(f, "ICP data"),
        }
    }
}

/// Errors that can occur while loading inputs or generating content.
#[derive(Debug, Error)]
pub enum PlanError {
    /// An input artifact was missing or malformed.
    #[error("Error loading {artifact}: {reason}")]
    Load { artifact: Artifact, reason: String },

    /// Calendar parameters outside their accepted ranges.
    #[error("Invalid calendar request: {0}")]
    InvalidRequest(String),

    /// The model request failed (network, auth, quota, empty reply).
    #[error("Generation request failed: {0}")]
    Generation(String),

    /// The model reply did not contain a usable JSON array.
    #[error("Failed to parse JSON response from LLM: {0}")]
    Parse(String),

    /// The JSON array did not have the expected calendar shape.
    #[error("Calendar entry {index} has invalid field '{field}': {reason}")]
    Validation { index: usize, field: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanError {
    /// Build a load error for the given artifact.
    pub fn load(artifact: Artifact, reason: impl fmt::Display) -> Self {
        Self::Load { artifact, reason: reason.to_string() }
    }

    /// The artifact that failed to load, if this is a load error.
    pub fn artifact(&self) -> Option<Artifact> {
        match self {
            Self::Load { artifact, .. } => Some(*artifact),
            _ => None,
        }
    }
}
