use thiserror::Error;

/// Top-level error type for agent construction and the demo environments.
///
/// The search and value-iteration algorithms themselves never fail; errors
/// only surface while validating configuration or building environments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Search depth must be at least 1, got {depth}")]
    InvalidDepth { depth: usize },

    #[error("Discount must lie in [0, 1], got {discount}")]
    InvalidDiscount { discount: f64 },

    #[error("Sweeping threshold must be positive, got {theta}")]
    InvalidTheta { theta: f64 },

    #[error("Unknown evaluation function: {name}")]
    UnknownEvaluation { name: String },

    #[error("Unknown agent: {name}")]
    UnknownAgent { name: String },

    #[error("Config parse failed: {details}")]
    ParseFailed { details: String },
}

/// Errors raised while building the demo environments
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvironmentError {
    #[error("Unknown layout: {name}")]
    UnknownLayout { name: String },

    #[error("Malformed layout at row {row}, column {col}: '{token}'")]
    MalformedLayout { row: usize, col: usize, token: String },

    #[error("Layout has no {what}")]
    MissingFeature { what: String },

    #[error("Layout rows have unequal widths")]
    RaggedLayout,

    #[error("Noise must lie in [0, 1], got {noise}")]
    InvalidNoise { noise: f64 },
}

/// Result type aliases for convenience
pub type AgentResult<T> = Result<T, AgentError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Helper methods for creating common errors
impl ConfigError {
    pub fn unknown_evaluation(name: impl Into<String>) -> Self {
        Self::UnknownEvaluation { name: name.into() }
    }

    pub fn unknown_agent(name: impl Into<String>) -> Self {
        Self::UnknownAgent { name: name.into() }
    }
}

impl EnvironmentError {
    pub fn unknown_layout(name: impl Into<String>) -> Self {
        Self::UnknownLayout { name: name.into() }
    }

    pub fn malformed(row: usize, col: usize, token: impl Into<String>) -> Self {
        Self::MalformedLayout {
            row,
            col,
            token: token.into(),
        }
    }

    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingFeature { what: what.into() }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseFailed {
            details: err.to_string(),
        }
    }
}
