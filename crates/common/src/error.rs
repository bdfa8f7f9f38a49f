//! Error types shared across Release Cinema crates.

/// Top-level error type for Release Cinema operations.
#[derive(Debug, thiserror::Error)]
pub enum CinemaError {
    /// A required external tool is not installed, or the working
    /// directory is not a repository.
    #[error("Environment error: {message}")]
    Environment { message: String },

    /// The caller supplied missing or contradictory input.
    #[error("Input error: {message}")]
    Input { message: String },

    /// An external program could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// An external program exited with a non-zero status.
    #[error("{program} failed ({status}): {stderr}")]
    Tool {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using CinemaError.
pub type CinemaResult<T> = Result<T, CinemaError>;

impl CinemaError {
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_includes_stderr() {
        let err = CinemaError::Tool {
            program: "ffmpeg".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "Unknown encoder".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("ffmpeg failed"));
        assert!(msg.contains("Unknown encoder"));
    }

    #[test]
    fn test_constructors_pick_variant() {
        assert!(matches!(
            CinemaError::environment("no git"),
            CinemaError::Environment { .. }
        ));
        assert!(matches!(
            CinemaError::input("need --from"),
            CinemaError::Input { .. }
        ));
    }
}
