use thiserror::Error;

/// Rejected solver configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown solver '{0}'")]
    UnknownSolver(String),

    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        ConfigError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Failure to collect a result from a background solve.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("solver thread panicked")]
    Panicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnknownSolver("beam".to_string());
        assert_eq!(format!("{}", err), "unknown solver 'beam'");

        let err = ConfigError::invalid("alpha", 1.5, "must be in (0, 1]");
        assert_eq!(format!("{}", err), "invalid alpha = 1.5: must be in (0, 1]");

        assert_eq!(RunnerError::Panicked.to_string(), "solver thread panicked");
    }
}
