use domain_types::errors::ConnectorError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed while loading configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Invalid configuration value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Process exit code the CLI reports for a failed attempt
pub trait ExitCode {
    fn exit_code(&self) -> i32;
}

impl ExitCode for ConnectorError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 2,
            Self::GatewayUnreachable => 3,
            Self::GatewayError { .. } => 4,
            Self::HardDecline { .. } => 5,
            Self::OAuthFailure => 6,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_facing_failures_have_distinct_codes() {
        let codes = [
            ConnectorError::InvalidInput {
                message: "missing card".to_string(),
            }
            .exit_code(),
            ConnectorError::GatewayUnreachable.exit_code(),
            ConnectorError::GatewayError {
                code: "510".to_string(),
                message: "down".to_string(),
            }
            .exit_code(),
            ConnectorError::HardDecline {
                code: None,
                message: "declined".to_string(),
            }
            .exit_code(),
            ConnectorError::OAuthFailure.exit_code(),
        ];
        let mut unique = codes.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
        assert_eq!(ConnectorError::RequestEncodingFailed.exit_code(), 1);
    }
}
