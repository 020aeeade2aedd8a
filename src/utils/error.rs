use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Unrecognized command: {message}")]
    Command { message: String },
}

impl RosterError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::ConfigValidation { .. }
                | Self::InvalidConfigValue { .. }
                | Self::MissingConfig { .. }
        )
    }

    /// Process exit status: 2 for configuration problems, 1 for anything else.
    pub fn exit_code(&self) -> i32 {
        if self.is_config_error() {
            2
        } else {
            1
        }
    }

    /// Short message suitable for the terminal, without source chains.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation { message } => format!("Invalid member data: {}", message),
            Self::Io(e) => format!("File access failed: {}", e),
            Self::Api(e) if e.is_timeout() => "The member service did not respond in time".to_string(),
            Self::Api(e) if e.is_connect() => "Could not connect to the member service".to_string(),
            Self::Api(_) => "Request to the member service failed".to_string(),
            Self::Serialization(_) => "The member service returned an unexpected payload".to_string(),
            Self::Config { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidation { field, message } => format!("{}: {}", field, message),
            Self::InvalidConfigValue { field, reason, .. } => format!("{}: {}", field, reason),
            Self::MissingConfig { field } => format!("'{}' must be configured", field),
            Self::Command { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Names must be non-blank and hours must be whole, non-negative numbers",
            Self::Io(_) => "Check that the roster path exists and is writable",
            Self::Api(_) => "Check the network connection, API base URL and access token",
            Self::Serialization(_) => "Verify the group id and that the API base points at the groups API",
            Self::Config { .. } | Self::ConfigValidation { .. } => "Review the TOML configuration file",
            Self::InvalidConfigValue { .. } => "Correct the value on the command line or in the TOML file",
            Self::MissingConfig { .. } => "Pass the value as a flag or set it in the TOML file",
            Self::Command { .. } => "Type 'help' to list the available commands",
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
