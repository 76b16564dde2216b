use thiserror::Error;

/// Boxed error produced by a cached computation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cacheable member <{member}> is not registered on {owner}")]
    RegistrationNotFound { owner: String, member: String },

    #[error("Cannot resolve an instance of {owner}: {message}")]
    Resolution { owner: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Cache tier failure during {operation}: {message}")]
    Tiered { operation: String, message: String },

    #[error("Computation {target} failed: {source}")]
    Computation {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("Key template error: {message}")]
    KeyTemplate { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn registration_not_found(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self::RegistrationNotFound {
            owner: owner.into(),
            member: member.into(),
        }
    }

    pub fn resolution(owner: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            owner: owner.into(),
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn tiered(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tiered {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn computation(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Computation {
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn key_template(message: impl Into<String>) -> Self {
        Self::KeyTemplate {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Programmer errors are never worth retrying
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::RegistrationNotFound { .. } | Self::KeyTemplate { .. }
        )
    }
}
