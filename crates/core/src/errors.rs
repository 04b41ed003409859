use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("This slot is already booked")]
    SlotTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Too many attempts, try later")]
    RateLimited,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ClinicError {
    /// Stable machine-readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ClinicError::Validation(_) => "VALIDATION_ERROR",
            ClinicError::Unauthorized(_) => "UNAUTHORIZED",
            ClinicError::InvalidCredentials => "INVALID_CREDENTIALS",
            ClinicError::Forbidden(_) => "FORBIDDEN",
            ClinicError::NotFound(_) => "NOT_FOUND",
            ClinicError::SlotTaken => "SLOT_TAKEN",
            ClinicError::EmailTaken => "EMAIL_TAKEN",
            ClinicError::RateLimited => "RATE_LIMITED",
            ClinicError::Config(_) => "CONFIG",
            ClinicError::Database(_) | ClinicError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ClinicError::Config(_) | ClinicError::Database(_) | ClinicError::Internal(_)
        )
    }
}

impl From<validator::ValidationErrors> for ClinicError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort_unstable();
        ClinicError::Validation(format!("Invalid input: {}", fields.join(", ")))
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
