use thiserror::Error;

/// Error for username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("must be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("must be at most {max} characters long, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("must only contain alphanumeric characters")]
    NotAlphanumeric,
}

/// Error for password rule failures.
///
/// Covers only the shape of the submitted plaintext; hashing failures are a
/// different concern and live in the credentials crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("must be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("must be at most {max} characters long, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("must only contain alphanumeric characters")]
    NotAlphanumeric,
}

/// Error for display name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("must be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("must be at most {max} characters long, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for email address validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("must be a valid email address: {0}")]
    InvalidFormat(String),

    #[error("must have at least {min} domain segments")]
    TooFewDomainSegments { min: usize },

    #[error("must end in an allowed top-level domain, got \"{0}\"")]
    DomainNotAllowed(String),
}

/// Error for postal address validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("city must not be empty")]
    EmptyCity,

    #[error("zip must be a 5-digit or ZIP+4 code")]
    InvalidZip,
}

/// Error for signin identifier validation failures.
///
/// The identifier may be a username or an email address, so only its length
/// is checked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("must be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("must be at most {max} characters long, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// First violated rule of a raw request.
///
/// Rendered as the single entry of the bad-input envelope's error list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("\"{0}\" is required")]
    MissingField(&'static str),

    #[error("\"username\" {0}")]
    Username(#[from] UsernameError),

    #[error("\"password\" {0}")]
    Password(#[from] PasswordRuleError),

    #[error("\"name\" {0}")]
    Name(#[from] DisplayNameError),

    #[error("\"email\" {0}")]
    Email(#[from] EmailError),

    #[error("\"address\" {0}")]
    Address(#[from] AddressError),

    #[error("\"usernameOrEmail\" {0}")]
    Identifier(#[from] IdentifierError),
}

/// Outcome of signup request validation.
///
/// The repeat-password cross-field rule has its own variant because the flow
/// answers it with a dedicated message, not the generic bad-input envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignupRequestError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("passwords does not match")]
    PasswordsDoNotMatch,
}

/// Failures surfaced by an account store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Stored account record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// True for the unique-constraint violations raised when an insert loses
    /// the race against a concurrent signup.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::UsernameTaken(_) | StoreError::EmailTaken(_)
        )
    }
}
