use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::account::errors::AddressError;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;
use crate::account::errors::IdentifierError;
use crate::account::errors::PasswordRuleError;
use crate::account::errors::SignupRequestError;
use crate::account::errors::UsernameError;
use crate::account::errors::ValidationError;

/// Account aggregate entity.
///
/// Created by the signup flow, read by both flows, never updated or
/// deleted. The password hash is opaque and never serialized.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub address: Address,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type.
///
/// Storage identity only; never exposed in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures the username is 3-30 ASCII alphanumeric characters. Unique
/// across accounts, enforced at the store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - Outside the 3-30 character range
    /// * `NotAlphanumeric` - Contains characters outside a-z, A-Z, 0-9
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(UsernameError::NotAlphanumeric);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Password as submitted with a request.
///
/// Holds the raw 3-30 ASCII alphanumeric plaintext for the lifetime of one
/// request; only its hash ever reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    /// Create a password from raw input.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - Outside the 3-30 character range
    /// * `NotAlphanumeric` - Contains characters outside a-z, A-Z, 0-9
    pub fn new(password: String) -> Result<Self, PasswordRuleError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordRuleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(PasswordRuleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PasswordRuleError::NotAlphanumeric);
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display name value type, 3-30 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// RFC-valid address whose domain has at least two segments and ends in one
/// of the allowed top-level domains. Unique across accounts, enforced at
/// the store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const ALLOWED_TLDS: [&'static str; 3] = ["com", "net", "org"];
    const MIN_DOMAIN_SEGMENTS: usize = 2;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not an RFC 5322 address
    /// * `TooFewDomainSegments` - Domain has no dot (e.g. `alice@com`)
    /// * `DomainNotAllowed` - Top-level domain outside {com, net, org}
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        // The local part may contain a quoted '@'; the domain starts after
        // the last one.
        let domain = match email.rsplit_once('@') {
            Some((_, domain)) => domain,
            None => return Err(EmailError::InvalidFormat("missing '@'".to_string())),
        };

        let segments: Vec<&str> = domain.split('.').collect();
        if segments.len() < Self::MIN_DOMAIN_SEGMENTS {
            return Err(EmailError::TooFewDomainSegments {
                min: Self::MIN_DOMAIN_SEGMENTS,
            });
        }

        let tld = segments[segments.len() - 1].to_ascii_lowercase();
        if !Self::ALLOWED_TLDS.contains(&tld.as_str()) {
            return Err(EmailError::DomainNotAllowed(tld));
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Postal address value type.
///
/// City must be non-empty; zip must be a 5-digit or ZIP+4 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    city: String,
    zip: String,
}

impl Address {
    pub fn new(city: String, zip: String) -> Result<Self, AddressError> {
        if city.is_empty() {
            return Err(AddressError::EmptyCity);
        }
        if !Self::is_valid_zip(&zip) {
            return Err(AddressError::InvalidZip);
        }
        Ok(Self { city, zip })
    }

    fn is_valid_zip(zip: &str) -> bool {
        let bytes = zip.as_bytes();
        match bytes.len() {
            5 => bytes.iter().all(u8::is_ascii_digit),
            10 => {
                bytes[5] == b'-'
                    && bytes[..5].iter().all(u8::is_ascii_digit)
                    && bytes[6..].iter().all(u8::is_ascii_digit)
            }
            _ => false,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }
}

/// Identifier supplied at signin, either a username or an email address.
///
/// Only length-checked, both shapes are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginIdentifier(String);

impl LoginIdentifier {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    pub fn new(identifier: String) -> Result<Self, IdentifierError> {
        let length = identifier.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(IdentifierError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(IdentifierError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw signup payload as submitted by the client.
///
/// Every field is optional at the wire level so that presence is a
/// validation concern and a missing field reports through the same path as
/// a malformed one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub repeat_password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<AddressInput>,
}

/// Raw address payload nested in a signup request.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

impl SignupRequest {
    /// Check every field rule in wire order and build the validated command.
    ///
    /// The first violated rule wins. The repeat-password cross-field rule is
    /// reported as its own variant so the flow can answer with the dedicated
    /// message instead of the generic bad-input envelope.
    pub fn to_command(&self) -> Result<SignupCommand, SignupRequestError> {
        let username = Username::new(required("username", &self.username)?.to_owned())
            .map_err(ValidationError::from)?;
        let password = Password::new(required("password", &self.password)?.to_owned())
            .map_err(ValidationError::from)?;

        if self.repeat_password.as_deref() != Some(password.as_str()) {
            return Err(SignupRequestError::PasswordsDoNotMatch);
        }

        let name = DisplayName::new(required("name", &self.name)?.to_owned())
            .map_err(ValidationError::from)?;
        let email = EmailAddress::new(required("email", &self.email)?.to_owned())
            .map_err(ValidationError::from)?;

        let address = match &self.address {
            Some(input) => Address::new(
                required("address.city", &input.city)?.to_owned(),
                required("address.zip", &input.zip)?.to_owned(),
            )
            .map_err(ValidationError::from)?,
            None => return Err(ValidationError::MissingField("address").into()),
        };

        Ok(SignupCommand {
            username,
            password,
            name,
            email,
            address,
        })
    }
}

/// Raw signin payload as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    #[serde(default)]
    pub username_or_email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl SigninRequest {
    /// Check both field rules in wire order and build the validated command.
    pub fn to_command(&self) -> Result<SigninCommand, ValidationError> {
        let identifier =
            LoginIdentifier::new(required("usernameOrEmail", &self.username_or_email)?.to_owned())?;
        let password = Password::new(required("password", &self.password)?.to_owned())?;

        Ok(SigninCommand {
            identifier,
            password,
        })
    }
}

fn required<'a>(
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, ValidationError> {
    value.as_deref().ok_or(ValidationError::MissingField(field))
}

/// Validated signup input with domain types.
#[derive(Debug)]
pub struct SignupCommand {
    pub username: Username,
    pub password: Password,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub address: Address,
}

/// Validated signin input with domain types.
#[derive(Debug)]
pub struct SigninCommand {
    pub identifier: LoginIdentifier,
    pub password: Password,
}

/// Fields of an account that are safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountProfile {
    pub username: String,
    pub name: String,
    pub email: String,
    pub address: AddressData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressData {
    pub city: String,
    pub zip: String,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.as_str().to_string(),
            name: account.name.as_str().to_string(),
            email: account.email.as_str().to_string(),
            address: AddressData {
                city: account.address.city().to_string(),
                zip: account.address.zip().to_string(),
            },
        }
    }
}

/// Payload of a successful signin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigninData {
    pub token: String,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request() -> SignupRequest {
        SignupRequest {
            username: Some("alice1".to_string()),
            password: Some("Pass123".to_string()),
            repeat_password: Some("Pass123".to_string()),
            name: Some("Alice A".to_string()),
            email: Some("alice@example.com".to_string()),
            address: Some(AddressInput {
                city: Some("X".to_string()),
                zip: Some("12345".to_string()),
            }),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(Username::new("alice1".to_string()).is_ok());
        assert!(matches!(
            Username::new("al".to_string()),
            Err(UsernameError::TooShort { .. })
        ));
        assert!(matches!(
            Username::new("a".repeat(31)),
            Err(UsernameError::TooLong { .. })
        ));
        assert!(matches!(
            Username::new("alice_1".to_string()),
            Err(UsernameError::NotAlphanumeric)
        ));
    }

    #[test]
    fn test_password_rules() {
        assert!(Password::new("Pass123".to_string()).is_ok());
        assert!(matches!(
            Password::new("pw".to_string()),
            Err(PasswordRuleError::TooShort { .. })
        ));
        assert!(matches!(
            Password::new("Pass 123".to_string()),
            Err(PasswordRuleError::NotAlphanumeric)
        ));
    }

    #[test]
    fn test_display_name_rules() {
        assert!(DisplayName::new("Alice A".to_string()).is_ok());
        assert!(matches!(
            DisplayName::new("Al".to_string()),
            Err(DisplayNameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_email_allowed_domains() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("alice@mail.example.net".to_string()).is_ok());
        assert!(EmailAddress::new("alice@example.ORG".to_string()).is_ok());

        assert!(matches!(
            EmailAddress::new("alice@example.io".to_string()),
            Err(EmailError::DomainNotAllowed(tld)) if tld == "io"
        ));
        assert!(matches!(
            EmailAddress::new("alice@com".to_string()),
            Err(EmailError::TooFewDomainSegments { .. })
        ));
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_address_rules() {
        assert!(Address::new("X".to_string(), "12345".to_string()).is_ok());
        assert!(Address::new("X".to_string(), "12345-6789".to_string()).is_ok());

        assert!(matches!(
            Address::new("".to_string(), "12345".to_string()),
            Err(AddressError::EmptyCity)
        ));
        assert!(matches!(
            Address::new("X".to_string(), "1234".to_string()),
            Err(AddressError::InvalidZip)
        ));
        assert!(matches!(
            Address::new("X".to_string(), "12345-67".to_string()),
            Err(AddressError::InvalidZip)
        ));
        assert!(matches!(
            Address::new("X".to_string(), "12a45".to_string()),
            Err(AddressError::InvalidZip)
        ));
    }

    #[test]
    fn test_signup_command_round_trip() {
        let command = signup_request().to_command().unwrap();

        assert_eq!(command.username.as_str(), "alice1");
        assert_eq!(command.name.as_str(), "Alice A");
        assert_eq!(command.email.as_str(), "alice@example.com");
        assert_eq!(command.address.city(), "X");
        assert_eq!(command.address.zip(), "12345");
    }

    #[test]
    fn test_signup_first_error_wins() {
        let mut request = signup_request();
        request.username = Some("a".to_string());
        request.email = Some("broken".to_string());

        // Username is checked before email, so its failure is the one
        // reported.
        let error = request.to_command().unwrap_err();
        assert!(matches!(
            error,
            SignupRequestError::Invalid(ValidationError::Username(_))
        ));
    }

    #[test]
    fn test_signup_missing_field_message() {
        let mut request = signup_request();
        request.name = None;

        let error = request.to_command().unwrap_err();
        assert_eq!(error.to_string(), "\"name\" is required");
    }

    #[test]
    fn test_signup_repeat_password_mismatch() {
        let mut request = signup_request();
        request.repeat_password = Some("Other123".to_string());
        assert!(matches!(
            request.to_command(),
            Err(SignupRequestError::PasswordsDoNotMatch)
        ));

        request.repeat_password = None;
        assert!(matches!(
            request.to_command(),
            Err(SignupRequestError::PasswordsDoNotMatch)
        ));
    }

    #[test]
    fn test_signin_command() {
        let request = SigninRequest {
            username_or_email: Some("alice@example.com".to_string()),
            password: Some("Pass123".to_string()),
        };

        let command = request.to_command().unwrap();
        assert_eq!(command.identifier.as_str(), "alice@example.com");
        assert_eq!(command.password.as_str(), "Pass123");
    }

    #[test]
    fn test_signin_identifier_bounds() {
        let request = SigninRequest {
            username_or_email: Some("ab".to_string()),
            password: Some("Pass123".to_string()),
        };
        assert!(matches!(
            request.to_command(),
            Err(ValidationError::Identifier(IdentifierError::TooShort { .. }))
        ));

        let request = SigninRequest {
            username_or_email: None,
            password: Some("Pass123".to_string()),
        };
        assert_eq!(
            request.to_command().unwrap_err().to_string(),
            "\"usernameOrEmail\" is required"
        );
    }
}
