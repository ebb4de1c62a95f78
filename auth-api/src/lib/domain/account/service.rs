use std::sync::Arc;

use chrono::Utc;
use credentials::Claims;
use credentials::PasswordHasher;
use credentials::TokenSigner;

use crate::account::envelope::Envelope;
use crate::account::errors::SignupRequestError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::SigninData;
use crate::account::models::SigninRequest;
use crate::account::models::SignupRequest;
use crate::account::ports::AccountStore;

/// The two public authentication flows.
///
/// Every collaborator is injected and the service keeps no state between
/// calls. Both flows return exactly one envelope and never let an error
/// escape: infrastructure failures are logged here with full detail and
/// replaced by the opaque internal-error envelope.
pub struct AccountService<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    hasher: PasswordHasher,
    signer: TokenSigner,
}

impl<S> AccountService<S>
where
    S: AccountStore,
{
    /// Create a new account service with injected collaborators.
    ///
    /// # Arguments
    /// * `store` - Account persistence implementation
    /// * `hasher` - Password hashing implementation
    /// * `signer` - Access token signer, keyed with the process secret
    pub fn new(store: Arc<S>, hasher: PasswordHasher, signer: TokenSigner) -> Self {
        Self {
            store,
            hasher,
            signer,
        }
    }

    /// Register a new account.
    pub async fn sign_up(&self, request: SignupRequest) -> Envelope<AccountProfile> {
        let command = match request.to_command() {
            Ok(command) => command,
            Err(SignupRequestError::PasswordsDoNotMatch) => {
                return Envelope::passwords_do_not_match()
            }
            Err(SignupRequestError::Invalid(error)) => {
                return Envelope::bad_input(error.to_string())
            }
        };

        // The cross-field rule inside to_command already compared the
        // passwords; the rule also holds on the raw fields.
        if request.password != request.repeat_password {
            return Envelope::passwords_do_not_match();
        }

        let (by_email, by_username) = match self
            .store
            .find_for_signup(&command.email, &command.username)
            .await
        {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::error!(error = %e, "Signup duplicate check failed");
                return Envelope::internal_error();
            }
        };

        if by_email.is_some() || by_username.is_some() {
            return Envelope::user_already_exists();
        }

        let password_hash = match self.hasher.hash(command.password.as_str()) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                return Envelope::internal_error();
            }
        };

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            name: command.name,
            address: command.address,
            password_hash,
            created_at: Utc::now(),
        };

        match self.store.insert(account).await {
            Ok(created) => Envelope::created("Signup Successful", AccountProfile::from(&created)),
            // A duplicate that slipped in after the pre-check surfaces as a
            // constraint violation and answers exactly like a pre-check hit.
            Err(e) if e.is_conflict() => Envelope::user_already_exists(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to insert account");
                Envelope::internal_error()
            }
        }
    }

    /// Authenticate an account and mint an access token.
    pub async fn sign_in(&self, request: SigninRequest) -> Envelope<SigninData> {
        let command = match request.to_command() {
            Ok(command) => command,
            Err(error) => return Envelope::bad_input(error.to_string()),
        };

        let account = match self
            .store
            .find_by_username_or_email(command.identifier.as_str())
            .await
        {
            Ok(Some(account)) => account,
            Ok(None) => return Envelope::unknown_user_or_password(),
            Err(e) => {
                tracing::error!(error = %e, "Signin lookup failed");
                return Envelope::internal_error();
            }
        };

        match self
            .hasher
            .verify(command.password.as_str(), &account.password_hash)
        {
            Ok(true) => {}
            Ok(false) => return Envelope::unknown_user_or_password(),
            Err(e) => {
                tracing::error!(error = %e, "Password verification failed");
                return Envelope::internal_error();
            }
        }

        let claims = Claims::for_user(account.username.as_str());
        let token = match self.signer.issue(&claims) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Token signing failed");
                return Envelope::internal_error();
            }
        };

        Envelope::ok(
            "Login Successful",
            SigninData {
                token,
                username: account.username.as_str().to_string(),
                email: account.email.as_str().to_string(),
            },
        )
    }
}
