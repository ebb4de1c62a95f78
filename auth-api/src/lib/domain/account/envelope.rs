use serde::Serialize;

/// Uniform response envelope returned by every public flow.
///
/// `status_code` doubles as the HTTP status the transport layer should
/// answer with. `data` is present only on success and omitted from the
/// serialized body otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// 200 with a payload.
    pub fn ok(message: &str, data: T) -> Self {
        Self::succeeded(200, message, data)
    }

    /// 201 with a payload.
    pub fn created(message: &str, data: T) -> Self {
        Self::succeeded(201, message, data)
    }

    /// 400 for a request that failed validation.
    pub fn bad_input(error: String) -> Self {
        Self::failed(400, "Bad Input", vec![error])
    }

    /// 400 for a signup whose password and repeat password differ.
    pub fn passwords_do_not_match() -> Self {
        Self::failed(400, "Passwords does not match", Vec::new())
    }

    /// 409 for a signup colliding with an existing username or email.
    pub fn user_already_exists() -> Self {
        Self::failed(409, "User already exists", Vec::new())
    }

    /// 404 for a signin that failed.
    ///
    /// Used for both unknown identifiers and wrong passwords; the two bodies
    /// must stay indistinguishable so responses cannot be used to probe
    /// which accounts exist.
    pub fn unknown_user_or_password() -> Self {
        Self::failed(404, "User does not exist or password is incorrect.", Vec::new())
    }

    /// 500 with the cause withheld from the client.
    ///
    /// The cause is logged at the failure site before this envelope is
    /// built; the client only learns that something went wrong.
    pub fn internal_error() -> Self {
        Self::failed(500, "Some internal server error occurred", Vec::new())
    }

    fn succeeded(status_code: u16, message: &str, data: T) -> Self {
        Self {
            success: true,
            status_code,
            message: message.to_string(),
            errors: Vec::new(),
            data: Some(data),
        }
    }

    fn failed(status_code: u16, message: &str, errors: Vec<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.to_string(),
            errors,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::created("Signup Successful", "payload");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["statusCode"], 201);
        assert_eq!(json["message"], "Signup Successful");
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
        assert_eq!(json["data"], "payload");
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let envelope = Envelope::<()>::user_already_exists();
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 409);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_bad_input_carries_the_message() {
        let envelope = Envelope::<()>::bad_input("\"username\" is required".to_string());

        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.message, "Bad Input");
        assert_eq!(envelope.errors, vec!["\"username\" is required".to_string()]);
    }
}
