use serde::{Deserialize, Serialize};

/// How client credentials are sent to the token endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// `client_id` and `client_secret` as form fields in the request body.
    #[default]
    Form,
    /// `Authorization: Basic base64(client_id:client_secret)`
    Basic,
}

/// Token endpoint response, limited to what client credentials needs.
///
/// `Deserialize` only, so tokens cannot be serialized back into logs.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Must be "Bearer" (case-insensitive) when present.
    #[serde(default)]
    pub token_type: Option<String>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_auth_method_is_form() {
        assert_eq!(ClientAuthMethod::default(), ClientAuthMethod::Form);
        let m: ClientAuthMethod = serde_json::from_str(r#""basic""#).unwrap();
        assert_eq!(m, ClientAuthMethod::Basic);
    }

    #[test]
    fn deserialize_full_response() {
        let json = r#"{"access_token":"tok","expires_in":300,"token_type":"Bearer","scope":"inventory"}"#;
        let r: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.access_token, "tok");
        assert_eq!(r.expires_in, Some(300));
        assert_eq!(r.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn deserialize_minimal_response() {
        let r: TokenResponse = serde_json::from_str(r#"{"access_token":"tok"}"#).unwrap();
        assert!(r.expires_in.is_none());
        assert!(r.token_type.is_none());
    }

    #[test]
    fn missing_access_token_fails() {
        assert!(serde_json::from_str::<TokenResponse>(r#"{"token_type":"Bearer"}"#).is_err());
    }
}
