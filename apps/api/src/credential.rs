//! Credential gate. The Gemini key arrives with every request and lives only
//! as long as that request.

use std::fmt;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::intake::SubmittedForm;

/// Header checked before the `api_key` form field.
pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_FIELD: &str = "api_key";

/// Secret API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Credential(trimmed.to_string()))
        }
    }

    /// Header wins over the form field. Blank everywhere is a missing credential.
    pub fn resolve(headers: &HeaderMap, form: &SubmittedForm) -> Result<Self, AppError> {
        Credential::from_headers(headers)
            .or_else(|| Credential::from_form(form))
            .ok_or(AppError::MissingCredential)
    }

    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Credential::new)
    }

    fn from_form(form: &SubmittedForm) -> Option<Self> {
        form.text(API_KEY_FIELD).and_then(Credential::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn form_with_key(key: &str) -> SubmittedForm {
        let mut form = SubmittedForm::default();
        form.insert_text(API_KEY_FIELD, key);
        form
    }

    #[test]
    fn test_blank_credential_is_rejected() {
        assert!(Credential::new("   ").is_none());
        assert!(Credential::new("").is_none());
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let credential = Credential::new("AIza-secret").unwrap();
        let printed = format!("{credential:?}");
        assert!(!printed.contains("AIza-secret"));
    }

    #[test]
    fn test_header_takes_precedence_over_form() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        let credential = Credential::resolve(&headers, &form_with_key("from-form")).unwrap();
        assert_eq!(credential.expose(), "from-header");
    }

    #[test]
    fn test_form_field_used_without_header() {
        let credential = Credential::resolve(&HeaderMap::new(), &form_with_key(" key-1 ")).unwrap();
        assert_eq!(credential.expose(), "key-1");
    }

    #[test]
    fn test_missing_everywhere_is_missing_credential() {
        let err = Credential::resolve(&HeaderMap::new(), &SubmittedForm::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingCredential));
    }
}
