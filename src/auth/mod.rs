//! # Authentication
//!
//! Credentials for the SCIM2 service under test. The form may hold both basic
//! and bearer credentials while it is being edited; only the run check in
//! [`crate::runner::validate_for_run`] rejects that combination.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Supported authentication methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    Basic,
    Bearer,
}

impl AuthType {
    pub const ALL: [AuthType; 2] = [AuthType::Basic, AuthType::Bearer];

    /// Fields that must be non-empty for this method.
    pub fn required_fields(self) -> &'static [AuthField] {
        match self {
            AuthType::Basic => &[AuthField::UserName, AuthField::Password],
            AuthType::Bearer => &[AuthField::Token],
        }
    }
}

impl Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AuthType::Basic => "Basic Auth",
            AuthType::Bearer => "Bearer Token",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthField {
    Endpoint,
    UserName,
    Password,
    Token,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            AuthField::Endpoint => "endpoint",
            AuthField::UserName => "userName",
            AuthField::Password => "password",
            AuthField::Token => "token",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            AuthField::Endpoint => "Fill endpoint details",
            AuthField::UserName => "Fill userName",
            AuthField::Password => "Fill password",
            AuthField::Token => "Fill token details",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthForm {
    pub endpoint: String,
    pub user_name: String,
    pub password: String,
    pub token: String,
    pub auth_type: AuthType,
}

impl AuthForm {
    pub fn with_defaults(endpoint: impl Into<String>, auth_type: AuthType) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_type,
            ..Self::default()
        }
    }

    pub fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Endpoint => &self.endpoint,
            AuthField::UserName => &self.user_name,
            AuthField::Password => &self.password,
            AuthField::Token => &self.token,
        }
    }

    pub fn is_empty(&self, field: AuthField) -> bool {
        self.value(field).is_empty()
    }

    /// Required fields of the selected method that are still empty.
    pub fn missing_for_type(&self) -> Vec<AuthField> {
        self.auth_type
            .required_fields()
            .iter()
            .copied()
            .filter(|field| self.is_empty(*field))
            .collect()
    }
}

/// Checks only the endpoint and the selected method's own fields.
pub fn validate_auth(form: &AuthForm) -> Result<(), ValidationError> {
    if form.is_empty(AuthField::Endpoint) {
        return Err(ValidationError::MissingEndpoint);
    }

    let missing = form.missing_for_type();
    if !missing.is_empty() {
        return Err(ValidationError::IncompleteAuth { missing });
    }

    Ok(())
}

/// Per-field hints shown under the auth dialog inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    pub endpoint: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl FieldErrors {
    pub fn get(&self, field: AuthField) -> Option<&str> {
        match field {
            AuthField::Endpoint => self.endpoint.as_deref(),
            AuthField::UserName => self.user_name.as_deref(),
            AuthField::Password => self.password.as_deref(),
            AuthField::Token => self.token.as_deref(),
        }
    }

    fn set(&mut self, field: AuthField) {
        let slot = match field {
            AuthField::Endpoint => &mut self.endpoint,
            AuthField::UserName => &mut self.user_name,
            AuthField::Password => &mut self.password,
            AuthField::Token => &mut self.token,
        };
        *slot = Some(field.hint().to_string());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Runs [`validate_auth`] for the dialog's Submit button. Failures add hints
/// for the offending fields on top of whatever was already recorded; success
/// clears every hint.
pub fn submit(form: &AuthForm, errors: &mut FieldErrors) -> Result<(), ValidationError> {
    match validate_auth(form) {
        Ok(()) => {
            errors.clear();
            Ok(())
        }
        Err(err) => {
            match &err {
                ValidationError::MissingEndpoint => errors.set(AuthField::Endpoint),
                ValidationError::IncompleteAuth { missing } => {
                    for field in missing {
                        errors.set(*field);
                    }
                }
                _ => {}
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user_name: &str, password: &str) -> AuthForm {
        AuthForm {
            endpoint: "https://localhost:9443/scim2".into(),
            user_name: user_name.into(),
            password: password.into(),
            ..AuthForm::default()
        }
    }

    #[test]
    fn empty_endpoint_is_rejected_first() {
        let form = AuthForm::default();
        assert_eq!(validate_auth(&form), Err(ValidationError::MissingEndpoint));
    }

    #[test]
    fn whitespace_is_a_value() {
        let form = AuthForm {
            endpoint: "   ".into(),
            ..basic(" ", "admin")
        };
        assert_eq!(validate_auth(&form), Ok(()));
    }

    #[test]
    fn basic_reports_every_missing_field() {
        assert_eq!(
            validate_auth(&basic("", "")),
            Err(ValidationError::IncompleteAuth {
                missing: vec![AuthField::UserName, AuthField::Password]
            })
        );
        assert_eq!(
            validate_auth(&basic("admin", "")),
            Err(ValidationError::IncompleteAuth {
                missing: vec![AuthField::Password]
            })
        );
    }

    #[test]
    fn bearer_requires_token_only() {
        let mut form = basic("", "");
        form.auth_type = AuthType::Bearer;
        assert_eq!(
            validate_auth(&form),
            Err(ValidationError::IncompleteAuth {
                missing: vec![AuthField::Token]
            })
        );

        form.token = "abc".into();
        assert_eq!(validate_auth(&form), Ok(()));
    }

    #[test]
    fn conflicting_credentials_pass_the_light_check() {
        let mut form = basic("admin", "admin");
        form.token = "abc".into();
        assert_eq!(validate_auth(&form), Ok(()));
    }

    #[test]
    fn submit_records_hints_and_success_clears_them() {
        let mut errors = FieldErrors::default();

        assert!(submit(&basic("", "secret"), &mut errors).is_err());
        assert_eq!(errors.get(AuthField::UserName), Some("Fill userName"));
        assert_eq!(errors.get(AuthField::Password), None);

        assert!(submit(&AuthForm::default(), &mut errors).is_err());
        assert_eq!(errors.get(AuthField::Endpoint), Some("Fill endpoint details"));
        assert_eq!(errors.get(AuthField::UserName), Some("Fill userName"));

        assert_eq!(submit(&basic("admin", "secret"), &mut errors), Ok(()));
        assert!(errors.is_empty());
    }

    #[test]
    fn auth_type_round_trips_through_json() {
        let raw = serde_json::to_string(&AuthType::Bearer).unwrap();
        assert_eq!(raw, "\"bearer\"");
        assert_eq!(serde_json::from_str::<AuthType>(&raw).unwrap(), AuthType::Bearer);
    }
}
