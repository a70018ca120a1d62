use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

/// Login details for a customer's I-Tax portal account and email account.
///
/// Missing keys deserialize to empty strings so that they are reported by
/// the validator rather than rejected by the JSON extractor.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialRecord {
    /// Customer's first name, used for the greeting and the file name.
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "A123456789B")]
    pub kra_pin: String,
    pub kra_password: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub email_password: String,
}

impl CredentialRecord {
    pub fn value(&self, field: CredentialField) -> &str {
        match field {
            CredentialField::FirstName => &self.first_name,
            CredentialField::KraPin => &self.kra_pin,
            CredentialField::KraPassword => &self.kra_password,
            CredentialField::Email => &self.email,
            CredentialField::EmailPassword => &self.email_password,
        }
    }
}

// Secrets are never printed, only their length.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("first_name", &self.first_name)
            .field("kra_pin", &self.kra_pin)
            .field(
                "kra_password",
                &format_args!("*** {} bytes ***", self.kra_password.len()),
            )
            .field("email", &self.email)
            .field(
                "email_password",
                &format_args!("*** {} bytes ***", self.email_password.len()),
            )
            .finish()
    }
}

/// The five form fields, in the order the form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialField {
    FirstName,
    KraPin,
    KraPassword,
    Email,
    EmailPassword,
}

impl CredentialField {
    pub const ALL: [CredentialField; 5] = [
        CredentialField::FirstName,
        CredentialField::KraPin,
        CredentialField::KraPassword,
        CredentialField::Email,
        CredentialField::EmailPassword,
    ];

    /// JSON key of the field, as sent by the form.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::KraPin => "kraPin",
            Self::KraPassword => "kraPassword",
            Self::Email => "email",
            Self::EmailPassword => "emailPassword",
        }
    }

    /// Human readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::KraPin => "KRA PIN",
            Self::KraPassword => "KRA Password",
            Self::Email => "Email",
            Self::EmailPassword => "Email Password",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Result of `POST /api/credentials/validate`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ValidationReport {
    pub valid: bool,
    /// Field key to error message, only for failing fields.
    pub errors: BTreeMap<String, String>,
}

/// Body of a `422` response from the document endpoint.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
    pub timestamp: String,
}

impl ValidationErrorResponse {
    pub fn new(message: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            error: "ValidationFailed".to_string(),
            message: message.into(),
            fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryFormat {
    /// Raw PDF bytes as an attachment.
    #[default]
    Pdf,
    /// JSON envelope with file metadata and base64 data.
    Json,
}

#[derive(Deserialize, Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentQuery {
    /// `pdf` (default) or `json`.
    #[serde(default)]
    pub format: Option<DeliveryFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let record: CredentialRecord = serde_json::from_str(r#"{"firstName": "Jane"}"#).unwrap();
        assert_eq!(record.first_name, "Jane");
        assert!(record.kra_pin.is_empty());
        assert!(record.email_password.is_empty());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = r#"{
            "firstName": "Jane",
            "kraPin": "A123",
            "kraPassword": "pw1",
            "email": "jane@x.com",
            "emailPassword": "pw2"
        }"#;
        let record: CredentialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.value(CredentialField::KraPin), "A123");
        assert_eq!(record.value(CredentialField::EmailPassword), "pw2");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let record = CredentialRecord {
            first_name: "Jane".into(),
            kra_pin: "A123".into(),
            kra_password: "hunter2".into(),
            email: "jane@x.com".into(),
            email_password: "s3cret".into(),
        };
        let debug = format!("{:?}", record);
        assert!(debug.contains("Jane"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("*** 7 bytes ***"));
    }

    #[test]
    fn test_field_keys_match_wire_names() {
        let json = serde_json::to_value(CredentialRecord::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), CredentialField::ALL.len());
        for field in CredentialField::ALL {
            assert!(object.contains_key(field.key()), "missing {}", field.key());
        }
    }
}
