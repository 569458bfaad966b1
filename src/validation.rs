// Declarative request validation
// A fixed field-name -> rule-set schema evaluated by a small rule engine;
// violations come back as a field -> message map, one entry per failing
// field (first failing rule wins).

use regex::Regex;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::auth::models::SignupRequest;
use crate::error::ApiError;
use crate::users::models::Role;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

/// A single field-level rule
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    Email,
    Numeric,
    OneOf(&'static [&'static str]),
}

struct FieldSchema {
    name: &'static str,
    rules: &'static [Rule],
}

const SIGNUP_SCHEMA: &[FieldSchema] = &[
    FieldSchema {
        name: "firstname",
        rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(100)],
    },
    FieldSchema {
        name: "lastname",
        rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(100)],
    },
    FieldSchema {
        name: "password",
        rules: &[Rule::Required, Rule::MinLen(6)],
    },
    FieldSchema {
        name: "email",
        rules: &[Rule::Required, Rule::Email],
    },
    FieldSchema {
        name: "phone",
        rules: &[Rule::Required, Rule::Numeric, Rule::MinLen(10)],
    },
    FieldSchema {
        name: "usertype",
        rules: &[Rule::Required, Rule::OneOf(&["ADMIN", "USER"])],
    },
];

/// A signup payload that passed every rule, with the role parsed
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// Rule evaluator for inbound payloads
///
/// Constructed once at startup and injected where needed; compiles the
/// email pattern a single time.
#[derive(Clone)]
pub struct RequestValidator {
    email_format: Regex,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self {
            email_format: Regex::new(EMAIL_PATTERN).expect("email pattern is valid"),
        }
    }

    /// Check a signup payload against the schema
    ///
    /// Returns the typed payload on success, or `ValidationFailed` carrying
    /// a message for every field that broke a rule.
    pub fn validate_signup(&self, request: &SignupRequest) -> Result<ValidSignup, ApiError> {
        let mut violations = BTreeMap::new();

        for field in SIGNUP_SCHEMA {
            let value = field_value(request, field.name);
            if let Some(message) = self.first_violation(field.name, value, field.rules) {
                violations.insert(field.name.to_string(), message);
            }
        }

        if !violations.is_empty() {
            return Err(ApiError::ValidationFailed(violations));
        }

        let usertype = request.usertype.as_deref().unwrap_or_default();
        let role = Role::from_str(usertype).map_err(ApiError::Internal)?;

        Ok(ValidSignup {
            first_name: request.firstname.clone().unwrap_or_default(),
            last_name: request.lastname.clone().unwrap_or_default(),
            email: request.email.clone().unwrap_or_default(),
            phone: request.phone.clone().unwrap_or_default(),
            password: request.password.clone().unwrap_or_default(),
            role,
        })
    }

    fn first_violation(
        &self,
        name: &str,
        value: Option<&str>,
        rules: &[Rule],
    ) -> Option<String> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            // Absent or empty: only Required can fire
            _ => {
                return rules
                    .iter()
                    .any(|r| matches!(r, Rule::Required))
                    .then(|| format!("{} is required", name));
            }
        };

        for rule in rules {
            let message = match rule {
                Rule::Required => None,
                Rule::MinLen(min) => (value.chars().count() < *min)
                    .then(|| format!("{} must be longer than {}", name, min)),
                Rule::MaxLen(max) => (value.chars().count() > *max)
                    .then(|| format!("{} cannot be longer than {}", name, max)),
                Rule::Email => (!self.email_format.is_match(value))
                    .then(|| "Invalid email format".to_string()),
                Rule::Numeric => (!value.chars().all(|c| c.is_ascii_digit()))
                    .then(|| format!("{} is not valid", name)),
                Rule::OneOf(options) => (!options.contains(&value))
                    .then(|| format!("{} is not valid", name)),
            };
            if message.is_some() {
                return message;
            }
        }
        None
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn field_value<'a>(request: &'a SignupRequest, name: &str) -> Option<&'a str> {
    match name {
        "firstname" => request.firstname.as_deref(),
        "lastname" => request.lastname.as_deref(),
        "password" => request.password.as_deref(),
        "email" => request.email.as_deref(),
        "phone" => request.phone.as_deref(),
        "usertype" => request.usertype.as_deref(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_request() -> SignupRequest {
        SignupRequest {
            firstname: Some("Ann".to_string()),
            lastname: Some("Lee".to_string()),
            email: Some("ann@x.com".to_string()),
            phone: Some("1234567890".to_string()),
            password: Some("secret1".to_string()),
            usertype: Some("USER".to_string()),
        }
    }

    fn violations(request: &SignupRequest) -> BTreeMap<String, String> {
        match RequestValidator::new().validate_signup(request) {
            Err(ApiError::ValidationFailed(map)) => map,
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn valid_payload_passes_and_parses_the_role() {
        let valid = RequestValidator::new()
            .validate_signup(&valid_request())
            .unwrap();

        assert_eq!(valid.first_name, "Ann");
        assert_eq!(valid.role, Role::User);
    }

    #[test]
    fn missing_fields_report_required() {
        let empty = SignupRequest {
            firstname: None,
            lastname: None,
            email: None,
            phone: None,
            password: None,
            usertype: None,
        };
        let map = violations(&empty);

        assert_eq!(map.len(), 6);
        assert_eq!(map["firstname"], "firstname is required");
        assert_eq!(map["usertype"], "usertype is required");
    }

    #[test]
    fn length_rules_fire_with_their_bound_in_the_message() {
        let mut request = valid_request();
        request.firstname = Some("A".to_string());
        request.lastname = Some("x".repeat(101));
        request.password = Some("short".to_string());
        let map = violations(&request);

        assert_eq!(map["firstname"], "firstname must be longer than 2");
        assert_eq!(map["lastname"], "lastname cannot be longer than 100");
        assert_eq!(map["password"], "password must be longer than 6");
    }

    #[test]
    fn email_format_is_checked() {
        let mut request = valid_request();
        request.email = Some("not-an-email".to_string());

        assert_eq!(violations(&request)["email"], "Invalid email format");
    }

    #[test]
    fn phone_must_be_numeric_and_long_enough() {
        let mut request = valid_request();
        request.phone = Some("12345abcde".to_string());
        assert_eq!(violations(&request)["phone"], "phone is not valid");

        let mut request = valid_request();
        request.phone = Some("12345".to_string());
        assert_eq!(violations(&request)["phone"], "phone must be longer than 10");
    }

    #[test]
    fn usertype_is_restricted_to_the_closed_set() {
        let mut request = valid_request();
        request.usertype = Some("SUPERADMIN".to_string());
        assert_eq!(violations(&request)["usertype"], "usertype is not valid");

        // lowercase is not accepted
        let mut request = valid_request();
        request.usertype = Some("admin".to_string());
        assert_eq!(violations(&request)["usertype"], "usertype is not valid");
    }

    #[test]
    fn one_message_per_failing_field() {
        // phone breaks both Numeric and MinLen; only the first rule reports
        let mut request = valid_request();
        request.phone = Some("abc".to_string());
        let map = violations(&request);

        assert_eq!(map.len(), 1);
        assert_eq!(map["phone"], "phone is not valid");
    }

    proptest! {
        #[test]
        fn prop_well_formed_payloads_always_pass(
            first in "[A-Za-z]{2,40}",
            last in "[A-Za-z]{2,40}",
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)",
            phone in "[0-9]{10,15}",
            password in "[a-zA-Z0-9]{6,30}",
        ) {
            let request = SignupRequest {
                firstname: Some(first),
                lastname: Some(last),
                email: Some(email),
                phone: Some(phone),
                password: Some(password),
                usertype: Some("ADMIN".to_string()),
            };
            prop_assert!(RequestValidator::new().validate_signup(&request).is_ok());
        }

        #[test]
        fn prop_non_numeric_phones_always_fail(phone in "[0-9]{3,6}[a-z]{1,4}[0-9]{3,6}") {
            let mut request = valid_request();
            request.phone = Some(phone);
            prop_assert!(RequestValidator::new().validate_signup(&request).is_err());
        }
    }
}
