//! Declarative field validation for the auth forms. Each schema is a pure,
//! synchronous predicate set over one form's fields and reports failures as
//! a field-name to message mapping; remote uniqueness checks live in the
//! flow controllers, never here. Field names and messages match the product
//! copy, so they map one-to-one onto the API payloads.

use crate::vecino::rut;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;

/// Minimum password length enforced client-side.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Exact length of a one-time code.
pub const OTP_LENGTH: usize = 6;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Validation outcome: field name mapped to a user-facing message. Ordered
/// so errors print deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    /// Union with another mapping; existing entries win.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Normalize an email the way the API expects it for lookups.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn valid_email(email_normalized: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|regex| regex.is_match(email_normalized))
}

pub fn check_email(email: &str, errors: &mut FieldErrors) {
    if !valid_email(&normalize_email(email)) {
        errors.insert("email", "Por favor, ingresa un correo válido.");
    }
}

pub fn check_document(value: &str, errors: &mut FieldErrors) {
    if !rut::is_valid(value) {
        errors.insert("documentValue", "El RUT ingresado no es válido.");
    }
}

pub fn check_password_pair(
    password: &SecretString,
    confirm_password: &SecretString,
    errors: &mut FieldErrors,
) {
    if password.expose_secret().len() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password",
            "La contraseña debe tener al menos 8 caracteres.",
        );
    }

    // Mismatch is attached to the confirmation field, not the password.
    if password.expose_secret() != confirm_password.expose_secret() {
        errors.insert("confirmPassword", "Las contraseñas no coinciden.");
    }
}

pub fn check_otp(code: &str, errors: &mut FieldErrors) {
    if code.len() != OTP_LENGTH {
        errors.insert("otp", "El código OTP debe tener 6 dígitos.");
    } else if !code.bytes().all(|b| b.is_ascii_digit()) {
        errors.insert("otp", "El código solo debe contener números.");
    }
}

pub fn check_names(first_name: &str, last_name: &str, errors: &mut FieldErrors) {
    if first_name.trim().chars().count() < 2 {
        errors.insert("firstName", "El nombre es demasiado corto.");
    }

    if last_name.trim().chars().count() < 2 {
        errors.insert("lastName", "El apellido es demasiado corto.");
    }
}

/// Step-one schema: email plus identity document.
pub fn contact(email: &str, document_value: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(email, &mut errors);
    check_document(document_value, &mut errors);
    errors.into_result()
}

/// Step-two schema: names plus the password pair.
pub fn profile(
    first_name: &str,
    last_name: &str,
    password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_names(first_name, last_name, &mut errors);
    check_password_pair(password, confirm_password, &mut errors);
    errors.into_result()
}

/// Terminal-step schema: just the one-time code.
pub fn one_time_code(code: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_otp(code, &mut errors);
    errors.into_result()
}

/// New-password schema for the recovery flow, merged with the code check at
/// the terminal step.
pub fn password_reset(
    password: &SecretString,
    confirm_password: &SecretString,
    code: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_password_pair(password, confirm_password, &mut errors);
    check_otp(code, &mut errors);
    errors.into_result()
}

/// Login schema: valid email and a non-empty password.
pub fn login(email: &str, password: &SecretString) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(email, &mut errors);

    if password.expose_secret().is_empty() {
        errors.insert("password", "La contraseña no puede estar vacía.");
    }

    errors.into_result()
}

/// Full registration schema: union of contact, profile and code checks,
/// composed from the step schemas rather than restated.
pub fn registration(
    email: &str,
    document_value: &str,
    first_name: &str,
    last_name: &str,
    password: &SecretString,
    confirm_password: &SecretString,
    code: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if let Err(step) = contact(email, document_value) {
        errors.merge(step);
    }
    if let Err(step) = profile(first_name, last_name, password, confirm_password) {
        errors.merge(step);
    }
    if let Err(step) = one_time_code(code) {
        errors.merge(step);
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Vecina@Example.COM "), "vecina@example.com");
    }

    #[test]
    fn contact_accepts_valid_fields() {
        assert!(contact("vecina@example.com", "12345678-5").is_ok());
        assert!(contact(" Vecina@Example.COM ", "7593832-2").is_ok());
    }

    #[test]
    fn contact_rejects_bad_email_and_document() {
        let errors = contact("not-an-email", "12345678-9").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("email"),
            Some("Por favor, ingresa un correo válido.")
        );
        assert_eq!(
            errors.get("documentValue"),
            Some("El RUT ingresado no es válido.")
        );
    }

    #[test]
    fn password_pair_rejects_short_password() {
        let errors = profile("Ana", "Rojas", &secret("short"), &secret("short")).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("La contraseña debe tener al menos 8 caracteres.")
        );
        assert_eq!(errors.get("confirmPassword"), None);
    }

    #[test]
    fn password_pair_attaches_mismatch_to_confirmation() {
        let errors =
            profile("Ana", "Rojas", &secret("longenough1"), &secret("different")).unwrap_err();
        assert_eq!(errors.get("password"), None);
        assert_eq!(
            errors.get("confirmPassword"),
            Some("Las contraseñas no coinciden.")
        );
    }

    #[test]
    fn password_pair_accepts_matching_pair() {
        assert!(profile("Ana", "Rojas", &secret("longenough1"), &secret("longenough1")).is_ok());
    }

    #[test]
    fn otp_rejects_wrong_length_and_non_digits() {
        assert_eq!(
            one_time_code("12345").unwrap_err().get("otp"),
            Some("El código OTP debe tener 6 dígitos.")
        );
        assert_eq!(
            one_time_code("12a456").unwrap_err().get("otp"),
            Some("El código solo debe contener números.")
        );
        assert!(one_time_code("123456").is_ok());
    }

    #[test]
    fn names_must_have_two_characters() {
        let errors = profile("A", "R", &secret("longenough1"), &secret("longenough1")).unwrap_err();
        assert_eq!(errors.get("firstName"), Some("El nombre es demasiado corto."));
        assert_eq!(errors.get("lastName"), Some("El apellido es demasiado corto."));
    }

    #[test]
    fn login_requires_non_empty_password() {
        let errors = login("vecina@example.com", &secret("")).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("La contraseña no puede estar vacía.")
        );
        assert!(login("vecina@example.com", &secret("x")).is_ok());
    }

    #[test]
    fn registration_merges_step_schemas_without_duplicates() {
        let errors = registration(
            "bad",
            "1-1",
            "A",
            "R",
            &secret("short"),
            &secret("other"),
            "12x",
        )
        .unwrap_err();
        // One entry per failing field, regardless of how many schemas ran.
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn registration_accepts_a_complete_draft() {
        assert!(registration(
            "vecina@example.com",
            "12345678-5",
            "Ana",
            "Rojas",
            &secret("longenough1"),
            &secret("longenough1"),
            "123456",
        )
        .is_ok());
    }

    #[test]
    fn password_reset_merges_pair_and_code() {
        let errors = password_reset(&secret("short"), &secret("short"), "abc").unwrap_err();
        assert!(errors.get("password").is_some());
        assert!(errors.get("otp").is_some());
        assert!(password_reset(&secret("longenough1"), &secret("longenough1"), "123456").is_ok());
    }
}
