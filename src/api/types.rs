//! Wire types for the portal identity API. Field names follow the JSON
//! contract (camelCase), so every request struct carries a rename.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// The only identity document type the portal accepts today.
pub const DOCUMENT_TYPE_RUT: &str = "RUT";

/// Profile data nested inside an identity.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
}

/// The authenticated user as returned by the API.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub profile: Profile,
}

/// Result of the registration availability pre-check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    /// Email or document already has an account (HTTP 200).
    Registered,
    /// No account found; registration may proceed (HTTP 404).
    Available,
}

/// Purpose attached to a one-time-code request.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    Registration,
    PasswordReset,
}

/// Everything the terminal registration step submits. The password stays
/// wrapped until the request body is built.
#[derive(Clone, Debug)]
pub struct RegistrationSubmission {
    pub email: String,
    pub document_value: String,
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
    pub otp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValidateRequest<'a> {
    pub email: &'a str,
    pub document_type: &'a str,
    pub document_value: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct OtpRequest<'a> {
    pub email: &'a str,
    pub purpose: OtpPurpose,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub document_type: &'a str,
    pub document_value: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub new_password: &'a str,
    pub otp: &'a str,
}
