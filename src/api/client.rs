//! HTTP client for the portal identity API. One `ApiClient` per process:
//! it owns the cookie jar holding the session credential, so every call
//! made through it is session-aware the same way a browser tab is.

use crate::api::error::ApiError;
use crate::api::types::{
    Availability, Identity, LoginRequest, OtpPurpose, OtpRequest, RegisterRequest,
    RegistrationSubmission, ResetPasswordRequest, ValidateRequest, DOCUMENT_TYPE_RUT,
};
use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Maximum number of error body characters kept for messages and logs.
const MAX_ERROR_CHARS: usize = 200;

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given API base URL, e.g.
    /// `http://localhost:3023/v1`. The cookie store is enabled so the
    /// session credential set by the server rides along automatically.
    pub fn new(base_url: &str) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("invalid API URL: {base_url}"))?;

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Combined availability pre-check: 200 means the email or document is
    /// already registered, 404 means it is free to take.
    #[instrument(skip(self))]
    pub async fn validate_registration(
        &self,
        email: &str,
        document_value: &str,
    ) -> Result<Availability, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/validate"))
            .json(&ValidateRequest {
                email,
                document_type: DOCUMENT_TYPE_RUT,
                document_value,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => Ok(Availability::Registered),
            StatusCode::NOT_FOUND => Ok(Availability::Available),
            _ => Err(error_from_response(response).await),
        }
    }

    /// Ask the server to email a one-time code for the given purpose.
    #[instrument(skip(self))]
    pub async fn request_code(&self, email: &str, purpose: OtpPurpose) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/otp/request"))
            .json(&OtpRequest { email, purpose })
            .send()
            .await
            .map_err(map_transport_error)?;

        expect_success(response).await
    }

    /// Create the account from the accumulated draft. Success returns the
    /// freshly created identity and sets the session credential.
    #[instrument(skip(self, submission))]
    pub async fn register(
        &self,
        submission: &RegistrationSubmission,
    ) -> Result<Identity, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/register"))
            .json(&RegisterRequest {
                email: &submission.email,
                document_type: DOCUMENT_TYPE_RUT,
                document_value: &submission.document_value,
                first_name: &submission.first_name,
                last_name: &submission.last_name,
                password: submission.password.expose_secret(),
                otp: &submission.otp,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        json_body(response).await
    }

    /// Exchange credentials for a session; the credential itself arrives as
    /// a cookie set by the server.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Identity, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        json_body(response).await
    }

    /// Invalidate the session credential server-side.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/logout"))
            .send()
            .await
            .map_err(map_transport_error)?;

        expect_success(response).await
    }

    /// Replace the password for an account that proved email control.
    #[instrument(skip(self, new_password, otp))]
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &SecretString,
        otp: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/auth/reset-password"))
            .json(&ResetPasswordRequest {
                email,
                new_password: new_password.expose_secret(),
                otp,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        expect_success(response).await
    }

    /// Ask the API who the session credential belongs to. `None` means no
    /// session (missing, expired or rejected credential).
    #[instrument(skip(self))]
    pub async fn fetch_session(&self) -> Result<Option<Identity>, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/users/me"))
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED => {
                debug!("no resident session");
                Ok(None)
            }
            status if status.is_success() => json_body(response).await.map(Some),
            _ => Err(error_from_response(response).await),
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(format!("Unable to reach the server: {err}"))
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    // The API optionally wraps errors as {"message": "..."}.
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);

    ApiError::Http {
        status,
        message: sanitize_body(message),
    }
}

/// Trim and truncate an error body before it reaches messages or logs.
fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
