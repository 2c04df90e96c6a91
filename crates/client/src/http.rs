//! [`Backend`] over the CareerKey REST API using [`reqwest`].

use async_trait::async_trait;
use careerkey_core::profile::ResolvedProfile;
use careerkey_core::student::AnonymousStudentId;
use careerkey_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::backend::{Backend, Company, Session, SignUpForm, Slot, SlotView};
use crate::error::ClientError;

/// HTTP client for one CareerKey service.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

/// `{ "data": T }` envelope used by resource endpoints.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// `{ "error": message, "code": CODE }` body of every error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct BookingCreated {
    appointment_id: DbId,
}

impl HttpBackend {
    /// * `base_url` - Service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        let envelope: DataEnvelope<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an [`ClientError::Api`]
    /// built from the error body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Build an [`ClientError::Api`] from a non-2xx response.
///
/// Bodies that are not the service's JSON error shape fall back to the raw
/// text, or the status reason when the body is empty.
fn api_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.error,
        },
        Err(_) => {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            };
            ClientError::Api {
                status: status.as_u16(),
                code: "HTTP_ERROR".to_string(),
                message,
            }
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn sign_up(&self, form: &SignUpForm) -> Result<Session, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/signup"))
            .json(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn resolve_profile(&self, access_token: &str) -> Result<ResolvedProfile, ClientError> {
        let response = self
            .client
            .get(self.url("/me/profile"))
            .bearer_auth(access_token)
            .send()
            .await?;
        let envelope: DataEnvelope<ResolvedProfile> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        self.get_data("/companies").await
    }

    async fn get_company(&self, id: DbId) -> Result<Company, ClientError> {
        self.get_data(&format!("/companies/{id}")).await
    }

    async fn list_slots(&self, company_id: DbId) -> Result<Vec<SlotView>, ClientError> {
        self.get_data(&format!("/companies/{company_id}/slots")).await
    }

    async fn get_slot(&self, id: DbId) -> Result<Slot, ClientError> {
        self.get_data(&format!("/slots/{id}")).await
    }

    async fn book_slot(
        &self,
        slot_id: DbId,
        student_id: &AnonymousStudentId,
    ) -> Result<DbId, ClientError> {
        let body = serde_json::json!({ "student_id": student_id });
        let response = self
            .client
            .post(self.url(&format!("/slots/{slot_id}/book")))
            .json(&body)
            .send()
            .await?;
        let envelope: DataEnvelope<BookingCreated> = Self::parse_response(response).await?;
        Ok(envelope.data.appointment_id)
    }
}
