use reqwest::{Client, StatusCode};
use uuid::Uuid;

use crate::models::{ProfileEnvelope, StudentRecord};
use crate::utils::caller::Caller;
use crate::utils::error::AppError;

/// Client for the external profile service, the system of record for
/// student identities and promotion rosters.
///
/// A non-200 status or a body that does not match the `{ data: ... }`
/// envelope yields an empty result rather than an error; only transport
/// failures surface as `ExternalServiceError`.
#[derive(Clone)]
pub struct ProfileClient {
    client: Client,
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Every active student, used when an event targets the whole school.
    pub async fn active_students(&self, caller: &Caller) -> Result<Vec<StudentRecord>, AppError> {
        self.fetch_roster(format!("{}/students/active", self.base_url), caller)
            .await
    }

    /// Roster of one promotion.
    pub async fn promotion_students(
        &self,
        promotion: Uuid,
        caller: &Caller,
    ) -> Result<Vec<StudentRecord>, AppError> {
        self.fetch_roster(
            format!("{}/students/promotion/{}", self.base_url, promotion),
            caller,
        )
        .await
    }

    /// Secondary lookup for roster entries that only carry a profile
    /// reference. Returns the user identity the profile points at, if any.
    pub async fn profile_user_id(
        &self,
        id_profile: Uuid,
        caller: &Caller,
    ) -> Result<Option<Uuid>, AppError> {
        let url = format!("{}/profile/{}", self.base_url, id_profile);
        let response = caller
            .apply(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Ok(None);
        }

        match response.json::<ProfileEnvelope<StudentRecord>>().await {
            Ok(envelope) => Ok(envelope.data.id),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Malformed profile response, ignoring");
                Ok(None)
            }
        }
    }

    async fn fetch_roster(
        &self,
        url: String,
        caller: &Caller,
    ) -> Result<Vec<StudentRecord>, AppError> {
        let response = caller
            .apply(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;

        if response.status() != StatusCode::OK {
            tracing::warn!(%url, status = %response.status(), "Profile service returned non-200, treating as empty roster");
            return Ok(Vec::new());
        }

        match response.json::<ProfileEnvelope<Vec<StudentRecord>>>().await {
            Ok(envelope) => Ok(envelope.data),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Malformed roster response, treating as empty");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_envelope_deserializes() {
        let body = r#"{"data":[{"id":"06f5fc8f-b654-4571-a1c4-131491b7b8d9"},{"id_profile":"16f5fc8f-b654-4571-a1c4-131491b7b8d9"},{"name":"no identity"}]}"#;
        let envelope: ProfileEnvelope<Vec<StudentRecord>> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.len(), 3);
        assert!(envelope.data[0].id.is_some());
        assert!(envelope.data[1].id.is_none());
        assert!(envelope.data[1].id_profile.is_some());
        assert!(envelope.data[2].id.is_none() && envelope.data[2].id_profile.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ProfileClient::new("http://profiles.local/".to_string());
        assert_eq!(client.base_url, "http://profiles.local");
    }
}
