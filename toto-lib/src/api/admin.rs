//! Dashboard, list and moderation endpoints

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ApiRequest;
use crate::ApiClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::ContactMessage;
use crate::model::DashboardStats;
use crate::model::DriverApplication;
use crate::model::Id;
use crate::model::Ride;
use crate::model::Rider;
use crate::model::User;

/// Acknowledgement returned by mutation endpoints.
///
/// The backend may answer with an empty body, which reads as the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    stats: DashboardStats,
}

#[derive(Deserialize)]
struct RidesEnvelope {
    #[serde(default)]
    rides: Vec<Ride>,
}

#[derive(Deserialize)]
struct RidersEnvelope {
    #[serde(default)]
    riders: Vec<Rider>,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    #[serde(default)]
    messages: Vec<ContactMessage>,
}

#[derive(Deserialize)]
struct ApplicationsEnvelope {
    #[serde(default)]
    applications: Vec<DriverApplication>,
}

/// Decodes an optional JSON body, treating an empty body as `T::default()`.
pub(super) fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
}

impl ApiClient {
    /// Fetches the dashboard counters.
    pub async fn stats(&self) -> Result<DashboardStats, Error> {
        let envelope: StatsEnvelope = self.send_json(ApiRequest::get("/admin/stats")).await?;
        Ok(envelope.stats)
    }

    /// Lists all rides.
    pub async fn rides(&self) -> Result<Vec<Ride>, Error> {
        let envelope: RidesEnvelope = self.send_json(ApiRequest::get("/admin/rides")).await?;
        Ok(envelope.rides)
    }

    /// Removes a ride.
    pub async fn remove_ride(&self, id: &Id) -> Result<Ack, Error> {
        self.ack(format!("/admin/rides/{}/remove", id.to_path_segment()))
            .await
    }

    /// Lists all riders.
    pub async fn riders(&self) -> Result<Vec<Rider>, Error> {
        let envelope: RidersEnvelope = self.send_json(ApiRequest::get("/admin/riders")).await?;
        Ok(envelope.riders)
    }

    /// Marks a rider as verified.
    pub async fn verify_rider(&self, id: &Id) -> Result<Ack, Error> {
        self.ack(format!("/admin/riders/{}/verify", id.to_path_segment()))
            .await
    }

    /// Lists all passenger accounts.
    pub async fn users(&self) -> Result<Vec<User>, Error> {
        let envelope: UsersEnvelope = self.send_json(ApiRequest::get("/admin/users")).await?;
        Ok(envelope.users)
    }

    /// Lists contact form submissions.
    pub async fn messages(&self) -> Result<Vec<ContactMessage>, Error> {
        let envelope: MessagesEnvelope =
            self.send_json(ApiRequest::get("/admin/messages")).await?;
        Ok(envelope.messages)
    }

    /// Lists driver applications.
    pub async fn applications(&self) -> Result<Vec<DriverApplication>, Error> {
        let envelope: ApplicationsEnvelope = self
            .send_json(ApiRequest::get("/admin/applications"))
            .await?;
        Ok(envelope.applications)
    }

    pub async fn approve_application(&self, id: &Id) -> Result<Ack, Error> {
        self.ack(format!(
            "/admin/applications/{}/approve",
            id.to_path_segment()
        ))
        .await
    }

    pub async fn reject_application(&self, id: &Id) -> Result<Ack, Error> {
        self.ack(format!(
            "/admin/applications/{}/reject",
            id.to_path_segment()
        ))
        .await
    }

    async fn ack(&self, path: String) -> Result<Ack, Error> {
        let response = self.send(ApiRequest::post(path)).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        Ok(decode_or_default(&body)?)
    }
}
