//! Typed admin entities
//!
//! These are decoded once at the HTTP boundary. Screens turn them into
//! [`Record`]s for the table engine; field names stay in the backend's
//! camelCase form so column keys match the JSON the server sends.

use serde::Deserialize;
use serde::Serialize;

use super::Id;
use super::Record;

/// Dashboard counters from `GET /admin/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_rides: u64,
    pub active_rides: u64,
    pub completed_rides: u64,
    pub total_riders: u64,
    pub verified_riders: u64,
    pub total_users: u64,
    pub pending_applications: u64,
    pub total_revenue: f64,
}

/// A ride booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: Id,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub rider_name: Option<String>,
    #[serde(default)]
    pub pickup: Option<String>,
    #[serde(default)]
    pub dropoff: Option<String>,
    #[serde(default)]
    pub fare: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A driver ("rider" in the backend's vocabulary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A passenger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A message submitted through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Review state of a driver application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A "become a driver" application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverApplication {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

/// Fare configuration edited on the settings screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub base_fare: f64,
    pub per_km: f64,
    #[serde(default)]
    pub per_minute: f64,
    #[serde(default)]
    pub minimum_fare: f64,
}

// =============================================================================
// Row mapping
// =============================================================================

impl From<&Ride> for Record {
    fn from(ride: &Ride) -> Self {
        Record::new()
            .set("id", ride.id.as_str())
            .set("userName", ride.user_name.clone())
            .set("riderName", ride.rider_name.clone())
            .set("pickup", ride.pickup.clone())
            .set("dropoff", ride.dropoff.clone())
            .set("fare", ride.fare)
            .set("status", ride.status.clone())
            .set("createdAt", ride.created_at.clone())
    }
}

impl From<&Rider> for Record {
    fn from(rider: &Rider) -> Self {
        Record::new()
            .set("id", rider.id.as_str())
            .set("name", rider.name.clone())
            .set("phone", rider.phone.clone())
            .set("vehicleNumber", rider.vehicle_number.clone())
            .set("vehicleType", rider.vehicle_type.clone())
            .set("verified", rider.verified)
            .set("rating", rider.rating)
    }
}

impl From<&User> for Record {
    fn from(user: &User) -> Self {
        Record::new()
            .set("id", user.id.as_str())
            .set("name", user.name.clone())
            .set("email", user.email.clone())
            .set("phone", user.phone.clone())
            .set("createdAt", user.created_at.clone())
    }
}

impl From<&ContactMessage> for Record {
    fn from(message: &ContactMessage) -> Self {
        Record::new()
            .set("id", message.id.as_str())
            .set("name", message.name.clone())
            .set("email", message.email.clone())
            .set("subject", message.subject.clone())
            .set("message", message.message.clone())
            .set("createdAt", message.created_at.clone())
    }
}

impl From<&DriverApplication> for Record {
    fn from(application: &DriverApplication) -> Self {
        Record::new()
            .set("id", application.id.as_str())
            .set("name", application.name.clone())
            .set("phone", application.phone.clone())
            .set("vehicleType", application.vehicle_type.clone())
            .set("licenseNumber", application.license_number.clone())
            .set("status", application.status.as_str())
            .set("submittedAt", application.submitted_at.clone())
    }
}

/// Converts a slice of entities into row records.
pub fn to_records<'a, T>(items: &'a [T]) -> Vec<Record>
where
    Record: From<&'a T>,
{
    items.iter().map(Record::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ride_decodes_with_missing_fields() {
        let ride: Ride = serde_json::from_str(r#"{"id": 9, "fare": 45.5, "riderName": "Kiran"}"#).unwrap();
        assert_eq!(ride.id.as_str(), "9");
        assert_eq!(ride.pickup, None);

        let record = Record::from(&ride);
        assert_eq!(record.text("fare"), "45.5");
        assert_eq!(record.text("riderName"), "Kiran");
        assert_eq!(record.text("pickup"), "");
    }

    #[test]
    fn test_application_status_defaults_to_pending() {
        let application: DriverApplication = serde_json::from_str(r#"{"id": "a1"}"#).unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(Record::from(&application).text("status"), "pending");
    }

    #[test]
    fn test_to_records() {
        let riders: Vec<Rider> =
            serde_json::from_str(r#"[{"id": 1, "verified": true}, {"id": 2}]"#).unwrap();
        let records = to_records(&riders);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("verified"), "true");
        assert_eq!(records[1].text("verified"), "false");
    }
}
