//! Wire types for the hospital API

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// `null` reads as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A value of the wrong shape reads as `None` instead of failing the record
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Triage priority of an incoming patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive parse; anything unrecognized is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatientContact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Raw priority label as sent by the server
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<String>,
}

impl Condition {
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    #[serde(default, deserialize_with = "lenient")]
    pub driver: Option<Driver>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_location: Option<Location>,
}

/// One ambulance ride heading for this hospital
///
/// Each field is read on its own: a null or oddly shaped value degrades that
/// field and leaves the rest of the ride (and the list) intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRide {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ride_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patient: PatientContact,
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition: Condition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ambulance: Ambulance,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// ETA in minutes
    #[serde(default, deserialize_with = "lenient")]
    pub time_to_arrival: Option<f64>,
    /// `None` when missing or not an RFC 3339 timestamp
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingPatients {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub patients: Vec<PatientRide>,
}

/// Available and total beds for one department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BedCount {
    #[serde(default)]
    pub available: u32,
    #[serde(default)]
    pub total: u32,
}

/// Department name to bed counts. `available <= total` is not enforced.
pub type BedDetails = BTreeMap<String, BedCount>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalBeds {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bed_details: BedDetails,
    #[serde(default)]
    pub available_beds: u64,
    #[serde(default)]
    pub total_beds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmbulanceSummary {
    #[serde(default)]
    pub free: u64,
    #[serde(default)]
    pub occupied: u64,
}

/// Entry in the public hospital listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// The staff member's hospital; only `id` is known when the server sends
/// an unpopulated reference
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HospitalRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// The signed-in staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient")]
    pub department: Option<String>,
    #[serde(rename = "hospitalId", default, deserialize_with = "hospital_ref")]
    pub hospital: HospitalRef,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HospitalField {
    Populated(HospitalRef),
    Id(String),
}

fn hospital_ref<'de, D>(deserializer: D) -> Result<HospitalRef, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match lenient(deserializer)? {
        Some(HospitalField::Populated(hospital)) => hospital,
        Some(HospitalField::Id(id)) => HospitalRef {
            id: Some(id),
            ..HospitalRef::default()
        },
        None => HospitalRef::default(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    #[default]
    Staff,
    Admin,
}

impl FromStr for StaffRole {
    type Err = crate::DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(StaffRole::Staff),
            "admin" => Ok(StaffRole::Admin),
            other => Err(crate::DashboardError::Validation(format!(
                "unknown role '{}'",
                other
            ))),
        }
    }
}

/// Registration payload for `staff/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: StaffRole,
    pub hospital_id: String,
}
