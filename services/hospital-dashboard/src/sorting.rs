//! Derived presentation lists: pure functions of (source list, key)

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Hospital, PatientRide};

/// How many rides the dashboard shows under "recent patients"
pub const RECENT_PATIENTS: usize = 5;

/// Ordering applied to the incoming patient list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Critical first
    #[default]
    Priority,
    /// Closest first
    Eta,
    /// Newest first
    Time,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Priority => write!(f, "Priority (Critical First)"),
            SortKey::Eta => write!(f, "ETA (Closest First)"),
            SortKey::Time => write!(f, "Time (Newest First)"),
        }
    }
}

/// Rank used for priority ordering; unknown or missing priority is 0
pub fn priority_rank(ride: &PatientRide) -> u8 {
    ride.condition.priority().map(|p| p.rank()).unwrap_or(0)
}

fn compare(a: &PatientRide, b: &PatientRide, key: SortKey) -> Ordering {
    match key {
        SortKey::Priority => priority_rank(b).cmp(&priority_rank(a)),
        // closest first, rides without an ETA last
        SortKey::Eta => {
            present_first(a.time_to_arrival, b.time_to_arrival, |a, b| a.total_cmp(&b))
        }
        // newest first, undated rides last
        SortKey::Time => present_first(a.created_at, b.created_at, |a, b| b.cmp(&a)),
    }
}

fn present_first<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of a copy of `patients`; ties keep server order
pub fn sort_patients(patients: &[PatientRide], key: SortKey) -> Vec<PatientRide> {
    let mut sorted = patients.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key));
    sorted
}

/// First few rides in server order, no independent sort
pub fn recent_patients(patients: &[PatientRide]) -> Vec<PatientRide> {
    patients.iter().take(RECENT_PATIENTS).cloned().collect()
}

/// Case-insensitive substring match on hospital name. An empty query matches nothing.
pub fn filter_hospitals<'a>(hospitals: &'a [Hospital], query: &str) -> Vec<&'a Hospital> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    hospitals
        .iter()
        .filter(|h| h.name.to_lowercase().contains(&needle))
        .collect()
}
