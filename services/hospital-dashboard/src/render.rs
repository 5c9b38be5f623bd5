//! Plain-text rendering of view state for the terminal

use std::fmt;

use chrono::Local;

use crate::models::{Location, PatientRide};
use crate::views::{
    BedEditorMode, BedsState, DashboardState, LoginState, MyInfoState, PatientsState,
    RegisterState,
};

pub const NO_INCOMING_PATIENTS: &str = "No incoming patients at this time.";

const DAILY_CHECKLIST: [(&str, &str); 3] = [
    (
        "🛏️",
        "Remember to update bed availability regularly, especially after a patient is admitted or discharged.",
    ),
    (
        "📞",
        "For critical incoming patients, use the 'Incoming Patients' page to get driver and relative contact information.",
    ),
    (
        "🚑",
        "Check the Ambulance Status page to see which units are free for new emergencies in your area.",
    ),
];

pub fn map_link(location: &Location) -> String {
    format!(
        "https://maps.google.com/?q={},{}",
        location.latitude, location.longitude
    )
}

/// Priority label; rides without one show as `medium`
pub struct PriorityBadge<'a>(pub Option<&'a str>);

impl fmt::Display for PriorityBadge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.map(str::trim).filter(|p| !p.is_empty()) {
            Some(label) => write!(f, "[{}]", label.to_lowercase()),
            None => f.write_str("[medium]"),
        }
    }
}

/// ETA in minutes, `N/A` when the server did not send one
pub struct Eta(pub Option<f64>);

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(minutes) => write!(f, "{} min", minutes),
            None => f.write_str("N/A"),
        }
    }
}

pub struct SummaryCard<'a> {
    pub icon: &'a str,
    pub value: String,
    pub title: &'a str,
}

impl fmt::Display for SummaryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:>8}  {}", self.icon, self.value, self.title)
    }
}

/// Full card for one incoming ride
pub struct PatientCard<'a>(pub &'a PatientRide);

impl fmt::Display for PatientCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ride = self.0;
        let driver = ride.ambulance.driver.as_ref();
        let na = "N/A";

        writeln!(
            f,
            "{} {}  ({})  ETA {}",
            PriorityBadge(ride.condition.priority.as_deref()),
            ride.patient.name,
            ride.status.replace('_', " "),
            Eta(ride.time_to_arrival)
        )?;
        writeln!(
            f,
            "  Patient Contact: {}",
            ride.patient.phone.as_deref().unwrap_or(na)
        )?;
        writeln!(f, "  Condition:       {}", ride.condition.description)?;
        writeln!(
            f,
            "  Driver:          {}",
            driver.and_then(|d| d.name.as_deref()).unwrap_or(na)
        )?;
        writeln!(
            f,
            "  Driver Contact:  {}",
            driver.and_then(|d| d.phone.as_deref()).unwrap_or(na)
        )?;
        match ride.created_at {
            Some(created) => writeln!(
                f,
                "  Created:         {}",
                created.with_timezone(&Local).format("%H:%M:%S")
            )?,
            None => writeln!(f, "  Created:         {}", na)?,
        }
        match &ride.ambulance.current_location {
            Some(location) => write!(f, "  Track on Map:    {}", map_link(location)),
            None => write!(f, "  No Location"),
        }
    }
}

fn push_error(lines: &mut Vec<String>, error: &Option<String>) {
    if let Some(message) = error {
        lines.push(format!("! {}", message));
    }
}

pub fn render_login(state: &LoginState) -> String {
    let mut lines = vec!["Hospital Staff Login".to_string()];
    if state.loading {
        lines.push("Logging in...".to_string());
    }
    push_error(&mut lines, &state.error);
    lines.join("\n")
}

pub fn render_register(state: &RegisterState) -> String {
    let mut lines = vec!["Register Hospital Staff".to_string()];
    if let Some(success) = &state.success {
        lines.push(success.clone());
    }
    push_error(&mut lines, &state.error);
    match &state.selected {
        Some(hospital) => lines.push(format!("Hospital: {} ({})", hospital.name, hospital.id)),
        None => {
            for hospital in state.suggestions() {
                lines.push(format!(
                    "  {}  {}  {}",
                    hospital.id,
                    hospital.name,
                    hospital.address.as_deref().unwrap_or("")
                ));
            }
        }
    }
    lines.join("\n")
}

pub fn render_dashboard(state: &DashboardState) -> String {
    let mut lines = Vec::new();
    let (name, hospital) = state
        .staff
        .as_ref()
        .map(|s| (s.name.as_str(), s.hospital.name.as_str()))
        .unwrap_or(("...", "..."));
    lines.push(format!("Hello, {}", name));
    lines.push(format!("Welcome to the dashboard for {}", hospital));
    lines.push(String::new());

    if state.loading {
        lines.push("Loading Dashboard...".to_string());
    }
    push_error(&mut lines, &state.error);

    if let Some(stats) = &state.stats {
        let cards = [
            SummaryCard {
                icon: "🚑",
                value: stats.patients.to_string(),
                title: "Incoming Patients",
            },
            SummaryCard {
                icon: "🛏️",
                value: stats.beds.clone(),
                title: "Available Beds",
            },
            SummaryCard {
                icon: "✅",
                value: stats.ambulances_free.to_string(),
                title: "Ambulances Free",
            },
            SummaryCard {
                icon: "🔴",
                value: stats.ambulances_occupied.to_string(),
                title: "Ambulances Occupied",
            },
        ];
        lines.extend(cards.iter().map(ToString::to_string));

        lines.push(String::new());
        lines.push("Recent Incoming Patients".to_string());
        if state.recent_patients.is_empty() {
            lines.push(NO_INCOMING_PATIENTS.to_string());
        }
        for ride in &state.recent_patients {
            lines.push(format!(
                "  {} - {}  ETA: {} {}",
                ride.patient.name,
                ride.condition.description,
                Eta(ride.time_to_arrival),
                PriorityBadge(ride.condition.priority.as_deref())
            ));
        }

        lines.push(String::new());
        lines.push("Daily Checklist".to_string());
        for (icon, item) in DAILY_CHECKLIST {
            lines.push(format!("  {} {}", icon, item));
        }
    }
    lines.join("\n")
}

pub fn render_patients(state: &PatientsState) -> String {
    let mut lines = vec![format!("Incoming Patients (sorted by {})", state.sort_by)];
    if state.loading {
        lines.push("Loading patients...".to_string());
    }
    push_error(&mut lines, &state.error);
    if !state.loading {
        let sorted = state.sorted();
        if sorted.is_empty() {
            lines.push(NO_INCOMING_PATIENTS.to_string());
        }
        for ride in &sorted {
            lines.push(String::new());
            lines.push(PatientCard(ride).to_string());
        }
    }
    lines.join("\n")
}

pub fn render_beds(state: &BedsState) -> String {
    let mut lines = vec!["Bed Availability".to_string()];
    if let Some(hospital) = &state.hospital {
        lines.push(hospital.name.clone());
    }
    match state.mode {
        BedEditorMode::Saving => lines.push("Saving...".to_string()),
        BedEditorMode::Editing => lines.push("(editing)".to_string()),
        BedEditorMode::Viewing if state.loading => lines.push("Loading...".to_string()),
        BedEditorMode::Viewing => {}
    }
    push_error(&mut lines, &state.error);
    if let Some(details) = state.displayed() {
        for (department, count) in details {
            lines.push(format!(
                "  {:<16} available {:>4}  total {:>4}",
                department, count.available, count.total
            ));
        }
    }
    for department in state.over_capacity() {
        lines.push(format!(
            "warning: {} has more available beds than total",
            department
        ));
    }
    lines.join("\n")
}

pub fn render_my_info(state: &MyInfoState) -> String {
    let mut lines = vec!["My Information".to_string()];
    if state.loading {
        lines.push("Loading information...".to_string());
    }
    push_error(&mut lines, &state.error);
    if let Some(staff) = &state.staff {
        lines.push("Account Details".to_string());
        lines.push(format!("  Name:       {}", staff.name));
        lines.push(format!("  Email:      {}", staff.email));
        lines.push(format!("  Phone:      {}", staff.phone.as_deref().unwrap_or("")));
        lines.push(format!("  Role:       {}", staff.role));
        lines.push(format!(
            "  Department: {}",
            staff.department.as_deref().unwrap_or("")
        ));
        lines.push("Hospital Details".to_string());
        lines.push(format!("  Hospital Name: {}", staff.hospital.name));
        lines.push(format!(
            "  Address:       {}",
            staff.hospital.address.as_deref().unwrap_or("")
        ));
    }
    lines.join("\n")
}
