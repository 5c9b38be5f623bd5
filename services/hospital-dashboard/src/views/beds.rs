//! Bed availability editor
//!
//! Viewing shows the last fetched map. Editing works on a draft copy that is
//! sent wholesale on save; a failed save leaves the draft in place.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::HospitalApi;
use crate::models::{BedDetails, HospitalBeds};
use crate::DashboardError;

pub const BEDS_FETCH_FAILED: &str = "Failed to fetch bed availability.";
pub const BEDS_UPDATE_FAILED: &str = "Failed to update bed availability.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedEditorMode {
    #[default]
    Viewing,
    Editing,
    Saving,
}

/// Which count of a department an input edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedField {
    Available,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BedsState {
    pub loading: bool,
    pub error: Option<String>,
    pub hospital: Option<HospitalBeds>,
    pub draft: Option<BedDetails>,
    pub mode: BedEditorMode,
}

impl Default for BedsState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            hospital: None,
            draft: None,
            mode: BedEditorMode::Viewing,
        }
    }
}

impl BedsState {
    /// The map on screen: the draft while editing, otherwise the fetched map
    pub fn displayed(&self) -> Option<&BedDetails> {
        match self.mode {
            BedEditorMode::Viewing => self.hospital.as_ref().map(|h| &h.bed_details),
            BedEditorMode::Editing | BedEditorMode::Saving => self.draft.as_ref(),
        }
    }

    /// Department names that inputs can target, in display order
    pub fn editable_departments(&self) -> Vec<String> {
        self.displayed()
            .map(|details| details.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Departments claiming more available beds than they have in total
    ///
    /// Advisory only; such maps are still saved.
    pub fn over_capacity(&self) -> Vec<String> {
        self.displayed()
            .map(|details| {
                details
                    .iter()
                    .filter(|(_, count)| count.available > count.total)
                    .map(|(dept, _)| dept.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Numeric input coercion: reads the leading decimal digits, so `3.7` is 3.
/// Blank, negative or non-numeric input counts as zero; overflow saturates.
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

#[derive(Debug)]
pub struct BedsView {
    api: Arc<HospitalApi>,
    state: RwLock<BedsState>,
}

impl BedsView {
    pub fn new(api: Arc<HospitalApi>) -> Self {
        Self {
            api,
            state: RwLock::new(BedsState::default()),
        }
    }

    pub async fn snapshot(&self) -> BedsState {
        self.state.read().await.clone()
    }

    pub async fn load(&self) {
        self.state.write().await.loading = true;

        let result = self.api.bed_availability().await;

        let mut state = self.state.write().await;
        match result {
            Ok(hospital) => {
                tracing::debug!(
                    "Fetched bed availability for '{}' ({} departments)",
                    hospital.name,
                    hospital.bed_details.len()
                );
                state.hospital = Some(hospital);
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("Bed availability fetch failed: {}", e);
                state.error = Some(BEDS_FETCH_FAILED.to_string());
            }
        }
        state.loading = false;
    }

    /// Start editing a copy of the fetched map
    pub async fn begin_edit(&self) -> crate::Result<()> {
        let mut state = self.state.write().await;
        if state.mode != BedEditorMode::Viewing {
            return Err(DashboardError::InvalidState(
                "already editing bed availability".to_string(),
            ));
        }
        let details = state
            .hospital
            .as_ref()
            .map(|h| h.bed_details.clone())
            .ok_or_else(|| {
                DashboardError::InvalidState("bed availability not loaded".to_string())
            })?;
        state.draft = Some(details);
        state.mode = BedEditorMode::Editing;
        Ok(())
    }

    /// Apply one input change to the draft
    pub async fn set_count(&self, department: &str, field: BedField, raw: &str) -> crate::Result<()> {
        let mut state = self.state.write().await;
        if state.mode != BedEditorMode::Editing {
            return Err(DashboardError::InvalidState(
                "not editing bed availability".to_string(),
            ));
        }
        let count = state
            .draft
            .as_mut()
            .and_then(|draft| draft.get_mut(department))
            .ok_or_else(|| {
                DashboardError::Validation(format!("unknown department '{}'", department))
            })?;
        let value = parse_count(raw);
        match field {
            BedField::Available => count.available = value,
            BedField::Total => count.total = value,
        }
        Ok(())
    }

    /// Discard the draft and show the fetched map again
    pub async fn cancel(&self) {
        let mut state = self.state.write().await;
        if state.mode == BedEditorMode::Editing {
            state.draft = None;
            state.mode = BedEditorMode::Viewing;
        }
    }

    /// Submit the whole draft. Returns whether the save went through.
    pub async fn save(&self) -> crate::Result<bool> {
        let draft = {
            let mut state = self.state.write().await;
            if state.mode != BedEditorMode::Editing {
                return Err(DashboardError::InvalidState(
                    "not editing bed availability".to_string(),
                ));
            }
            let draft = state.draft.clone().unwrap_or_default();
            state.mode = BedEditorMode::Saving;
            state.loading = true;
            draft
        };

        let result = self.api.update_bed_availability(&draft).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(hospital) => {
                tracing::info!("Bed availability saved for '{}'", hospital.name);
                state.hospital = Some(hospital);
                state.draft = None;
                state.mode = BedEditorMode::Viewing;
                state.error = None;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Bed availability update failed: {}", e);
                state.mode = BedEditorMode::Editing;
                state.error = Some(BEDS_UPDATE_FAILED.to_string());
                Ok(false)
            }
        }
    }
}
