//! Incoming patients view with a user-selected ordering

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::HospitalApi;
use crate::models::PatientRide;
use crate::poller::Refresh;
use crate::sorting::{sort_patients, SortKey};

pub const PATIENTS_FETCH_FAILED: &str = "Failed to fetch incoming patients.";

#[derive(Debug, Clone, PartialEq)]
pub struct PatientsState {
    pub loading: bool,
    pub error: Option<String>,
    /// Server order, as last fetched
    pub patients: Vec<PatientRide>,
    pub sort_by: SortKey,
}

impl Default for PatientsState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            patients: Vec::new(),
            sort_by: SortKey::default(),
        }
    }
}

impl PatientsState {
    /// The list as displayed, recomputed from source and key on every call
    pub fn sorted(&self) -> Vec<PatientRide> {
        sort_patients(&self.patients, self.sort_by)
    }
}

#[derive(Debug)]
pub struct PatientsView {
    api: Arc<HospitalApi>,
    state: RwLock<PatientsState>,
}

impl PatientsView {
    pub fn new(api: Arc<HospitalApi>) -> Self {
        Self {
            api,
            state: RwLock::new(PatientsState::default()),
        }
    }

    pub async fn snapshot(&self) -> PatientsState {
        self.state.read().await.clone()
    }

    pub async fn set_sort(&self, key: SortKey) {
        self.state.write().await.sort_by = key;
    }

    pub async fn sorted(&self) -> Vec<PatientRide> {
        self.state.read().await.sorted()
    }
}

#[async_trait]
impl Refresh for PatientsView {
    fn name(&self) -> &str {
        "incoming-patients"
    }

    async fn refresh(&self) {
        let result = self.api.incoming_patients().await;

        let mut state = self.state.write().await;
        match result {
            Ok(incoming) => {
                tracing::debug!("Fetched {} incoming patients", incoming.patients.len());
                state.patients = incoming.patients;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("Incoming patients refresh failed: {}", e);
                state.error = Some(PATIENTS_FETCH_FAILED.to_string());
            }
        }
        state.loading = false;
    }
}
