//! Dashboard view: summary metrics, greeting and recent patients

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::HospitalApi;
use crate::guard::Route;
use crate::models::{PatientRide, StaffProfile};
use crate::poller::Refresh;
use crate::sorting::recent_patients;
use crate::views::Navigation;

pub const DASHBOARD_FETCH_FAILED: &str = "Failed to fetch dashboard data. Please try again later.";

/// Headline numbers shown on the summary cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub patients: u64,
    /// `"<available> / <total>"`
    pub beds: String,
    pub ambulances_free: u64,
    pub ambulances_occupied: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<String>,
    pub stats: Option<DashboardStats>,
    pub staff: Option<StaffProfile>,
    pub recent_patients: Vec<PatientRide>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            stats: None,
            staff: None,
            recent_patients: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct DashboardView {
    api: Arc<HospitalApi>,
    state: RwLock<DashboardState>,
}

impl DashboardView {
    pub fn new(api: Arc<HospitalApi>) -> Self {
        Self {
            api,
            state: RwLock::new(DashboardState::default()),
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Forget the session and go back to login
    pub async fn logout(&self) -> crate::Result<Navigation> {
        self.api.session().sign_out()?;
        tracing::info!("Signed out");
        Ok(Navigation::To(Route::Login))
    }
}

#[async_trait]
impl Refresh for DashboardView {
    fn name(&self) -> &str {
        "dashboard"
    }

    /// All four fetches must succeed before anything is shown
    async fn refresh(&self) {
        {
            let mut state = self.state.write().await;
            if state.stats.is_none() {
                state.loading = true;
            }
        }

        let result = tokio::try_join!(
            self.api.incoming_patients(),
            self.api.bed_availability(),
            self.api.ambulance_status(),
            self.api.my_info(),
        );

        let mut state = self.state.write().await;
        match result {
            Ok((patients, beds, ambulances, staff)) => {
                state.stats = Some(DashboardStats {
                    patients: patients.count,
                    beds: format!("{} / {}", beds.available_beds, beds.total_beds),
                    ambulances_free: ambulances.free,
                    ambulances_occupied: ambulances.occupied,
                });
                state.staff = Some(staff);
                state.recent_patients = recent_patients(&patients.patients);
                state.error = None;
                tracing::debug!(
                    "Dashboard refreshed: {} incoming, {} recent shown",
                    patients.count,
                    state.recent_patients.len()
                );
            }
            Err(e) => {
                tracing::warn!("Dashboard refresh failed: {}", e);
                state.error = Some(DASHBOARD_FETCH_FAILED.to_string());
            }
        }
        state.loading = false;
    }
}
