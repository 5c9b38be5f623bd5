//! Staff registration: find a hospital, then fill in account details

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::api::HospitalApi;
use crate::guard::Route;
use crate::models::{Hospital, NewStaff, StaffRole};
use crate::sorting::filter_hospitals;
use crate::views::Navigation;
use crate::DashboardError;

pub const HOSPITALS_FETCH_FAILED: &str = "Could not load hospital list from database.";
pub const NO_HOSPITAL_SELECTED: &str = "You must select a hospital from the search results.";
pub const REGISTRATION_SUCCEEDED: &str = "Registration successful! Redirecting to login page...";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please check your details.";

/// Account fields of the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: StaffRole,
}

impl RegistrationForm {
    /// Every text field is required
    pub fn validate(&self) -> crate::Result<()> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
            ("phone", &self.phone),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DashboardError::Validation(format!(
                    "Please fill in the {} field.",
                    field
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterState {
    pub form: RegistrationForm,
    pub search: String,
    pub hospitals: Vec<Hospital>,
    pub selected: Option<Hospital>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl RegisterState {
    /// Type-ahead matches; none once a hospital has been picked
    pub fn suggestions(&self) -> Vec<Hospital> {
        if self.selected.is_some() {
            return Vec::new();
        }
        filter_hospitals(&self.hospitals, &self.search)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[derive(Debug)]
pub struct RegisterView {
    api: Arc<HospitalApi>,
    redirect_delay: Duration,
    state: RwLock<RegisterState>,
}

impl RegisterView {
    pub fn new(api: Arc<HospitalApi>, redirect_delay: Duration) -> Self {
        Self {
            api,
            redirect_delay,
            state: RwLock::new(RegisterState::default()),
        }
    }

    pub async fn snapshot(&self) -> RegisterState {
        self.state.read().await.clone()
    }

    /// Fetch the full hospital list once; searching is local afterwards
    pub async fn load_hospitals(&self) {
        let result = self.api.list_hospitals().await;

        let mut state = self.state.write().await;
        match result {
            Ok(hospitals) => {
                tracing::debug!("Loaded {} hospitals", hospitals.len());
                state.hospitals = hospitals;
            }
            Err(e) => {
                tracing::warn!("Hospital list fetch failed: {}", e);
                state.error = Some(HOSPITALS_FETCH_FAILED.to_string());
            }
        }
    }

    /// Typing in the search box drops any earlier selection
    pub async fn set_search(&self, text: &str) {
        let mut state = self.state.write().await;
        state.search = text.to_string();
        state.selected = None;
    }

    pub async fn suggestions(&self) -> Vec<Hospital> {
        self.state.read().await.suggestions()
    }

    pub async fn select(&self, hospital_id: &str) -> crate::Result<()> {
        let mut state = self.state.write().await;
        let hospital = state
            .hospitals
            .iter()
            .find(|h| h.id == hospital_id)
            .cloned()
            .ok_or_else(|| {
                DashboardError::Validation(format!("unknown hospital '{}'", hospital_id))
            })?;
        state.search = hospital.name.clone();
        state.selected = Some(hospital);
        Ok(())
    }

    pub async fn fill(&self, form: RegistrationForm) {
        self.state.write().await.form = form;
    }

    /// Create the account. Local checks run before any network call.
    pub async fn submit(&self) -> Navigation {
        let staff = {
            let mut state = self.state.write().await;
            let Some(hospital) = state.selected.clone() else {
                state.error = Some(NO_HOSPITAL_SELECTED.to_string());
                return Navigation::Stay;
            };
            if let Err(e) = state.form.validate() {
                state.error = Some(match e {
                    DashboardError::Validation(message) => message,
                    other => other.to_string(),
                });
                return Navigation::Stay;
            }
            state.loading = true;
            state.error = None;
            state.success = None;
            NewStaff {
                name: state.form.name.clone(),
                email: state.form.email.clone(),
                password: state.form.password.clone(),
                phone: state.form.phone.clone(),
                role: state.form.role,
                hospital_id: hospital.id,
            }
        };

        let result = self.api.create_staff(&staff).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(()) => {
                tracing::info!("Registered {} at hospital {}", staff.email, staff.hospital_id);
                state.success = Some(REGISTRATION_SUCCEEDED.to_string());
                Navigation::After {
                    delay: self.redirect_delay,
                    route: Route::Login,
                }
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                state.error = Some(
                    e.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| REGISTRATION_FAILED.to_string()),
                );
                Navigation::Stay
            }
        }
    }
}
