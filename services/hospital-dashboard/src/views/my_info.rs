//! Profile view for the signed-in staff member

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::HospitalApi;
use crate::models::StaffProfile;

pub const MY_INFO_FETCH_FAILED: &str = "Failed to fetch user information.";

#[derive(Debug, Clone, PartialEq)]
pub struct MyInfoState {
    pub loading: bool,
    pub error: Option<String>,
    pub staff: Option<StaffProfile>,
}

impl Default for MyInfoState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            staff: None,
        }
    }
}

#[derive(Debug)]
pub struct MyInfoView {
    api: Arc<HospitalApi>,
    state: RwLock<MyInfoState>,
}

impl MyInfoView {
    pub fn new(api: Arc<HospitalApi>) -> Self {
        Self {
            api,
            state: RwLock::new(MyInfoState::default()),
        }
    }

    pub async fn snapshot(&self) -> MyInfoState {
        self.state.read().await.clone()
    }

    pub async fn load(&self) {
        let result = self.api.my_info().await;

        let mut state = self.state.write().await;
        match result {
            Ok(staff) => state.staff = Some(staff),
            Err(e) => {
                tracing::warn!("Profile fetch failed: {}", e);
                state.error = Some(MY_INFO_FETCH_FAILED.to_string());
            }
        }
        state.loading = false;
    }
}
