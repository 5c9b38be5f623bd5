//! Login view

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::HospitalApi;
use crate::guard::Route;
use crate::views::Navigation;

pub const LOGIN_FAILED: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct LoginView {
    api: Arc<HospitalApi>,
    state: RwLock<LoginState>,
}

impl LoginView {
    pub fn new(api: Arc<HospitalApi>) -> Self {
        Self {
            api,
            state: RwLock::new(LoginState::default()),
        }
    }

    pub async fn snapshot(&self) -> LoginState {
        self.state.read().await.clone()
    }

    /// Exchange credentials for a token and store it in the session
    pub async fn submit(&self, email: &str, password: &str) -> Navigation {
        {
            let mut state = self.state.write().await;
            state.error = None;
            state.loading = true;
        }

        let result = match self.api.login(email, password).await {
            Ok(token) => self.api.session().sign_in(token),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(()) => {
                tracing::info!("Signed in as {}", email);
                Navigation::To(Route::Dashboard)
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                state.error = Some(
                    e.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| LOGIN_FAILED.to_string()),
                );
                Navigation::Stay
            }
        }
    }
}
