//! Hospital Dashboard - staff client for the InstaAid hospital API
//!
//! Tracks incoming ambulance patients, bed availability and ambulance status
//! for the signed-in staff member's hospital.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod io;
pub mod models;
pub mod poller;
pub mod render;
pub mod session;
pub mod sorting;
pub mod views;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::HospitalApi;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::poller::{PollingTask, Refresh};
use crate::session::{FileSessionStore, SessionContext, SessionStore};
use crate::views::{
    BedsView, DashboardView, LoginView, MyInfoView, PatientsView, RegisterView,
};

/// Wires the API client and session store from configuration
pub struct DashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl DashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            store: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<HospitalDashboard> {
        self.config.validate()?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::with_timeout(
                self.config.api.request_timeout(),
            )?),
        };
        let store: Arc<dyn SessionStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileSessionStore::new(&self.config.session.token_file)),
        };

        tracing::debug!(
            "Hospital API at {}, session file {:?}",
            self.config.api.base_url,
            self.config.session.token_file
        );
        let api = HospitalApi::new(&self.config.api.base_url, http, SessionContext::new(store));

        Ok(HospitalDashboard {
            config: self.config,
            api: Arc::new(api),
        })
    }
}

/// Entry point to the views; each call creates a fresh, independent view
#[derive(Debug)]
pub struct HospitalDashboard {
    config: Config,
    api: Arc<HospitalApi>,
}

impl HospitalDashboard {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }

    pub fn login(&self) -> LoginView {
        LoginView::new(Arc::clone(&self.api))
    }

    pub fn register(&self) -> RegisterView {
        RegisterView::new(
            Arc::clone(&self.api),
            self.config.registration.redirect_delay(),
        )
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::new(Arc::clone(&self.api))
    }

    pub fn patients(&self) -> PatientsView {
        PatientsView::new(Arc::clone(&self.api))
    }

    pub fn beds(&self) -> BedsView {
        BedsView::new(Arc::clone(&self.api))
    }

    pub fn my_info(&self) -> MyInfoView {
        MyInfoView::new(Arc::clone(&self.api))
    }
}

/// Poll `view` every `period`, calling `on_refresh` after each completed
/// refresh until `cancel` fires. The schedule is stopped before returning.
pub async fn watch<V, F, Fut>(
    view: Arc<V>,
    period: Duration,
    cancel: CancellationToken,
    mut on_refresh: F,
) where
    V: Refresh + 'static,
    F: FnMut(Arc<V>) -> Fut,
    Fut: Future<Output = ()>,
{
    let task = PollingTask::start(view.clone(), period);
    let mut refreshes = task.subscribe();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = refreshes.changed() => {
                if changed.is_err() {
                    break;
                }
                on_refresh(Arc::clone(&view)).await;
            }
        }
    }

    task.stop().await;
}
