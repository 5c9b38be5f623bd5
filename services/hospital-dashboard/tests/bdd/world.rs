//! BDD test world for the hospital dashboard

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cucumber::World;
use tempfile::TempDir;

use hospital_dashboard::guard::Route;
use hospital_dashboard::io::{HttpClient, HttpRequest, HttpResponse, Method};
use hospital_dashboard::models::PatientRide;
use hospital_dashboard::poller::PollingTask;
use hospital_dashboard::session::{FileSessionStore, MemorySessionStore};
use hospital_dashboard::views::{
    BedsView, DashboardView, LoginView, Navigation, PatientsView, RegisterView,
};
use hospital_dashboard::{Config, DashboardBuilder, HospitalDashboard};

pub const BASE_URL: &str = "http://hospital.test";

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Canned responses keyed by method and path; anything else is a 404
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<HashMap<(String, String), HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedHttpClient {
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            HttpResponse {
                status,
                body: body.into(),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn send(&self, request: HttpRequest) -> hospital_dashboard::Result<HttpResponse> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            path: path.clone(),
            bearer: request.bearer.as_ref().map(|b| b.expose().to_string()),
            body: request.body.clone(),
        });
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&(request.method.to_string(), path))
            .cloned();
        Ok(response.unwrap_or(HttpResponse {
            status: 404,
            body: r#"{"error": "Not found"}"#.to_string(),
        }))
    }
}

#[derive(Debug, Default, World)]
pub struct HospitalDashboardWorld {
    pub http: Arc<ScriptedHttpClient>,
    pub session_dir: Option<TempDir>,
    pub session_file: Option<PathBuf>,
    pub memory_session: Arc<MemorySessionStore>,
    app: Option<HospitalDashboard>,

    // Guard and login
    pub route_result: Option<hospital_dashboard::Result<Route>>,
    pub login: Option<LoginView>,
    pub navigation: Option<Navigation>,

    // Sorting
    pub rides: Vec<PatientRide>,
    pub sorted: Vec<PatientRide>,

    // Views
    pub dashboard: Option<DashboardView>,
    pub beds: Option<BedsView>,
    pub save_result: Option<bool>,
    pub register: Option<RegisterView>,
    pub patients: Option<Arc<PatientsView>>,

    // Polling
    pub polling: Option<PollingTask>,
    pub fetches_at_stop: usize,
}

impl HospitalDashboardWorld {
    /// The app under test, built on first use against the scripted backend
    pub fn app(&mut self) -> &HospitalDashboard {
        if self.app.is_none() {
            let mut config = Config::default();
            config.api.base_url = BASE_URL.to_string();

            let builder = DashboardBuilder::new(config).with_http_client(self.http.clone());
            let builder = match &self.session_file {
                Some(path) => builder.with_session_store(Arc::new(FileSessionStore::new(path))),
                None => builder.with_session_store(self.memory_session.clone()),
            };
            self.app = Some(builder.build().expect("test config is valid"));
        }
        self.app.as_ref().expect("app was just built")
    }

    /// Point the session at a fresh file in a temporary directory
    pub fn use_session_file(&mut self) -> PathBuf {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("session.json");
        self.session_dir = Some(dir);
        self.session_file = Some(path.clone());
        self.app = None;
        path
    }
}
