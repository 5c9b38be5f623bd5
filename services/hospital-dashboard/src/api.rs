//! Client for the hospital dashboard REST API

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::io::{HttpClient, HttpRequest, HttpResponse};
use crate::models::{
    AmbulanceSummary, BedDetails, Hospital, HospitalBeds, IncomingPatients, NewStaff,
    StaffProfile,
};
use crate::session::{BearerToken, SessionContext};
use crate::DashboardError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: BearerToken,
}

#[derive(Debug, Deserialize)]
struct HospitalsResponse {
    #[serde(default)]
    hospitals: Option<Vec<Hospital>>,
}

#[derive(Debug, Deserialize)]
struct HospitalBedsResponse {
    hospital: HospitalBeds,
}

#[derive(Debug, Deserialize)]
struct AmbulanceStatusResponse {
    summary: AmbulanceSummary,
}

#[derive(Debug, Deserialize)]
struct StaffResponse {
    staff: StaffProfile,
}

/// Named operations against the hospital backend
///
/// Every operation is a single attempt. Authenticated operations read the
/// bearer token from the session at call time.
pub struct HospitalApi {
    base_url: String,
    http: Arc<dyn HttpClient>,
    session: SessionContext,
}

impl std::fmt::Debug for HospitalApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HospitalApi")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl HospitalApi {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        session: SessionContext,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Created HospitalApi at {}", base_url);
        Self {
            base_url,
            http,
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn dashboard_url(&self, path: &str) -> String {
        format!("{}/hospital-dashboard{}", self.base_url, path)
    }

    fn signed(&self, request: HttpRequest) -> HttpRequest {
        request.with_bearer(self.session.bearer())
    }

    async fn send(&self, request: HttpRequest) -> crate::Result<HttpResponse> {
        let response = self.http.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(api_error(&response))
        }
    }

    async fn call<T: DeserializeOwned>(&self, request: HttpRequest) -> crate::Result<T> {
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn login(&self, email: &str, password: &str) -> crate::Result<BearerToken> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .call(HttpRequest::post_json(self.dashboard_url("/staff/login"), body))
            .await?;
        Ok(response.token)
    }

    pub async fn create_staff(&self, staff: &NewStaff) -> crate::Result<()> {
        let body = serde_json::to_value(staff)?;
        self.send(HttpRequest::post_json(
            self.dashboard_url("/staff/create"),
            body,
        ))
        .await?;
        Ok(())
    }

    pub async fn list_hospitals(&self) -> crate::Result<Vec<Hospital>> {
        let response: HospitalsResponse = self
            .call(HttpRequest::get(format!("{}/hospitals", self.base_url)))
            .await?;
        Ok(response.hospitals.unwrap_or_default())
    }

    pub async fn incoming_patients(&self) -> crate::Result<IncomingPatients> {
        self.call(self.signed(HttpRequest::get(
            self.dashboard_url("/incoming-patients"),
        )))
        .await
    }

    pub async fn bed_availability(&self) -> crate::Result<HospitalBeds> {
        let response: HospitalBedsResponse = self
            .call(self.signed(HttpRequest::get(
                self.dashboard_url("/bed-availability"),
            )))
            .await?;
        Ok(response.hospital)
    }

    /// Replace the whole department map; returns the record the server now holds
    pub async fn update_bed_availability(
        &self,
        bed_details: &BedDetails,
    ) -> crate::Result<HospitalBeds> {
        let body = serde_json::json!({ "bedDetails": bed_details });
        let response: HospitalBedsResponse = self
            .call(self.signed(HttpRequest::put_json(
                self.dashboard_url("/bed-availability"),
                body,
            )))
            .await?;
        Ok(response.hospital)
    }

    pub async fn ambulance_status(&self) -> crate::Result<AmbulanceSummary> {
        let response: AmbulanceStatusResponse = self
            .call(self.signed(HttpRequest::get(
                self.dashboard_url("/ambulance-status"),
            )))
            .await?;
        Ok(response.summary)
    }

    pub async fn my_info(&self) -> crate::Result<StaffProfile> {
        let response: StaffResponse = self
            .call(self.signed(HttpRequest::get(self.dashboard_url("/staff/me"))))
            .await?;
        Ok(response.staff)
    }
}

/// Turn a non-2xx response into an error, keeping the server's message if it sent one
fn api_error(response: &HttpResponse) -> DashboardError {
    let message = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|body| {
            ["error", "message"]
                .iter()
                .find_map(|key| body.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });
    tracing::debug!(
        "API call failed with status {}: {:?}",
        response.status,
        message
    );
    DashboardError::Api {
        status: response.status,
        message,
    }
}
