//! BDD step definitions for the dashboard summary

use cucumber::{given, then, when};

use hospital_dashboard::io::Method;
use hospital_dashboard::poller::Refresh;
use hospital_dashboard::render::render_dashboard;
use hospital_dashboard::views::{DashboardStats, DashboardView};

use crate::world::HospitalDashboardWorld;

fn view(world: &HospitalDashboardWorld) -> &DashboardView {
    world.dashboard.as_ref().expect("dashboard refreshed")
}

#[given(expr = "the server lists {int} incoming patients")]
fn server_lists_patients(world: &mut HospitalDashboardWorld, count: usize) {
    let patients: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "rideId": format!("ride-{}", i),
                "patient": {"name": format!("Patient {}", i)},
                "condition": {"description": "Observation", "priority": "medium"},
                "ambulance": {},
                "status": "en_route",
                "timeToArrival": 10 + i,
            })
        })
        .collect();
    world.http.respond(
        Method::Get,
        "/hospital-dashboard/incoming-patients",
        200,
        serde_json::json!({ "count": count, "patients": patients }).to_string(),
    );
}

#[given(expr = "the server reports {int} of {int} beds available")]
fn server_reports_beds(world: &mut HospitalDashboardWorld, available: u64, total: u64) {
    world.http.respond(
        Method::Get,
        "/hospital-dashboard/bed-availability",
        200,
        serde_json::json!({
            "hospital": {
                "name": "Grey Sloan Memorial",
                "bedDetails": {},
                "availableBeds": available,
                "totalBeds": total,
            }
        })
        .to_string(),
    );
}

#[given(expr = "the server reports {int} free and {int} occupied ambulances")]
fn server_reports_ambulances(world: &mut HospitalDashboardWorld, free: u64, occupied: u64) {
    world.http.respond(
        Method::Get,
        "/hospital-dashboard/ambulance-status",
        200,
        serde_json::json!({ "summary": { "free": free, "occupied": occupied } }).to_string(),
    );
}

#[given(expr = "the server knows me as {string} at {string}")]
fn server_knows_me(world: &mut HospitalDashboardWorld, name: String, hospital: String) {
    world.http.respond(
        Method::Get,
        "/hospital-dashboard/staff/me",
        200,
        serde_json::json!({
            "staff": {
                "name": name,
                "email": "staff@hospital.test",
                "role": "staff",
                "hospitalId": { "name": hospital },
            }
        })
        .to_string(),
    );
}

#[when("the dashboard refreshes")]
async fn dashboard_refreshes(world: &mut HospitalDashboardWorld) {
    let view = world.app().dashboard();
    view.refresh().await;
    world.dashboard = Some(view);
}

#[then(
    expr = "the dashboard shows {int} patients, beds {string}, {int} free and {int} occupied ambulances"
)]
async fn dashboard_shows(
    world: &mut HospitalDashboardWorld,
    patients: u64,
    beds: String,
    free: u64,
    occupied: u64,
) {
    let state = view(world).snapshot().await;
    assert!(!state.loading);
    assert_eq!(
        state.stats,
        Some(DashboardStats {
            patients,
            beds,
            ambulances_free: free,
            ambulances_occupied: occupied,
        })
    );
}

#[then(expr = "{int} recent patients are listed")]
async fn recent_listed(world: &mut HospitalDashboardWorld, count: usize) {
    let state = view(world).snapshot().await;
    assert_eq!(state.recent_patients.len(), count);
    assert_eq!(state.recent_patients[0].ride_id, "ride-0");
}

#[then(expr = "the greeting names {string} at {string}")]
async fn greeting_names(world: &mut HospitalDashboardWorld, name: String, hospital: String) {
    let text = render_dashboard(&view(world).snapshot().await);
    assert!(text.contains(&format!("Hello, {}", name)), "{}", text);
    assert!(text.contains(&format!("dashboard for {}", hospital)), "{}", text);
    assert!(text.contains("Daily Checklist"));
}

#[then(expr = "the dashboard error is {string}")]
async fn dashboard_error(world: &mut HospitalDashboardWorld, message: String) {
    assert_eq!(view(world).snapshot().await.error, Some(message));
}

#[then("no dashboard stats are shown")]
async fn no_stats(world: &mut HospitalDashboardWorld) {
    let state = view(world).snapshot().await;
    assert!(state.stats.is_none());
    assert!(state.recent_patients.is_empty());
}
