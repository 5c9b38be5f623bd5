//! BDD step definitions for incoming patient ordering

use std::sync::Arc;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use hospital_dashboard::io::Method;
use hospital_dashboard::models::PatientRide;
use hospital_dashboard::poller::Refresh;
use hospital_dashboard::sorting::{sort_patients, SortKey};

use super::{ids, table_rows};
use crate::world::HospitalDashboardWorld;

fn parse_key(s: &str) -> SortKey {
    match s {
        "priority" => SortKey::Priority,
        "eta" => SortKey::Eta,
        "time" => SortKey::Time,
        other => panic!("Unknown sort key: {}", other),
    }
}

fn ride_json(row: &[String]) -> serde_json::Value {
    let mut ride = serde_json::json!({
        "rideId": row[0],
        "patient": {"name": format!("Patient {}", row[0])},
        "condition": {"description": "Trauma"},
        "ambulance": {},
        "status": "en_route",
        "timeToArrival": row[2].parse::<f64>().expect("numeric eta"),
    });
    if !row[1].is_empty() {
        ride["condition"]["priority"] = serde_json::Value::String(row[1].clone());
    }
    if !row[3].is_empty() {
        ride["createdAt"] = serde_json::Value::String(row[3].clone());
    }
    ride
}

#[given("the incoming patients")]
fn the_incoming_patients(world: &mut HospitalDashboardWorld, step: &Step) {
    let rides: Vec<serde_json::Value> = table_rows(step).iter().map(|r| ride_json(r)).collect();

    world.rides = rides
        .iter()
        .map(|r| serde_json::from_value::<PatientRide>(r.clone()).expect("valid ride"))
        .collect();
    world.http.respond(
        Method::Get,
        "/hospital-dashboard/incoming-patients",
        200,
        serde_json::json!({ "count": rides.len(), "patients": rides }).to_string(),
    );
}

#[when(expr = "the list is sorted by {string}")]
fn sorted_by(world: &mut HospitalDashboardWorld, key: String) {
    world.sorted = sort_patients(&world.rides, parse_key(&key));
}

#[when(expr = "the patient screen loads sorted by {string}")]
async fn screen_sorted_by(world: &mut HospitalDashboardWorld, key: String) {
    let view = Arc::new(world.app().patients());
    view.refresh().await;
    view.set_sort(parse_key(&key)).await;
    world.sorted = view.sorted().await;
    world.patients = Some(view);
}

#[then(expr = "the order is {string}")]
fn order_is(world: &mut HospitalDashboardWorld, expected: String) {
    let actual: Vec<String> = world.sorted.iter().map(|r| r.ride_id.clone()).collect();
    assert_eq!(actual, ids(&expected));
}

#[then("sorting again gives the same order")]
fn sorting_again(world: &mut HospitalDashboardWorld) {
    for key in [SortKey::Priority, SortKey::Eta, SortKey::Time] {
        assert_eq!(sort_patients(&world.rides, key), sort_patients(&world.rides, key));
    }
}

#[then("the fetched list keeps server order")]
async fn fetched_keeps_order(world: &mut HospitalDashboardWorld) {
    let state = world.patients.as_ref().expect("screen loaded").snapshot().await;
    assert_eq!(state.patients, world.rides);
}
