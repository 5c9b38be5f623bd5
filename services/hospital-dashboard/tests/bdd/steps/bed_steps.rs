//! BDD step definitions for the bed availability editor

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use hospital_dashboard::io::Method;
use hospital_dashboard::views::{BedEditorMode, BedField, BedsView};

use super::table_rows;
use crate::world::HospitalDashboardWorld;

const BEDS_PATH: &str = "/hospital-dashboard/bed-availability";

fn hospital_body(step: &Step) -> String {
    let mut details = serde_json::Map::new();
    let (mut available, mut total) = (0u64, 0u64);
    for row in table_rows(step) {
        let a: u64 = row[1].parse().expect("numeric available");
        let t: u64 = row[2].parse().expect("numeric total");
        available += a;
        total += t;
        details.insert(row[0].clone(), serde_json::json!({ "available": a, "total": t }));
    }
    serde_json::json!({
        "hospital": {
            "name": "Grey Sloan Memorial",
            "bedDetails": details,
            "availableBeds": available,
            "totalBeds": total,
        }
    })
    .to_string()
}

fn parse_field(s: &str) -> BedField {
    match s {
        "available" => BedField::Available,
        "total" => BedField::Total,
        other => panic!("Unknown bed field: {}", other),
    }
}

fn view(world: &HospitalDashboardWorld) -> &BedsView {
    world.beds.as_ref().expect("bed screen loaded")
}

#[given("the hospital reports beds")]
fn hospital_reports_beds(world: &mut HospitalDashboardWorld, step: &Step) {
    world
        .http
        .respond(Method::Get, BEDS_PATH, 200, hospital_body(step));
}

#[given("the server saves beds as")]
fn server_saves_beds(world: &mut HospitalDashboardWorld, step: &Step) {
    world
        .http
        .respond(Method::Put, BEDS_PATH, 200, hospital_body(step));
}

#[given("the server fails bed updates")]
fn server_fails_updates(world: &mut HospitalDashboardWorld) {
    world
        .http
        .respond(Method::Put, BEDS_PATH, 500, r#"{"error": "database offline"}"#);
}

#[given("the bed availability screen is loaded")]
async fn screen_loaded(world: &mut HospitalDashboardWorld) {
    let view = world.app().beds();
    view.load().await;
    world.beds = Some(view);
}

#[when("I start editing")]
async fn start_editing(world: &mut HospitalDashboardWorld) {
    view(world).begin_edit().await.expect("can start editing");
}

#[when(expr = "I set {string} {word} to {string}")]
async fn set_count(world: &mut HospitalDashboardWorld, department: String, field: String, raw: String) {
    view(world)
        .set_count(&department, parse_field(&field), &raw)
        .await
        .expect("department is editable");
}

#[when("I cancel editing")]
async fn cancel_editing(world: &mut HospitalDashboardWorld) {
    view(world).cancel().await;
}

#[when("I save")]
async fn save(world: &mut HospitalDashboardWorld) {
    world.save_result = Some(view(world).save().await.expect("save allowed"));
}

#[then(expr = "the editor is {word}")]
async fn editor_is(world: &mut HospitalDashboardWorld, mode: String) {
    let expected = match mode.as_str() {
        "viewing" => BedEditorMode::Viewing,
        "editing" => BedEditorMode::Editing,
        other => panic!("Unknown editor mode: {}", other),
    };
    assert_eq!(view(world).snapshot().await.mode, expected);
}

#[then(expr = "{string} shows {int} available of {int}")]
async fn shows_counts(world: &mut HospitalDashboardWorld, department: String, available: u32, total: u32) {
    let state = view(world).snapshot().await;
    let count = state
        .displayed()
        .and_then(|d| d.get(&department).copied())
        .expect("department displayed");
    assert_eq!((count.available, count.total), (available, total));
}

#[then("the save succeeded")]
fn save_succeeded(world: &mut HospitalDashboardWorld) {
    assert_eq!(world.save_result, Some(true));
}

#[then("the save failed")]
fn save_failed(world: &mut HospitalDashboardWorld) {
    assert_eq!(world.save_result, Some(false));
}

#[then(expr = "the bed error is {string}")]
async fn bed_error_is(world: &mut HospitalDashboardWorld, message: String) {
    assert_eq!(view(world).snapshot().await.error, Some(message));
}

#[then(expr = "the editable departments are {string}")]
async fn editable_departments_are(world: &mut HospitalDashboardWorld, expected: String) {
    let expected: Vec<String> = expected.split(", ").map(str::to_string).collect();
    assert_eq!(view(world).snapshot().await.editable_departments(), expected);
}

#[then(expr = "{string} is flagged over capacity")]
async fn flagged_over_capacity(world: &mut HospitalDashboardWorld, department: String) {
    assert_eq!(view(world).snapshot().await.over_capacity(), vec![department]);
}

#[then(expr = "the last update sent {string} as {int} available of {int}")]
fn last_update_sent(world: &mut HospitalDashboardWorld, department: String, available: u32, total: u32) {
    let put = world
        .http
        .requests()
        .into_iter()
        .rev()
        .find(|r| r.method == Method::Put)
        .expect("an update was sent");
    let body = put.body.expect("update has a body");
    assert_eq!(
        body["bedDetails"][department.as_str()],
        serde_json::json!({ "available": available, "total": total })
    );
    assert_eq!(body["bedDetails"].as_object().map(|m| m.len()), Some(2));
}
