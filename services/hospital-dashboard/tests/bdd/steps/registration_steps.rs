//! BDD step definitions for staff registration

use std::time::Duration;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use hospital_dashboard::guard::Route;
use hospital_dashboard::io::Method;
use hospital_dashboard::models::StaffRole;
use hospital_dashboard::views::{Navigation, RegisterView, RegistrationForm};

use super::{ids, table_rows};
use crate::world::HospitalDashboardWorld;

const CREATE_PATH: &str = "/hospital-dashboard/staff/create";

fn view(world: &HospitalDashboardWorld) -> &RegisterView {
    world.register.as_ref().expect("registration screen loaded")
}

#[given("the hospital list")]
fn hospital_list(world: &mut HospitalDashboardWorld, step: &Step) {
    let hospitals: Vec<_> = table_rows(step)
        .into_iter()
        .map(|row| serde_json::json!({ "_id": row[0], "name": row[1] }))
        .collect();
    world.http.respond(
        Method::Get,
        "/hospitals",
        200,
        serde_json::json!({ "hospitals": hospitals }).to_string(),
    );
}

#[given("the registration screen is loaded")]
async fn registration_loaded(world: &mut HospitalDashboardWorld) {
    let view = world.app().register();
    view.load_hospitals().await;
    world.register = Some(view);
}

#[given("the server accepts new staff")]
fn server_accepts_staff(world: &mut HospitalDashboardWorld) {
    world
        .http
        .respond(Method::Post, CREATE_PATH, 201, r#"{"message": "Staff created"}"#);
}

#[when(expr = "I search hospitals for {string}")]
async fn search_hospitals(world: &mut HospitalDashboardWorld, query: String) {
    view(world).set_search(&query).await;
}

#[when(expr = "I select hospital {string}")]
async fn select_hospital(world: &mut HospitalDashboardWorld, id: String) {
    view(world).select(&id).await.expect("hospital is listed");
}

#[when(expr = "I fill the registration form for {string}")]
async fn fill_form(world: &mut HospitalDashboardWorld, email: String) {
    view(world)
        .fill(RegistrationForm {
            name: "Meredith Grey".to_string(),
            email,
            password: "Secret1!".to_string(),
            phone: "555-0100".to_string(),
            role: StaffRole::Staff,
        })
        .await;
}

#[when("I submit the registration")]
async fn submit_registration(world: &mut HospitalDashboardWorld) {
    world.navigation = Some(view(world).submit().await);
}

#[then(expr = "the suggestions are {string}")]
async fn suggestions_are(world: &mut HospitalDashboardWorld, expected: String) {
    let actual: Vec<String> = view(world)
        .suggestions()
        .await
        .into_iter()
        .map(|h| h.id)
        .collect();
    assert_eq!(actual, ids(&expected));
}

#[then("there are no suggestions")]
async fn no_suggestions(world: &mut HospitalDashboardWorld) {
    assert!(view(world).suggestions().await.is_empty());
}

#[then(expr = "the search box shows {string}")]
async fn search_box_shows(world: &mut HospitalDashboardWorld, text: String) {
    assert_eq!(view(world).snapshot().await.search, text);
}

#[then(expr = "the registration error is {string}")]
async fn registration_error(world: &mut HospitalDashboardWorld, message: String) {
    assert_eq!(view(world).snapshot().await.error, Some(message));
}

#[then(expr = "the registration message is {string}")]
async fn registration_message(world: &mut HospitalDashboardWorld, message: String) {
    assert_eq!(view(world).snapshot().await.success, Some(message));
}

#[then("no account was created")]
fn no_account_created(world: &mut HospitalDashboardWorld) {
    assert_eq!(world.http.count(Method::Post, CREATE_PATH), 0);
    assert_eq!(world.navigation, Some(Navigation::Stay));
}

#[then(expr = "exactly one account was created for hospital {string}")]
fn one_account_created(world: &mut HospitalDashboardWorld, hospital_id: String) {
    let creates: Vec<_> = world
        .http
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Post && r.path == CREATE_PATH)
        .collect();
    assert_eq!(creates.len(), 1);
    let body = creates[0].body.as_ref().expect("create has a body");
    assert_eq!(body["hospitalId"], hospital_id);
    assert_eq!(body["role"], "staff");
}

#[then(expr = "I am sent to {string} after {int} seconds")]
fn sent_after(world: &mut HospitalDashboardWorld, path: String, seconds: u64) {
    let route: Route = path.parse().expect("known route");
    assert_eq!(
        world.navigation,
        Some(Navigation::After {
            delay: Duration::from_secs(seconds),
            route,
        })
    );
}
