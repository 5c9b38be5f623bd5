//! BDD step definitions for the hospital dashboard

pub mod bed_steps;
pub mod dashboard_steps;
pub mod registration_steps;
pub mod sorting_steps;

use cucumber::gherkin::Step;

/// Data rows of a step table, header skipped
pub fn table_rows(step: &Step) -> Vec<Vec<String>> {
    step.table
        .as_ref()
        .expect("step has a data table")
        .rows
        .iter()
        .skip(1)
        .cloned()
        .collect()
}

pub fn ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
