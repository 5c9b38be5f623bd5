//! View controllers: per-screen state over the hospital API
//!
//! Each view owns its state behind a lock and re-fetches independently; no
//! state is shared between views. Remote failures are caught here and turned
//! into the messages the screens display.

pub mod beds;
pub mod dashboard;
pub mod login;
pub mod my_info;
pub mod patients;
pub mod register;

use std::time::Duration;

use crate::guard::Route;

pub use beds::{BedEditorMode, BedField, BedsState, BedsView};
pub use dashboard::{DashboardState, DashboardStats, DashboardView};
pub use login::{LoginState, LoginView};
pub use my_info::{MyInfoState, MyInfoView};
pub use patients::{PatientsState, PatientsView};
pub use register::{RegisterState, RegisterView, RegistrationForm};

/// What a view asks the shell to do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    To(Route),
    After { delay: Duration, route: Route },
}
