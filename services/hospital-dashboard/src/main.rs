//! Hospital Dashboard CLI
//!
//! Command-line front end for hospital staff: sign in, watch incoming
//! patients and keep bed availability current.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hospital_dashboard::guard::{self, Route};
use hospital_dashboard::models::StaffRole;
use hospital_dashboard::poller::Refresh;
use hospital_dashboard::render;
use hospital_dashboard::sorting::{filter_hospitals, SortKey};
use hospital_dashboard::views::{BedField, LoginState, Navigation, RegistrationForm};
use hospital_dashboard::{load_config, watch, Config, DashboardBuilder, HospitalDashboard};
use tokio_util::sync::CancellationToken;
use tracing::Level;

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "hospital-dashboard")]
#[command(about = "Hospital staff dashboard for incoming patients and bed availability")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Session token file (overrides config file)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and keep the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the session token
    Logout,
    /// Create a staff account at a hospital
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "staff")]
        role: StaffRole,
        /// Hospital id, or a search that matches exactly one hospital
        #[arg(long)]
        hospital: String,
    },
    /// List hospitals, optionally filtered by name
    Hospitals {
        #[arg(long)]
        search: Option<String>,
    },
    /// Render any route once, as the session allows
    Open { path: String },
    /// Summary metrics and recent patients
    Dashboard {
        #[arg(long)]
        watch: bool,
    },
    /// Incoming patients
    Patients {
        #[arg(long, value_enum, default_value = "priority")]
        sort: SortKey,
        #[arg(long)]
        watch: bool,
    },
    /// Show or edit bed availability
    Beds {
        #[command(subcommand)]
        action: Option<BedsAction>,
    },
    /// Profile of the signed-in staff member
    Me,
}

#[derive(Subcommand)]
enum BedsAction {
    /// Update one department's counts
    Set {
        department: String,
        #[arg(long)]
        available: Option<String>,
        #[arg(long)]
        total: Option<String>,
    },
}

#[tokio::main]
async fn main() -> CliResult {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, base_url={:?}, session_file={:?}, log_level={:?}",
        args.config,
        args.base_url,
        args.session_file,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    if let Some(session_file) = args.session_file {
        config.session.token_file = session_file;
    }

    let app = DashboardBuilder::new(config).build()?;

    match args.command {
        Command::Login { email, password } => login(&app, &email, &password).await,
        Command::Logout => {
            app.dashboard().logout().await?;
            println!("Signed out.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Register {
            name,
            email,
            password,
            phone,
            role,
            hospital,
        } => {
            let form = RegistrationForm {
                name,
                email,
                password,
                phone,
                role,
            };
            register(&app, form, &hospital).await
        }
        Command::Hospitals { search } => hospitals(&app, search.as_deref()).await,
        Command::Open { path } => open(&app, &path).await,
        Command::Dashboard { watch } => dashboard(&app, watch).await,
        Command::Patients { sort, watch } => patients(&app, sort, watch).await,
        Command::Beds { action } => beds(&app, action).await,
        Command::Me => my_info(&app).await,
    }
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// `true` when the session allows `route`; otherwise prints the redirect
fn authorized(app: &HospitalDashboard, route: Route) -> bool {
    let resolved = guard::resolve(route, app.session());
    if resolved != route {
        println!("Not signed in. Redirecting to {}", resolved);
        return false;
    }
    true
}

fn shutdown_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
        }
    });
    cancel
}

fn redraw(text: &str) {
    print!("\x1B[2J\x1B[H");
    println!("{}", text);
}

async fn login(app: &HospitalDashboard, email: &str, password: &str) -> CliResult {
    let view = app.login();
    match view.submit(email, password).await {
        Navigation::To(route) => {
            println!("Signed in. Continue at {}", route);
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            println!("{}", render::render_login(&view.snapshot().await));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn register(app: &HospitalDashboard, form: RegistrationForm, hospital: &str) -> CliResult {
    let view = app.register();
    view.load_hospitals().await;

    if view.select(hospital).await.is_err() {
        view.set_search(hospital).await;
        let matches = view.suggestions().await;
        if let [only] = matches.as_slice() {
            view.select(&only.id).await?;
        } else {
            println!("{}", render::render_register(&view.snapshot().await));
        }
    }

    view.fill(form).await;
    let navigation = view.submit().await;
    println!("{}", render::render_register(&view.snapshot().await));

    match navigation {
        Navigation::After { delay, route } => {
            tokio::time::sleep(delay).await;
            println!("Continue at {}", route);
            Ok(ExitCode::SUCCESS)
        }
        Navigation::To(route) => {
            println!("Continue at {}", route);
            Ok(ExitCode::SUCCESS)
        }
        Navigation::Stay => Ok(ExitCode::FAILURE),
    }
}

async fn hospitals(app: &HospitalDashboard, search: Option<&str>) -> CliResult {
    let view = app.register();
    view.load_hospitals().await;
    let state = view.snapshot().await;
    if let Some(error) = &state.error {
        println!("{}", error);
        return Ok(ExitCode::FAILURE);
    }

    let listed: Vec<_> = match search {
        Some(query) => filter_hospitals(&state.hospitals, query),
        None => state.hospitals.iter().collect(),
    };
    for hospital in listed {
        println!(
            "{}  {}  {}",
            hospital.id,
            hospital.name,
            hospital.address.as_deref().unwrap_or("")
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn open(app: &HospitalDashboard, path: &str) -> CliResult {
    let requested: Route = path.parse()?;
    let route = guard::navigate(path, app.session())?;
    if route != requested {
        println!("Not signed in. Redirecting to {}", route);
    }

    match route {
        Route::Login => {
            println!("{}", render::render_login(&LoginState::default()));
            Ok(ExitCode::SUCCESS)
        }
        Route::Register => {
            let view = app.register();
            view.load_hospitals().await;
            let state = view.snapshot().await;
            println!("{}", render::render_register(&state));
            Ok(exit_code(state.error.is_some()))
        }
        Route::Dashboard => dashboard(app, false).await,
        Route::IncomingPatients => patients(app, SortKey::default(), false).await,
        Route::BedAvailability => beds(app, None).await,
        Route::MyInfo => my_info(app).await,
    }
}

async fn dashboard(app: &HospitalDashboard, watching: bool) -> CliResult {
    if !authorized(app, Route::Dashboard) {
        return Ok(ExitCode::FAILURE);
    }
    let view = Arc::new(app.dashboard());

    if watching {
        let period = app.config().polling.dashboard_interval();
        watch(view, period, shutdown_on_ctrl_c(), |view| async move {
            redraw(&render::render_dashboard(&view.snapshot().await));
        })
        .await;
        return Ok(ExitCode::SUCCESS);
    }

    view.refresh().await;
    let state = view.snapshot().await;
    println!("{}", render::render_dashboard(&state));
    Ok(exit_code(state.error.is_some()))
}

async fn patients(app: &HospitalDashboard, sort: SortKey, watching: bool) -> CliResult {
    if !authorized(app, Route::IncomingPatients) {
        return Ok(ExitCode::FAILURE);
    }
    let view = Arc::new(app.patients());
    view.set_sort(sort).await;

    if watching {
        let period = app.config().polling.patients_interval();
        watch(view, period, shutdown_on_ctrl_c(), |view| async move {
            redraw(&render::render_patients(&view.snapshot().await));
        })
        .await;
        return Ok(ExitCode::SUCCESS);
    }

    view.refresh().await;
    let state = view.snapshot().await;
    println!("{}", render::render_patients(&state));
    Ok(exit_code(state.error.is_some()))
}

async fn beds(app: &HospitalDashboard, action: Option<BedsAction>) -> CliResult {
    if !authorized(app, Route::BedAvailability) {
        return Ok(ExitCode::FAILURE);
    }
    let view = app.beds();
    view.load().await;
    if view.snapshot().await.error.is_some() {
        println!("{}", render::render_beds(&view.snapshot().await));
        return Ok(ExitCode::FAILURE);
    }

    let saved = match action {
        None => true,
        Some(BedsAction::Set {
            department,
            available,
            total,
        }) => {
            let departments = view.snapshot().await.editable_departments();
            if !departments.contains(&department) {
                eprintln!(
                    "Unknown department '{}'. Choose one of: {}",
                    department,
                    departments.join(", ")
                );
                return Ok(ExitCode::FAILURE);
            }
            view.begin_edit().await?;
            if let Some(raw) = available {
                view.set_count(&department, BedField::Available, &raw).await?;
            }
            if let Some(raw) = total {
                view.set_count(&department, BedField::Total, &raw).await?;
            }
            view.save().await?
        }
    };

    println!("{}", render::render_beds(&view.snapshot().await));
    Ok(exit_code(!saved))
}

async fn my_info(app: &HospitalDashboard) -> CliResult {
    if !authorized(app, Route::MyInfo) {
        return Ok(ExitCode::FAILURE);
    }
    let view = app.my_info();
    view.load().await;
    let state = view.snapshot().await;
    println!("{}", render::render_my_info(&state));
    Ok(exit_code(state.error.is_some()))
}
