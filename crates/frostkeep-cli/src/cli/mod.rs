//! CLI entry and dispatch.
//!
//! Every subcommand is a navigation intent: it maps to a route, the route
//! guard decides against the rehydrated session, and only then does the
//! command render. Redirects become messages plus the overview, mirroring
//! the web client's behavior.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use frostkeep_core::api::auth::AuthClient;
use frostkeep_core::api::{ApiError, Backend};
use frostkeep_core::config::Config;
use frostkeep_core::guard::{self, Route, RouteDecision};
use frostkeep_core::session::Session;
use frostkeep_core::session::store::SessionStore;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "frostkeep")]
#[command(version)]
#[command(about = "Freezer inventory client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in to the backend
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Password (falls back to FROSTKEEP_PASSWORD)
        #[arg(short, long, env = "FROSTKEEP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the current session
    Whoami,

    /// Show item counts and what expires soon
    Dashboard,

    /// Inventory items
    Items {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Item categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Account administration
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Photo and CSV uploads
    Files {
        #[command(subcommand)]
        command: FileCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Expiry semantics flag for item commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ExpiryKind {
    /// Hard limit ("use by")
    UseBy,
    /// Quality guideline ("best before")
    BestBefore,
}

impl From<ExpiryKind> for frostkeep_core::api::types::ExpiryType {
    fn from(kind: ExpiryKind) -> Self {
        match kind {
            ExpiryKind::UseBy => Self::UseBy,
            ExpiryKind::BestBefore => Self::BestBefore,
        }
    }
}

#[derive(clap::Subcommand)]
enum ItemCommands {
    /// List items, optionally narrowed to a category
    List {
        /// Category name to filter by
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one item
    Get {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Add an item
    Add {
        /// Item name
        name: String,

        /// Category name
        #[arg(long)]
        category: String,

        /// Quantity, validated against the category's bounds and step
        #[arg(long)]
        quantity: f64,

        /// Unit (defaults to the category's unit)
        #[arg(long)]
        unit: Option<String>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: Option<chrono::NaiveDate>,

        /// Expiry semantics
        #[arg(long, value_enum, default_value = "best-before")]
        expiry_type: ExpiryKind,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Photo to upload and attach
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Update an item
    Edit {
        #[arg(value_name = "ID")]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        quantity: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: Option<chrono::NaiveDate>,

        #[arg(long, value_enum)]
        expiry_type: Option<ExpiryKind>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an item
    Rm {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Search items by name
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// List items expiring within a window
    Expiring {
        /// Days ahead (defaults to the configured warning window)
        #[arg(long)]
        days: Option<u32>,
    },
    /// List items past their expiry date
    Expired,
    /// Show aggregate item counts
    Stats,
    /// Bulk-import items from a CSV file
    Import {
        /// CSV file to upload
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Import rows that failed validation too
        #[arg(long)]
        keep_invalid: bool,

        /// Show the preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(clap::Subcommand)]
enum CategoryCommands {
    /// List categories
    List,
    /// Show one category
    Get {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Create a category (administrators only)
    Add {
        /// Category name
        name: String,

        /// Display icon
        #[arg(long)]
        icon: Option<String>,

        /// Default unit for items in this category
        #[arg(long, default_value = "Stück")]
        unit: String,

        /// Quantity step
        #[arg(long, default_value_t = 1.0)]
        step: f64,

        /// Smallest allowed quantity
        #[arg(long, default_value_t = 0.0)]
        min: f64,

        /// Largest allowed quantity
        #[arg(long, default_value_t = 1000.0)]
        max: f64,
    },
    /// Update a category (administrators only)
    Edit {
        #[arg(value_name = "ID")]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        step: Option<f64>,

        #[arg(long)]
        min: Option<f64>,

        #[arg(long)]
        max: Option<f64>,
    },
    /// Delete a category (administrators only)
    Rm {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum UserCommands {
    /// List accounts
    List,
    /// Show one account
    Get {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Create an account
    Add {
        /// Account name
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "FROSTKEEP_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        /// Role: USER or ADMIN
        #[arg(long, default_value = "USER")]
        role: String,
    },
    /// Delete an account
    Rm {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(clap::Subcommand)]
enum FileCommands {
    /// Upload an item photo
    UploadImage {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Upload a CSV file and show the parsed preview
    UploadCsv {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete an uploaded photo
    DeleteImage {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the backend base URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maps a subcommand to the view it navigates to. Config management is
/// local tooling, not a view, and never reaches the guard.
fn route_for(command: &Commands) -> Route {
    match command {
        Commands::Login { .. } => Route::Login,
        Commands::Logout | Commands::Whoami | Commands::Dashboard => Route::Dashboard,
        Commands::Items { .. } => Route::Items,
        Commands::Categories { command } => match command {
            CategoryCommands::List | CategoryCommands::Get { .. } => Route::Categories,
            CategoryCommands::Add { .. }
            | CategoryCommands::Edit { .. }
            | CategoryCommands::Rm { .. } => Route::CategoryAdmin,
        },
        Commands::Users { .. } => Route::UserAdmin,
        Commands::Files { .. } => Route::Files,
        Commands::Config { .. } => Route::Dashboard,
    }
}

/// Shared handle for commands behind the guard.
pub(crate) struct AppContext {
    pub config: Config,
    pub backend: Backend,
    pub token: String,
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    // Config management needs no backend or session.
    if let Commands::Config { command } = &cli.command {
        return commands::config::run(command);
    }

    let backend = Backend::from_config(&config)?;
    let auth = AuthClient::new(backend.clone());
    let mut session = Session::new(SessionStore::new());

    // Rehydration completes before the first route decision.
    session.initialize(&auth).await;
    tracing::debug!(phase = ?session.phase(), "session ready");

    let route = route_for(&cli.command);
    match guard::decide(route, &session) {
        RouteDecision::Render(_) => {}
        RouteDecision::Loading => {
            // initialize() settles the session before any decision is made.
            anyhow::bail!("session is still initializing");
        }
        RouteDecision::RedirectToLogin => {
            anyhow::bail!("You are not signed in. Run 'frostkeep login' first.");
        }
        RouteDecision::RedirectToDashboard => {
            if matches!(cli.command, Commands::Login { .. }) {
                let username = session.user().map_or("?", |user| user.username.as_str());
                println!("Already signed in as {username}.");
            } else {
                println!(
                    "The {} view requires the administrator role; showing the overview instead.",
                    route.label()
                );
            }
            let ctx = app_context(&config, &backend, &session)?;
            return commands::status::overview(&ctx).await;
        }
    }

    let result = match cli.command {
        Commands::Login { username, password } => {
            commands::login::sign_in(&mut session, &auth, username, password).await
        }
        Commands::Logout => commands::login::sign_out(&mut session),
        Commands::Whoami => commands::status::whoami(&session),
        Commands::Dashboard => {
            let ctx = app_context(&config, &backend, &session)?;
            commands::status::overview(&ctx).await
        }
        Commands::Items { command } => {
            let ctx = app_context(&config, &backend, &session)?;
            commands::items::run(command, &ctx).await
        }
        Commands::Categories { command } => {
            let ctx = app_context(&config, &backend, &session)?;
            commands::categories::run(command, &ctx).await
        }
        Commands::Users { command } => {
            let ctx = app_context(&config, &backend, &session)?;
            commands::users::run(command, &ctx).await
        }
        Commands::Files { command } => {
            let ctx = app_context(&config, &backend, &session)?;
            commands::files::run(command, &ctx).await
        }
        // Handled before the guard.
        Commands::Config { .. } => Ok(()),
    };

    // A 401 on any protected call means the session expired server-side.
    if let Err(err) = result {
        if let Some(api_err) = err.downcast_ref::<ApiError>() {
            if session.handle_unauthorized(api_err) {
                return Err(err.context("Session expired. Run 'frostkeep login' to sign in again"));
            }
        }
        return Err(err);
    }

    Ok(())
}

fn app_context(config: &Config, backend: &Backend, session: &Session) -> Result<AppContext> {
    let token = session
        .token()
        .context("not signed in")?
        .to_string();
    Ok(AppContext {
        config: config.clone(),
        backend: backend.clone(),
        token,
    })
}
