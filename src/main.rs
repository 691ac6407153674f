use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sweep_cli::api::{NewRequest, RequestStatus};
use sweep_cli::views;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), env!("SWEEP_VERSION_SUFFIX"));

#[derive(Parser)]
#[command(name = "sweep")]
#[command(author, version = VERSION, about = "Sweep - CLI client for the cleaning-service API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        /// Account email
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create a new user account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the persisted session
    Logout,

    /// Show the persisted session
    Whoami,

    /// Submit a new cleaning request
    Submit {
        /// Requester name
        #[arg(long)]
        name: String,

        /// Contact phone, exactly 10 digits
        #[arg(long)]
        phone: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Room number
        #[arg(long = "room")]
        room_no: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// Service type (e.g. deep-clean)
        #[arg(long = "service")]
        service_type: String,

        /// Optional map link
        #[arg(long)]
        location_url: Option<String>,
    },

    /// List requests
    List {
        /// Which view: all, pending, mine, staff
        #[arg(short, long, default_value = "all")]
        scope: String,
    },

    /// Approve a pending request
    Approve {
        /// Request id
        id: i64,
    },

    /// Reject a pending request
    Reject {
        /// Request id
        id: i64,
    },

    /// Set an arbitrary status via the generic update endpoint
    SetStatus {
        /// Request id
        id: i64,

        /// Target status (e.g. COMPLETED)
        status: String,
    },

    /// Assign a staff member to a request
    Assign {
        /// Request id
        id: i64,

        /// Staff name
        name: String,

        /// Staff email
        email: String,
    },

    /// Delete a request
    Delete {
        /// Request id
        id: i64,
    },

    /// Show the staff directory
    Staff,

    /// Show request counters
    Stats,

    /// One-shot dashboard for the logged-in role
    Dashboard,

    /// Live dashboard, re-fetched on an interval
    Watch {
        /// Refresh interval in seconds (default from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sweep_cli=debug"
    } else {
        "sweep_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Login { email, password } => {
            views::run_login(&email, password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            views::run_register(&name, &email, password).await?;
        }
        Commands::Logout => {
            views::run_logout()?;
        }
        Commands::Whoami => {
            views::run_whoami()?;
        }
        Commands::Submit {
            name,
            phone,
            email,
            room_no,
            address,
            service_type,
            location_url,
        } => {
            let form = NewRequest {
                user_id: None,
                name,
                email,
                phone,
                room_no,
                address,
                location_url,
                service_type,
            };
            views::run_submit(form).await?;
        }
        Commands::List { scope } => {
            views::run_list(&scope).await?;
        }
        Commands::Approve { id } => {
            views::run_transition(id, RequestStatus::Approved).await?;
        }
        Commands::Reject { id } => {
            views::run_transition(id, RequestStatus::Rejected).await?;
        }
        Commands::SetStatus { id, status } => {
            views::run_transition(id, RequestStatus::parse(&status)).await?;
        }
        Commands::Assign { id, name, email } => {
            views::run_assign(id, &name, &email).await?;
        }
        Commands::Delete { id } => {
            views::run_delete(id).await?;
        }
        Commands::Staff => {
            views::run_staff().await?;
        }
        Commands::Stats => {
            views::run_stats().await?;
        }
        Commands::Dashboard => {
            views::run_dashboard().await?;
        }
        Commands::Watch { interval } => {
            views::run_watch(interval).await?;
        }
    }

    Ok(())
}
