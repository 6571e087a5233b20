mod error;
mod paths;
mod redirect;
mod screens;

use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use toto_lib::ApiClient;
use toto_lib::auth::SessionTokens;
use toto_lib::config::BaseUrlConfig;
use toto_lib::model::Id;
use toto_lib::model::PricingConfig;
use toto_lib::storage::SqliteStorage;
use toto_lib::storage::Storage;

use crate::error::CliError;
use crate::redirect::TerminalRedirect;
use crate::screens::RowCommand;
use crate::screens::Screen;
use crate::screens::ViewArgs;

/// Local ToTo admin console.
#[derive(Parser)]
#[command(name = "toto-admin", version, about = "Local ToTo admin console")]
struct Cli {
    /// Admin API base URL, e.g. https://api.localtoto.in/api
    #[arg(long, global = true, env = "TOTO_API_URL")]
    api_url: Option<String>,

    /// Development proxy URL, used when no API URL is configured
    #[arg(long, global = true, env = "TOTO_DEV_PROXY")]
    dev_proxy: Option<String>,

    /// Host of the API when neither URL is set (port 4000, prefix /api)
    #[arg(long, global = true, env = "TOTO_API_HOST")]
    host: Option<String>,

    /// Directory holding session.db
    #[arg(long, global = true, env = "TOTO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store admin tokens issued by the backend
    Login {
        #[arg(long)]
        access: String,
        #[arg(long)]
        refresh: Option<String>,
    },

    /// Forget the stored tokens
    Logout,

    /// Show dashboard counters
    Stats,

    /// List rides
    Rides(ViewArgs),

    /// List riders
    Riders(ViewArgs),

    /// List passenger accounts
    Users(ViewArgs),

    /// List contact messages
    Messages(ViewArgs),

    /// List driver applications
    Applications(ViewArgs),

    /// Remove a ride
    RemoveRide { id: String },

    /// Mark a rider as verified
    VerifyRider { id: String },

    /// Approve a driver application
    Approve { id: String },

    /// Reject a driver application
    Reject { id: String },

    /// Show or change fare settings
    Pricing {
        #[command(subcommand)]
        command: PricingCommand,
    },
}

#[derive(Subcommand)]
enum PricingCommand {
    /// Show the current fares
    Show,

    /// Change one or more fares
    Set {
        #[arg(long)]
        base_fare: Option<f64>,
        #[arg(long)]
        per_km: Option<f64>,
        #[arg(long)]
        per_minute: Option<f64>,
        #[arg(long)]
        minimum_fare: Option<f64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        log::error!("{}", err);
        eprintln!("Error: {}", err.user_message());
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    paths::rotate_logs();

    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match File::create(&path) {
        Ok(file) => {
            if let Err(err) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Warning: failed to initialize logger: {}", err);
            }
        }
        Err(err) => eprintln!("Warning: failed to create {}: {}", path.display(), err),
    }
}

async fn open_client(cli: &Cli) -> Result<ApiClient, CliError> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => paths::data_dir().ok_or(CliError::NoDataDir)?,
    };
    fs::create_dir_all(&data_dir).map_err(|source| CliError::CreateDir {
        path: data_dir.clone(),
        source,
    })?;

    let storage = SqliteStorage::open(paths::session_db(&data_dir)).await?;

    let config = BaseUrlConfig {
        configured: cli.api_url.clone(),
        dev_proxy: cli.dev_proxy.clone(),
        host: cli.host.clone(),
    };

    let client = ApiClient::builder()
        .base_url(config.resolve()?)
        .storage(Storage::new(storage))
        .login_redirect(TerminalRedirect)
        .timeout(Duration::from_secs(cli.timeout))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = open_client(&cli).await?;

    match cli.command {
        Commands::Login { access, refresh } => {
            client
                .session()
                .sign_in(SessionTokens::new(access, refresh))
                .await?;
            println!("Signed in.");
        }
        Commands::Logout => {
            client.session().clear().await?;
            println!("Signed out.");
        }
        Commands::Stats => screens::show_stats(&client).await?,
        Commands::Rides(args) => screens::show_list(&client, Screen::Rides, args).await?,
        Commands::Riders(args) => screens::show_list(&client, Screen::Riders, args).await?,
        Commands::Users(args) => screens::show_list(&client, Screen::Users, args).await?,
        Commands::Messages(args) => screens::show_list(&client, Screen::Messages, args).await?,
        Commands::Applications(args) => {
            screens::show_list(&client, Screen::Applications, args).await?
        }
        Commands::RemoveRide { id } => run_command(&client, RowCommand::RemoveRide, id).await?,
        Commands::VerifyRider { id } => run_command(&client, RowCommand::VerifyRider, id).await?,
        Commands::Approve { id } => run_command(&client, RowCommand::Approve, id).await?,
        Commands::Reject { id } => run_command(&client, RowCommand::Reject, id).await?,
        Commands::Pricing { command } => match command {
            PricingCommand::Show => screens::show_pricing(&client).await?,
            PricingCommand::Set {
                base_fare,
                per_km,
                per_minute,
                minimum_fare,
            } => {
                if base_fare.is_none()
                    && per_km.is_none()
                    && per_minute.is_none()
                    && minimum_fare.is_none()
                {
                    return Err(CliError::EmptyPricingUpdate);
                }
                let current = client.pricing().await?;
                let next = PricingConfig {
                    base_fare: base_fare.unwrap_or(current.base_fare),
                    per_km: per_km.unwrap_or(current.per_km),
                    per_minute: per_minute.unwrap_or(current.per_minute),
                    minimum_fare: minimum_fare.unwrap_or(current.minimum_fare),
                };
                let saved = client.update_pricing(next).await?;
                println!("Pricing saved.");
                screens::print_pricing(&saved);
            }
        },
    }

    Ok(())
}

async fn run_command(client: &ApiClient, command: RowCommand, id: String) -> Result<(), CliError> {
    let ack = command.run(client, &Id::new(id)).await?;
    screens::print_ack(&ack, command.done_message());
    Ok(())
}
