use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use userdesk_backend_api::build_router;
use userdesk_backend_runtime::{seed, telemetry, BackendServices};
use userdesk_config::load as load_config;

#[derive(Parser)]
#[command(name = "userdesk-backend")]
#[command(about = "Userdesk user management backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Register the sample users
    Seed,
    /// Print every user in the database
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&config).await,
        Commands::Migrate => migrate(&config).await,
        Commands::Seed => seed_users(&config).await,
        Commands::ListUsers => list_users(&config).await,
    }
}

async fn run_server(config: &userdesk_config::AppConfig) -> anyhow::Result<()> {
    info!("starting Userdesk backend");

    let services = BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")?;
    let app = build_router(services.state.clone());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(userdesk_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn migrate(config: &userdesk_config::AppConfig) -> anyhow::Result<()> {
    let pool = userdesk_database::initialize_database(&config.database)
        .await
        .context("failed to migrate database")?;
    pool.close().await;

    println!("Database at {} is up to date", config.database.url);
    Ok(())
}

async fn seed_users(config: &userdesk_config::AppConfig) -> anyhow::Result<()> {
    info!("seeding database with sample users");

    let services = BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")?;

    let report = seed::seed_sample_users(services.state.users()).await?;

    println!("Seeding finished:");
    println!("- {} users created", report.created);
    println!("- {} users already present", report.skipped);
    println!("Sample users log in with password '{}'", seed::SEED_PASSWORD);
    Ok(())
}

async fn list_users(config: &userdesk_config::AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")?;

    let users = services
        .state
        .users()
        .list()
        .await
        .context("failed to fetch users")?;

    if users.is_empty() {
        println!("No users found in database");
        return Ok(());
    }

    println!("Found {} users:", users.len());
    println!(
        "{:<5} {:<25} {:<15} {:<30} {:<20} {:<25}",
        "ID", "Name", "Username", "Email", "City", "Company"
    );
    println!("{}", "-".repeat(125));

    for user in users {
        println!(
            "{:<5} {:<25} {:<15} {:<30} {:<20} {:<25}",
            user.id,
            user.name,
            user.username,
            user.email,
            user.address
                .as_ref()
                .map(|address| address.city.as_str())
                .unwrap_or("NULL"),
            user.company
                .as_ref()
                .map(|company| company.name.as_str())
                .unwrap_or("NULL"),
        );
    }

    Ok(())
}
