use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use payment_onboarding::client::OnboardingProfile;
use payment_onboarding::forms::definitions::profile_entries;
use payment_onboarding::forms::{fields, profile_form, FormState};
use payment_onboarding::pages::{DepositPage, HistoryPage, WithdrawPage};
use payment_onboarding::status::{dispatch, RemoteCallResult, UiStatus};
use payment_onboarding::{
    ClientConfig, LookupOutcome, PaymentApiClient, Route, RoutingLookupClient,
    RoutingNumberLookup, SessionContext, UserId,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const LOGIN_REQUIRED: &str = "User ID not found. Please log in again.";

#[derive(Parser, Debug)]
#[command(name = "payment-onboarding", version, about = "Payment onboarding client")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Payment backend base URL, overrides the configuration.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[arg(long, global = true, env = "PAYMENT_USER_ID")]
    user_id: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shows the connect account and customer ids for the user.
    Account,
    /// Creates a connect account for the user.
    CreateAccount,
    /// Shows the available balance.
    Balance,
    /// Deposits an amount given in major units, e.g. 12.50.
    Deposit { amount: String },
    /// Withdraws an amount given in major units to the payout bank.
    Withdraw { amount: String },
    /// Lists past transactions.
    History,
    /// Resolves a routing number to its bank name.
    Lookup { routing_number: String },
    /// Validates and submits an onboarding profile read from a JSON file.
    SubmitProfile { file: PathBuf },
    /// Parses a navigable route path.
    Route { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(user_id) = cli.user_id {
        config.session.user_id = Some(user_id);
    }
    log::debug!("using payment API at {}", config.api.base_url);

    match &cli.command {
        Commands::Lookup { routing_number } => lookup(&config, routing_number).await,
        Commands::Route { path } => route(path),
        command => {
            let session = require_session(&config);
            run_session_command(command, session, PaymentApiClient::from_config(&config)).await
        }
    }
}

/// Every backend call is made on behalf of a user; without one there is
/// nothing to do but ask for a new login.
fn require_session(config: &ClientConfig) -> SessionContext {
    match config.session() {
        Some(session) => session,
        None => {
            eprintln!("{}", LOGIN_REQUIRED);
            process::exit(1);
        }
    }
}

async fn run_session_command(
    command: &Commands,
    session: SessionContext,
    client: PaymentApiClient,
) -> Result<()> {
    match command {
        Commands::Account => {
            let details = client.get_stripe_user_details(session.user_id).await?;
            println!("👤 User {}", session.user_id);
            println!("  connect account: {}", details.connect_id.as_deref().unwrap_or("-"));
            println!("  customer:        {}", details.customer_id.as_deref().unwrap_or("-"));
        }
        Commands::CreateAccount => {
            let response = client.create_connect_account(session.user_id).await?;
            println!("✅ Connect account created: {}", response.account_id);
            if let Some(message) = response.message {
                println!("  {}", message);
            }
        }
        Commands::Balance => {
            let mut page = DepositPage::new(session, client);
            page.load().await;
            finish(&page.status)?;
            match page.balance_display() {
                Some(balance) => println!("💰 Available balance: {}", balance),
                None => println!("💰 Available balance: unknown"),
            }
        }
        Commands::Deposit { amount } => {
            let mut page = DepositPage::new(session, client);
            page.load().await;
            page.set_amount(amount.as_str());
            page.deposit_funds().await;
            finish(&page.status)?;
            if let Some(balance) = page.balance_display() {
                println!("💰 Available balance: {}", balance);
            }
        }
        Commands::Withdraw { amount } => {
            let mut page = WithdrawPage::new(session, client);
            page.load().await;
            if let Some(account) = &page.payout_account {
                println!("🏦 Payout account: {}", account);
            }
            page.set_amount(amount.as_str());
            page.withdraw_funds().await;
            finish(&page.status)?;
            if let Some(alert) = page.status.take_alert() {
                println!("  {}", alert);
            }
        }
        Commands::History => {
            let mut page = HistoryPage::new(session, client);
            page.load().await;
            finish(&page.status)?;
            println!("📜 {} transaction(s)", page.transactions.len());
            for t in &page.transactions {
                let created = t
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {}  {:?}  {}  {:?}  {}",
                    created, t.transaction_type, t.amount, t.status, t.transaction_id
                );
            }
        }
        Commands::SubmitProfile { file } => submit_profile(session, client, file).await?,
        // Sessionless; handled in main.
        Commands::Lookup { .. } | Commands::Route { .. } => {}
    }
    Ok(())
}

async fn lookup(config: &ClientConfig, routing_number: &str) -> Result<()> {
    let lookup = RoutingNumberLookup::new(RoutingLookupClient::from_config(config));
    let Some(ticket) = lookup.observe(routing_number) else {
        bail!("Routing number must be exactly 9 digits");
    };

    match lookup.resolve(&ticket).await {
        LookupOutcome::Resolved { bank_name } => println!("🏦 {}: {}", routing_number, bank_name),
        outcome => bail!(outcome.error_message().unwrap_or("Error checking routing number")),
    }
    Ok(())
}

fn route(path: &str) -> Result<()> {
    match Route::parse(path) {
        Some(route) => {
            println!("{:?} -> {}", route, route.path());
            Ok(())
        }
        None => bail!("Unknown route: {}", path),
    }
}

async fn submit_profile(session: SessionContext, client: PaymentApiClient, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let profile: OnboardingProfile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let mut form = FormState::new(profile_form());
    for (field, value) in profile_entries(&profile) {
        form.set(field, value);
    }
    form.set_flag(fields::TOS_CONSENT, profile.tos_consent);
    form.set(fields::ACCOUNT_ID, profile.account_id.clone());

    if !form.is_valid() {
        for (field, error) in form.errors() {
            eprintln!("  🔥 {}: {}", field, error);
        }
        bail!("Profile is incomplete");
    }

    let mut status = UiStatus::new();
    match dispatch(&mut status, "submit onboarding profile", client.submit_onboarding(&profile)).await {
        RemoteCallResult::Success(payload) => {
            println!("✅ Profile submitted for user {}", session.user_id);
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        RemoteCallResult::Failure(error) => {
            Err(error).context("Something went wrong. Please try again later.")
        }
    }
}

/// Print the page's message and turn a failed status into an error exit.
fn finish(status: &UiStatus) -> Result<()> {
    if status.failed {
        bail!("{}", status.message);
    }
    if !status.message.is_empty() {
        println!("✅ {}", status.message);
    }
    Ok(())
}
