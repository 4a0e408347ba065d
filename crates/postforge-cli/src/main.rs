//! Postforge CLI - command-line client for the postforge platform.
//!
//! A thin consumer of `postforge-core`: it wires the session manager to a
//! terminal so you can sign in, inspect the current session, connect social
//! accounts, and update your profile.

use std::io::{self, Write};

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use postforge_core::api::AuthClient;
use postforge_core::auth::oauth::parse_callback_url;
use postforge_core::auth::{
    CredentialStore, OAuthProvider, SessionManager, SessionStatus, SessionStore,
};
use postforge_core::config::Config;
use postforge_core::models::ProfileUpdate;
use postforge_core::utils::{format_datetime, format_optional};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: postforge <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [--remember]            Sign in with email and password");
    eprintln!("  signup                        Create an account and sign in");
    eprintln!("  logout [--forget]             Sign out (--forget clears remembered credentials)");
    eprintln!("  whoami                        Show the current user");
    eprintln!("  connect <google|facebook>     Sign in through an OAuth provider");
    eprintln!("  status                        Show service and session status");
    eprintln!("  profile --name <name> [--image <url>]");
    eprintln!("                                Update profile fields");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Postforge CLI starting");

    let config = Config::load()?;
    let api = AuthClient::new(config.resolved_base_url())?;
    let store = SessionStore::new(config.cache_dir()?);
    let manager = SessionManager::new(api.clone(), store);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = run(&manager, &api, config, &args).await;

    info!("Postforge CLI exiting");
    result
}

async fn run(
    manager: &SessionManager,
    api: &AuthClient,
    config: Config,
    args: &[String],
) -> Result<()> {
    let command = args.first().map(String::as_str).unwrap_or("whoami");

    match command {
        "login" => cmd_login(manager, config, args.iter().any(|a| a == "--remember")).await,
        "signup" => cmd_signup(manager, config).await,
        "logout" => cmd_logout(manager, &config, args.iter().any(|a| a == "--forget")).await,
        "whoami" => cmd_whoami(manager).await,
        "connect" => cmd_connect(manager, &args[1..]).await,
        "status" => cmd_status(manager, api).await,
        "profile" => cmd_profile(manager, &args[1..]).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn cmd_login(manager: &SessionManager, mut config: Config, remember: bool) -> Result<()> {
    manager.initialize().await;
    if let Some(user) = manager.current_user().await {
        println!("Already logged in as {} ({})", user.name, user.email);
        return Ok(());
    }

    let default_email = config.last_email.clone().unwrap_or_default();
    let label = if default_email.is_empty() {
        "Email".to_string()
    } else {
        format!("Email [{default_email}]")
    };
    let mut email = prompt(&label)?;
    if email.is_empty() {
        email = default_email;
    }
    if email.is_empty() {
        return Err(anyhow!("An email address is required"));
    }

    // Try the keychain first when the account was remembered.
    let password = match CredentialStore::password_for(&email) {
        Ok(saved) => {
            info!("Using remembered credentials");
            saved
        }
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    let user = manager.login(&email, &password).await?;

    config.last_email = Some(email.clone());
    config.save()?;
    if remember {
        CredentialStore::remember(&email, &password)?;
        println!("Credentials saved to the OS keychain.");
    }

    println!("Logged in as {} ({})", user.name, user.email);
    Ok(())
}

async fn cmd_signup(manager: &SessionManager, mut config: Config) -> Result<()> {
    let email = prompt("Email")?;
    let name = prompt("Display name")?;
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        return Err(anyhow!("Passwords do not match"));
    }

    let user = manager.signup(&email, &password, &name).await?;

    config.last_email = Some(email);
    config.save()?;

    println!("Welcome, {}! Your account is ready.", user.name);
    Ok(())
}

async fn cmd_logout(manager: &SessionManager, config: &Config, forget: bool) -> Result<()> {
    manager.initialize().await;
    manager.logout().await;

    if forget {
        if let Some(ref email) = config.last_email {
            if CredentialStore::is_remembered(email) {
                CredentialStore::forget(email)?;
                println!("Removed remembered credentials for {email}.");
            }
        }
    }

    println!("Logged out.");
    Ok(())
}

async fn cmd_whoami(manager: &SessionManager) -> Result<()> {
    manager.initialize().await;

    match manager.current_user().await {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            println!("  provider:     {}", user.provider);
            println!("  member since: {}", format_datetime(&user.created_at));
            println!("  avatar:       {}", format_optional(&user.profile_image, "none"));
        }
        None => println!("Not logged in. Run `postforge login` to sign in."),
    }
    Ok(())
}

async fn cmd_connect(manager: &SessionManager, args: &[String]) -> Result<()> {
    let provider: OAuthProvider = args
        .first()
        .ok_or_else(|| anyhow!("Usage: postforge connect <google|facebook>"))?
        .parse()?;

    manager.initialize().await;

    let authorize_url = manager.connect_start(provider).await?;
    println!("Open this URL in your browser and approve access:");
    println!("  {authorize_url}");

    let pasted = prompt("Paste the URL you were redirected to")?;
    let (code, state) = parse_callback_url(&pasted)?;

    let user = manager.connect_finish(provider, &code, &state).await?;
    println!("Connected {provider} - logged in as {} ({})", user.name, user.email);
    Ok(())
}

async fn cmd_status(manager: &SessionManager, api: &AuthClient) -> Result<()> {
    match api.health().await {
        Ok(health) => println!(
            "Service: {} ({})",
            health.status,
            format_optional(&health.service, "unknown")
        ),
        Err(e) => println!("Service: unreachable ({e})"),
    }

    manager.initialize().await;
    let snapshot = manager.snapshot().await;
    match snapshot.status {
        SessionStatus::Authenticated => match snapshot.user {
            Some(user) => println!("Session: authenticated as {}", user.email),
            None => println!("Session: authenticated"),
        },
        _ => println!("Session: anonymous"),
    }
    Ok(())
}

async fn cmd_profile(manager: &SessionManager, args: &[String]) -> Result<()> {
    let mut update = ProfileUpdate::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" => {
                update.name = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--name requires a value"))?
                        .clone(),
                );
            }
            "--image" => {
                update.profile_image = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--image requires a value"))?
                        .clone(),
                );
            }
            other => return Err(anyhow!("Unknown option: {other}")),
        }
    }
    if update.name.is_none() && update.profile_image.is_none() {
        return Err(anyhow!("Usage: postforge profile --name <name> [--image <url>]"));
    }

    manager.initialize().await;
    let user = manager.update_profile(&update).await?;
    println!(
        "Profile updated: {} ({})",
        user.name,
        format_optional(&user.profile_image, "no avatar")
    );
    Ok(())
}
