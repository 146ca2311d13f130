//! CLI command runner

use crate::api::endpoints::EntityQuery;
use crate::api::VwClient;
use crate::config::{Profile, Settings};
use crate::convert::{open_input, read_input, read_nicknames, read_relations, write_document_to};
use crate::credentials::CredentialStore;
use crate::import::{ImportEvent, ImportOptions, Importer, TransactionState};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tokio::sync::watch;

use super::{
    Cli, Commands, EntitiesArgs, ImportArgs, NicknamesArgs, ProfileCommands, RelationsArgs,
};

/// Run the CLI application
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Nicknames(args)) => run_nicknames(args),
        Some(Commands::Relations(args)) => run_relations(args),
        Some(Commands::Import(args)) => run_import(cli.host, cli.profile, args).await,
        Some(Commands::Entities(args)) => run_entities(cli.host, cli.profile, args).await,
        Some(Commands::Profile(args)) => run_profile(args.command),
        None => {
            println!("VirtualWisdom entity import tools");
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

/// Run the nickname conversion
fn run_nicknames(args: NicknamesArgs) -> anyhow::Result<()> {
    let entities = read_nicknames(open_input(&args.csv_in)?, args.port_type, args.name_key)?;
    let count = write_document_to(entities, &args.json_out)?;
    report_written(count, &args.json_out);
    Ok(())
}

/// Run the relations conversion
fn run_relations(args: RelationsArgs) -> anyhow::Result<()> {
    let entities = read_relations(open_input(&args.csv_in)?)?;
    let count = write_document_to(entities, &args.json_out)?;
    report_written(count, &args.json_out);
    Ok(())
}

fn report_written(count: usize, path: &Path) {
    // stdout carries the document when piping
    if path == Path::new("-") {
        tracing::info!("Wrote {} entities to stdout", count);
    } else {
        println!("✓ {} entities written to {}", count, path.display());
    }
}

/// Run the import command
async fn run_import(
    host: Option<String>,
    profile_name: Option<String>,
    args: ImportArgs,
) -> anyhow::Result<()> {
    let mut settings = connection_settings(Settings::load(), host.is_some())?;
    let connection = resolve_connection(&settings, host, profile_name, args.token.as_deref())?;

    let mut defaults = settings.import.clone();
    if let Some(secs) = args.poll_interval {
        defaults.poll_interval_secs = secs;
    }
    if let Some(max) = args.max_polls {
        defaults.max_poll_attempts = max;
    }

    let input = read_input(&args.json_in)?;
    let client = VwClient::new(
        &connection.host,
        &connection.token,
        &defaults.client_options(connection.verify_tls || args.verify_tls),
    )?;
    tracing::info!("Importing into {}", client.host());

    let options = ImportOptions {
        force: args.force,
        poll: defaults.poll_policy(),
    };

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted; stopping at the next status check (Ctrl-C again to abort)");
            let _ = cancel_tx.send(true);
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    let mut importer = Importer::new(&client, options).with_cancel(cancel_rx);
    let result = importer.run(&input, print_event).await;

    if let Some(name) = &connection.profile {
        touch_profile(&mut settings, name);
    }

    match result {
        Ok(outcome) => {
            match outcome.transaction_id {
                Some(id) => println!(
                    "\n✓ Import complete: {} entities (transaction {})",
                    outcome.entity_count, id
                ),
                None => println!("\n✓ Import complete: {} entities", outcome.entity_count),
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ {}", e);
            for detail in e.details() {
                println!("{}", detail);
            }
            anyhow::bail!("Import did not complete")
        }
    }
}

/// Console progress in "step... ✓" form
fn print_event(event: ImportEvent) {
    match event {
        ImportEvent::Entered(state) => {
            let label = match state {
                TransactionState::Validating => "Validating input... ",
                TransactionState::Starting => "Uploading and verifying JSON... ",
                TransactionState::Committing => "Committing JSON... ",
                TransactionState::Polling => "Performing final verification... ",
                TransactionState::Discarding | TransactionState::Done { .. } => return,
            };
            print!("{}", label);
            let _ = io::stdout().flush();
        }
        ImportEvent::Passed(_) => println!("✓"),
        ImportEvent::Forced { diagnostics } => {
            println!("✗ (continuing because of --force)");
            for line in diagnostics {
                println!("{}", line);
            }
        }
    }
}

/// Run entity lookup
async fn run_entities(
    host: Option<String>,
    profile_name: Option<String>,
    args: EntitiesArgs,
) -> anyhow::Result<()> {
    let settings = connection_settings(Settings::load(), host.is_some())?;
    let connection = resolve_connection(&settings, host, profile_name, args.token.as_deref())?;

    let client = VwClient::new(
        &connection.host,
        &connection.token,
        &settings
            .import
            .client_options(connection.verify_tls || args.verify_tls),
    )?;

    let mut query = EntityQuery::new(&args.kind);
    if let Some(text) = &args.filter {
        query = query.filter(text, args.filter_type);
    }

    let entities = client.get_entities(&query).await.map_err(|e| {
        anyhow::anyhow!("Could not get entities of type {} ({})", args.kind, e)
    })?;

    println!("{}", serde_json::to_string_pretty(&entities)?);
    Ok(())
}

/// Run profile management commands
fn run_profile(cmd: ProfileCommands) -> anyhow::Result<()> {
    match cmd {
        ProfileCommands::List => {
            let settings = Settings::load()?;
            if settings.profiles.is_empty() {
                println!("No profiles saved.");
            } else {
                println!("Saved profiles:");
                for profile in &settings.profiles {
                    let active = settings.active_profile.as_ref() == Some(&profile.name);
                    let marker = if active { "*" } else { " " };
                    let creds = if CredentialStore::has_token(&profile.name) {
                        "✓"
                    } else {
                        " "
                    };
                    println!("  {} {} {} ({})", marker, creds, profile.name, profile.host);
                }
                println!("\n* = active profile");
                println!("✓ = token stored");
            }
        }

        ProfileCommands::Add {
            name,
            address,
            verify_tls,
        } => {
            let mut settings = Settings::load()?;
            let mut profile = Profile::new(&name, &address);
            profile.verify_tls = verify_tls;
            settings.add_profile(profile);

            if settings.active_profile.is_none() {
                settings.active_profile = Some(name.clone());
            }

            settings.save()?;
            println!("✓ Profile '{}' saved", name);
        }

        ProfileCommands::Delete { name } => {
            let mut settings = Settings::load()?;
            settings.delete_profile(&name);
            if let Err(e) = CredentialStore::delete_token(&name) {
                tracing::warn!("Could not remove token for '{}': {}", name, e);
            }
            settings.save()?;
            println!("✓ Profile '{}' deleted", name);
        }

        ProfileCommands::Use { name } => {
            let mut settings = Settings::load()?;
            settings.set_active_profile(&name)?;
            settings.save()?;
            println!("✓ Active profile set to '{}'", name);
        }

        ProfileCommands::SetToken { name } => {
            println!("Enter VW API token for profile '{}': ", name);
            let mut token = String::new();
            io::stdin().lock().read_line(&mut token)?;
            let token = token.trim();

            if token.is_empty() {
                anyhow::bail!("API token cannot be empty");
            }

            CredentialStore::store_token(&name, token)?;
            println!("✓ Token stored for profile '{}'", name);
        }
    }

    Ok(())
}

fn touch_profile(settings: &mut Settings, name: &str) {
    if let Some(profile) = settings.profile_mut(name) {
        profile.touch();
        if let Err(e) = settings.save() {
            tracing::warn!("Could not update profile '{}': {}", name, e);
        }
    }
}

/// Settings for a command that talks to the appliance. An explicit host
/// does not need the profile store, so an unreadable one only warns.
fn connection_settings(
    loaded: crate::Result<Settings>,
    explicit_host: bool,
) -> anyhow::Result<Settings> {
    match loaded {
        Ok(settings) => Ok(settings),
        Err(e) if explicit_host => {
            tracing::warn!("Ignoring unreadable settings, using defaults: {}", e);
            Ok(Settings::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Appliance connection details for one run
#[derive(Debug, Clone, PartialEq, Eq)]
struct Connection {
    host: String,
    token: String,
    verify_tls: bool,
    /// Profile the details came from
    profile: Option<String>,
}

/// Resolve connection details from CLI args or profile
fn resolve_connection(
    settings: &Settings,
    host: Option<String>,
    profile_name: Option<String>,
    token: Option<&str>,
) -> anyhow::Result<Connection> {
    // If explicit host provided, use it
    if let Some(host) = host {
        let token = match token {
            Some(t) => t.to_string(),
            None => {
                anyhow::bail!("API token required when using --host. Use --token or set VI_TOKEN env var")
            }
        };
        return Ok(Connection {
            host,
            token,
            verify_tls: false,
            profile: None,
        });
    }

    let profile_name = profile_name
        .or(settings.active_profile.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No appliance specified and no active profile set. Use --host or --profile"
            )
        })?;

    let profile = settings
        .profile(&profile_name)
        .ok_or_else(|| anyhow::anyhow!("Profile '{}' not found", profile_name))?;

    let token = match token {
        Some(t) => t.to_string(),
        None => CredentialStore::get_token(&profile_name)?.ok_or_else(|| {
            anyhow::anyhow!(
                "No token stored for profile '{}'. Use: vw-import profile set-token {}",
                profile_name,
                profile_name
            )
        })?,
    };

    Ok(Connection {
        host: profile.host.clone(),
        token,
        verify_tls: profile.verify_tls,
        profile: Some(profile_name),
    })
}
