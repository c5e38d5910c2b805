//! OAuth Client Provisioning CLI Tool
//!
//! Creates OAuth 2.0 clients and the scopes they may be restricted to.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Register the scopes first
//! oauth2-provisioner create-scope read --description "Read access"
//! oauth2-provisioner create-scope write
//!
//! # Confidential client, a secret is generated and printed once
//! oauth2-provisioner create-client web-app http://www.web-app.example/redirect \
//!   authorization_code,refresh_token read,write
//!
//! # Public client, no secret
//! oauth2-provisioner create-client --public spa http://localhost:3000/callback
//! ```
//!
//! ## Environment Variables
//!
//! - `STORAGE_BACKEND`: `memory`, `sqlite` or `postgres` (default `sqlite`)
//! - `DATABASE_URL`: connection string for the selected backend
//! - `CLIENT_SECRET_BYTES`: random bytes per generated secret (default 32)
//! - `RUST_LOG`: log filter, logs are written to stderr
//!
//! Exit codes:
//! - 0: Success
//! - 1: General or storage error
//! - 2: Scope not found
//! - 3: Client already exists
//! - 4: Invalid input

use clap::{Args, Parser, Subcommand, ValueEnum};
use oauth2_provisioner::{
    config::Config,
    errors::{ProvisionError, StorageError},
    oauth::{
        ClientProvisioner, CreateClientRequest, OAuthClient, OAuthScope, RegistryScopeValidator,
        types::parse_delimited,
    },
    storage::{ProvisioningStorage, create_storage_backend, parse_storage_backend},
};
use serde_json::json;
use std::process;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::prelude::*;

/// Main CLI application structure
#[derive(Parser)]
#[command(
    name = "oauth2-provisioner",
    about = "OAuth 2.0 client provisioning tool",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, help = "Enable debug logging on stderr")]
    verbose: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "text",
        help = "Output format for results"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// JSON formatted output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// Human-readable text
    Text,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Create an OAuth client
    CreateClient(CreateClientArgs),
    /// Register a scope clients may be restricted to
    CreateScope(CreateScopeArgs),
    /// Show an existing client
    GetClient(GetClientArgs),
}

/// Arguments for client creation
#[derive(Args)]
struct CreateClientArgs {
    /// The client identifier
    identifier: String,

    /// The client redirect URIs (comma separated)
    #[arg(default_value = "")]
    redirect_uris: String,

    /// Grant types to restrict the client to (comma separated)
    #[arg(default_value = "")]
    grant_types: String,

    /// Scopes to restrict the client to (comma separated)
    #[arg(default_value = "")]
    scopes: String,

    /// If client is public, no client secret is generated
    #[arg(long)]
    public: bool,
}

/// Arguments for scope creation
#[derive(Args)]
struct CreateScopeArgs {
    /// The scope name
    scope: String,

    /// Human readable description
    #[arg(long)]
    description: Option<String>,
}

/// Arguments for client retrieval
#[derive(Args)]
struct GetClientArgs {
    /// The client identifier
    identifier: String,
}

/// Application errors
#[derive(Debug, Error)]
enum AppError {
    /// Provisioning errors reported by the core
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    /// Storage errors outside of provisioning
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Invalid command line input
    #[error("{0}")]
    InvalidInput(String),
    /// General application errors
    #[error(transparent)]
    General(#[from] anyhow::Error),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Provision(ProvisionError::ScopeNotFound(_)) => 2,
            AppError::Provision(ProvisionError::DuplicateClient(_)) => 3,
            AppError::Provision(ProvisionError::InvalidIdentifier(_)) => 4,
            AppError::InvalidInput(_) => 4,
            _ => 1,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Provision(ProvisionError::ScopeNotFound(scope)) => {
                format!("Scope {} not found, please create it first", scope)
            }
            AppError::Provision(ProvisionError::DuplicateClient(client_id)) => {
                format!("Client {} already exists", client_id)
            }
            AppError::Provision(ProvisionError::Persistence(e)) => {
                format!("Unable to create client: {}", e)
            }
            other => other.to_string(),
        }
    }
}

/// Main application entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "oauth2_provisioner=debug,info"
    } else {
        "oauth2_provisioner=info,warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(()) => process::exit(0),
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("Error: {}", error.message());
            process::exit(error.exit_code());
        }
    }
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    let config = Config::new()?;
    tracing::debug!(
        version = %config.version,
        backend = %config.storage_backend,
        "starting"
    );

    let backend =
        parse_storage_backend(&config.storage_backend, config.database_url.as_deref())?;
    let storage = create_storage_backend(backend).await?;

    match &cli.command {
        Commands::CreateClient(args) => create_client(cli, &config, storage, args).await,
        Commands::CreateScope(args) => create_scope(cli, storage, args).await,
        Commands::GetClient(args) => get_client(cli, storage, args).await,
    }
}

/// Create a new OAuth client
async fn create_client(
    cli: &Cli,
    config: &Config,
    storage: Arc<dyn ProvisioningStorage>,
    args: &CreateClientArgs,
) -> Result<(), AppError> {
    let scope_validator = Arc::new(RegistryScopeValidator::new(storage.clone()));
    let provisioner = ClientProvisioner::new(storage, scope_validator)
        .with_secret_length(*config.client_secret_length.as_ref());

    let request = CreateClientRequest::from_delimited(
        &args.identifier,
        &args.redirect_uris,
        &args.grant_types,
        &args.scopes,
        args.public,
    );
    let client = provisioner.create_client(request).await?;

    match cli.format {
        OutputFormat::Text => match &client.client_secret {
            Some(secret) => println!(
                "Client {} created with secret {}",
                client.client_id, secret
            ),
            None => println!("Client {} created", client.client_id),
        },
        _ => print_json(cli, &client_json(&client, true)),
    }
    Ok(())
}

/// Register a new scope
async fn create_scope(
    cli: &Cli,
    storage: Arc<dyn ProvisioningStorage>,
    args: &CreateScopeArgs,
) -> Result<(), AppError> {
    // Scope names are space free and must not contain the list delimiter
    let names = parse_delimited(&args.scope);
    let name = match names.as_slice() {
        [name] if !name.contains(char::is_whitespace) => name.clone(),
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Invalid scope name: {:?}",
                args.scope
            )));
        }
    };

    let mut scope = OAuthScope::new(name);
    scope.description = args.description.clone();

    storage.store_scope(&scope).await.map_err(|e| match e {
        StorageError::DuplicateKey(name) => {
            AppError::InvalidInput(format!("Scope {} already exists", name))
        }
        other => AppError::Storage(other),
    })?;
    tracing::info!(scope = %scope.scope, "scope created");

    match cli.format {
        OutputFormat::Text => println!("Scope {} created", scope.scope),
        _ => print_json(cli, &json!(scope)),
    }
    Ok(())
}

/// Show an existing client without its secret
async fn get_client(
    cli: &Cli,
    storage: Arc<dyn ProvisioningStorage>,
    args: &GetClientArgs,
) -> Result<(), AppError> {
    let client = storage
        .get_client(&args.identifier)
        .await?
        .ok_or_else(|| AppError::InvalidInput(format!("Client {} not found", args.identifier)))?;

    match cli.format {
        OutputFormat::Text => {
            println!("client_id:     {}", client.client_id);
            println!(
                "client_type:   {}",
                if client.is_public() { "public" } else { "confidential" }
            );
            println!(
                "client_secret: {}",
                if client.client_secret.is_some() { "set" } else { "none" }
            );
            println!("redirect_uris: {}", client.redirect_uris.join(","));
            println!(
                "grant_types:   {}",
                client.grant_types.iter().cloned().collect::<Vec<_>>().join(",")
            );
            println!(
                "scopes:        {}",
                client.scopes.iter().cloned().collect::<Vec<_>>().join(",")
            );
            println!("created_at:    {}", client.created_at.to_rfc3339());
        }
        _ => print_json(cli, &client_json(&client, false)),
    }
    Ok(())
}

fn client_json(client: &OAuthClient, include_secret: bool) -> serde_json::Value {
    let mut value = json!({
        "client_id": client.client_id,
        "client_type": client.client_type,
        "redirect_uris": client.redirect_uris,
        "grant_types": client.grant_types,
        "scopes": client.scopes,
        "created_at": client.created_at,
    });
    if include_secret {
        value["client_secret"] = json!(client.client_secret);
    } else {
        value["has_client_secret"] = json!(client.client_secret.is_some());
    }
    value
}

fn print_json(cli: &Cli, value: &serde_json::Value) {
    let rendered = match cli.format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value),
        _ => serde_json::to_string(value),
    };
    match rendered {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => eprintln!("Error: failed to render output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use oauth2_provisioner::oauth::ClientType;

    fn test_client(client_secret: Option<&str>) -> OAuthClient {
        OAuthClient {
            client_id: "web-app".to_string(),
            client_secret: client_secret.map(str::to_string),
            redirect_uris: vec!["http://example.com/cb".to_string()],
            grant_types: ["authorization_code".to_string()].into(),
            scopes: ["read".to_string()].into(),
            client_type: if client_secret.is_some() {
                ClientType::Confidential
            } else {
                ClientType::Public
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_exit_codes() {
        let cases = [
            (AppError::from(ProvisionError::ScopeNotFound("admin".into())), 2),
            (AppError::from(ProvisionError::DuplicateClient("web-app".into())), 3),
            (AppError::from(ProvisionError::InvalidIdentifier(" ".into())), 4),
            (AppError::InvalidInput("bad scope".into()), 4),
            (
                AppError::from(ProvisionError::Persistence(StorageError::DatabaseError(
                    "disk full".into(),
                ))),
                1,
            ),
            (
                AppError::from(ProvisionError::ScopeRegistry(StorageError::ConnectionFailed(
                    "offline".into(),
                ))),
                1,
            ),
            (AppError::from(StorageError::ConnectionFailed("offline".into())), 1),
            (AppError::from(anyhow::anyhow!("boom")), 1),
        ];

        for (error, expected) in cases {
            assert_eq!(error.exit_code(), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_messages_name_the_failure() {
        let missing = AppError::from(ProvisionError::ScopeNotFound("admin".into()));
        assert_eq!(missing.message(), "Scope admin not found, please create it first");

        let duplicate = AppError::from(ProvisionError::DuplicateClient("web-app".into()));
        assert_eq!(duplicate.message(), "Client web-app already exists");

        let persistence = AppError::from(ProvisionError::Persistence(
            StorageError::DatabaseError("disk full".into()),
        ));
        assert!(persistence.message().starts_with("Unable to create client: "));
        assert!(persistence.message().contains("disk full"));

        let invalid = AppError::InvalidInput("Invalid scope name: \"a b\"".into());
        assert_eq!(invalid.message(), "Invalid scope name: \"a b\"");
    }

    #[test]
    fn test_client_json_hides_secret_when_asked() {
        let client = test_client(Some("s3cret"));

        let shown = client_json(&client, false);
        assert!(shown.get("client_secret").is_none());
        assert_eq!(shown["has_client_secret"], json!(true));
        assert!(!shown.to_string().contains("s3cret"));

        let public = client_json(&test_client(None), false);
        assert_eq!(public["has_client_secret"], json!(false));
        assert_eq!(public["client_type"], json!("public"));
    }

    #[test]
    fn test_client_json_includes_secret_on_creation() {
        let created = client_json(&test_client(Some("s3cret")), true);
        assert_eq!(created["client_secret"], json!("s3cret"));
        assert!(created.get("has_client_secret").is_none());
        assert_eq!(created["client_id"], json!("web-app"));
    }
}
