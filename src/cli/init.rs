//! Init command implementation
//!
//! Scaffolds a Clientbook deployment: `clientbook.toml`, `.env.example`,
//! a `data/` directory and a `.gitignore`.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// clientbook.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Clientbook");

    let base_path = &config.path;

    let config_path = base_path.join("clientbook.toml");
    if config_path.exists() && !config.force {
        output.warning("clientbook.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if data_dir.exists() {
        output.skipped("data", "already exists");
    } else if let Err(e) = fs::create_dir_all(&data_dir) {
        output.error(&format!("Failed to create data: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("directory", "data");
    }

    let files = [
        ("config", "clientbook.toml", generate_clientbook_toml(&config)),
        ("env", ".env.example", generate_env_example()),
    ];
    for (kind, name, content) in files {
        if let Err(e) = write_file(&base_path.join(name), &content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        match write_file(&gitignore_path, &generate_gitignore(), false) {
            Ok(()) => output.created("file", ".gitignore"),
            Err(e) => output.warning(&format!("Failed to create .gitignore: {}", e)),
        }
    }

    output.success("Clientbook initialized");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set the token signing secret:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set JWT_SECRET");
    output.newline();
    output.info("2. Start the server:");
    output.command("clientbook-server");

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_clientbook_toml(config: &InitConfig) -> String {
    format!(
        r#"# Clientbook configuration
# Secrets are read from the environment variables named here.

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"

[auth]
jwt_secret_env = "JWT_SECRET"
jwt_expiry_hours = 24

[database]
# Local SQLite file, or ":memory:"
url = "./data/clientbook.db"

# Remote Turso (requires the `turso` feature)
# turso_url_env = "TURSO_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"

[pagination]
default_limit = 10
max_limit = 100
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    r#"# Clientbook Environment Variables
# Copy this file to .env and fill in the values.

# REQUIRED: token signing secret
# Generate with: openssl rand -base64 32
JWT_SECRET=change-me-in-production

# Optional: log filter, overrides server.log_level
RUST_LOG=info,clientbook=debug

# Optional: Turso cloud database
# TURSO_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=your-token
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"/data/
*.db
*.db-journal

.env
.env.local

/target/
"#
    .to_string()
}
