//! Command-line and environment configuration.
//!
//! The four `API_*` settings assemble the users endpoint; the remaining flags
//! point at the theme, keybinding and log files.
//!
use clap::{Args, Parser};

/// Resource path appended to the configured prefix.
pub const USERS_RESOURCE: &str = "usuarios";

#[derive(Parser, Debug, Clone)]
#[command(name = "user-console", version, about = "Manage users through a REST API")]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiConfig,

    /// Theme file (key = #RRGGBB). Created with defaults when missing.
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Keybinding file (Action = Key). Created with defaults when missing.
    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Where log lines go; the terminal belongs to the UI.
    #[arg(long, env = "USER_CONSOLE_LOG", default_value = "user-console.log")]
    pub log_file: String,
}

/// Endpoint settings for the users service.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    #[arg(long = "api-protocol", env = "API_PROTOCOL", default_value = "http")]
    pub protocol: String,

    #[arg(long = "api-host", env = "API_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long = "api-port", env = "API_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path prefix in front of `/usuarios`, e.g. `/api`.
    #[arg(long = "api-base", env = "API_BASE", default_value = "/api")]
    pub base: String,
}

impl ApiConfig {
    /// `{protocol}://{host}:{port}{prefix}/usuarios`, with the prefix normalised
    /// to one leading slash and no trailing slash.
    pub fn base_url(&self) -> String {
        let trimmed = self.base.trim().trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        format!(
            "{}://{}:{}{}/{}",
            self.protocol.trim(),
            self.host.trim(),
            self.port,
            prefix,
            USERS_RESOURCE
        )
    }
}
