//! Command-line configuration and logging setup.
//!
//! Every flag has an environment fallback so the client can be configured
//! entirely from the environment.

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use clap::Parser;
use motbwa_client::ServerConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::TuiError;

/// Terminal chat client
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "motbwa")]
#[command(about = "Terminal client for the motbwa chat server")]
#[command(version)]
pub struct Args {
    /// Chat server host
    #[arg(long, env = "MOTBWA_HOST", default_value = "localhost")]
    pub host: String,

    /// Chat server port
    #[arg(short, long, env = "PORT")]
    pub port: u16,

    /// File receiving log output
    #[arg(long, env = "MOTBWA_LOG_FILE", default_value = "motbwa.log")]
    pub log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Server endpoints derived from host and port.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(&self.host, self.port)
    }
}

/// Install the global subscriber, appending to the configured log file.
///
/// The terminal belongs to the UI, so nothing is logged to stdout or stderr.
pub fn init_logging(args: &Args) -> Result<(), TuiError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .map_err(|source| TuiError::LogFile { path: args.log_file.clone(), source })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn explicit_flags() {
        let args = Args::try_parse_from([
            "motbwa",
            "--host",
            "chat.example",
            "--port",
            "9000",
            "--log-file",
            "/tmp/chat.log",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.host, "chat.example");
        assert_eq!(args.port, 9000);
        assert_eq!(args.log_file, PathBuf::from("/tmp/chat.log"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn server_urls_follow_host_and_port() {
        let args = Args::try_parse_from(["motbwa", "--host", "chat.example", "-p", "9000"]).unwrap();
        let server = args.server_config();

        assert_eq!(server.base_url(), "http://chat.example:9000/");
        assert_eq!(server.websocket_url(), "ws://chat.example:9000/ws");
        assert_eq!(server.login_url(), "http://chat.example:9000/api/login");
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(Args::try_parse_from(["motbwa", "--port", "not-a-port"]).is_err());
        assert!(Args::try_parse_from(["motbwa", "--port", "70000"]).is_err());
    }
}
