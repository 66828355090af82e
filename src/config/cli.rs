use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "prospect-intake")]
#[command(about = "Contact-form intake service: stores prospects and sends follow-up emails")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the submission endpoint
    Serve {
        /// TOML config file; environment variables are used when omitted
        #[arg(long, env = "INTAKE_CONFIG")]
        config: Option<PathBuf>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Submit one contact form to a running endpoint
    Submit {
        #[arg(long, default_value = "http://localhost:3000/api/submit")]
        endpoint: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long, default_value = "russ@instantask.co")]
        contact: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = CliConfig::parse_from(["prospect-intake", "--verbose", "serve", "--port", "8080"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Serve { port, host, .. } => {
                assert_eq!(port, Some(8080));
                assert!(host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_submit() {
        let cli = CliConfig::parse_from([
            "prospect-intake",
            "submit",
            "--name",
            "Jane",
            "--email",
            "jane@x.com",
            "--phone",
            "555-1111",
            "--json-logs",
        ]);
        assert!(cli.json_logs);
        match cli.command {
            Command::Submit {
                endpoint, name, ..
            } => {
                assert_eq!(endpoint, "http://localhost:3000/api/submit");
                assert_eq!(name, "Jane");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
