//! Tripkit CLI - command-line front end for the Tripkit backend
//!
//! Signs in, keeps the session in a credentials file, and lists or changes
//! itineraries, reviews, alerts, notifications and bookings.

mod cli;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use error::Result;
use handlers::Session;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tripkit_core::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
async fn run(cli: Cli) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let config = {
        let _config_timer = Timer::new("config_loading");
        Config::load(cli.config.as_deref())?
    };

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet);

    tracing::info!(
        environment = %config.environment,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Config commands work without a reachable backend or credentials
    let command = match cli.command {
        Commands::Config(command) => return handlers::handle_config(command, &config, &mut output).await,
        command => command,
    };

    let session = Session::open(&config)?;

    match command {
        Commands::Login(args) => handlers::handle_login(args, &session, &mut output).await,
        Commands::Register(args) => handlers::handle_register(args, &session, &mut output).await,
        Commands::Logout => handlers::handle_logout(&session, &mut output).await,
        Commands::Whoami => handlers::handle_whoami(&session, &mut output).await,
        Commands::Itineraries(command) => handlers::handle_itineraries(command, &session, &mut output).await,
        Commands::Reviews(command) => handlers::handle_reviews(command, &session, &mut output).await,
        Commands::Alerts(command) => handlers::handle_alerts(command, &session, &mut output).await,
        Commands::Notifications(command) => handlers::handle_notifications(command, &session, &mut output).await,
        Commands::Bookings(command) => handlers::handle_bookings(command, &session, &mut output).await,
        Commands::Weather(args) => handlers::handle_weather(args, &config, &session, &mut output).await,
        Commands::Config(_) => Ok(()),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["tripkit", "whoami"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Whoami));

        let cli = Cli::parse_from(["tripkit", "-v", "notifications", "read-all"]);
        assert_eq!(cli.verbosity_level(), 1);
        assert!(matches!(
            cli.command,
            Commands::Notifications(cli::NotificationCommand::ReadAll)
        ));
    }

    #[tokio::test]
    async fn test_commands_needing_a_session_fail_fast() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            credentials_path: Some(dir.path().join("credentials.json")),
            ..Config::default()
        };
        let session = Session::open(&config).unwrap();
        let mut output = OutputWriter::with_writer(cli::OutputFormat::Human, false, true, Box::new(std::io::sink()));

        let result = handlers::handle_bookings(cli::BookingCommand::List(Default::default()), &session, &mut output).await;

        let err = result.unwrap_err();
        assert!(matches!(err, error::Error::NotSignedIn));
        assert_eq!(err.exit_code(), 11);
    }
}
