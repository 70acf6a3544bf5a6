//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use tripkit_core::PageQuery;

/// Tripkit CLI - plan trips against the Tripkit backend
///
/// Sign in once; the session is kept in the credentials file and refreshed
/// automatically when it expires.
#[derive(Parser, Debug)]
#[command(
    name = "tripkit",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TRIPKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Create an account and store the session
    Register(RegisterArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Browse and manage itineraries
    #[command(subcommand)]
    Itineraries(ItineraryCommand),

    /// Browse reviews
    #[command(subcommand)]
    Reviews(ReviewCommand),

    /// Travel alerts
    #[command(subcommand)]
    Alerts(AlertCommand),

    /// Notifications inbox
    #[command(subcommand)]
    Notifications(NotificationCommand),

    /// Bookings
    #[command(subcommand)]
    Bookings(BookingCommand),

    /// Forecast for a coordinate pair
    Weather(WeatherArgs),

    /// Inspect and initialize configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "TRIPKIT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "TRIPKIT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Pagination flags shared by list commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        PageQuery {
            page: args.page,
            limit: args.limit,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ItineraryCommand {
    /// List your itineraries
    List(PageArgs),

    /// Show one itinerary
    Show {
        id: String,

        /// Include the itinerary's items
        #[arg(long)]
        items: bool,
    },

    /// Create an itinerary
    Create(CreateItineraryArgs),

    /// Delete an itinerary
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct CreateItineraryArgs {
    /// Itinerary title
    #[arg(short, long)]
    pub title: String,

    #[arg(short, long)]
    pub destination: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommand {
    /// List reviews, optionally for one guide, vehicle or location
    List {
        /// Reviewed record id
        #[arg(long)]
        target: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Mark a review as helpful
    Helpful { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    /// List active alerts
    List(PageArgs),

    /// Dismiss an alert
    Dismiss { id: String },
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommand {
    /// List notifications
    List(PageArgs),

    /// Mark one notification as read
    Read { id: String },

    /// Mark every notification as read
    ReadAll,
}

#[derive(Subcommand, Debug)]
pub enum BookingCommand {
    /// List bookings
    List(PageArgs),

    /// Cancel a booking
    Cancel { id: String },
}

#[derive(Args, Debug)]
pub struct WeatherArgs {
    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// List the files searched for configuration
    Paths,

    /// Write a configuration file with default values
    Init {
        /// Destination (.yaml, .yml or .json)
        #[arg(default_value = "tripkit.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors and tables
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["tripkit", "-vv", "whoami"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["tripkit", "--quiet", "whoami"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_itinerary_create_parses_dates() {
        let cli = Cli::parse_from([
            "tripkit",
            "itineraries",
            "create",
            "--title",
            "Rift valley",
            "--start-date",
            "2026-08-01",
        ]);

        match cli.command {
            Commands::Itineraries(ItineraryCommand::Create(args)) => {
                assert_eq!(args.title, "Rift valley");
                assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2026, 8, 1));
                assert_eq!(args.end_date, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_weather_accepts_negative_coordinates() {
        let cli = Cli::parse_from(["tripkit", "weather", "-3.3869", "36.6830"]);
        match cli.command {
            Commands::Weather(args) => {
                assert_eq!(args.lat, -3.3869);
                assert_eq!(args.lon, 36.6830);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_page_args_become_query() {
        let cli = Cli::parse_from(["tripkit", "bookings", "list", "--page", "2", "--limit", "5"]);
        match cli.command {
            Commands::Bookings(BookingCommand::List(page)) => {
                let query = PageQuery::from(page);
                assert_eq!(query.page, Some(2));
                assert_eq!(query.limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_output_format_flag() {
        let cli = Cli::parse_from(["tripkit", "-o", "json-pretty", "alerts", "list"]);
        assert_eq!(cli.output, OutputFormat::JsonPretty);
    }
}
