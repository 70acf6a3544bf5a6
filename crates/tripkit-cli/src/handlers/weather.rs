//! Weather command handler

use super::{with_spinner, Session};
use crate::cli::WeatherArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use tripkit_core::{Config, WeatherService};

pub async fn handle_weather(args: WeatherArgs, config: &Config, session: &Session, output: &mut OutputWriter) -> Result<()> {
    check_coordinates(args.lat, args.lon)?;

    let service = WeatherService::new(session.api.clone(), config.retry_policy());
    let forecast = with_spinner(output, "Fetching forecast", service.forecast(args.lat, args.lon)).await?;

    if !output.is_human() {
        return output.data(&forecast);
    }

    if forecast.stale {
        output.warning("Weather service unavailable; showing the last known forecast")?;
    }
    output.data(&forecast.data)
}

fn check_coordinates(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::invalid_args(format!("latitude {} is outside -90..=90", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::invalid_args(format!("longitude {} is outside -180..=180", lon)));
    }
    Ok(())
}
