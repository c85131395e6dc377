use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{CityWeatherResolver, Config};
use inquire::Text;
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and forecast for a city")]
pub struct Cli {
    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather for a city.
    Show {
        /// City name, sent to the geocoder as typed.
        city: String,

        /// Print the raw result as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Interactively set the service endpoints and request timeout.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, json } => {
                let config = Config::load()?;
                debug!(?config, "Loaded configuration");
                let resolver = CityWeatherResolver::from_config(&config)?;

                let result = resolver
                    .resolve_city_weather(&city)
                    .await
                    .with_context(|| format!("Could not get weather for '{city}'"))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{}", render::summary(&result));
                }
            }
            Command::Configure => configure()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.geocoding_url = Text::new("Geocoding service URL:")
        .with_default(&config.geocoding_url)
        .prompt()
        .context("Geocoding URL prompt aborted")?;

    config.forecast_url = Text::new("Forecast service URL:")
        .with_default(&config.forecast_url)
        .prompt()
        .context("Forecast URL prompt aborted")?;

    let current_timeout = config.timeout_secs.map(|s| s.to_string()).unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds (leave empty for none):")
        .with_initial_value(&current_timeout)
        .prompt()
        .context("Timeout prompt aborted")?;
    config.timeout_secs = parse_timeout(&timeout)?;

    // Reject unusable URLs before writing them to disk.
    CityWeatherResolver::from_config(&config)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn parse_timeout(input: &str) -> anyhow::Result<Option<u64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let secs = input
        .parse::<u64>()
        .with_context(|| format!("Timeout must be a whole number of seconds, got '{input}'"))?;
    Ok(Some(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_json_flag() {
        let cli = Cli::try_parse_from(["cityweather", "show", "New York", "--json"]).unwrap();

        assert!(!cli.verbose);
        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city, "New York");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbose_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["cityweather", "show", "Paris", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["cityweather", "show"]).is_err());
    }

    #[test]
    fn config_path_is_kebab_case() {
        let cli = Cli::try_parse_from(["cityweather", "config-path"]).unwrap();
        assert!(matches!(cli.command, Command::ConfigPath));
    }

    #[test]
    fn empty_timeout_means_none() {
        assert_eq!(parse_timeout("  ").unwrap(), None);
        assert_eq!(parse_timeout("15").unwrap(), Some(15));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = parse_timeout("soon").unwrap_err();
        assert!(err.to_string().contains("whole number of seconds"));
    }
}
