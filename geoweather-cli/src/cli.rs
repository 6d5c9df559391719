use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use geoweather_core::{
    Config, Coordinates, DisplayFormat, DisplaySink, GeocoderId, LocationSource, Renderer,
    ReqwestHttpClient, WeatherResolver,
};
use inquire::{CustomType, Select};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Local weather for your approximate location")]
pub struct Cli {
    /// Log resolver progress to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve location and temperature once and print the result.
    Show {
        /// Latitude to use instead of the configured location source.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to use instead of the configured location source.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Reverse geocoder, e.g. "bigdatacloud" or "nominatim".
        #[arg(long)]
        geocoder: Option<String>,

        /// Output format.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Interactively choose geocoder, location source and output format.
    Configure,

    /// Print the path of the configuration file.
    ConfigPath,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Text,
    Html,
}

impl From<FormatArg> for DisplayFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => DisplayFormat::Text,
            FormatArg::Html => DisplayFormat::Html,
        }
    }
}

/// Prints each fragment it is handed.
#[derive(Debug, Default)]
struct Terminal;

impl Renderer for Terminal {
    fn replace_content(&mut self, fragment: &str) {
        println!("{fragment}");
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { lat, lon, geocoder, format } => {
                let mut config = Config::load()?;

                if let (Some(lat), Some(lon)) = (lat, lon) {
                    config.set_fixed_location(Coordinates::new(lat, lon));
                }
                if let Some(name) = geocoder {
                    config.set_geocoder(GeocoderId::try_from(name.as_str())?);
                }
                if let Some(format) = format {
                    config.display.format = format.into();
                }

                show(&config).await?;
            }
            Command::Configure => configure()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

/// One resolution attempt. Weather failures are rendered, not returned.
async fn show(config: &Config) -> anyhow::Result<()> {
    let http = ReqwestHttpClient::new(config.http.timeout(), &config.http.user_agent)
        .context("Failed to build HTTP client")?;
    let resolver = WeatherResolver::from_config(config, Arc::new(http))?;

    let mut sink = DisplaySink::new(Terminal, config.display.format);
    resolver.resolve(&mut sink).await;

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let geocoder = Select::new("Reverse geocoder:", GeocoderId::all().to_vec())
        .with_starting_cursor(cursor_of(GeocoderId::all(), &config.geocoder_id()?))
        .prompt()?;
    config.set_geocoder(geocoder);

    let source = Select::new("Location source:", LocationSource::all().to_vec())
        .with_starting_cursor(cursor_of(LocationSource::all(), &config.location.source))
        .prompt()?;
    match source {
        LocationSource::Fixed => {
            let lat = CustomType::<f64>::new("Latitude:")
                .with_error_message("Please type a decimal number")
                .prompt()?;
            let lon = CustomType::<f64>::new("Longitude:")
                .with_error_message("Please type a decimal number")
                .prompt()?;
            config.set_fixed_location(Coordinates::new(lat, lon));
        }
        other => config.location.source = other,
    }

    config.display.format = Select::new("Output format:", DisplayFormat::all().to_vec())
        .with_starting_cursor(cursor_of(DisplayFormat::all(), &config.display.format))
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Index of `current` in `choices`, so prompts open on the saved setting.
fn cursor_of<T: PartialEq>(choices: &[T], current: &T) -> usize {
    choices.iter().position(|c| c == current).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["geoweather", "show", "--lat", "51.5", "--lon", "-0.12"])
            .expect("valid args");
        match cli.command {
            Command::Show { lat, lon, .. } => {
                assert_eq!(lat, Some(51.5));
                assert_eq!(lon, Some(-0.12));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn prompts_start_on_saved_settings() {
        assert_eq!(cursor_of(LocationSource::all(), &LocationSource::Disabled), 2);
        assert_eq!(cursor_of(LocationSource::all(), &LocationSource::Ip), 0);
        assert_eq!(cursor_of(DisplayFormat::all(), &DisplayFormat::Html), 1);
        assert_eq!(cursor_of(GeocoderId::all(), &GeocoderId::Nominatim), 1);
    }

    #[test]
    fn lat_without_lon_is_rejected() {
        assert!(Cli::try_parse_from(["geoweather", "show", "--lat", "51.5"]).is_err());
    }

    #[test]
    fn format_flag_maps_to_display_format() {
        let cli = Cli::try_parse_from(["geoweather", "-v", "show", "--format", "html"])
            .expect("valid args");
        assert!(cli.verbose);
        match cli.command {
            Command::Show { format: Some(f), .. } => {
                assert_eq!(DisplayFormat::from(f), DisplayFormat::Html)
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
