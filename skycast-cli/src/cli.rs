use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text, error::InquireResult};
use skycast_core::{
    Config, HealthReadout, ObservabilityRecorder, RenderState, Units, WeatherService, client_from_config,
};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and a 5-day outlook")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Warsaw" or "London,GB".
        city: String,

        /// Override the configured units ("metric" or "imperial").
        #[arg(long)]
        units: Option<String>,

        /// Print the view model as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until an empty name is entered.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units, json } => {
                let mut config = Config::load()?;
                if let Some(units) = units {
                    config.units = Units::try_from(units.as_str())?;
                }
                show(&config, &city, json).await
            }
            Command::Interactive => interactive(&Config::load()?).await,
        }
    }
}

fn build_service(config: &Config) -> anyhow::Result<WeatherService> {
    let client = client_from_config(config)?;
    Ok(WeatherService::new(client, ObservabilityRecorder::new(config.metrics_window), config))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(Units::all().iter().position(|u| *u == config.units).unwrap_or(0))
        .prompt()
        .context("Failed to read units")?;
    config.units = units;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, city: &str, json: bool) -> anyhow::Result<()> {
    let service = build_service(config)?;
    let state = service.render(city).await;

    if json {
        match &state {
            RenderState::Ready(view) => println!("{}", serde_json::to_string_pretty(view)?),
            RenderState::NoData { message, .. } => {
                println!("{}", serde_json::json!({ "error": message }));
            }
        }
    } else {
        print!("{}", render::render_state(&state));
    }

    Ok(())
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let service = build_service(config)?;

    loop {
        let prompt = Text::new("City:").with_help_message("Empty input exits").prompt();
        let Some(city) = entered_city(prompt)? else {
            debug!("no city entered, leaving interactive mode");
            return Ok(());
        };

        let state = service.render(&city).await;
        print!("{}", interactive_output(&state, &service.health()));
    }
}

/// `None` for blank input, Esc or Ctrl-C.
fn entered_city(prompt: InquireResult<String>) -> anyhow::Result<Option<String>> {
    let city = match prompt {
        Ok(city) => city,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return Ok(None),
        Err(err) => return Err(err).context("Failed to read city"),
    };

    let city = city.trim();
    Ok((!city.is_empty()).then(|| city.to_string()))
}

fn interactive_output(state: &RenderState, health: &HealthReadout) -> String {
    let mut out = render::render_state(state);
    // a ready view already carries its health readout
    if matches!(state, RenderState::NoData { .. }) {
        out.push_str(&render::health_line(health));
        out.push('\n');
    }
    out
}
