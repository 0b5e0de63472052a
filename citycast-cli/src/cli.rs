use std::fmt;

use anyhow::{Context, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use citycast_core::{
    CityCandidate, CitySuggester, Config, Language, SearchOrchestrator, SearchSession,
    WeatherResult, provider::open_meteo::OpenMeteoProvider,
};
use inquire::{Confirm, CustomType, Select, Text};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "City weather lookup with a 3-day forecast")]
pub struct Cli {
    /// Log provider requests and fallbacks to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print weather as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Display language override, e.g. "ru" or "en".
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather and the 3-day forecast for a city.
    Show {
        /// City name.
        city: String,
    },

    /// List city suggestions for a partial name.
    Suggest {
        /// Beginning of a city name.
        query: String,
    },

    /// Type a city, pick from suggestions, then show its weather.
    Search,

    /// Edit language, search and HTTP settings.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(lang) = self.lang.as_deref() {
            config.language = Language::try_from(lang)?;
        }

        match self.command {
            Command::Show { city } => {
                let orchestrator = SearchOrchestrator::from_config(&config)?;
                let result = fetch(&orchestrator, &city, config.language).await?;
                print_weather(&result, &config, self.json)?;
            }
            Command::Suggest { query } => {
                let suggester = suggester(&config)?;
                match suggester.suggest(&query).await {
                    Ok(cities) if cities.is_empty() => println!("No suggestions."),
                    Ok(cities) => {
                        for city in &cities {
                            println!("{}", city.display_name());
                        }
                    }
                    Err(err) => eprintln!("No suggestions: {}", err.user_message(config.language)),
                }
            }
            Command::Search => search(&config, self.json).await?,
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

fn suggester(config: &Config) -> anyhow::Result<CitySuggester<OpenMeteoProvider>> {
    let lookup = OpenMeteoProvider::from_config(config, config.http_client()?);
    Ok(CitySuggester::from_config(lookup, config))
}

async fn fetch(
    orchestrator: &SearchOrchestrator,
    city: &str,
    lang: Language,
) -> anyhow::Result<WeatherResult> {
    orchestrator.fetch_weather(city).await.map_err(|err| {
        debug!(error = %err, "weather lookup failed");
        anyhow!(err.user_message(lang))
    })
}

fn print_weather(result: &WeatherResult, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(result).context("Failed to serialize weather")?;
        println!("{text}");
    } else {
        print!("{}", render::weather(result, config.language, Local::now().date_naive()));
    }
    Ok(())
}

struct Choice(CityCandidate);

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.display_name())
    }
}

async fn search(config: &Config, json: bool) -> anyhow::Result<()> {
    let orchestrator = SearchOrchestrator::from_config(config)?;
    let mut session = SearchSession::new(suggester(config)?, config.search.clone());

    loop {
        let text = Text::new("City:").with_help_message("Empty input quits").prompt()?;
        if text.trim().is_empty() {
            return Ok(());
        }

        session.input(text.clone());
        let state = session.settle().await.clone();

        let query = if state.show_suggestions {
            let choices: Vec<Choice> = state.suggestions.iter().cloned().map(Choice).collect();
            let picked = Select::new("Pick a city:", choices).prompt()?;
            session.select(picked.0)
        } else {
            if let Some(err) = &state.suggestion_error {
                eprintln!("{}", err.user_message(config.language));
            }
            text.trim().to_string()
        };

        match fetch(&orchestrator, &query, config.language).await {
            Ok(result) => print_weather(&result, config, json)?,
            Err(err) => eprintln!("{err}"),
        }
        session.clear();
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let languages = vec![Language::Ru, Language::En];
    let start = languages.iter().position(|l| *l == config.language).unwrap_or(0);
    config.language = Select::new("Display language:", languages)
        .with_starting_cursor(start)
        .prompt()?;

    config.search.debounce_ms = CustomType::<u64>::new("Suggestion debounce (ms):")
        .with_default(config.search.debounce_ms)
        .prompt()?;
    config.search.suggestion_limit = CustomType::<u8>::new("Suggestions to show:")
        .with_default(config.search.suggestion_limit)
        .prompt()?;
    config.http.timeout_secs = CustomType::<u64>::new("HTTP timeout in seconds (0 = none):")
        .with_default(config.http.timeout_secs)
        .prompt()?;

    config.validate()?;

    if Confirm::new("Save configuration?").with_default(true).prompt()? {
        config.save()?;
        println!("Saved to {}", Config::config_file_path()?.display());
    }

    Ok(())
}
