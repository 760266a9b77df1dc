use actix_web::{middleware, web, App, HttpServer};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

mod config;
mod error;
mod handlers;
mod llm;
mod models;
mod pipeline;
mod selection;
mod weather;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::GroqClient;
use crate::weather::OpenWeatherClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal Weather Assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Resolve a city name to coordinates
    Geocode {
        #[arg(short, long)]
        city: String,
    },
    /// Print the weather summary for a city and date
    Forecast {
        #[arg(short, long)]
        city: String,
        /// YYYY-MM-DD
        #[arg(short, long)]
        date: String,
    },
    /// Print LLM outfit/activity recommendations for a city and date
    Recommend {
        #[arg(short, long)]
        city: String,
        /// YYYY-MM-DD
        #[arg(short, long)]
        date: String,
    },
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub weather: OpenWeatherClient,
    pub groq: GroqClient,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let weather = OpenWeatherClient::new(config.openweather_api_key.clone());
    let groq = GroqClient::new(config.groq_api_key.clone(), config.groq_model.clone());

    match cli.command {
        Some(Commands::Serve { port }) => {
            start_server(port, config, weather, groq).await?;
        }
        Some(Commands::Geocode { city }) => {
            let geo = weather.geocode(&city).await?;
            println!("City: {} ({})", geo.name, geo.country.as_deref().unwrap_or("?"));
            println!("Lat/Lon: {}, {}", geo.lat, geo.lon);
        }
        Some(Commands::Forecast { city, date }) => {
            let requested = parse_cli_date(&date)?;
            let summary = exit_on_bad_date(
                pipeline::forecast_summary(&weather, &city, requested).await,
            )?;
            println!("\n=== Weather Summary (JSON) ===");
            print_json(&summary)?;
        }
        Some(Commands::Recommend { city, date }) => {
            let requested = parse_cli_date(&date)?;
            let rec = exit_on_bad_date(
                pipeline::recommend(&weather, &groq, &city, requested).await,
            )?;
            println!("\n=== Recommendations (JSON) ===");
            print_json(&rec)?;
        }
        None => {
            start_server(8080, config, weather, groq).await?;
        }
    }

    Ok(())
}

async fn start_server(
    port: u16,
    config: Config,
    weather: OpenWeatherClient,
    groq: GroqClient,
) -> Result<(), AppError> {
    info!("🌐 Starting server on http://0.0.0.0:{}", port);

    let app_state = AppState {
        config,
        weather,
        groq,
    };

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(handlers::configure_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}

fn parse_cli_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format. Use YYYY-MM-DD.".to_string()))
}

/// Out-of-range dates are user input, not failures worth a backtrace: print
/// the nearest-date hint and exit like the HTTP surface would return a 400.
fn exit_on_bad_date<T>(result: Result<T, AppError>) -> Result<T, AppError> {
    match result {
        Err(AppError::Validation(msg)) => {
            eprintln!("{}", msg);
            eprintln!("OpenWeatherMap provides forecasts only up to ~5 days ahead.");
            std::process::exit(1);
        }
        other => other,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(format!("Failed to render JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}
