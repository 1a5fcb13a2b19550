use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nearby_core::{AppError, Config};
use nearby_places::display::{format_distance, format_rating, star_row, RatingTier};
use nearby_places::{Coordinate, Place, PlaceDetails, PlaceFinder};

/// Find well-rated restaurants, night clubs and hotels nearby
#[derive(Debug, Parser)]
#[command(name = "nearby", version, about)]
struct Cli {
    /// Print JSON instead of cards
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Venues around a coordinate
    Near {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Venues around a postal code
    Zip {
        /// Postal code or address
        code: String,
    },

    /// Detail view for one venue
    Place {
        /// Provider place id
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = nearby_core::init() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let (config, _) = Config::load_validated().map_err(AppError::from_anyhow)?;
    let finder = PlaceFinder::from_config(&config.places)?;
    let deadline = Duration::from_secs(config.client.request_timeout_secs);

    with_deadline(deadline, execute(&finder, cli.command, cli.json)).await
}

async fn execute(finder: &PlaceFinder, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Near {
            latitude,
            longitude,
        } => {
            let origin = Coordinate::new(latitude, longitude);
            let places = finder.find_nearby(origin).await?;
            print_places(&places, json)?;
        }
        Command::Zip { code } => {
            let origin = finder.resolve_zipcode(&code).await?;
            if !json {
                println!("{} \u{2192} {}\n", code.trim(), origin);
            }
            let places = finder.find_nearby(origin).await?;
            print_places(&places, json)?;
        }
        Command::Place { id } => {
            let details = finder.place_details(&id).await?;
            print_details(&details, finder.places_base_url(), json)?;
        }
    }

    Ok(())
}

/// Run a whole command under the configured deadline.
async fn with_deadline<T>(
    deadline: Duration,
    action: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(deadline, action).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Other(anyhow::anyhow!(
            "Request timed out after {}s",
            deadline.as_secs()
        ))),
    }
}

fn print_places(places: &[Place], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(places)?);
        return Ok(());
    }

    if places.is_empty() {
        println!("No venues found nearby.");
        return Ok(());
    }

    for (idx, place) in places.iter().enumerate() {
        let tier = RatingTier::from_rating(place.rating);
        println!(
            "{:>2}. [{}] {} {}",
            idx + 1,
            format_rating(place.rating),
            place.name,
            tier.label()
        );
        if !place.vicinity.is_empty() {
            println!("    {}", place.vicinity);
        }
        println!(
            "    {}  id: {}",
            format_distance(place.distance_meters),
            place.place_id
        );
    }

    Ok(())
}

fn print_details(details: &PlaceDetails, base_url: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(details)?);
        return Ok(());
    }

    println!("{}", details.name);
    if !details.address.is_empty() {
        println!("{}", details.address);
    }
    println!(
        "{} {} ({} reviews)",
        star_row(details.rating),
        format_rating(details.rating),
        details.user_rating_count.unwrap_or(0)
    );
    if let Some(summary) = &details.summary {
        println!("{}", summary);
    }
    if let Some(phone) = &details.phone {
        println!("Phone: {}", phone);
    }
    if let Some(uri) = &details.maps_uri {
        println!("Map: {}", uri);
    }
    if let Some(url) = details.photo_url(base_url, 0, 600) {
        println!("Photo ({} total): {}", details.photo_names.len(), url);
    }

    Ok(())
}
