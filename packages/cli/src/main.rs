#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the Park-A-Don parking toolkit.

mod report;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use park_a_don_api_models::MapKind;
use park_a_don_client::{ClientConfig, HttpParkingApi, ParkingApi as _, fetch_map_data};
use park_a_don_view::{
    AvailabilityFilter, DayFilter, Filters, MapView, ParkingTypeFilter, PriceFilter, RiskPanel,
    ViewState, query_risk, regenerate_map, visible_layer,
};
use park_a_don_zone::HeatLayer;
use park_a_don_zone_models::ZoneRecord;

#[derive(Parser)]
#[command(name = "park_a_don", about = "Campus street parking information")]
struct Cli {
    /// Backend base URL (overrides the config file and `PARK_A_DON_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify zones from a local `GeoJSON` file
    Classify {
        /// Path to a `GeoJSON` `FeatureCollection`
        file: PathBuf,
        #[command(flatten)]
        layer: LayerArgs,
    },
    /// Fetch zones from the backend and classify them
    Zones {
        #[command(flatten)]
        layer: LayerArgs,
    },
    /// Fetch ticket points for the heat layer
    Tickets {
        /// Print the heat layer as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up the ticket risk for a street
    Risk {
        /// Street name, e.g. "Fulton St"
        street: String,
        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the backend to rebuild a pre-rendered map
    Regenerate {
        /// `current` or `combined`
        kind: MapKind,
    },
    /// Print the parking duration legend
    Legend {
        /// Print the legend as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct LayerArgs {
    /// `regulations`, `current-status`, `heatmap` or `combined`
    #[arg(long, default_value = "regulations")]
    view: MapView,
    /// Evaluate availability at this local time (e.g. `2025-03-05T10:00:00`)
    #[arg(long)]
    at: Option<NaiveDateTime>,
    #[command(flatten)]
    filters: FilterArgs,
    /// Print every zone's popup text
    #[arg(long)]
    details: bool,
    /// Print the layer as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// `all` or a weekday name
    #[arg(long, default_value = "all")]
    day: DayFilter,
    /// `all`, `available`, `limited` or `full`
    #[arg(long, default_value = "all")]
    availability: AvailabilityFilter,
    /// `all`, `free` or `metered`
    #[arg(long, default_value = "all")]
    price: PriceFilter,
    /// Only zones within this many miles of the origin
    #[arg(long, value_parser = parse_miles)]
    max_distance: Option<f64>,
    /// `all`, `time_limited`, `no_parking` or `permit`
    #[arg(long, default_value = "all")]
    parking_type: ParkingTypeFilter,
}

impl FilterArgs {
    const fn filters(&self) -> Filters {
        Filters {
            day: self.day,
            availability: self.availability,
            price: self.price,
            max_distance_miles: self.max_distance,
            parking_type: self.parking_type,
        }
    }
}

fn parse_miles(value: &str) -> Result<f64, String> {
    let miles: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if !miles.is_finite() || miles < 0.0 {
        return Err(format!("{value:?} is not a non-negative distance"));
    }
    Ok(miles)
}

fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.api_url.clone(), None)?;
    log::debug!("Using backend at {}", config.base_url);
    Ok(config)
}

fn print_zones(
    records: &[ZoneRecord],
    layer_args: &LayerArgs,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = ViewState {
        filters: layer_args.filters.filters(),
        map_view: layer_args.view,
        ..ViewState::default()
    };
    let now = layer_args
        .at
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let layer = visible_layer(&state, records, now, config.origin);

    if layer_args.json {
        println!("{}", serde_json::to_string_pretty(&layer)?);
    } else {
        print!("{}", report::layer_summary(&layer, records.len()));
        if layer_args.details {
            print!("{}", report::layer_details(&layer));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Legend { json } => {
            let legend = park_a_don_regulation::legend();
            if json {
                println!("{}", serde_json::to_string_pretty(&legend)?);
            } else {
                print!("{}", report::legend_table(&legend));
            }
        }
        Commands::Classify { file, layer } => {
            let body = std::fs::read_to_string(&file)?;
            let records = park_a_don_zone::parse_zone_collection(&body)?;
            log::info!("Read {} zones from {}", records.len(), file.display());
            print_zones(&records, &layer, &config)?;
        }
        Commands::Zones { layer } => {
            let api = HttpParkingApi::new(config.clone())?;
            if matches!(layer.view, MapView::Heatmap | MapView::Combined) {
                let data = fetch_map_data(&api).await;
                let records = data.zones.map_err(|e| e.user_message())?;
                print_zones(&records, &layer, &config)?;
                match data.tickets {
                    Ok(points) if !layer.json => {
                        let heat = HeatLayer::new(points)
                            .within(config.origin, config.heat_radius_miles);
                        print!("{}", report::heat_summary(&heat));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("Ticket heat layer unavailable: {}", e.user_message());
                    }
                }
            } else {
                let records = api.zones().await.map_err(|e| e.user_message())?;
                print_zones(&records, &layer, &config)?;
            }
        }
        Commands::Tickets { json } => {
            let (origin, radius) = (config.origin, config.heat_radius_miles);
            let api = HttpParkingApi::new(config)?;
            let heat = HeatLayer::new(api.tickets().await.map_err(|e| e.user_message())?)
                .within(origin, radius);
            if json {
                println!("{}", serde_json::to_string_pretty(&heat)?);
            } else {
                print!("{}", report::heat_summary(&heat));
            }
        }
        Commands::Risk { street, json } => {
            let api = HttpParkingApi::new(config)?;
            let state = query_risk(&api, ViewState::default(), &street).await;
            match state.risk {
                RiskPanel::Loaded { assessment, .. } => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&assessment)?);
                    } else {
                        print!("{}", report::risk_card(&assessment));
                    }
                }
                RiskPanel::Failed { message, .. } => return Err(message.into()),
                RiskPanel::Closed | RiskPanel::Loading { .. } => {}
            }
        }
        Commands::Regenerate { kind } => {
            let api = HttpParkingApi::new(config)?;
            let mut state = ViewState::default();
            regenerate_map(&api, &mut state, kind)
                .await
                .map_err(|e| e.user_message())?;
            println!("Regenerated {kind} map");
        }
    }

    Ok(())
}
