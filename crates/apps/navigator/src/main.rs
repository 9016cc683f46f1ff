use std::io::Write;
use std::sync::Arc;

use bridge::Transport;
use catalog::PoiCategory;
use clap::{Parser, Subcommand};
use foundation::Coordinates;
use navigator::{
    ApiClient, Navigator, NavigatorConfig, PoiSearch, Services, parse_bbox, parse_categories,
};
use streaming::{BboxQuery, ImportRequest, PoiSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless POI navigator host")]
struct Args {
    /// Backend base URL (default: NAVIGATOR_API_URL or http://127.0.0.1:3000/api)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the map session from JSON lines on stdin; surface scripts go to stdout
    Run {
        /// Initial category filter, comma separated
        #[arg(long, default_value = "")]
        categories: String,

        /// Quiet period after the last map move, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Minimum zoom at which POIs are shown
        #[arg(long)]
        min_zoom: Option<f64>,
    },

    /// Check backend health
    Health,

    /// Query POIs in a bounding box
    Query {
        /// Bounding box: minLat,maxLat,minLng,maxLng
        #[arg(long)]
        bbox: String,

        /// Category filter, comma separated
        #[arg(long, default_value = "")]
        categories: String,

        /// Max number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search POIs by text and/or proximity
    Search {
        /// Free-text query
        #[arg(long)]
        text: Option<String>,

        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,

        /// Radius in meters
        #[arg(long)]
        radius: Option<f64>,

        /// Category filter, comma separated
        #[arg(long, default_value = "")]
        categories: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// POIs near a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Radius in meters (server default when omitted)
        #[arg(long)]
        radius: Option<f64>,
    },

    /// Fetch one POI by id
    Poi { id: String },

    /// Fetch a stored route by id
    Route { id: String },

    /// Import POIs around a point from the external source
    Import {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Radius in meters
        #[arg(long, default_value_t = 5000.0)]
        radius: f64,

        /// Categories to import, comma separated (default: the standard import set)
        #[arg(long)]
        categories: Option<String>,
    },
}

/// Writes one script per line to stdout.
struct StdoutTransport;

impl Transport for StdoutTransport {
    fn deliver(&mut self, script: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{script}")?;
        out.flush()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = NavigatorConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = std::time::Duration::from_secs(secs);
    }

    let client = Arc::new(ApiClient::new(config.api_url.clone(), config.timeout)?);

    match args.command {
        Command::Run {
            categories,
            debounce_ms,
            min_zoom,
        } => {
            config.categories = parse_categories(&categories)?;
            if let Some(ms) = debounce_ms {
                config.sync.debounce_ms = ms;
            }
            if let Some(zoom) = min_zoom {
                config.sync.min_zoom_for_pois = zoom;
            }
            config.validate()?;
            run(client, &config).await;
        }
        Command::Health => {
            let health = client.health().await?;
            println!("{}", health.status);
        }
        Command::Query {
            bbox,
            categories,
            limit,
        } => {
            let query = BboxQuery {
                bounds: parse_bbox(&bbox)?,
                categories: parse_categories(&categories)?,
                limit: limit.unwrap_or(config.sync.result_limit),
            };
            let pois = client.fetch_by_bbox(query).await?;
            for poi in &pois {
                println!("{}", serde_json::to_string(poi)?);
            }
            info!(count = pois.len(), "query finished");
        }
        Command::Search {
            text,
            lat,
            lng,
            radius,
            categories,
            limit,
        } => {
            let center = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)?),
                _ => None,
            };
            let search = PoiSearch {
                text,
                center,
                radius_m: radius,
                categories: parse_categories(&categories)?,
                limit,
            };
            let pois = client.search_pois(&search).await?;
            for poi in &pois {
                println!("{}", serde_json::to_string(poi)?);
            }
            info!(count = pois.len(), "search finished");
        }
        Command::Nearby { lat, lng, radius } => {
            let pois = client
                .nearby_pois(Coordinates::new(lat, lng)?, radius)
                .await?;
            for poi in &pois {
                println!("{}", serde_json::to_string(poi)?);
            }
            info!(count = pois.len(), "nearby query finished");
        }
        Command::Poi { id } => {
            let poi = client.poi(&id).await?;
            println!("{}", serde_json::to_string(&poi)?);
        }
        Command::Route { id } => {
            let route = client.route(&id).await?;
            println!("{}", serde_json::to_string(&route)?);
        }
        Command::Import {
            lat,
            lng,
            radius,
            categories,
        } => {
            let categories: Option<Vec<PoiCategory>> =
                categories.as_deref().map(parse_categories).transpose()?;
            let summary = client
                .import_area(ImportRequest {
                    center: Coordinates::new(lat, lng)?,
                    radius_m: radius,
                    categories,
                })
                .await?;
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    Ok(())
}

async fn run(client: Arc<ApiClient>, config: &NavigatorConfig) {
    info!(api = client.base_url(), "navigator session starting");
    let services = Services {
        pois: client.clone(),
        routes: client,
    };
    let navigator = Navigator::new(services, config, StdoutTransport);

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "stdin read failed");
                    break;
                }
            }
        }
    });

    navigator.run(rx).await;
}
