//! Probe the SEPTA endpoints and save every response for inspection.
//!
//! Usage: `septa-dump [OUTPUT_DIR]` (defaults to `test_output`).

use septa_watch::dump::{DEFAULT_DUMP_DIR, DumpError, DumpWriter};
use septa_watch::septa::{
    Direction, Endpoint, SeptaClient, SeptaConfig, TrainRecord, arrivals_only, format_schedule,
    next_to_arrive_query, station_query,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("septa_watch=info,septa_dump=info")),
        )
        .init();

    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DUMP_DIR.to_string());

    let client = match SeptaClient::new(SeptaConfig::new()) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to create SEPTA client: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&client, &DumpWriter::new(&dir)).await {
        error!("dump failed: {e}");
        std::process::exit(1);
    }
    info!("raw data has been saved to {dir}");
}

async fn run(client: &SeptaClient, writer: &DumpWriter) -> Result<(), DumpError> {
    let routes = [
        ("Suburban Station", "30th Street Station", 3, "next_to_arrive_suburban_to_30th"),
        ("Market East", "Temple University", 2, "next_to_arrive_market_east_to_temple"),
    ];
    for (origin, destination, count, name) in routes {
        println!("Trains from {origin} to {destination}:");
        let query = next_to_arrive_query(origin, destination, count);
        let capture = writer.capture(client, name, Endpoint::NextToArrive, &query).await?;
        print_schedules(&capture.records().unwrap_or_default());
    }

    println!("All current trains:");
    let capture = writer
        .capture(client, "train_view_all_trains", Endpoint::TrainView, &[])
        .await?;
    match capture.records() {
        Ok(trains) => println!("Found {} trains currently in the system.", trains.len()),
        Err(e) => warn!("train view failed: {e}"),
    }

    println!("Enhanced search from Suburban Station to 30th Street Station:");
    match client
        .search_trains_by_route("Suburban Station", "30th Street Station", 3)
        .await
    {
        Ok(trains) => {
            writer.write_json("enhanced_search_suburban_to_30th", &trains)?;
            print_schedules(&trains);
        }
        Err(e) => warn!("enhanced search failed: {e}"),
    }

    let boards = [
        ("Suburban Station", Direction::North, 10, "arrivals_suburban_northbound"),
        ("30th Street Station", Direction::South, 8, "arrivals_30th_street_southbound"),
    ];
    for (station, direction, count, name) in boards {
        println!("Arrivals at {station} ({direction}):");
        let query = station_query(station, direction, count);
        let capture = writer.capture(client, name, Endpoint::Arrivals, &query).await?;
        print_schedules(&arrivals_only(capture.records().unwrap_or_default()));
    }

    Ok(())
}

fn print_schedules(trains: &[TrainRecord]) {
    if trains.is_empty() {
        println!("No trains found.");
        return;
    }
    println!("Found {} trains:", trains.len());
    for (i, train) in trains.iter().enumerate() {
        println!("\n{}. {}", i + 1, format_schedule(train));
    }
    println!("{}", "-".repeat(50));
}
