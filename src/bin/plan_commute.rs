//! Command-line trip planner.

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use detour_planner::candidate::Candidate;
use detour_planner::config::PlannerConfig;
use detour_planner::engine::DetourEngine;
use detour_planner::fixed::{
    parse_candidate, parse_coordinate, CoordinateText, FixedLocation, StaticCandidates,
};
use detour_planner::haversine::HaversineResolver;
use detour_planner::navigation::{NavigationPlan, TransportMode};
use detour_planner::osrm::OsrmClient;
use detour_planner::overpass::OverpassClient;
use detour_planner::planner::{TripPlan, TripPlanner, TripRequest};
use detour_planner::traits::{CandidateSource, Coordinate, LegResolver, NavigationHandoff};

#[derive(Parser, Debug)]
#[command(author, version, about = "Check whether a coffee stop still gets you there on time", long_about = None)]
struct Args {
    /// Starting position as lat,lng
    #[arg(long, value_parser = coordinate_arg)]
    origin: Coordinate,

    /// Destination as lat,lng
    #[arg(long)]
    destination: String,

    /// Departure time (RFC 3339); defaults to now
    #[arg(long)]
    depart: Option<DateTime<Utc>>,

    /// Arrival deadline (RFC 3339)
    #[arg(long)]
    deadline: DateTime<Utc>,

    /// Candidate stop as name@lat,lng; repeatable. Searches nearby cafés when omitted.
    #[arg(long = "candidate", value_parser = candidate_arg)]
    candidates: Vec<Candidate>,

    /// Use straight-line estimates instead of OSRM
    #[arg(long)]
    offline: bool,

    /// Minutes spent at the stop
    #[arg(long)]
    coffee_minutes: Option<u32>,

    /// Maximum number of candidate stops
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Travel mode for the navigation hand-off: driving, walking or cycling
    #[arg(long, default_value_t = TransportMode::Driving)]
    mode: TransportMode,

    /// Print the navigation plan for option N (0 = direct, 1.. = stops)
    #[arg(long)]
    choose: Option<usize>,
}

fn coordinate_arg(text: &str) -> Result<Coordinate, String> {
    parse_coordinate(text).ok_or_else(|| format!("expected lat,lng, got '{text}'"))
}

fn candidate_arg(text: &str) -> Result<Candidate, String> {
    parse_candidate(text).ok_or_else(|| format!("expected name@lat,lng, got '{text}'"))
}

struct PrintHandoff;

impl NavigationHandoff for PrintHandoff {
    fn hand_off(&self, plan: &NavigationPlan) {
        println!("Navigation ({}):", plan.mode);
        for stop in plan.stops() {
            println!("  {} @ {}", stop.label, stop.position);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("detour_planner=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = PlannerConfig::from_env();
    if let Some(minutes) = args.coffee_minutes {
        config.coffee_stop_minutes = minutes;
    }
    if let Some(max) = args.max_candidates {
        config.max_candidates = max;
    }

    let request = TripRequest {
        destination: args.destination.clone(),
        departure: args.depart.unwrap_or_else(Utc::now),
        deadline: args.deadline,
        mode: args.mode,
    };

    let source: Box<dyn CandidateSource> = if args.candidates.is_empty() {
        Box::new(OverpassClient::new(config.overpass.clone(), config.search_region_m)?)
    } else {
        Box::new(StaticCandidates(args.candidates.clone()))
    };

    let plan = if args.offline {
        run(HaversineResolver::default(), source, &args, config, &request)?
    } else {
        let client = OsrmClient::new(config.osrm.clone())?;
        run(client, source, &args, config, &request)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan.summary)?);
    } else {
        print_summary(&plan);
    }

    if let Some(option) = args.choose {
        if !plan.commit(option.checked_sub(1), &PrintHandoff) {
            eprintln!("no option {option}");
        }
    }

    Ok(())
}

fn run<R: LegResolver>(
    resolver: R,
    source: Box<dyn CandidateSource>,
    args: &Args,
    config: PlannerConfig,
    request: &TripRequest,
) -> Result<TripPlan, Box<dyn std::error::Error>> {
    let engine = DetourEngine::new(resolver, config.worker_threads)?;
    let planner = TripPlanner::new(
        engine,
        source,
        FixedLocation(Some(args.origin)),
        CoordinateText,
        config,
    );
    Ok(planner.plan(request)?)
}

fn print_summary(plan: &TripPlan) {
    let summary = &plan.summary;
    println!("Arrival deadline: {}", summary.deadline.format("%H:%M"));
    println!("Direct ETA: {} min", summary.direct_minutes);
    println!("STATUS: {}", summary.direct_status());
    println!();
    for (index, option) in summary.options.iter().enumerate() {
        println!("{}. {}", index + 1, option);
    }
}
