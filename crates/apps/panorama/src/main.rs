use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use foundation::math::{ProjectionModel, ReferencePoint};
use panorama::{ConfigOverrides, LoadOutcome, PanoramaSession, RunReport, resolve_config};
use streaming::{FeatureSource, FeatureStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How long an interrupted run still waits for the in-flight load.
const LATE_LOAD_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Project nearby road lines and crossings onto a 360° panorama"
)]
struct Args {
    /// Line collection (file path or http(s) URL)
    #[arg(long, env = "PANORAMA_LINES", default_value = "data/line.json")]
    lines: FeatureSource,

    /// Polygon collection (file path or http(s) URL)
    #[arg(long, env = "PANORAMA_POLYGONS", default_value = "data/road_cros.json")]
    polygons: FeatureSource,

    /// Overlay config file (JSON: radiusMeters, groundOffset, earthRadiusMeters, projection)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Proximity radius in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Meters subtracted from every altitude
    #[arg(long, allow_negative_numbers = true)]
    ground_offset: Option<f64>,

    #[arg(long)]
    earth_radius: Option<f64>,

    /// equirectangular | enu
    #[arg(long)]
    projection: Option<ProjectionModel>,

    /// Longitude of the panorama
    #[arg(long, default_value_t = ReferencePoint::FALLBACK.lon_deg, allow_negative_numbers = true)]
    lon: f64,

    /// Latitude of the panorama
    #[arg(long, default_value_t = ReferencePoint::FALLBACK.lat_deg, allow_negative_numbers = true)]
    lat: f64,

    /// Further viewpoints to visit after opening, in order
    #[arg(long = "walk", value_name = "LON,LAT", value_parser = parse_point)]
    walk: Vec<ReferencePoint>,

    /// Frames rendered at each viewpoint
    #[arg(long, default_value_t = 3)]
    frames: u32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Include feature metadata in the text report
    #[arg(long)]
    describe: bool,
}

fn parse_point(s: &str) -> Result<ReferencePoint, String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got {s:?}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude {lon:?}: {e}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    Ok(ReferencePoint::new(lon, lat))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let overrides = ConfigOverrides {
        radius_meters: args.radius,
        ground_offset: args.ground_offset,
        earth_radius_meters: args.earth_radius,
        projection: args.projection,
    };
    let config = resolve_config(args.config.as_deref(), &overrides).map_err(|e| e.to_string())?;
    let lines = args.lines;
    let polygons = args.polygons;
    info!(%lines, %polygons, radius = config.radius_meters, "starting");

    let mut session = PanoramaSession::new(config);
    let ticket = session.open(ReferencePoint::new(args.lon, args.lat));
    let mut load = tokio::spawn(async move { FeatureStore::load(&lines, &polygons).await });

    let loaded = tokio::select! {
        joined = &mut load => Some(joined.map_err(|e| format!("load task failed: {e}"))?),
        _ = tokio::signal::ctrl_c() => None,
    };

    let mut report = match loaded {
        Some((store, load_report)) => {
            let mut report = RunReport::new(Some(&load_report));
            let outcome = session.complete_load(ticket, store, &load_report);
            if let LoadOutcome::Applied(summary) = outcome {
                report.updates.push(summary);
            }
            let interrupted = tokio::select! {
                () = walk(&mut session, &args.walk, args.frames, &mut report) => false,
                _ = tokio::signal::ctrl_c() => true,
            };
            report.interrupted = interrupted;
            report
        }
        None => {
            warn!("interrupted before the feature data arrived");
            session.close();
            match tokio::time::timeout(LATE_LOAD_GRACE, &mut load).await {
                Ok(Ok((store, load_report))) => {
                    session.complete_load(ticket, store, &load_report);
                }
                Ok(Err(e)) => warn!(error = %e, "load task failed"),
                Err(_) => {
                    warn!("load still running; cancelling it");
                    load.abort();
                }
            }
            let mut report = RunReport::new(None);
            report.interrupted = true;
            report
        }
    };

    report.capture_resident(&session);
    session.close();
    report.capture_events(&mut session);

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print!("{}", report.describe(args.describe));
    }
    Ok(())
}

/// Renders `frames` frames at the opening viewpoint and at each stop.
async fn walk(
    session: &mut PanoramaSession,
    stops: &[ReferencePoint],
    frames: u32,
    report: &mut RunReport,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(runtime::DEFAULT_FRAME_DT_S));
    let viewpoints = std::iter::once(None).chain(stops.iter().copied().map(Some));
    for stop in viewpoints {
        if let Some(summary) = stop.and_then(|point| session.move_reference(point)) {
            report.updates.push(summary);
        }
        for _ in 0..frames {
            ticker.tick().await;
            if session.render_frame().is_some() {
                report.frames += 1;
            }
        }
    }
}
