//! Georeference a floorplan described by a JSON config and write a report.
//!
//! ```text
//! cargo run -p floorplan-geo --example floorplan_report -- testdata/golden_gate_park.json
//! ```

use std::{env, path::PathBuf};

use floorplan_geo::{FloorplanConfig, FloorplanReport};

#[cfg(not(feature = "tracing"))]
use std::str::FromStr;

#[cfg(not(feature = "tracing"))]
use log::{info, warn, LevelFilter};

#[cfg(feature = "tracing")]
use tracing::{info, warn};

#[cfg(feature = "tracing")]
use floorplan_geo_core::init_tracing;
#[cfg(not(feature = "tracing"))]
use floorplan_geo_core::init_with_level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    let log_level = env::var("FLOORPLAN_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info);
    #[cfg(not(feature = "tracing"))]
    init_with_level(log_level)?;

    #[cfg(feature = "tracing")]
    init_tracing(false);

    run()
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = parse_config_path();
    let cfg = FloorplanConfig::load_json(&config_path)?;
    info!("loaded {}", config_path.display());

    let mut report = FloorplanReport::new(&cfg, &config_path);
    match cfg.build_floorplan() {
        Ok(floorplan) => {
            info!(
                "floor {}: {:.4} m per page unit, upright heading {:.2} deg",
                floorplan.floor_level(),
                floorplan.page_unit_size_in_meters(),
                floorplan.upright_heading()
            );
            report.set_floorplan(&floorplan, &cfg.query_points);
            for q in &report.queries {
                info!(
                    "page ({:.1}, {:.1}) -> map ({:.3}, {:.3}) -> ({:.7}, {:.7})",
                    q.page_point.x,
                    q.page_point.y,
                    q.map_point.x,
                    q.map_point.y,
                    q.coordinate.latitude,
                    q.coordinate.longitude
                );
            }
        }
        Err(err) => {
            warn!("floorplan rejected: {err}");
            report.set_error(err);
        }
    }

    let output_path = cfg.output_path();
    report.write_json(&output_path)?;
    info!("report written to {}", output_path.display());
    Ok(())
}

fn parse_config_path() -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("testdata/golden_gate_park.json"))
}
