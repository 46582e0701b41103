//! `build_routing_index`: the CLI entry point that drives feature reader →
//! bridge → builder → serialiser end to end (§6, §7).

mod json_source;
mod poly_border;

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use routing_graph::{
    Archive, BorderLoader, CrossMwmConnectorBuilder, CrossMwmConnectorSerializer, FeatureId, FeatureSource,
    IndexGraphBuilder, IndexGraphSerializer, RoadInfo, RoadPoint, VehicleClassificationBridge, VehicleType,
};
use routing_profiles::{Profile, SpeedBasedEdgeEstimator, UniformVehicleModelFactory};

use json_source::JsonFeatureSource;
use poly_border::PolyBorderLoader;

static PROGRESS_STYLE: OnceLock<ProgressStyle> = OnceLock::new();

/// Builds a tile's `routing` and `cross_mwm` archive sections from a feature
/// reader, a country's vehicle models, and its border polygons.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the tile's features, as a JSON array of `{points, altitudes}`.
    #[arg(env)]
    tile_path: PathBuf,

    /// ISO country code used to specialise the vehicle-model factory and to
    /// locate the border file.
    #[arg(env)]
    country: String,

    /// Directory containing `borders/<country>.poly`.
    #[arg(env)]
    data_path: PathBuf,

    /// Path to the output archive (created or extended).
    #[arg(env)]
    output_archive: PathBuf,

    /// Disables progress output.
    #[arg(env, long)]
    no_progress: bool,
}

impl Cli {
    fn border_path(&self) -> PathBuf {
        self.data_path.join("borders").join(format!("{}.poly", self.country))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env()))
        .init();

    let cli = Cli::parse();

    if !cli.no_progress {
        _ = PROGRESS_STYLE.set(
            ProgressStyle::with_template("[{elapsed}] {bar:40.cyan/blue} {msg} {percent}% ETA {eta}")
                .expect("template is valid")
                .progress_chars("##-"),
        );
    }

    match build_routing_index(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "build_routing_index failed");
            ExitCode::FAILURE
        }
    }
}

/// Drives the whole pipeline for one tile: index graph, then cross-tile
/// connectors for every vehicle type (§9: parameterised, not Car-only).
/// The whole body is one `Result` so a failure never leaves a partially
/// written archive (§7: "partial output must not be committed").
fn build_routing_index(cli: &Cli) -> anyhow::Result<()> {
    let source = JsonFeatureSource::load(&cli.tile_path)?;
    tracing::info!(feature_count = source.feature_count(), tile_path = %cli.tile_path.display(), "loaded tile features");

    let factory = UniformVehicleModelFactory;
    let bridge = VehicleClassificationBridge::new(&factory, &cli.country)?;

    let index_build = IndexGraphBuilder::new(&bridge).build(&source);

    let border_loader = PolyBorderLoader;
    let regions = border_loader.load_borders(&cli.border_path())?;

    let cross_mwm_builder = CrossMwmConnectorBuilder::new(&bridge);
    let transitions = cross_mwm_builder.detect_transitions(&source, &regions);
    tracing::info!(transition_count = transitions.len(), "cross-tile transitions detected");

    let progress = PROGRESS_STYLE.get().map(|style| {
        let bar = ProgressBar::new(VehicleType::ALL.len() as u64);
        bar.set_message("Precomputing leap weights...");
        bar.set_style(style.clone());
        bar
    });

    let mut connectors = Vec::new();
    for vehicle in VehicleType::ALL {
        let mut connector = CrossMwmConnectorBuilder::<Profile>::connector_for(&transitions, vehicle);
        let estimator = SpeedBasedEdgeEstimator::new(bridge.max_speed_kmph(vehicle));
        let road_infos = collect_road_infos(&source, &bridge, vehicle);

        CrossMwmConnectorBuilder::<Profile>::fill_leap_weights(
            &mut connector,
            &index_build.graph,
            &road_infos,
            &estimator,
            |segment| index_build.graph.joint_for(RoadPoint::new(segment.feature_id, segment.segment_index)),
        );

        connectors.push((vehicle, connector));
        progress.as_ref().inspect(|bar| bar.inc(1));
    }
    progress.inspect(ProgressBar::finish);

    let mut archive = Archive::open(&cli.output_archive)?;

    let routing_bytes = IndexGraphSerializer::serialize(&index_build.graph, &index_build.masks)?;
    let mut writer = archive.get_writer("routing");
    std::io::Write::write_all(&mut writer, &routing_bytes)?;
    archive.commit(writer);

    let cross_mwm_bytes = CrossMwmConnectorSerializer::serialize(&transitions, &connectors)?;
    let mut writer = archive.get_writer("cross_mwm");
    std::io::Write::write_all(&mut writer, &cross_mwm_bytes)?;
    archive.commit(writer);

    archive.finish()?;
    tracing::info!(output = %cli.output_archive.display(), "routing index written");
    Ok(())
}

/// Builds the per-feature `RoadInfo` table the cross-tile leap-weight pass
/// needs for one vehicle, via [`VehicleClassificationBridge::build_road_info`].
fn collect_road_infos(source: &JsonFeatureSource, bridge: &VehicleClassificationBridge<Profile>, vehicle: VehicleType) -> HashMap<FeatureId, RoadInfo> {
    let mut road_infos = HashMap::new();
    source.for_each_feature(&mut |feature, feature_id| {
        if let Some(road_info) = bridge.build_road_info(feature, 0, vehicle) {
            road_infos.insert(feature_id, road_info);
        }
    });
    road_infos
}
