//! Error enums for the core's fallible boundaries, one dedicated
//! `thiserror` enum per layer rather than one grab-bag error type.

use crate::vehicle::VehicleType;

/// Fails the bridge before any I/O happens (§4.1, §7 Missing-model).
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("no {vehicle} model available for country {country:?}")]
    MissingModel { vehicle: VehicleType, country: String },
}

/// Fails the index graph builder (§4.3).
#[derive(Debug, thiserror::Error)]
pub enum IndexGraphBuildError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("archive write failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Fails the cross-tile connector builder (§4.4).
#[derive(Debug, thiserror::Error)]
pub enum CrossMwmBuildError {
    #[error("failed to load borders: {0}")]
    BorderLoad(#[from] BorderLoadError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("archive write failed: {0}")]
    Archive(#[from] ArchiveError),
    #[error("cross-mwm section failed to decode: {0}")]
    Decode(String),
}

/// Fails loading the border polygons for one country (§6, §7 IO failure).
#[derive(Debug, thiserror::Error)]
pub enum BorderLoadError {
    #[error("could not read border file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("malformed border polygon in {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Fails reading or writing an archive section (§6, §7 IO/Format failure).
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("io error on section {tag:?}: {source}")]
    Io { tag: String, #[source] source: std::io::Error },
    #[error("section {tag:?} failed to decode: {source}")]
    Decode { tag: String, #[source] source: bincode::Error },
    #[error("section {tag:?} is missing from the archive")]
    MissingSection { tag: String },
}
