//! Byte layout for the `cross_mwm` archive section (§4.4, §6).
//!
//! The exact byte layout is nominally owned by an external collaborator
//! (`CrossMwmConnectorSerializer`), but the core still needs to guarantee
//! that `serialize`/`deserialize` round-trip, so one concrete
//! bincode-backed implementation lives here.

use crate::error::ArchiveError;
use crate::vehicle::VehicleType;

use super::{CrossMwmConnector, CrossMwmTransition};

/// One vehicle's connector plus the tag it was keyed by, as written into
/// the section.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct PersistedConnector {
    vehicle: VehicleType,
    connector: CrossMwmConnector,
}

/// The full `cross_mwm` section payload: the global transition list
/// followed by per-vehicle connector blocks (§6: "Persisted layout").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CrossMwmSection {
    transitions: Vec<CrossMwmTransition>,
    connectors: Vec<PersistedConnector>,
}

/// Encodes/decodes the `cross_mwm` archive section.
pub struct CrossMwmConnectorSerializer;

impl CrossMwmConnectorSerializer {
    /// # Errors
    /// Returns [`ArchiveError::Decode`] only via the caller's own decode
    /// path; this method itself only fails on a `bincode` encode error,
    /// which is reported the same way for consistency.
    pub fn serialize(transitions: &[CrossMwmTransition], connectors: &[(VehicleType, CrossMwmConnector)]) -> Result<Vec<u8>, ArchiveError> {
        let section = CrossMwmSection {
            transitions: transitions.to_vec(),
            connectors: connectors.iter().map(|(vehicle, connector)| PersistedConnector { vehicle: *vehicle, connector: connector.clone() }).collect(),
        };
        bincode::serialize(&section).map_err(|source| ArchiveError::Decode { tag: "cross_mwm".to_owned(), source })
    }

    /// # Errors
    /// Returns [`ArchiveError::Decode`] if `bytes` is not a valid encoded
    /// section.
    pub fn deserialize(bytes: &[u8]) -> Result<(Vec<CrossMwmTransition>, Vec<(VehicleType, CrossMwmConnector)>), ArchiveError> {
        let section: CrossMwmSection =
            bincode::deserialize(bytes).map_err(|source| ArchiveError::Decode { tag: "cross_mwm".to_owned(), source })?;
        let connectors = section.connectors.into_iter().map(|p| (p.vehicle, p.connector)).collect();
        Ok((section.transitions, connectors))
    }
}
