//! Vehicle types and the mask used to record per-feature/per-joint access.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

/// The three vehicle profiles the core is aware of.
#[derive(Debug, EnumSetType)]
pub enum VehicleType {
    Pedestrian,
    Bicycle,
    Car,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Pedestrian, VehicleType::Bicycle, VehicleType::Car];
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VehicleType::Pedestrian => "pedestrian",
            VehicleType::Bicycle => "bicycle",
            VehicleType::Car => "car",
        };
        f.write_str(s)
    }
}

/// A bitset over [`VehicleType`], backed by `enumset::EnumSet` rather than a
/// hand-rolled bit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleMask(EnumSet<VehicleType>);

impl VehicleMask {
    #[must_use]
    pub fn empty() -> Self {
        Self(EnumSet::empty())
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(self, vehicle: VehicleType) -> bool {
        self.0.contains(vehicle)
    }

    pub fn insert(&mut self, vehicle: VehicleType) {
        self.0.insert(vehicle);
    }

    #[must_use]
    pub fn iter(self) -> impl Iterator<Item = VehicleType> {
        self.0.iter()
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        self.0.as_u8()
    }

    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        Self(EnumSet::from_u8_truncated(raw))
    }
}

impl FromIterator<VehicleType> for VehicleMask {
    fn from_iter<T: IntoIterator<Item = VehicleType>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl BitOr for VehicleMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VehicleMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_contains_nothing() {
        let mask = VehicleMask::empty();
        assert!(VehicleType::ALL.iter().all(|v| !mask.contains(*v)));
    }

    #[test]
    fn insert_is_observable() {
        let mut mask = VehicleMask::empty();
        mask.insert(VehicleType::Car);
        assert!(mask.contains(VehicleType::Car));
        assert!(!mask.contains(VehicleType::Bicycle));
    }

    #[test]
    fn iter_yields_only_set_bits() {
        let mask: VehicleMask = [VehicleType::Pedestrian, VehicleType::Car].into_iter().collect();
        let collected: Vec<_> = mask.iter().collect();
        assert_eq!(collected, vec![VehicleType::Pedestrian, VehicleType::Car]);
    }
}
