//! The closed set of physical fields a lookup table can carry.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// A tabulated physical property.
///
/// The declaration order is the column order of a full table row,
/// after the leading pressure and temperature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    /// Compressional wave velocity
    Vp,
    /// Shear wave velocity
    Vs,
    /// Anharmonic compressional wave velocity
    VpAni,
    /// Anharmonic shear wave velocity
    VsAni,
    /// Bulk sound velocity
    Vphi,
    Density,
    /// Shear attenuation
    Qs,
    /// Solidus temperature
    TSol,
}

impl FieldKind {
    /// Every field, in full-table column order.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Vp,
        FieldKind::Vs,
        FieldKind::VpAni,
        FieldKind::VsAni,
        FieldKind::Vphi,
        FieldKind::Density,
        FieldKind::Qs,
        FieldKind::TSol,
    ];

    /// Lowercase registry name, e.g. `"vp_ani"`.
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Vp => "vp",
            FieldKind::Vs => "vs",
            FieldKind::VpAni => "vp_ani",
            FieldKind::VsAni => "vs_ani",
            FieldKind::Vphi => "vphi",
            FieldKind::Density => "density",
            FieldKind::Qs => "qs",
            FieldKind::TSol => "t_sol",
        }
    }

    /// Physical unit label. Metadata only; nothing is converted.
    pub const fn units(self) -> &'static str {
        match self {
            FieldKind::Vp
            | FieldKind::Vs
            | FieldKind::VpAni
            | FieldKind::VsAni
            | FieldKind::Vphi => "km/s",
            FieldKind::Density => "kg/m^3",
            FieldKind::Qs => "Hz",
            FieldKind::TSol => "K",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = Error;

    /// Case-insensitive lookup by registry name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownField(s.to_owned()))
    }
}
