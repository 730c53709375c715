//! Rolling-stock composition types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one physical rolling-stock unit.
///
/// Upstream uses `0` as a documented "unknown identifier" value. That is
/// not the same as the field being absent (which callers model as
/// `Option::None`), so the sentinel is kept as its own variant rather
/// than collapsed into absence. A genuinely assigned unit number of 0
/// cannot be told apart from the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum RollingStockId {
    /// Upstream sent the `0` sentinel.
    Unknown,
    /// A real unit number.
    Known(u64),
}

impl RollingStockId {
    /// Returns the unit number, or `None` for the sentinel.
    pub fn known(&self) -> Option<u64> {
        match self {
            RollingStockId::Unknown => None,
            RollingStockId::Known(n) => Some(*n),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, RollingStockId::Unknown)
    }
}

impl From<u64> for RollingStockId {
    fn from(n: u64) -> Self {
        if n == 0 {
            RollingStockId::Unknown
        } else {
            RollingStockId::Known(n)
        }
    }
}

impl From<RollingStockId> for u64 {
    fn from(id: RollingStockId) -> Self {
        id.known().unwrap_or(0)
    }
}

impl fmt::Display for RollingStockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollingStockId::Unknown => f.write_str("unknown"),
            RollingStockId::Known(n) => write!(f, "{n}"),
        }
    }
}

/// One physical part of a train.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Stock type code, e.g. "VIRM", "SLT".
    pub type_code: String,
    /// `None` when upstream omitted the identifier entirely.
    pub stock_id: Option<RollingStockId>,
    /// Set when this unit runs to a different destination than the train.
    pub destination: Option<String>,
    pub image_url: Option<String>,
}

/// The ordered set of units forming one journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Total number of units as reported upstream.
    pub length: u32,
    pub units: Vec<Unit>,
    /// Direction of travel along the platform, when known.
    pub direction: Option<String>,
}

impl Composition {
    /// Find a unit by its rolling-stock number.
    pub fn unit_by_stock(&self, id: RollingStockId) -> Option<(usize, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .find(|(_, u)| u.stock_id == Some(id))
    }
}
