//! Spatial reference model

use serde::{Deserialize, Serialize};

/// Spatial reference system from `GDB_SpatialRefs`
///
/// Name and WKT stay empty when the SRID could not be looked up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SpatialReference {
    pub srid: i32,
    #[serde(default)]
    pub srs_name: String,
    /// Well-known text definition
    #[serde(default)]
    pub srs_definition: String,
}

impl SpatialReference {
    pub fn stub(srid: i32) -> Self {
        Self {
            srid,
            ..Default::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.srs_name.is_empty() || !self.srs_definition.is_empty()
    }
}
