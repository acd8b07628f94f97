use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::{
    ASPECT_RATIO_16X9, ASPECT_RATIO_9X16, LANDSCAPE_PREFIX, OTHER_PREFIX, PORTRAIT_PREFIX,
};

/// Orientation bucket for an uploaded video, derived from its display aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClassification {
    Landscape,
    Portrait,
    Other,
}

impl AspectClassification {
    /// Map a reported display aspect ratio. Only exact `16:9` and `9:16` are
    /// recognized; anything else, including a missing ratio, is `Other`.
    pub fn from_ratio(ratio: Option<&str>) -> Self {
        match ratio {
            Some(ASPECT_RATIO_16X9) => AspectClassification::Landscape,
            Some(ASPECT_RATIO_9X16) => AspectClassification::Portrait,
            _ => AspectClassification::Other,
        }
    }

    /// Key prefix used when naming stored objects.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClassification::Landscape => LANDSCAPE_PREFIX,
            AspectClassification::Portrait => PORTRAIT_PREFIX,
            AspectClassification::Other => OTHER_PREFIX,
        }
    }
}

impl Display for AspectClassification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
