use serde::Serialize;

/// One record of the persistence diagram.
///
/// `birth` and `death` are filtration values with `birth < death`; an
/// essential feature carries the run threshold (possibly `+inf`) as its
/// death. `(x, y, z)` locate the reported cell's anchor vertex, chosen by
/// [`LocationMode`] at emission time.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistencePair {
    pub dim: u8,
    pub birth: f64,
    pub death: f64,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl PersistencePair {
    pub fn new(dim: u8, birth: f64, death: f64, x: i32, y: i32, z: i32) -> Self {
        Self {
            dim,
            birth,
            death,
            x,
            y,
            z,
        }
    }

    /// Lifetime of the feature.
    pub fn persistence(&self) -> f64 {
        self.death - self.birth
    }

    /// Whether the feature survives up to the threshold.
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Which cell's coordinates a [`PersistencePair`] reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    /// Anchor of the cell that created the feature (default).
    #[default]
    Birth,
    /// Anchor of the cell that killed the feature; essential pairs and the
    /// dual sweep fall back to the birth location.
    Death,
    /// Coordinates are recorded but omitted from textual output.
    None,
}

impl LocationMode {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "birth" => Ok(Self::Birth),
            "death" => Ok(Self::Death),
            "none" => Ok(Self::None),
            other => Err(format!("Unknown location '{other}'. Use birth|death|none.")),
        }
    }
}

/// Pipeline selection for the persistence computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Union-find sweep for dimension 0, matrix reduction above (default).
    #[default]
    LinkFind,
    /// Matrix reduction for every dimension including 0.
    ComputePairs,
    /// Top-dimensional persistence only, via the dual-graph sweep.
    TopDim,
}

impl Method {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "link_find" => Ok(Self::LinkFind),
            "compute_pairs" => Ok(Self::ComputePairs),
            "top_dim" => Ok(Self::TopDim),
            other => Err(format!(
                "Unknown method '{other}'. Use link_find|compute_pairs|top_dim."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parsing_round_trips() {
        assert_eq!(Method::from_str("link_find").unwrap(), Method::LinkFind);
        assert_eq!(
            Method::from_str("compute_pairs").unwrap(),
            Method::ComputePairs
        );
        assert_eq!(Method::from_str("top_dim").unwrap(), Method::TopDim);
        assert!(Method::from_str("linkfind").is_err());
    }

    #[test]
    fn essential_pairs_report_infinite_persistence() {
        let pair = PersistencePair::new(1, 0.25, f64::INFINITY, 0, 0, 0);
        assert!(pair.is_essential());
        assert!(pair.persistence().is_infinite());
    }
}
