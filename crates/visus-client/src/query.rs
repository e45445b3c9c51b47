//! Request descriptors and their URL encoding.
//!
//! Parameter order on the wire is fixed: `quality`, `time`, then `z`,
//! `x_range` and `y_range`, each range expanded as two repeated entries
//! `[min, max]`. The server reads the ranges with `getlist`, so the order
//! inside each pair matters.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Inclusive integer range along one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Swap an inverted pair so that `min <= max`.
    ///
    /// Slider widgets can be dragged past each other; the UI calls this
    /// before building a descriptor. The builder itself never reorders.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// The pair in wire order.
    pub fn as_pair(&self) -> [i32; 2] {
        [self.min, self.max]
    }
}

/// Everything the array server needs to cut a velocity sub-volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Downsampling level; more negative is coarser.
    pub quality: i32,
    /// Timestep index.
    pub time: u32,
    /// Depth levels.
    pub z: AxisRange,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::build(
            0,
            0,
            AxisRange::new(0, 1),
            AxisRange::new(0, 200),
            AxisRange::new(0, 200),
        )
    }
}

impl QueryDescriptor {
    /// Assemble a descriptor. No range validation happens here.
    pub fn build(
        quality: i32,
        time: u32,
        z: AxisRange,
        x_range: AxisRange,
        y_range: AxisRange,
    ) -> Self {
        Self {
            quality,
            time,
            z,
            x_range,
            y_range,
        }
    }

    /// Query parameters in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("quality", self.quality.to_string()),
            ("time", self.time.to_string()),
        ];

        for (name, range) in [("z", self.z), ("x_range", self.x_range), ("y_range", self.y_range)] {
            for value in range.as_pair() {
                pairs.push((name, value.to_string()));
            }
        }

        pairs
    }

    /// Append the query to `base`, keeping any query the base already has.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in self.query_pairs() {
                query.append_pair(name, &value);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:5000/").unwrap()
    }

    #[test]
    fn test_default_matches_reference_request() {
        let url = QueryDescriptor::default().to_url(&base());
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/?quality=0&time=0&z=0&z=1&x_range=0&x_range=200&y_range=0&y_range=200"
        );
    }

    #[test]
    fn test_negative_quality() {
        let query = QueryDescriptor::build(
            -6,
            3,
            AxisRange::new(0, 10),
            AxisRange::new(5, 6),
            AxisRange::new(7, 8),
        );
        let url = query.to_url(&base());
        assert!(url.as_str().contains("quality=-6&time=3"));
    }

    #[test]
    fn test_builder_keeps_inverted_ranges() {
        let query = QueryDescriptor::build(
            0,
            0,
            AxisRange::new(5, 1),
            AxisRange::new(0, 1),
            AxisRange::new(0, 1),
        );
        let pairs = query.query_pairs();
        assert_eq!(pairs[2], ("z", "5".to_string()));
        assert_eq!(pairs[3], ("z", "1".to_string()));
    }

    #[test]
    fn test_normalized() {
        assert_eq!(AxisRange::new(9, 2).normalized(), AxisRange::new(2, 9));
        assert_eq!(AxisRange::new(2, 9).normalized(), AxisRange::new(2, 9));
        assert!(AxisRange::new(9, 2).is_inverted());
    }

    #[test]
    fn test_existing_base_query_is_kept() {
        let base = Url::parse("http://example.org/data?dataset=llc2160").unwrap();
        let url = QueryDescriptor::default().to_url(&base);
        assert!(url.as_str().starts_with("http://example.org/data?dataset=llc2160&quality=0"));
    }
}
