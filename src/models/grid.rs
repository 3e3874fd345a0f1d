//! Grid cell identifier

use serde::{Deserialize, Serialize};

/// The upstream's spatial tiling unit covering a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Forecast office code (e.g. "OKX")
    pub office: String,
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    #[must_use]
    pub fn new<S: Into<String>>(office: S, x: u32, y: u32) -> Self {
        Self {
            office: office.into(),
            x,
            y,
        }
    }

    /// Path of the raw gridpoint document for this cell
    #[must_use]
    pub fn gridpoint_path(&self) -> String {
        format!("gridpoints/{}/{},{}", self.office, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gridpoint_path() {
        let cell = GridCell::new("OKX", 33, 35);
        assert_eq!(cell.gridpoint_path(), "gridpoints/OKX/33,35");
    }
}
