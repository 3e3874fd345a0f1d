//! Coordinate to grid cell resolution via the point-lookup endpoint

use serde::Deserialize;
use tracing::{debug, instrument};

use super::fetch_properties;
use crate::error::ForecastError;
use crate::models::{Coordinate, GridCell};
use crate::transport::Transport;

const CONTEXT: &str = "point lookup response";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    grid_id: String,
    grid_x: u32,
    grid_y: u32,
}

/// Resolves a coordinate to the grid cell covering it
pub struct GridResolver<'a> {
    transport: &'a dyn Transport,
    base_url: &'a str,
}

impl<'a> GridResolver<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn Transport, base_url: &'a str) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// Point-lookup URL for a coordinate
    #[must_use]
    pub fn point_url(&self, coord: &Coordinate) -> String {
        format!("{}/points/{}", self.base_url, coord.format_point_query())
    }

    /// Look up the grid cell for `coord` with a single request
    #[instrument(skip(self), fields(coord = %coord))]
    pub fn resolve(&self, coord: &Coordinate) -> crate::Result<GridCell> {
        let url = self.point_url(coord);
        let properties = fetch_properties(self.transport, &url, CONTEXT)?;

        let raw = properties.to_string();
        let point: PointProperties = serde_json::from_value(properties)
            .map_err(|e| ForecastError::decode(CONTEXT, e.to_string(), raw))?;

        let cell = GridCell::new(point.grid_id, point.grid_x, point.grid_y);
        debug!("Resolved {} to grid cell {:?}", coord, cell);
        Ok(cell)
    }
}
