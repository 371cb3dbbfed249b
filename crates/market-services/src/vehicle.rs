//! Vehicle-type feed from the cars service.

use market_catalog::{VehicleType, VehicleTypeFeed};
use market_core::endpoints;
use market_data::{ApiClient, Params};
use tracing::error;

use crate::error::ServiceError;

/// Reads the vehicle types with their live car counts.
#[derive(Debug, Clone)]
pub struct VehicleService {
    api: ApiClient,
}

impl VehicleService {
    /// Create a service over the cars API.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All vehicle types.
    pub async fn vehicle_types(&self) -> Result<Vec<VehicleType>, ServiceError> {
        let feed: VehicleTypeFeed = self
            .api
            .get_json(endpoints::VEHICLE_TYPES, Params::new())
            .await
            .map_err(|e| {
                error!(error = %e, "failed to fetch types");
                e
            })?;
        Ok(feed.data)
    }
}
