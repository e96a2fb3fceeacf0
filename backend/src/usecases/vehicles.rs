use chrono::Utc;
use portal::domain::{
    repositories::vehicles::VehicleRepository,
    value_objects::vehicles::{CreateVehicleModel, VehicleDto},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::usecases::action_errors::{ActionError, ActionResult};

pub struct VehicleUseCase<V>
where
    V: VehicleRepository + Send + Sync + 'static,
{
    vehicle_repository: Arc<V>,
}

impl<V> VehicleUseCase<V>
where
    V: VehicleRepository + Send + Sync + 'static,
{
    pub fn new(vehicle_repository: Arc<V>) -> Self {
        Self { vehicle_repository }
    }

    pub async fn create(&self, model: CreateVehicleModel) -> ActionResult<VehicleDto> {
        let now = Utc::now();
        model.validate_at(now)?;

        let vehicle = self
            .vehicle_repository
            .create(model.to_entity(now))
            .await
            .map_err(|err| {
                error!(user_id = model.user_id, db_error = ?err, "vehicles: failed to create vehicle");
                ActionError::persistence("Failed to create vehicle. Please try again.", err)
            })?;

        info!(vehicle_id = vehicle.id, user_id = vehicle.user_id, "vehicles: created");

        Ok(vehicle.into())
    }
}
