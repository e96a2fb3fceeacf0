use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::vehicles::{InsertVehicleEntity, VehicleEntity};

#[automock]
#[async_trait]
pub trait VehicleRepository {
    async fn create(&self, vehicle: InsertVehicleEntity) -> Result<VehicleEntity>;
}
