use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::vehicles::{InsertVehicleEntity, VehicleEntity},
        repositories::vehicles::VehicleRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::vehicles},
};

pub struct VehiclePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl VehiclePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VehicleRepository for VehiclePostgres {
    async fn create(&self, vehicle: InsertVehicleEntity) -> Result<VehicleEntity> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<VehicleEntity> {
            let mut conn = db_pool.get()?;

            let vehicle = insert_into(vehicles::table)
                .values(&vehicle)
                .returning(VehicleEntity::as_returning())
                .get_result::<VehicleEntity>(&mut conn)?;

            Ok(vehicle)
        })
        .await?
    }
}
