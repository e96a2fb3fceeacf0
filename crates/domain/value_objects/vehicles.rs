use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::vehicles::{InsertVehicleEntity, VehicleEntity};
use crate::domain::value_objects::{enums::vehicle_colors::VehicleColor, field_errors::FieldErrors};

pub const MIN_VEHICLE_YEAR: i32 = 1975;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct CreateVehicleModel {
    #[validate(range(min = 1, message = "Please select a user"))]
    pub user_id: i64,
    #[validate(length(min = 1, message = "Make is required"))]
    pub make: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    pub color: String,
    pub year: i32,
    #[validate(length(min = 7, message = "License plate must be at least 7 characters"))]
    pub license_plate: String,
}

impl CreateVehicleModel {
    /// Trimmed copy with the plate upper-cased, as it will be stored.
    pub fn normalized(&self) -> Self {
        Self {
            user_id: self.user_id,
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            color: self.color.trim().to_string(),
            year: self.year,
            license_plate: self.license_plate.trim().to_uppercase(),
        }
    }

    /// Field rules that depend on the current date or on closed value sets.
    /// Runs against the normalized form so the checked values are the stored ones.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), FieldErrors> {
        let model = self.normalized();
        let mut errors = match model.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => FieldErrors::from(err),
        };

        let max_year = now.year() + 1;
        if !(MIN_VEHICLE_YEAR..=max_year).contains(&model.year) {
            errors.push(
                "year",
                format!("Year must be between {} and {}", MIN_VEHICLE_YEAR, max_year),
            );
        }

        if VehicleColor::parse(&model.color).is_none() {
            errors.push("color", "Please select a valid color");
        }

        errors.into_result()
    }

    pub fn to_entity(&self, now: DateTime<Utc>) -> InsertVehicleEntity {
        let model = self.normalized();
        InsertVehicleEntity {
            user_id: model.user_id,
            make: model.make,
            model: model.model,
            color: model.color,
            year: model.year,
            license_plate: model.license_plate,
            created_at: now,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VehicleDto {
    pub id: i64,
    pub user_id: i64,
    pub make: String,
    pub model: String,
    pub color: String,
    pub year: i32,
    pub license_plate: String,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleEntity> for VehicleDto {
    fn from(value: VehicleEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            make: value.make,
            model: value.model,
            color: value.color,
            year: value.year,
            license_plate: value.license_plate,
            created_at: value.created_at,
        }
    }
}
