use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleColor {
    Black,
    Blue,
    Bronze,
    Gold,
    Gray,
    Green,
    Red,
    Silver,
    White,
    Yellow,
}

impl VehicleColor {
    pub const ALL: [VehicleColor; 10] = [
        VehicleColor::Black,
        VehicleColor::Blue,
        VehicleColor::Bronze,
        VehicleColor::Gold,
        VehicleColor::Gray,
        VehicleColor::Green,
        VehicleColor::Red,
        VehicleColor::Silver,
        VehicleColor::White,
        VehicleColor::Yellow,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.to_string() == value)
    }
}

impl Display for VehicleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = match self {
            VehicleColor::Black => "black",
            VehicleColor::Blue => "blue",
            VehicleColor::Bronze => "bronze",
            VehicleColor::Gold => "gold",
            VehicleColor::Gray => "gray",
            VehicleColor::Green => "green",
            VehicleColor::Red => "red",
            VehicleColor::Silver => "silver",
            VehicleColor::White => "white",
            VehicleColor::Yellow => "yellow",
        };
        write!(f, "{}", color)
    }
}
