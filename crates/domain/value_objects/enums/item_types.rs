use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Subscription,
    Wash,
}

impl Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let item_type = match self {
            ItemType::Subscription => "subscription",
            ItemType::Wash => "wash",
        };
        write!(f, "{}", item_type)
    }
}
