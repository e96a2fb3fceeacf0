use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Cancelled,
}

impl Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            AccountStatus::Active => "active",
            AccountStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", status)
    }
}

impl AccountStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AccountStatus::Active),
            "cancelled" => Some(AccountStatus::Cancelled),
            _ => None,
        }
    }
}
