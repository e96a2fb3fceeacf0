use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Inactive,
    Overdue,
    Transferred,
}

/// CSR operations that move a subscription between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    Cancel,
    Transfer,
}

impl Display for SubscriptionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            SubscriptionAction::Cancel => "cancel",
            SubscriptionAction::Transfer => "transfer",
        };
        write!(f, "{}", action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedTransition {
    pub from: SubscriptionStatus,
    pub action: SubscriptionAction,
}

impl Display for RejectedTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot {} a subscription that is {}", self.action, self.from)
    }
}

impl std::error::Error for RejectedTransition {}

/// Outcome of a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The row must be written with the new status.
    To(SubscriptionStatus),
    /// Already in the target status; nothing to write.
    Unchanged,
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Overdue => "overdue",
            SubscriptionStatus::Transferred => "transferred",
        };
        write!(f, "{}", status)
    }
}

impl SubscriptionStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(SubscriptionStatus::Active),
            "inactive" => Some(SubscriptionStatus::Inactive),
            "overdue" => Some(SubscriptionStatus::Overdue),
            "transferred" => Some(SubscriptionStatus::Transferred),
            _ => None,
        }
    }

    /// Unknown stored values are treated as inactive.
    pub fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or(SubscriptionStatus::Inactive)
    }

    pub fn apply(self, action: SubscriptionAction) -> Result<Transition, RejectedTransition> {
        use SubscriptionAction::*;
        use SubscriptionStatus::*;

        match (self, action) {
            (Active, Cancel) | (Overdue, Cancel) => Ok(Transition::To(Inactive)),
            (Inactive, Cancel) => Ok(Transition::Unchanged),
            (Active, Transfer) => Ok(Transition::To(Transferred)),
            (from, action) => Err(RejectedTransition { from, action }),
        }
    }
}
