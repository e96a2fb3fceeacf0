use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanCount {
    pub plan: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardHeaderMetrics {
    pub total_active_users: i64,
    pub users_with_overdue_subscriptions: i64,
    pub subscription_status_count: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_active_users: i64,
    pub users_with_overdue_subscriptions: i64,
    pub subscription_status_count: Vec<StatusCount>,
    pub subscription_plan_count: Vec<PlanCount>,
    /// Sum of paid payments over the trailing 30 days, e.g. `"1240.00"`.
    pub monthly_revenue: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_serialize_in_camel_case() {
        let metrics = DashboardHeaderMetrics {
            total_active_users: 3,
            users_with_overdue_subscriptions: 1,
            subscription_status_count: vec![StatusCount {
                status: "active".to_string(),
                count: 2,
            }],
        };
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["totalActiveUsers"], 3);
        assert_eq!(json["usersWithOverdueSubscriptions"], 1);
        assert_eq!(json["subscriptionStatusCount"][0]["status"], "active");
    }
}
