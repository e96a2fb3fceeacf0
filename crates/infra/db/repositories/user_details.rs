use anyhow::Result;
use async_trait::async_trait;
use diesel::{PgConnection, RunQueryDsl, prelude::*};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::{
            payment_methods::PaymentMethodEntity, payments::PaymentEntity,
            subscription_plans::SubscriptionPlanEntity, subscriptions::SubscriptionEntity,
            users::UserEntity, vehicles::VehicleEntity, washes::WashEntity,
        },
        repositories::user_details::UserDetailRepository,
        value_objects::{
            enums::{
                account_statuses::AccountStatus, subscription_statuses::SubscriptionStatus,
            },
            user_details::UserDetailRecord,
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{
            payment_methods, payments, subscription_plans, subscriptions, users, vehicles, washes,
        },
    },
};

pub struct UserDetailPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserDetailPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn group_by_user<T>(rows: Vec<T>, user_id: impl Fn(&T) -> i64) -> HashMap<i64, Vec<T>> {
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(user_id(&row)).or_default().push(row);
    }
    grouped
}

/// Loads the related rows for `users` in one query per table and stitches
/// them together. With `billed_only`, only active and overdue subscriptions
/// are attached.
fn load_records(
    conn: &mut PgConnection,
    users: Vec<UserEntity>,
    billed_only: bool,
) -> QueryResult<Vec<UserDetailRecord>> {
    let user_ids: Vec<i64> = users.iter().map(|user| user.id).collect();

    let vehicle_rows = vehicles::table
        .filter(vehicles::user_id.eq_any(&user_ids))
        .filter(vehicles::deleted_at.is_null())
        .select(VehicleEntity::as_select())
        .order(vehicles::created_at.asc())
        .load::<VehicleEntity>(conn)?;

    let mut subscription_query = subscriptions::table
        .inner_join(subscription_plans::table)
        .filter(subscriptions::user_id.eq_any(&user_ids))
        .filter(subscriptions::deleted_at.is_null())
        .select((
            SubscriptionEntity::as_select(),
            SubscriptionPlanEntity::as_select(),
        ))
        .order(subscriptions::created_at.desc())
        .into_boxed();

    if billed_only {
        subscription_query = subscription_query.filter(subscriptions::status.eq_any(vec![
            SubscriptionStatus::Active.to_string(),
            SubscriptionStatus::Overdue.to_string(),
        ]));
    }

    let subscription_rows =
        subscription_query.load::<(SubscriptionEntity, SubscriptionPlanEntity)>(conn)?;

    let payment_rows = payments::table
        .filter(payments::user_id.eq_any(&user_ids))
        .filter(payments::deleted_at.is_null())
        .select(PaymentEntity::as_select())
        .order(payments::created_at.desc())
        .load::<PaymentEntity>(conn)?;

    let payment_method_rows = payment_methods::table
        .filter(payment_methods::user_id.eq_any(&user_ids))
        .filter(payment_methods::deleted_at.is_null())
        .select(PaymentMethodEntity::as_select())
        .order((payment_methods::is_default.desc(), payment_methods::created_at.desc()))
        .load::<PaymentMethodEntity>(conn)?;

    let wash_rows = washes::table
        .filter(washes::user_id.eq_any(&user_ids))
        .filter(washes::deleted_at.is_null())
        .select(WashEntity::as_select())
        .order(washes::created_at.desc())
        .load::<WashEntity>(conn)?;

    let mut vehicles_by_user = group_by_user(vehicle_rows, |row| row.user_id);
    let mut subscriptions_by_user = group_by_user(subscription_rows, |(row, _)| row.user_id);
    let mut payments_by_user = group_by_user(payment_rows, |row| row.user_id);
    let mut payment_methods_by_user = group_by_user(payment_method_rows, |row| row.user_id);
    let mut washes_by_user = group_by_user(wash_rows, |row| row.user_id);

    Ok(users
        .into_iter()
        .map(|user| UserDetailRecord {
            vehicles: vehicles_by_user.remove(&user.id).unwrap_or_default(),
            subscriptions: subscriptions_by_user.remove(&user.id).unwrap_or_default(),
            payments: payments_by_user.remove(&user.id).unwrap_or_default(),
            payment_methods: payment_methods_by_user.remove(&user.id).unwrap_or_default(),
            washes: washes_by_user.remove(&user.id).unwrap_or_default(),
            user,
        })
        .collect())
}

#[async_trait]
impl UserDetailRepository for UserDetailPostgres {
    async fn list_active_user_details(&self) -> Result<Vec<UserDetailRecord>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<UserDetailRecord>> {
            let mut conn = db_pool.get()?;

            let active_users = users::table
                .filter(users::account_status.eq(AccountStatus::Active.to_string()))
                .filter(users::deleted_at.is_null())
                .select(UserEntity::as_select())
                .order(users::name.asc())
                .load::<UserEntity>(&mut conn)?;

            Ok(load_records(&mut conn, active_users, true)?)
        })
        .await?
    }

    async fn find_user_detail(&self, user_id: i64) -> Result<Option<UserDetailRecord>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<UserDetailRecord>> {
            let mut conn = db_pool.get()?;

            let Some(user) = users::table
                .filter(users::id.eq(user_id))
                .select(UserEntity::as_select())
                .first::<UserEntity>(&mut conn)
                .optional()?
            else {
                return Ok(None);
            };

            Ok(load_records(&mut conn, vec![user], false)?.pop())
        })
        .await?
    }
}
