#![allow(dead_code)]

use chrono::{Duration, Utc};
use diesel::{
    PgConnection, RunQueryDsl,
    connection::{Connection, SimpleConnection},
    insert_into,
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use portal::infra::db::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{payment_methods, subscriptions, users, vehicles},
};
use std::sync::Arc;
use uuid::Uuid;

const MIGRATION: &str =
    include_str!("../../../migrations/2025-01-15-000000_create_csr_portal/up.sql");

/// Every checkout runs inside a never-committed transaction with the schema
/// created in a throwaway namespace.
#[derive(Debug)]
struct PrivateSchema {
    schema: String,
}

impl CustomizeConnection<PgConnection, R2d2Error> for PrivateSchema {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), R2d2Error> {
        conn.begin_test_transaction().map_err(R2d2Error::QueryError)?;
        conn.batch_execute(&format!(
            "CREATE SCHEMA {schema}; SET LOCAL search_path TO {schema};",
            schema = self.schema
        ))
        .map_err(R2d2Error::QueryError)?;
        conn.batch_execute(MIGRATION).map_err(R2d2Error::QueryError)
    }
}

/// Single-connection pool so every repository call shares the test transaction.
pub fn test_pool() -> Arc<PgPoolSquad> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(PrivateSchema {
            schema: format!("test_{}", Uuid::new_v4().simple()),
        }))
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .expect("failed to build test pool");

    Arc::new(pool)
}

pub fn seed_user(pool: &PgPoolSquad, name: &str) -> i64 {
    let mut conn = pool.get().unwrap();
    insert_into(users::table)
        .values((
            users::name.eq(name),
            users::email.eq(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        ))
        .returning(users::id)
        .get_result::<i64>(&mut conn)
        .unwrap()
}

pub fn seed_vehicle(pool: &PgPoolSquad, user_id: i64, plate: &str) -> i64 {
    let mut conn = pool.get().unwrap();
    insert_into(vehicles::table)
        .values((
            vehicles::user_id.eq(user_id),
            vehicles::make.eq("Toyota"),
            vehicles::model.eq("Camry"),
            vehicles::color.eq("silver"),
            vehicles::year.eq(2021),
            vehicles::license_plate.eq(plate),
        ))
        .returning(vehicles::id)
        .get_result::<i64>(&mut conn)
        .unwrap()
}

pub fn seed_payment_method(pool: &PgPoolSquad, user_id: i64, is_default: bool) -> i64 {
    let mut conn = pool.get().unwrap();
    insert_into(payment_methods::table)
        .values((
            payment_methods::user_id.eq(user_id),
            payment_methods::card_last4.eq("4242"),
            payment_methods::card_exp_month.eq(12),
            payment_methods::card_exp_year.eq(2099),
            payment_methods::is_default.eq(is_default),
        ))
        .returning(payment_methods::id)
        .get_result::<i64>(&mut conn)
        .unwrap()
}

/// Subscription row with an explicit status and due date offset in days.
pub fn seed_subscription(
    pool: &PgPoolSquad,
    user_id: i64,
    vehicle_id: i64,
    status: &str,
    due_in_days: i64,
) -> i64 {
    let mut conn = pool.get().unwrap();
    let due = Utc::now() + Duration::days(due_in_days);
    insert_into(subscriptions::table)
        .values((
            subscriptions::user_id.eq(user_id),
            subscriptions::vehicle_id.eq(vehicle_id),
            subscriptions::plan_id.eq(2_i64),
            subscriptions::remaining_washes.eq(6),
            subscriptions::status.eq(status),
            subscriptions::billing_period_start.eq(due - Duration::days(30)),
            subscriptions::payment_due_date.eq(due),
        ))
        .returning(subscriptions::id)
        .get_result::<i64>(&mut conn)
        .unwrap()
}
