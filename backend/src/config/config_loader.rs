use anyhow::{Context, Result};
use std::str::FromStr;

use crate::config::{
    config_model::{BackendServer, Database, DotEnvyConfig, PlanCatalog},
    stage::Stage,
};

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_PLAN_CATALOG_TTL_SECONDS: u64 = 300;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let backend_server = BackendServer {
        port: required(&lookup, "SERVER_PORT")?,
        body_limit: required(&lookup, "SERVER_BODY_LIMIT")?,
        timeout: required(&lookup, "SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL is invalid")?,
        max_connections: optional(&lookup, "DATABASE_MAX_CONNECTIONS")?
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
    };

    let plan_catalog = PlanCatalog {
        ttl_seconds: optional(&lookup, "PLAN_CATALOG_TTL_SECONDS")?
            .unwrap_or(DEFAULT_PLAN_CATALOG_TTL_SECONDS),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        plan_catalog,
    })
}

fn required<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = lookup(key).with_context(|| format!("{} is invalid", key))?;
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{} is invalid", key))
}

fn optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(_) => required(lookup, key).map(Some),
        None => Ok(None),
    }
}
