// Service configuration, read from the environment

use anyhow::{bail, Context, Result};
use std::str::FromStr;

use crate::validation::LedgerPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{}', expected 'text' or 'json'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Row in `wallets` the ledger reads and debits
    pub wallet_id: i64,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub log_format: LogFormat,
    pub policy: LedgerPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let transaction_types = match lookup("TRANSACTION_TYPES") {
            Some(raw) => parse_list(&raw),
            None => LedgerPolicy::default().transaction_types,
        };
        if transaction_types.is_empty() {
            bail!("TRANSACTION_TYPES must name at least one type");
        }

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", 4000)?,
            wallet_id: parse_or(&lookup, "WALLET_ID", 1)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            run_migrations: parse_flag(&lookup, "RUN_MIGRATIONS", true)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Text)?,
            policy: LedgerPolicy {
                transaction_types,
                allow_overdraft: parse_flag(&lookup, "ALLOW_OVERDRAFT", false)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {} '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("invalid {} '{}', expected true or false", key, v),
        },
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
