use std::{
	net::{IpAddr, Ipv4Addr},
	path::PathBuf,
	str::FromStr,
};

use tracing::Level;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} has an invalid value: {value:?}")]
	Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	/// Directory served for paths that match no route.
	pub static_dir: PathBuf,
	pub rate_limit: bool,
	/// Export traces and metrics over OTLP.
	pub telemetry: bool,
	pub log_level: Level,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
	where
		F: Fn(&str) -> Option<String>,
	{
		Ok(Self {
			database_url: lookup("DATABASE_URL").ok_or(Error::Missing("DATABASE_URL"))?,
			host: parse(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
			port: parse(&lookup, "PORT", 8080)?,
			static_dir: parse(&lookup, "STATIC_DIR", PathBuf::from("static"))?,
			rate_limit: parse(&lookup, "RATE_LIMIT", true)?,
			telemetry: parse(&lookup, "TELEMETRY", false)?,
			log_level: parse(&lookup, "LOG_LEVEL", Level::INFO)?,
		})
	}
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, Error>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
{
	match lookup(key) {
		None => Ok(default),
		Some(value) => value.parse().map_err(|_| Error::Invalid { key, value }),
	}
}
