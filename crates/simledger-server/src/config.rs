//! Server configuration, read from `config.toml` and `SIMLEDGER_*`
//! environment variables.

use std::path::PathBuf;

use serde::Deserialize;

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 5240 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/simledger/ledger.db") }
fn default_geocode_language() -> String { "ar".to_owned() }

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,

  #[serde(default = "default_port")]
  pub port: u16,

  /// SQLite database file; a leading `~` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,

  /// Username for the HTTP Basic login gate.
  pub auth_username: String,

  /// Argon2 PHC string; generate with `server --hash-password`.
  pub auth_password_hash: String,

  /// Override the geocoding endpoint (e.g. a self-hosted Nominatim).
  #[serde(default)]
  pub geocode_base_url: Option<String>,

  /// `accept-language` sent with geocoding lookups.
  #[serde(default = "default_geocode_language")]
  pub geocode_language: String,
}
