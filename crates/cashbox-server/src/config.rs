use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cashbox_api::AdminAccount;

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Frontend directory served for every non-API path, if set.
    pub static_dir: Option<PathBuf>,
    pub admin: AdminAccount,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AdminAccount::default();

        let host = lookup("CASHBOX_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("CASHBOX_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("CASHBOX_PORT is not a valid port")?;
        let db_path = lookup("CASHBOX_DB_PATH")
            .unwrap_or_else(|| "users.db".into())
            .into();
        let static_dir = lookup("CASHBOX_STATIC_DIR")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);
        let admin = AdminAccount {
            username: lookup("CASHBOX_ADMIN_USERNAME").unwrap_or(defaults.username),
            password: lookup("CASHBOX_ADMIN_PASSWORD").unwrap_or(defaults.password),
        };

        Ok(Self {
            host,
            port,
            db_path,
            static_dir,
            admin,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("Invalid listen address {}", addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.db_path, PathBuf::from("users.db"));
        assert!(cfg.static_dir.is_none());
        assert_eq!(cfg.admin.username, "admin");
        assert_eq!(cfg.admin.password, "1234");
        assert_eq!(cfg.addr().unwrap().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("CASHBOX_HOST", "127.0.0.1"),
            ("CASHBOX_PORT", "8080"),
            ("CASHBOX_STATIC_DIR", "frontend"),
            ("CASHBOX_ADMIN_PASSWORD", "changed"),
        ])
        .unwrap();
        assert_eq!(cfg.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.static_dir, Some(PathBuf::from("frontend")));
        assert_eq!(cfg.admin.username, "admin");
        assert_eq!(cfg.admin.password, "changed");
    }

    #[test]
    fn bad_port() {
        assert!(config(&[("CASHBOX_PORT", "fivethousand")]).is_err());
    }
}
