use anyhow::{Context, Result};
use tracing::{info, warn};

use cashbox_db::Store;

use crate::password;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// Account seeded on first start.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.into(),
            password: DEFAULT_ADMIN_PASSWORD.into(),
        }
    }
}

/// One-time startup: create tables, then seed the admin account if it is
/// missing. Safe to run on every boot.
pub fn initialize(store: &dyn Store, admin: &AdminAccount) -> Result<()> {
    store.init_schema().context("Failed to create schema")?;

    if admin.password == DEFAULT_ADMIN_PASSWORD {
        warn!(
            "Admin account {:?} uses the built-in default password; set CASHBOX_ADMIN_PASSWORD",
            admin.username
        );
    }

    if store
        .get_user_by_username(&admin.username)
        .context("Failed to look up admin account")?
        .is_some()
    {
        info!("Admin account {:?} already present", admin.username);
        return Ok(());
    }

    let hash = password::hash_password(&admin.password)?;
    let created = store
        .create_user_if_absent(&admin.username, &hash)
        .context("Failed to seed admin account")?;

    if created {
        info!("Seeded admin account {:?}", admin.username);
    } else {
        // Lost a race with another process seeding the same file
        info!("Admin account {:?} already present", admin.username);
    }

    Ok(())
}
