//! OwnedPackList DTOs and migrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use tgstickers_core::sticker::OwnedPackList;

/// V1.0.0: Initial owned pack list schema.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct OwnedPackListV1_0_0 {
    /// Short-names in the order the sticker bot lists them.
    #[serde(default)]
    pub short_names: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl IntoDomain<OwnedPackList> for OwnedPackListV1_0_0 {
    fn into_domain(self) -> OwnedPackList {
        OwnedPackList {
            short_names: self.short_names,
            updated_at: self.updated_at,
        }
    }
}

impl FromDomain<OwnedPackList> for OwnedPackListV1_0_0 {
    fn from_domain(list: OwnedPackList) -> Self {
        OwnedPackListV1_0_0 {
            short_names: list.short_names,
            updated_at: list.updated_at,
        }
    }
}

/// Creates and configures a Migrator instance for OwnedPackList entities.
pub fn create_owned_packs_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let owned_path = version_migrate::Migrator::define("owned_packs")
        .from::<OwnedPackListV1_0_0>()
        .into_with_save::<OwnedPackList>();

    migrator
        .register(owned_path)
        .expect("Failed to register owned_packs migration path");

    migrator
}
