use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::Postgres;

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_backend", skip_on_field_errors = false))]
pub struct Store {
    /// Which backend holds the post documents.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_KIND`
    #[serde(default)]
    pub kind: StoreKind,
    /// Fills an empty in-memory store with sample posts.
    ///
    /// **Environment variables**:
    /// - `SCRIBE_STORE_SEED`
    #[serde(default = "Store::default_seed")]
    pub seed: bool,
    #[validate(nested)]
    pub postgres: Option<Postgres>,
}

impl Store {
    const fn default_seed() -> bool {
        true
    }
}

impl Default for Store {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            seed: Self::default_seed(),
            postgres: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Postgres,
}

fn validate_backend(store: &Store) -> Result<(), ValidationError> {
    if store.kind == StoreKind::Postgres && store.postgres.is_none() {
        let mut error = ValidationError::new("missing_postgres");
        error.message = Some("`store.postgres` must be set to use the postgres store".into());
        return Err(error);
    }
    Ok(())
}
