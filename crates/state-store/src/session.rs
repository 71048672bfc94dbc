//! Persisted login session management.
//!
//! The credential and identity are stored as two keyed string entries and
//! must be both-present or both-absent. `save_session` and `clear_session`
//! write both rows inside one transaction so the pairing cannot tear; a
//! half-present pair on disk is treated as no session at all.

use sb_types::auth::Identity;
use sb_types::state::DbHandle;
use sqlx::{Row, SqliteExecutor};
use tracing::warn;

use crate::{DbError, DbResult};

const CREDENTIAL_KEY: &str = "credential";
const IDENTITY_KEY: &str = "identity";

/// Credential + identity pair as restored from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedSession {
    /// Opaque credential token, attached to requests as-is.
    pub credential: String,
    /// Profile captured at login time.
    pub identity: Identity,
}

// --------------------------------
// Generic State Entries
// --------------------------------

pub async fn get_state_value(executor: impl SqliteExecutor<'_>, key: &str) -> DbResult<Option<String>> {
    let row = sqlx::query("SELECT value FROM session_state WHERE key = ?")
        .bind(key)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| r.get("value")))
}

pub async fn set_state_value(executor: impl SqliteExecutor<'_>, key: &str, value: &str) -> DbResult<()> {
    sqlx::query("INSERT OR REPLACE INTO session_state (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_state_value(executor: impl SqliteExecutor<'_>, key: &str) -> DbResult<()> {
    sqlx::query("DELETE FROM session_state WHERE key = ?")
        .bind(key)
        .execute(executor)
        .await?;
    Ok(())
}

// --------------------------------
// Credential + Identity Pair
// --------------------------------

/// Persist the credential and identity together. Replaces any existing pair.
pub async fn save_session(handle: &DbHandle, credential: &str, identity: &Identity) -> DbResult<()> {
    let json = serde_json::to_string(identity).map_err(|e| DbError::JsonSerialization {
        context: "identity serialization".to_string(),
        source: e,
    })?;
    let mut tx = handle.pool.begin().await?;
    set_state_value(&mut *tx, CREDENTIAL_KEY, credential).await?;
    set_state_value(&mut *tx, IDENTITY_KEY, &json).await?;
    tx.commit().await?;
    Ok(())
}

/// Load the persisted pair. Returns `None` when no session is stored or when
/// only one half of the pair is present. Both rows are read inside one
/// transaction so a concurrent `save_session` cannot yield a mismatched pair.
pub async fn load_session(handle: &DbHandle) -> DbResult<Option<PersistedSession>> {
    let mut tx = handle.pool.begin().await?;
    let credential = get_state_value(&mut *tx, CREDENTIAL_KEY).await?;
    let identity_json = get_state_value(&mut *tx, IDENTITY_KEY).await?;
    tx.commit().await?;
    match (credential, identity_json) {
        (Some(credential), Some(json)) => {
            let identity = serde_json::from_str(&json).map_err(|e| DbError::JsonSerialization {
                context: "identity deserialization".to_string(),
                source: e,
            })?;
            Ok(Some(PersistedSession { credential, identity }))
        }
        (None, None) => Ok(None),
        (credential, identity_json) => {
            warn!(
                has_credential = credential.is_some(),
                has_identity = identity_json.is_some(),
                "half-present session pair treated as absent"
            );
            Ok(None)
        }
    }
}

/// Remove the persisted pair. Safe to call when nothing is stored.
pub async fn clear_session(handle: &DbHandle) -> DbResult<()> {
    let mut tx = handle.pool.begin().await?;
    delete_state_value(&mut *tx, CREDENTIAL_KEY).await?;
    delete_state_value(&mut *tx, IDENTITY_KEY).await?;
    tx.commit().await?;
    Ok(())
}
