//! Per-test SQLite databases that never touch the real client store.
//!
//! Running the migrator for every test adds up, so the factory migrates one
//! template file and copies it for each caller. Every copy gets its own pool,
//! which keeps parallel tests from seeing each other's writes.
//!
//! The backing directory is deleted when the factory drops. Set
//! `SB_TEST_DB_PERSIST=1` to keep the files around for a post-mortem.

use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use sb_types::state::DbHandle;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tokio::sync::OnceCell;

use crate::{
    DbError, DbResult,
    db::{sqlite_url_from_path, touch_private_file},
    migrate_client,
};

/// Hands out migrated client databases, one file per call.
#[derive(Debug)]
pub struct SqliteTestDbFactory {
    root: PathBuf,
    _tempdir: Option<TempDir>,
    template: OnceCell<PathBuf>,
}

impl SqliteTestDbFactory {
    /// Set up a factory under a fresh temporary directory.
    pub fn new() -> Self {
        let tempdir = tempfile::Builder::new()
            .prefix("salonbooker-testdb-")
            .tempdir()
            .expect("cannot create scratch directory for test databases");

        let (root, tempdir) = match std::env::var_os("SB_TEST_DB_PERSIST") {
            Some(flag) if flag != "0" => (tempdir.keep(), None),
            _ => (tempdir.path().to_path_buf(), Some(tempdir)),
        };
        Self {
            root,
            _tempdir: tempdir,
            template: OnceCell::const_new(),
        }
    }

    /// A migrated, empty client database for one test case.
    pub async fn client_db(&self) -> DbResult<DbHandle> {
        let template = self.template_path().await?;
        let copy = self.root.join(format!("client_{}.db", unique_stem()));
        tokio::fs::copy(&template, &copy).await.map_err(DbError::Io)?;
        open_isolated_db(&copy).await
    }

    async fn template_path(&self) -> DbResult<PathBuf> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DbError::DirectoryCreationFailed {
                path: self.root.clone(),
                source: e,
            })?;
        let path = self
            .template
            .get_or_try_init(|| async {
                let template = self.root.join("template_client.db");
                let handle = open_isolated_db(&template).await?;
                migrate_client(&handle).await?;
                handle.pool.close().await;
                Ok::<_, DbError>(template)
            })
            .await?;
        Ok(path.clone())
    }
}

impl Default for SqliteTestDbFactory {
    fn default() -> Self {
        Self::new()
    }
}

async fn open_isolated_db(path: &Path) -> DbResult<DbHandle> {
    // SQLite needs the file to exist up front on some platforms.
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || touch_private_file(&target))
        .await
        .map_err(|e| DbError::TaskPanicked(e.to_string()))??;

    let url = sqlite_url_from_path(path)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .map_err(|e| DbError::ConnectionFailed {
            path: url.clone(),
            source: e,
        })?;

    // Trade durability for speed; a failing pragma is not worth a test failure.
    let _ = sqlx::query("PRAGMA journal_mode = MEMORY").execute(&pool).await;
    let _ = sqlx::query("PRAGMA synchronous = OFF").execute(&pool).await;
    let _ = sqlx::query("PRAGMA temp_store = MEMORY").execute(&pool).await;

    Ok(DbHandle {
        pool,
        url,
        path: Some(path.to_path_buf()),
        freshly_created: true,
    })
}

fn unique_stem() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}-{nanos}-{}", std::process::id(), uuid::Uuid::now_v7())
}
