//! Opens and migrates the on-disk SQLite database that backs the client
//! session store.

use std::{
    env,
    fs::OpenOptions,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use sb_types::state::{DbHandle, DbLocation};
use sqlx::{migrate::Migrator, sqlite::SqlitePoolOptions};
use tokio::sync::OnceCell;
use tracing::{info, warn};
use url::Url;

use crate::{DbError, DbResult};

static CLIENT_MIGRATOR: Migrator = sqlx::migrate!("./migrations/client");

const CLIENT_DB_ENV: &str = "SB_CLIENT_DB_URL";
const MAX_CONNECTIONS_ENV: &str = "SB_DB_MAX_CONNECTIONS";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

static CLIENT_DB: OnceCell<DbHandle> = OnceCell::const_new();

/// Where the client database lives, for log lines and diagnostics.
/// Returns the override URL verbatim when one is set, the default file
/// path otherwise.
pub fn display_client_db_path() -> String {
    match env::var(CLIENT_DB_ENV) {
        Ok(configured) => configured,
        Err(_) => default_client_path().display().to_string(),
    }
}

/// Open (once per process) the pooled connection to the client state
/// database. Subsequent callers share the same pool.
pub async fn client_db() -> DbResult<DbHandle> {
    let handle = CLIENT_DB
        .get_or_try_init(|| async {
            let location = client_location().await?;
            open_pool(location).await
        })
        .await?;
    Ok(handle.clone())
}

/// Bring the client schema up to date.
pub async fn migrate_client(handle: &DbHandle) -> DbResult<()> {
    CLIENT_MIGRATOR.run(&handle.pool).await?;
    if handle.freshly_created {
        info!(db = %display_path(handle), "created client state database");
    }
    Ok(())
}

/// The database path when one is known, the connection URL otherwise.
pub fn display_path(handle: &DbHandle) -> String {
    match &handle.path {
        Some(path) => path.display().to_string(),
        None => handle.url.clone(),
    }
}

async fn client_location() -> DbResult<DbLocation> {
    match env::var(CLIENT_DB_ENV) {
        // A full sqlite: URL (e.g. sqlite::memory:) is handed to sqlx as-is.
        Ok(value) if value.starts_with("sqlite:") => Ok(DbLocation {
            url: value,
            path: None,
            freshly_created: false,
        }),
        Ok(value) => location_from_file(PathBuf::from(value)).await,
        Err(_) => location_from_file(default_client_path()).await,
    }
}

async fn location_from_file(path: PathBuf) -> DbResult<DbLocation> {
    let existed = tokio::fs::try_exists(&path).await.unwrap_or(false);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DbError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    if !existed {
        let target = path.clone();
        tokio::task::spawn_blocking(move || touch_private_file(&target))
            .await
            .map_err(|e| DbError::TaskPanicked(e.to_string()))??;
    }
    Ok(DbLocation {
        url: sqlite_url_from_path(&path)?,
        path: Some(path),
        freshly_created: !existed,
    })
}

/// Create the database file ourselves rather than letting SQLite do it,
/// so the file starts out mode 0600 on Unix. Losing the race to another
/// process is fine; the file exists either way.
pub(crate) fn touch_private_file(path: &Path) -> DbResult<()> {
    let mut options = OpenOptions::new();
    options.create_new(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    match options.open(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(DbError::FileCreationFailed {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

pub(crate) fn sqlite_url_from_path(path: &Path) -> DbResult<String> {
    let file_url = Url::from_file_path(path).map_err(|_| DbError::InvalidPath(path.to_path_buf()))?;
    // Reuse the percent-encoded path but swap the scheme sqlx expects.
    let mut url = String::from(file_url);
    url.replace_range(..4, "sqlite");
    Ok(url)
}

async fn open_pool(location: DbLocation) -> DbResult<DbHandle> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections())
        .connect(&location.url)
        .await
        .map_err(|e| DbError::ConnectionFailed {
            path: location.url.clone(),
            source: e,
        })?;

    // A pre-existing file may have been created loosely; clamp it down.
    if let Some(path) = &location.path
        && !location.freshly_created
        && let Ok(tightened) = tighten_permissions(path)
        && tightened
    {
        warn!(db = %path.display(), "state database was group/world readable, reset to 0600");
    }

    Ok(DbHandle {
        pool,
        url: location.url,
        path: location.path.clone(),
        freshly_created: location.freshly_created,
    })
}

fn max_connections() -> u32 {
    env::var(MAX_CONNECTIONS_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}

/// Clamp the file mode to 0600 on Unix. Returns whether anything changed.
fn tighten_permissions(path: &Path) -> DbResult<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = std::fs::metadata(path).map_err(DbError::Io)?;
        let mut permissions = metadata.permissions();
        if permissions.mode() & 0o777 == 0o600 {
            return Ok(false);
        }
        permissions.set_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(DbError::Io)?;
        Ok(true)
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(false)
    }
}

fn default_client_path() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".local/share")
    });
    data_dir.join("salonbooker").join("client.db")
}
