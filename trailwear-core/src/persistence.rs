//! Persistence for the wear store.
//!
//! The host persists the whole store as one opaque blob under a fixed
//! namespace key. This module owns:
//!
//! - the blob format ([`WearSnapshot`]) and its codecs (JSON, `MessagePack`,
//!   bincode);
//! - the [`BlobStore`] seam the host implements over its save system;
//! - two ready-made stores: [`MemoryBlobStore`] and the `SQLite`-backed
//!   [`SqliteBlobStore`].
//!
//! The `SQLite` schema is one row per namespace:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS wear_blobs (
//!     namespace  TEXT PRIMARY KEY,
//!     data       BLOB NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     checksum   TEXT
//! );
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use xxhash_rust::xxh32::xxh32;

use crate::config::{BlobCodec, PersistenceConfig};
use crate::error::{Result, WearError};
use crate::store::{WearRecord, WearStore};
use crate::types::CellPos;

/// Current blob format version.
pub const SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Blob format
// ---------------------------------------------------------------------------

/// One persisted store entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Tracked cell.
    pub pos: CellPos,
    /// Its wear record.
    pub record: WearRecord,
}

/// The persisted form of a [`WearStore`].
///
/// Entries are a list rather than a map because JSON cannot key objects by
/// a struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearSnapshot {
    /// Blob format version.
    pub version: u32,
    /// Every tracked cell, sorted by position.
    pub entries: Vec<SnapshotEntry>,
}

impl WearSnapshot {
    /// Capture the current contents of `store`.
    #[must_use]
    pub fn capture(store: &WearStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entries: store
                .snapshot()
                .into_iter()
                .map(|(pos, record)| SnapshotEntry { pos, record })
                .collect(),
        }
    }

    /// Rebuild the map for [`WearStore::replace`]. Later duplicates win.
    #[must_use]
    pub fn into_records(self) -> HashMap<CellPos, WearRecord> {
        let total = self.entries.len();
        let records: HashMap<_, _> = self
            .entries
            .into_iter()
            .map(|entry| (entry.pos, entry.record))
            .collect();
        if records.len() != total {
            warn!(
                entries = total,
                unique = records.len(),
                "Duplicate cells in wear snapshot; keeping the last of each"
            );
        }
        records
    }
}

#[allow(clippy::needless_pass_by_value)]
fn codec_error<E: std::fmt::Display>(e: E) -> WearError {
    WearError::Serialization(e.to_string())
}

/// Encode `store` into an opaque blob.
///
/// # Errors
///
/// Returns [`WearError::Serialization`] if encoding fails.
pub fn encode_snapshot(store: &WearStore, codec: BlobCodec) -> Result<Vec<u8>> {
    let snapshot = WearSnapshot::capture(store);
    let bytes = match codec {
        BlobCodec::Json => serde_json::to_vec(&snapshot).map_err(codec_error)?,
        BlobCodec::MessagePack => rmp_serde::to_vec_named(&snapshot).map_err(codec_error)?,
        BlobCodec::Bincode => bincode::serialize(&snapshot).map_err(codec_error)?,
    };
    Ok(bytes)
}

/// Decode a blob produced by [`encode_snapshot`].
///
/// # Errors
///
/// Returns [`WearError::Serialization`] if the blob is malformed or has an
/// unsupported version.
pub fn decode_snapshot(bytes: &[u8], codec: BlobCodec) -> Result<WearSnapshot> {
    let snapshot: WearSnapshot = match codec {
        BlobCodec::Json => serde_json::from_slice(bytes).map_err(codec_error)?,
        BlobCodec::MessagePack => rmp_serde::from_slice(bytes).map_err(codec_error)?,
        BlobCodec::Bincode => bincode::deserialize(bytes).map_err(codec_error)?,
    };
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(WearError::Serialization(format!(
            "unsupported wear snapshot version {} (newest known: {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }
    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// BlobStore
// ---------------------------------------------------------------------------

/// Host persistence seam: opaque blobs keyed by namespace.
pub trait BlobStore {
    /// Read the blob stored under `namespace`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read_blob(&self, namespace: &str) -> Result<Option<Vec<u8>>>;

    /// Store `data` under `namespace`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write_blob(&mut self, namespace: &str, data: &[u8]) -> Result<()>;
}

/// In-process [`BlobStore`], e.g. for hosts that hand the bytes to their own
/// save format after the fact.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes stored under `namespace`.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&[u8]> {
        self.blobs.get(namespace).map(Vec::as_slice)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read_blob(&self, namespace: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(namespace).cloned())
    }

    fn write_blob(&mut self, namespace: &str, data: &[u8]) -> Result<()> {
        self.blobs.insert(namespace.to_string(), data.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SqliteBlobStore
// ---------------------------------------------------------------------------

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS wear_blobs (
    namespace  TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL,
    checksum   TEXT
);";

/// Seed for blob checksums. Changing it invalidates every stored checksum.
const CHECKSUM_SEED: u32 = 0x7261_696C;

/// xxh32 digest of a blob, stored as lowercase hex.
fn blob_checksum(data: &[u8]) -> String {
    format!("{:08x}", xxh32(data, CHECKSUM_SEED))
}

/// [`BlobStore`] backed by an `SQLite` database.
///
/// ```no_run
/// # use trailwear_core::persistence::{BlobStore, SqliteBlobStore};
/// # use trailwear_core::config::PersistenceConfig;
/// let mut blobs = SqliteBlobStore::open("world_wear.db", &PersistenceConfig::default())?;
/// blobs.write_blob("trailwear_paths", b"{}")?;
/// let data = blobs.read_blob("trailwear_paths")?;
/// # Ok::<(), trailwear_core::error::WearError>(())
/// ```
pub struct SqliteBlobStore {
    conn: Connection,
    checksums: bool,
}

impl std::fmt::Debug for SqliteBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBlobStore")
            .field("path", &self.conn.path())
            .field("checksums", &self.checksums)
            .finish_non_exhaustive()
    }
}

impl SqliteBlobStore {
    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WearError::Database`] on `SQLite` failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        if config.wal_mode {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            debug!(journal_mode = %mode, "Journal mode set");
        }
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        info!(
            path = %path.as_ref().display(),
            wal = config.wal_mode,
            "Wear blob store opened"
        );
        Self::with_schema(conn, config)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`WearError::Database`] on `SQLite` failures.
    pub fn open_in_memory(config: &PersistenceConfig) -> Result<Self> {
        Self::with_schema(Connection::open_in_memory()?, config)
    }

    fn with_schema(conn: Connection, config: &PersistenceConfig) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            checksums: config.checksum_enabled,
        })
    }

    /// Delete the blob under `namespace`. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`WearError::Database`] on `SQLite` failures.
    pub fn delete_blob(&self, namespace: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM wear_blobs WHERE namespace = ?1", params![namespace])?;
        Ok(deleted > 0)
    }

    /// Every namespace that has a stored blob, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`WearError::Database`] on `SQLite` failures.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT namespace FROM wear_blobs ORDER BY namespace")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }
}

impl BlobStore for SqliteBlobStore {
    /// Checksum mismatches are logged and the data is still returned.
    fn read_blob(&self, namespace: &str) -> Result<Option<Vec<u8>>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT data, checksum FROM wear_blobs WHERE namespace = ?1")?;

        let row: Option<(Vec<u8>, Option<String>)> = match stmt
            .query_row(params![namespace], |row| Ok((row.get(0)?, row.get(1)?)))
        {
            Ok(found) => Some(found),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let Some((data, stored_checksum)) = row else {
            return Ok(None);
        };

        if let Some(expected) = stored_checksum.filter(|_| self.checksums) {
            let actual = blob_checksum(&data);
            if expected != actual {
                warn!(
                    namespace,
                    expected = %expected,
                    actual = %actual,
                    "Wear blob checksum mismatch; loading anyway"
                );
            }
        }

        debug!(namespace, bytes = data.len(), "Loaded wear blob");
        Ok(Some(data))
    }

    fn write_blob(&mut self, namespace: &str, data: &[u8]) -> Result<()> {
        let checksum = self.checksums.then(|| blob_checksum(data));
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO wear_blobs (namespace, data, updated_at, checksum)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                checksum = excluded.checksum",
            params![namespace, data, now, checksum],
        )?;

        debug!(namespace, bytes = data.len(), "Saved wear blob");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
