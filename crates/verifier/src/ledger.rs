use std::path::Path;
use std::sync::Mutex;

use poseidon::Fq;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::VerifyError;

/// Placeholder the audit log always records for ticket linkage: the
/// verifier never learns which ticket a proof was for, by design, so
/// there is nothing else to write here even when a caller's wire
/// request carried a `ticketId` for its own bookkeeping.
pub const TICKET_ID_PLACEHOLDER: &str = "unknown";

/// A single audit-log row: a record of one accepted proof, kept solely
/// for post-incident forensics. Never read back by the verifier's own
/// decision path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// The event the accepted proof was scoped to.
    pub event_id: String,
    /// Hex-encoded [`crate::verifier::proof_hash`] of the accepted
    /// proof.
    pub proof_hash_hex: String,
    /// The seven public signals, canonical decimal strings, joined by
    /// commas.
    pub public_signals_canonical: String,
    /// Always [`TICKET_ID_PLACEHOLDER`]; preserved here as a field
    /// rather than inlined so the "we never learn this" invariant is
    /// visible at the type level.
    pub ticket_id: String,
    /// Unix seconds this entry was committed at.
    pub timestamp: u64,
}

/// Whether a nonce commit succeeded or the nonce had already been spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// This call was the first to commit the nonce.
    Committed,
    /// Another verification (concurrent or prior) already committed this
    /// nonce; the caller must treat this as [`VerifyError::Replay`].
    AlreadySpent,
}

/// The nonce ledger and audit log, backed by a single SQLite connection.
///
/// A unique-key insert on `nonce` is the replay-detection primitive
/// (§5): under concurrent commits of the same nonce, SQLite's own
/// uniqueness constraint guarantees exactly one insert succeeds. The
/// nonce-ledger write and the audit-log append for one accepted proof
/// happen inside a single transaction, so a partial write is never
/// observable — either both rows exist, or neither does and the nonce
/// remains available to fail the *next* attempt with `Replay` once
/// someone else wins the race.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Opens (creating if absent) the ledger database at `path`.
    pub fn open(path: &Path) -> Result<Self, VerifyError> {
        let conn = Connection::open(path).map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory ledger database. Useful for tests and for
    /// single-process deployments that don't need the ledger to survive
    /// a restart.
    pub fn open_in_memory() -> Result<Self, VerifyError> {
        let conn = Connection::open_in_memory().map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, VerifyError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS nonces (
                nonce_hex   TEXT PRIMARY KEY,
                expiry      INTEGER NOT NULL,
                event_hex   TEXT NOT NULL,
                proof_hash_hex TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS audit_log (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                event_hex       TEXT NOT NULL,
                proof_hash_hex  TEXT NOT NULL,
                public_signals  TEXT NOT NULL,
                ticket_id       TEXT NOT NULL,
                timestamp       INTEGER NOT NULL
            );",
        )
        .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        Ok(Storage { conn: Mutex::new(conn) })
    }

    /// Gate 7's fast-path check: whether `nonce` is already present.
    ///
    /// This is a preliminary rejection only; under concurrency the
    /// authoritative check is the unique-key insert in
    /// [`Storage::commit`].
    pub fn contains_nonce(&self, nonce: Fq) -> Result<bool, VerifyError> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM nonces WHERE nonce_hex = ?1",
                params![hex::encode(nonce.to_be_bytes())],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Gate 9: atomically commits the nonce and appends the audit-log
    /// entry. The caller-supplied `ticket_id` is accepted for API
    /// symmetry with the wire request but is never written; the audit
    /// row always records [`TICKET_ID_PLACEHOLDER`].
    #[allow(clippy::too_many_arguments)]
    pub fn commit(
        &self,
        nonce: Fq,
        expiry: u64,
        event: Fq,
        proof_hash: [u8; 32],
        public_signals_canonical: &str,
        timestamp: u64,
    ) -> Result<CommitOutcome, VerifyError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;

        let nonce_hex = hex::encode(nonce.to_be_bytes());
        let event_hex = hex::encode(event.to_be_bytes());
        let proof_hash_hex = hex::encode(proof_hash);

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO nonces (nonce_hex, expiry, event_hex, proof_hash_hex)
                 VALUES (?1, ?2, ?3, ?4)",
                params![nonce_hex, expiry, event_hex, proof_hash_hex],
            )
            .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;

        if inserted == 0 {
            tx.rollback().map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
            return Ok(CommitOutcome::AlreadySpent);
        }

        tx.execute(
            "INSERT INTO audit_log (event_hex, proof_hash_hex, public_signals, ticket_id, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![event_hex, proof_hash_hex, public_signals_canonical, TICKET_ID_PLACEHOLDER, timestamp],
        )
        .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;

        tx.commit().map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        Ok(CommitOutcome::Committed)
    }

    /// Deletes every nonce whose `expiry + safety_margin_secs` is
    /// already in the past relative to `now`. Returns the number of rows
    /// purged.
    pub fn purge_expired(&self, now: u64, safety_margin_secs: u64) -> Result<usize, VerifyError> {
        let conn = self.lock()?;
        let cutoff = now.saturating_sub(safety_margin_secs);
        let purged = conn
            .execute("DELETE FROM nonces WHERE expiry < ?1", params![cutoff])
            .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        Ok(purged)
    }

    /// Reads the most recent audit-log entries, newest first. For
    /// forensics only; the verifier's own decision path never calls
    /// this.
    pub fn recent_audit_entries(&self, limit: usize) -> Result<Vec<AuditEntry>, VerifyError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT event_hex, proof_hash_hex, public_signals, ticket_id, timestamp
                 FROM audit_log ORDER BY id DESC LIMIT ?1",
            )
            .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok(AuditEntry {
                    event_id: row.get(0)?,
                    proof_hash_hex: row.get(1)?,
                    public_signals_canonical: row.get(2)?,
                    ticket_id: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })
            .map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(|e| VerifyError::LedgerUnavailable(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, VerifyError> {
        self.conn.lock().map_err(|_| VerifyError::LedgerUnavailable("ledger mutex poisoned".into()))
    }
}
