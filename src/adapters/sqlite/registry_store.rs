//! SQLite implementation of the RegistryStore.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::models::{ConnectionRecord, ConnectionRecordPatch, NewConnectionRecord};
use crate::domain::ports::RegistryStore;

/// Registry store backed by the `objects` table.
///
/// Every mutation opens with its write statement so the transaction takes
/// the database write lock before it reads anything back.
pub struct SqliteRegistryStore {
    pool: SqlitePool,
}

impl SqliteRegistryStore {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistryStore for SqliteRegistryStore {
    async fn list(&self) -> RegistryResult<Vec<ConnectionRecord>> {
        let rows: Vec<ObjectRow> = sqlx::query_as("SELECT * FROM objects ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn create(&self, payload: &NewConnectionRecord) -> RegistryResult<ConnectionRecord> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"INSERT INTO objects (cluster_name, certificate, filer_id, server, port, vhost, exchange, username, password)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(&payload.cluster_name)
        .bind(&payload.certificate)
        .bind(payload.filer_id)
        .bind(&payload.server)
        .bind(i64::from(payload.port))
        .bind(&payload.vhost)
        .bind(&payload.exchange)
        .bind(&payload.username)
        .bind(&payload.password)
        .execute(&mut *tx)
        .await
        .map_err(|e| describe_conflict(e, &payload.cluster_name, payload.filer_id))?;

        let id = result.last_insert_rowid();
        tx.commit().await?;

        debug!(id, cluster_name = %payload.cluster_name, "object created");
        Ok(payload.clone().into_record(id))
    }

    async fn get_by_cluster_name(&self, cluster_name: &str) -> RegistryResult<ConnectionRecord> {
        let row: Option<ObjectRow> = sqlx::query_as("SELECT * FROM objects WHERE cluster_name = ?")
            .bind(cluster_name)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| RegistryError::NotFound(cluster_name.to_string()))?
            .try_into()
    }

    async fn get_by_id(&self, id: i64) -> RegistryResult<ConnectionRecord> {
        let row: Option<ObjectRow> = sqlx::query_as("SELECT * FROM objects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| RegistryError::NotFound(format!("id {id}")))?
            .try_into()
    }

    async fn update(
        &self,
        cluster_name: &str,
        patch: &ConnectionRecordPatch,
    ) -> RegistryResult<ConnectionRecord> {
        let mut tx = self.pool.begin().await?;

        // COALESCE keeps the stored value for every field the patch omits.
        let result = sqlx::query(
            r#"UPDATE objects SET
                   certificate = COALESCE(?, certificate),
                   filer_id = COALESCE(?, filer_id),
                   server = COALESCE(?, server),
                   port = COALESCE(?, port),
                   vhost = COALESCE(?, vhost),
                   exchange = COALESCE(?, exchange),
                   username = COALESCE(?, username),
                   password = COALESCE(?, password)
               WHERE cluster_name = ?"#
        )
        .bind(patch.certificate.as_deref())
        .bind(patch.filer_id)
        .bind(patch.server.as_deref())
        .bind(patch.port.map(i64::from))
        .bind(patch.vhost.as_deref())
        .bind(patch.exchange.as_deref())
        .bind(patch.username.as_deref())
        .bind(patch.password.as_deref())
        .bind(cluster_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| describe_conflict(e, cluster_name, patch.filer_id.unwrap_or_default()))?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound(cluster_name.to_string()));
        }

        let row: ObjectRow = sqlx::query_as("SELECT * FROM objects WHERE cluster_name = ?")
            .bind(cluster_name)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(cluster_name, "object updated");
        row.try_into()
    }

    async fn delete(&self, cluster_name: &str) -> RegistryResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM objects WHERE cluster_name = ?")
            .bind(cluster_name)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound(cluster_name.to_string()));
        }

        tx.commit().await?;
        debug!(cluster_name, "object deleted");
        Ok(())
    }
}

/// Turn a unique-constraint failure into a conflict naming the offending key.
fn describe_conflict(err: sqlx::Error, cluster_name: &str, filer_id: i64) -> RegistryError {
    match RegistryError::from(err) {
        RegistryError::Conflict(message) if message.contains("objects.cluster_name") => {
            RegistryError::Conflict(format!("cluster_name '{cluster_name}' already exists"))
        }
        RegistryError::Conflict(message) if message.contains("objects.filer_id") => {
            RegistryError::Conflict(format!("filer_id {filer_id} already exists"))
        }
        other => other,
    }
}

#[derive(sqlx::FromRow)]
struct ObjectRow {
    id: i64,
    cluster_name: String,
    certificate: String,
    filer_id: i64,
    server: String,
    port: i64,
    vhost: String,
    exchange: String,
    username: String,
    password: String,
}

impl TryFrom<ObjectRow> for ConnectionRecord {
    type Error = RegistryError;

    fn try_from(row: ObjectRow) -> Result<Self, Self::Error> {
        let port = u16::try_from(row.port)
            .map_err(|_| RegistryError::SerializationError(format!("Invalid port: {}", row.port)))?;

        Ok(Self {
            id: row.id,
            cluster_name: row.cluster_name,
            certificate: row.certificate,
            filer_id: row.filer_id,
            server: row.server,
            port,
            vhost: row.vhost,
            exchange: row.exchange,
            username: row.username,
            password: row.password,
        })
    }
}
