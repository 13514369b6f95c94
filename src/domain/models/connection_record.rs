//! Connection record domain model.
//!
//! A connection record describes how a cluster's event publisher reaches its
//! message bus: the broker address, virtual host, exchange and the broker
//! credentials, plus the client certificate it presents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the registry, keyed externally by `cluster_name`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Store-assigned identifier. Never reused or mutated.
    pub id: i64,
    pub cluster_name: String,
    /// Base64 encoded X.509 certificate, opaque to the registry.
    pub certificate: String,
    pub filer_id: i64,
    pub server: String,
    pub port: u16,
    pub vhost: String,
    pub exchange: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRecord")
            .field("id", &self.id)
            .field("cluster_name", &self.cluster_name)
            .field("filer_id", &self.filer_id)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("vhost", &self.vhost)
            .field("exchange", &self.exchange)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Client payload for creating a record. The id is assigned by the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConnectionRecord {
    pub cluster_name: String,
    pub certificate: String,
    pub filer_id: i64,
    pub server: String,
    pub port: u16,
    pub vhost: String,
    pub exchange: String,
    pub username: String,
    pub password: String,
}

impl NewConnectionRecord {
    /// Attach the identifier assigned by the store.
    pub fn into_record(self, id: i64) -> ConnectionRecord {
        ConnectionRecord {
            id,
            cluster_name: self.cluster_name,
            certificate: self.certificate,
            filer_id: self.filer_id,
            server: self.server,
            port: self.port,
            vhost: self.vhost,
            exchange: self.exchange,
            username: self.username,
            password: self.password,
        }
    }

    /// Check the fields the store cannot check for us.
    pub fn validate(&self) -> Result<(), String> {
        if self.cluster_name.trim().is_empty() {
            return Err("cluster_name cannot be empty".to_string());
        }
        if self.server.trim().is_empty() {
            return Err("server cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for NewConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewConnectionRecord")
            .field("cluster_name", &self.cluster_name)
            .field("filer_id", &self.filer_id)
            .field("server", &self.server)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

/// Partial update. Only fields that are `Some` are written.
///
/// `id` and `cluster_name` are not part of the patch: they identify the
/// record and are never changed by an update.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vhost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ConnectionRecordPatch {
    /// True when the patch would not touch any field.
    pub const fn is_empty(&self) -> bool {
        self.certificate.is_none()
            && self.filer_id.is_none()
            && self.server.is_none()
            && self.port.is_none()
            && self.vhost.is_none()
            && self.exchange.is_none()
            && self.username.is_none()
            && self.password.is_none()
    }

    /// Write the supplied fields onto `record`, leaving the rest untouched.
    pub fn apply_to(&self, record: &mut ConnectionRecord) {
        if let Some(certificate) = &self.certificate {
            record.certificate.clone_from(certificate);
        }
        if let Some(filer_id) = self.filer_id {
            record.filer_id = filer_id;
        }
        if let Some(server) = &self.server {
            record.server.clone_from(server);
        }
        if let Some(port) = self.port {
            record.port = port;
        }
        if let Some(vhost) = &self.vhost {
            record.vhost.clone_from(vhost);
        }
        if let Some(exchange) = &self.exchange {
            record.exchange.clone_from(exchange);
        }
        if let Some(username) = &self.username {
            record.username.clone_from(username);
        }
        if let Some(password) = &self.password {
            record.password.clone_from(password);
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_filer_id(mut self, filer_id: i64) -> Self {
        self.filer_id = Some(filer_id);
        self
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }
}

impl fmt::Debug for ConnectionRecordPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRecordPatch")
            .field("filer_id", &self.filer_id)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("vhost", &self.vhost)
            .field("exchange", &self.exchange)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewConnectionRecord {
        NewConnectionRecord {
            cluster_name: "c1".to_string(),
            certificate: "Zm9v".to_string(),
            filer_id: 42,
            server: "10.0.0.5".to_string(),
            port: 5671,
            vhost: "/".to_string(),
            exchange: "ex1".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
        }
    }

    #[test]
    fn test_into_record_keeps_fields() {
        let record = sample().into_record(7);
        assert_eq!(record.id, 7);
        assert_eq!(record.cluster_name, "c1");
        assert_eq!(record.filer_id, 42);
        assert_eq!(record.port, 5671);
    }

    #[test]
    fn test_validate_rejects_blank_cluster_name() {
        let mut payload = sample();
        payload.cluster_name = "  ".to_string();
        assert!(payload.validate().is_err());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut record = sample().into_record(1);
        let before = record.clone();

        ConnectionRecordPatch::default().with_port(5672).apply_to(&mut record);

        assert_eq!(record.port, 5672);
        assert_eq!(record.server, before.server);
        assert_eq!(record.filer_id, before.filer_id);
        assert_eq!(record.password, before.password);
        assert_eq!(record.id, before.id);
        assert_eq!(record.cluster_name, before.cluster_name);
    }

    #[test]
    fn test_patch_ignores_cluster_name_and_id() {
        let patch: ConnectionRecordPatch =
            serde_json::from_str(r#"{"id": 99, "cluster_name": "other", "vhost": "/prod"}"#).unwrap();
        let mut record = sample().into_record(1);
        patch.apply_to(&mut record);

        assert_eq!(record.id, 1);
        assert_eq!(record.cluster_name, "c1");
        assert_eq!(record.vhost, "/prod");
    }

    #[test]
    fn test_empty_patch() {
        assert!(ConnectionRecordPatch::default().is_empty());
        assert!(!ConnectionRecordPatch::default().with_server("h").is_empty());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut payload = sample();
        payload.password = "hunter2".to_string();
        let record = payload.into_record(1);
        let rendered = format!("{record:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
