//! Base64 helpers for certificate files.
//!
//! Records carry the broker certificate base64 encoded. These helpers turn
//! a PEM/CRT file into that form and back.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Decoded certificate is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn read(path: &Path) -> Result<Vec<u8>, CertificateError> {
    std::fs::read(path).map_err(|source| CertificateError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Read a certificate file and return its contents as standard base64.
pub fn encode_certificate(path: impl AsRef<Path>) -> Result<String, CertificateError> {
    Ok(STANDARD.encode(read(path.as_ref())?))
}

/// Read a file holding base64 text and return the decoded certificate.
pub fn decode_certificate(path: impl AsRef<Path>) -> Result<String, CertificateError> {
    let raw = read(path.as_ref())?;
    let trimmed = raw.trim_ascii();
    Ok(String::from_utf8(STANDARD.decode(trimmed)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    #[test]
    fn test_encode_then_decode_file() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        cert.write_all(PEM.as_bytes()).unwrap();

        let encoded = encode_certificate(cert.path()).unwrap();

        let mut b64 = tempfile::NamedTempFile::new().unwrap();
        writeln!(b64, "{encoded}").unwrap();
        assert_eq!(decode_certificate(b64.path()).unwrap(), PEM);
    }

    #[test]
    fn test_encode_known_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"foo").unwrap();
        assert_eq!(encode_certificate(file.path()).unwrap(), "Zm9v");
    }

    #[test]
    fn test_missing_file() {
        let err = encode_certificate("/definitely/not/here.crt").unwrap_err();
        assert!(matches!(err, CertificateError::Read { .. }));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not base64!!").unwrap();
        assert!(matches!(decode_certificate(file.path()), Err(CertificateError::Decode(_))));
    }
}
