// Loads the PEM certificate chain and private key used in HTTPS mode

use crate::config::TlsConfig;
use rustls::ServerConfig;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

pub fn load_rustls_config(tls: &TlsConfig) -> io::Result<ServerConfig> {
    let certs = rustls_pemfile::certs(&mut open(&tls.cert_path)?).collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(invalid_data(format!(
            "no certificates found in {}",
            tls.cert_path.display()
        )));
    }

    let key = rustls_pemfile::private_key(&mut open(&tls.key_path)?)?
        .ok_or_else(|| invalid_data(format!("no private key found in {}", tls.key_path.display())))?;

    ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| invalid_data(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| invalid_data(e.to_string()))
}

fn open(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_reported() {
        let tls = TlsConfig {
            cert_path: "/nonexistent/cert.pem".into(),
            key_path: "/nonexistent/key.pem".into(),
        };
        let err = load_rustls_config(&tls).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn empty_certificate_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        std::fs::write(&cert_path, "").unwrap();
        std::fs::write(&key_path, "").unwrap();

        let err = load_rustls_config(&TlsConfig { cert_path, key_path }).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
