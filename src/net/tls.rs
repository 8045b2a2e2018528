//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;
use std::path::Path;

use crate::config::TlsConfig;

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    let cert_path = Path::new(&tls.cert_path);
    let key_path = Path::new(&tls.key_path);

    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_certificate_is_reported() {
        let tls = TlsConfig {
            cert_path: "/nonexistent/hop.crt".into(),
            key_path: "/nonexistent/hop.key".into(),
        };
        let err = load_tls_config(&tls).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("Certificate"));
    }
}
