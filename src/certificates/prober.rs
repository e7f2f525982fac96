// Certificate Prober - read the peer certificate's validity window over TLS

use crate::Result;
use crate::error::{ProbeError, WatchError};
use crate::monitor::types::{CertificateObservation, HostTarget};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

/// Source of certificate observations - implement this to probe endpoints differently
#[async_trait]
pub trait CertificateProbe: Send + Sync {
    /// Connect to `target` and report the presented certificate's validity.
    ///
    /// Failures are returned as [`WatchError::ConnectionError`].
    async fn probe(&self, target: &HostTarget) -> Result<CertificateObservation>;

    /// Name used in logs
    fn probe_name(&self) -> &str;
}

/// Probes endpoints with a rustls handshake that accepts any peer certificate
pub struct TlsProber {
    connector: TlsConnector,
    connect_timeout: Duration,
    handshake_timeout: Duration,
}

impl TlsProber {
    /// Create a prober with default timeouts (10s connect, 10s handshake)
    pub fn new() -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()
            .map_err(|e| WatchError::Other(format!("Failed to build TLS config: {}", e)))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            connect_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(10),
        })
    }

    /// Override both connect and handshake timeouts
    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self.handshake_timeout = duration;
        self
    }

    /// Handshake with the target and return (not_before, not_after) of the leaf
    async fn read_validity(
        &self,
        target: &HostTarget,
    ) -> std::result::Result<(DateTime<Utc>, DateTime<Utc>), ProbeError> {
        let server_name = ServerName::try_from(target.host.clone()).map_err(|_| {
            ProbeError::InvalidServerName {
                name: target.host.clone(),
            }
        })?;

        let stream = timeout(
            self.connect_timeout,
            TcpStream::connect((target.host.as_str(), target.port)),
        )
        .await
        .map_err(|_| ProbeError::Timeout {
            duration: self.connect_timeout,
        })??;

        let mut tls_stream = timeout(
            self.handshake_timeout,
            self.connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| ProbeError::Timeout {
            duration: self.handshake_timeout,
        })?
        .map_err(|e| ProbeError::Handshake {
            details: e.to_string(),
        })?;

        let (_io, connection) = tls_stream.get_ref();
        let leaf = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(ProbeError::NoCertificate)?;

        let validity = parse_validity(leaf.as_ref())?;

        // Best effort close_notify; the certificate is already read
        let _ = tls_stream.shutdown().await;

        Ok(validity)
    }
}

#[async_trait]
impl CertificateProbe for TlsProber {
    async fn probe(&self, target: &HostTarget) -> Result<CertificateObservation> {
        let (valid_from, valid_to) =
            self.read_validity(target)
                .await
                .map_err(|source| WatchError::ConnectionError {
                    host: target.host.clone(),
                    port: target.port,
                    source,
                })?;

        Ok(CertificateObservation::new(
            target,
            valid_from,
            valid_to,
            Utc::now(),
        ))
    }

    fn probe_name(&self) -> &str {
        "tls"
    }
}

/// Extract the validity window from a DER-encoded certificate
pub fn parse_validity(
    der_bytes: &[u8],
) -> std::result::Result<(DateTime<Utc>, DateTime<Utc>), ProbeError> {
    let (_, cert) =
        X509Certificate::from_der(der_bytes).map_err(|e| ProbeError::CertificateParse {
            details: format!("{:?}", e),
        })?;

    let validity = cert.validity();
    let not_before = asn1_to_utc(validity.not_before)?;
    let not_after = asn1_to_utc(validity.not_after)?;

    Ok((not_before, not_after))
}

fn asn1_to_utc(time: ASN1Time) -> std::result::Result<DateTime<Utc>, ProbeError> {
    DateTime::from_timestamp(time.timestamp(), 0).ok_or_else(|| ProbeError::CertificateParse {
        details: format!("timestamp out of range: {}", time),
    })
}

/// Verifier that accepts whatever certificate the server presents.
///
/// Handshake signatures are still checked against the presented key so the
/// connection itself is well-formed; only trust-chain and name checks are skipped.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
