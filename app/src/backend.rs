use rand_core::RngCore;
use uuid::Uuid;

use shared::error::AppError;
use shared::schema::{ConsentRequest, ConsentResponse, UploadRequest, UploadResponse};

use crate::time::Delay;

/// Fixed hosted endpoint the real upload path talks to.
pub const DEFAULT_ENDPOINT: &str = "https://healthbook-backend.onrender.com/records";

/// Simulated duration of an upload exchange.
pub const UPLOAD_EXCHANGE_MS: u64 = 1_800;

/// Simulated duration of a consent exchange.
pub const CONSENT_EXCHANGE_MS: u64 = 1_500;

/// Seam over the records backend.
///
/// Both operations are single-shot: no retry, no backoff, no cancellation.
/// A failure is terminal for the operation and the caller re-initiates.
pub trait RecordsBackend {
    fn upload(&mut self, request: &UploadRequest) -> Result<UploadResponse, AppError>;

    fn grant_consent(&mut self, request: &ConsentRequest) -> Result<ConsentResponse, AppError>;
}

/// Backend that POSTs the upload to the hosted endpoint.
///
/// Consent grants stay simulated even here; the hosted service never grew a
/// consent route.
pub struct HttpBackend<D> {
    client: reqwest::blocking::Client,
    endpoint: String,
    delay: D,
}

impl<D: Delay> HttpBackend<D> {
    pub fn new(endpoint: impl Into<String>, delay: D) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            delay,
        }
    }
}

impl<D: Delay> RecordsBackend for HttpBackend<D> {
    fn upload(&mut self, request: &UploadRequest) -> Result<UploadResponse, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|err| AppError::Backend(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Backend(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        response
            .json::<UploadResponse>()
            .map_err(|err| AppError::Backend(err.to_string()))
    }

    fn grant_consent(&mut self, request: &ConsentRequest) -> Result<ConsentResponse, AppError> {
        log::debug!("consent payload: doctor={}", request.doctor);
        self.delay.sleep_ms(CONSENT_EXCHANGE_MS);
        Ok(ConsentResponse { success: true })
    }
}

/// Backend that fabricates every identifier after a fixed delay.
pub struct SimulatedBackend<R, D> {
    rng: R,
    delay: D,
}

impl<R: RngCore, D: Delay> SimulatedBackend<R, D> {
    pub fn new(rng: R, delay: D) -> Self {
        Self { rng, delay }
    }

    fn fabricate_record_id(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Uuid::from_bytes(bytes).to_string()
    }

    fn fabricate_content_hash(&mut self) -> String {
        let mut bytes = [0u8; 32];
        self.rng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("0x{hex}")
    }
}

impl<R: RngCore, D: Delay> RecordsBackend for SimulatedBackend<R, D> {
    fn upload(&mut self, request: &UploadRequest) -> Result<UploadResponse, AppError> {
        log::debug!("simulated upload for patient {}", request.patient);
        self.delay.sleep_ms(UPLOAD_EXCHANGE_MS);
        Ok(UploadResponse {
            record_id: self.fabricate_record_id(),
            content_hash: self.fabricate_content_hash(),
        })
    }

    fn grant_consent(&mut self, request: &ConsentRequest) -> Result<ConsentResponse, AppError> {
        log::debug!(
            "simulated consent: doctor={} expiry={}",
            request.doctor,
            request.expiry
        );
        self.delay.sleep_ms(CONSENT_EXCHANGE_MS);
        Ok(ConsentResponse { success: true })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use shared::model::AccessScope;

    use crate::time::NoopDelay;

    use super::*;

    fn sample_upload() -> UploadRequest {
        UploadRequest::from_bytes("0xabc", b"%PDF-1.4")
    }

    fn sample_consent() -> ConsentRequest {
        ConsentRequest {
            doctor: String::from("0x742d"),
            scope: AccessScope::All,
            expiry: 1_755_043_200,
        }
    }

    #[test]
    fn simulated_upload_fabricates_distinct_identifiers() {
        let mut backend = SimulatedBackend::new(ChaCha20Rng::from_seed([3u8; 32]), NoopDelay);
        let first = backend.upload(&sample_upload()).expect("upload");
        let second = backend.upload(&sample_upload()).expect("upload");
        assert_ne!(first.record_id, second.record_id);
        assert!(first.content_hash.starts_with("0x"));
        assert_eq!(first.content_hash.len(), 66);
    }

    #[test]
    fn simulated_upload_is_deterministic_for_a_seed() {
        let mut a = SimulatedBackend::new(ChaCha20Rng::from_seed([4u8; 32]), NoopDelay);
        let mut b = SimulatedBackend::new(ChaCha20Rng::from_seed([4u8; 32]), NoopDelay);
        assert_eq!(
            a.upload(&sample_upload()).expect("upload"),
            b.upload(&sample_upload()).expect("upload")
        );
    }

    #[test]
    fn simulated_consent_always_succeeds() {
        let mut backend = SimulatedBackend::new(ChaCha20Rng::from_seed([5u8; 32]), NoopDelay);
        let response = backend.grant_consent(&sample_consent()).expect("grant");
        assert!(response.success);
    }

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/records")
    }

    #[test]
    fn http_upload_parses_a_success_response() {
        let endpoint = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"recordId":"rec-0001","contentHash":"0xbeef"}"#,
        );
        let mut backend = HttpBackend::new(endpoint, NoopDelay);
        let response = backend.upload(&sample_upload()).expect("upload");
        assert_eq!(response.record_id, "rec-0001");
        assert_eq!(response.content_hash, "0xbeef");
    }

    #[test]
    fn http_upload_surfaces_non_2xx_as_error() {
        let endpoint = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let mut backend = HttpBackend::new(endpoint, NoopDelay);
        let err = backend.upload(&sample_upload()).expect_err("server error");
        match err {
            AppError::Backend(message) => assert!(message.contains("500")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
