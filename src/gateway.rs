use crate::error::PrismError;
use crate::sample::Sample;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// The companion service is only reachable on the local network while it is
/// running; this is where it listens by default.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:41586";

const GATEWAY_TIMEOUT_SECS: u64 = 60;

/// Body of a successful `/upload` response: the experiment name the service
/// derived from the file, plus the full sample catalog it parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedExperiment {
    pub name: String,
    #[serde(rename = "experiment")]
    pub samples: Vec<Sample>,
}

/// One fully resolved group in the submission: catalog records, not names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSubmission {
    pub control: Sample,
    pub experimental: Vec<Sample>,
}

/// The complete partition as sent to `/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub samples: Vec<GroupSubmission>,
}

/// Network seam. The application only ever talks to the companion service
/// through this trait, so the interactive flow is testable without it.
pub trait Gateway {
    /// Sends a raw experiment file for parsing and returns the catalog.
    fn upload(&self, path: &Path) -> Result<UploadedExperiment, PrismError>;

    /// Sends the completed partition for processing; the returned string is
    /// the service's confirmation text, surfaced to the user verbatim.
    fn submit(&self, payload: &SubmissionPayload) -> Result<String, PrismError>;
}

pub struct HttpGateway {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, PrismError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(GATEWAY_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                PrismError::GatewayFailure(format!("could not build HTTP client: {e}"))
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// On a non-success status the raw body is the error the user sees.
    fn read_body(response: reqwest::blocking::Response) -> Result<String, PrismError> {
        let status = response.status();
        let body = response.text().map_err(|e| {
            PrismError::GatewayFailure(format!("could not read response body: {e}"))
        })?;
        if !status.is_success() {
            return Err(PrismError::GatewayFailure(if body.is_empty() {
                format!("request failed with status {status}")
            } else {
                body
            }));
        }
        Ok(body)
    }
}

impl Gateway for HttpGateway {
    fn upload(&self, path: &Path) -> Result<UploadedExperiment, PrismError> {
        // The service reads the file from the multipart field "xlsfile".
        let form = reqwest::blocking::multipart::Form::new()
            .file("xlsfile", path)
            .map_err(|e| {
                PrismError::GatewayFailure(format!("could not read '{}': {e}", path.display()))
            })?;
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .map_err(|e| PrismError::GatewayFailure(format!("upload request failed: {e}")))?;
        let body = Self::read_body(response)?;
        serde_json::from_str(&body).map_err(|e| {
            PrismError::GatewayFailure(format!("upload response was not a sample catalog: {e}"))
        })
    }

    fn submit(&self, payload: &SubmissionPayload) -> Result<String, PrismError> {
        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(payload)
            .send()
            .map_err(|e| PrismError::GatewayFailure(format!("submit request failed: {e}")))?;
        Self::read_body(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_response_deserializes_from_service_shape() {
        let body = json!({
            "name": "plate_2024_06",
            "experiment": [
                { "name": "unpulsed", "data": [101.0, 99.0, 100.0] },
                { "name": "cond_1", "data": [222.0, 230.0, 219.0] }
            ]
        });
        let uploaded: UploadedExperiment = serde_json::from_value(body).unwrap();
        assert_eq!(uploaded.name, "plate_2024_06");
        assert_eq!(uploaded.samples.len(), 2);
        assert_eq!(uploaded.samples[0].name, "unpulsed");
        assert_eq!(uploaded.samples[1].data, vec![222.0, 230.0, 219.0]);
    }

    #[test]
    fn test_submission_payload_serializes_to_service_shape() {
        let payload = SubmissionPayload {
            name: "plate_2024_06".to_string(),
            samples: vec![GroupSubmission {
                control: Sample::new("unpulsed", vec![1.0]),
                experimental: vec![Sample::new("cond_1", vec![2.0])],
            }],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "plate_2024_06",
                "samples": [
                    {
                        "control": { "name": "unpulsed", "data": [1.0] },
                        "experimental": [ { "name": "cond_1", "data": [2.0] } ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_http_gateway_strips_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:41586/").unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:41586");
    }
}
