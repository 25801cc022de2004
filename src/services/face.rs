//! Face recognition.
//!
//! A captured image is matched against every recognizable employee's
//! reference portrait. The remote API is behind [`FaceRecognizer`] so tests
//! and offline deployments can swap it out. API failures are never surfaced
//! as errors to the caller; they count as "not recognized".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FaceRecognitionConfig;
use crate::error::{HotelError, HotelResult};
use crate::models::Employee;

/// A face detection and comparison backend.
#[async_trait]
pub trait FaceRecognizer: Send + Sync {
    /// Number of faces found in a base64 image.
    async fn detect(&self, image_base64: &str) -> HotelResult<usize>;

    /// Confidence (0-100) that two base64 images show the same person.
    async fn compare(&self, image_base64: &str, reference_base64: &str) -> HotelResult<Decimal>;
}

/// Shared recognizer handle stored in application state.
pub type SharedFaceRecognizer = Arc<dyn FaceRecognizer>;

/// Recognizer backed by a Face++ compatible HTTP API.
pub struct HttpFaceRecognizer {
    client: reqwest::Client,
    config: FaceRecognitionConfig,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    faces: Vec<serde_json::Value>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    confidence: Option<f64>,
    error_message: Option<String>,
}

impl HttpFaceRecognizer {
    /// Builds a client with the configured timeout.
    pub fn new(config: FaceRecognitionConfig) -> HotelResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| HotelError::Internal {
                message: format!("failed to build face recognition client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T>(&self, path: &str, form: &[(&str, &str)]) -> HotelResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut fields = vec![
            ("api_key", self.config.api_key.as_str()),
            ("api_secret", self.config.api_secret.as_str()),
        ];
        fields.extend_from_slice(form);
        let response = self
            .client
            .post(self.endpoint(path))
            .form(&fields)
            .send()
            .await
            .map_err(|e| HotelError::Internal {
                message: format!("face API {} request failed: {}", path, e),
            })?;
        response.json::<T>().await.map_err(|e| HotelError::Internal {
            message: format!("face API {} returned an unreadable body: {}", path, e),
        })
    }
}

#[async_trait]
impl FaceRecognizer for HttpFaceRecognizer {
    async fn detect(&self, image_base64: &str) -> HotelResult<usize> {
        let body: DetectResponse = self.post("detect", &[("image_base64", image_base64)]).await?;
        if let Some(message) = body.error_message {
            return Err(HotelError::Internal {
                message: format!("face API detect error: {}", message),
            });
        }
        Ok(body.faces.len())
    }

    async fn compare(&self, image_base64: &str, reference_base64: &str) -> HotelResult<Decimal> {
        let body: CompareResponse = self
            .post(
                "compare",
                &[
                    ("image_base64_1", image_base64),
                    ("image_base64_2", reference_base64),
                ],
            )
            .await?;
        if let Some(message) = body.error_message {
            return Err(HotelError::Internal {
                message: format!("face API compare error: {}", message),
            });
        }
        body.confidence
            .and_then(Decimal::from_f64)
            .ok_or_else(|| HotelError::Internal {
                message: "face API compare returned no confidence".to_string(),
            })
    }
}

/// A successful match.
#[derive(Debug, Clone)]
pub struct FaceMatch {
    /// The recognized employee.
    pub employee: Employee,
    /// Comparison confidence.
    pub confidence: Decimal,
}

/// Finds the employee whose reference portrait best matches `image_base64`.
///
/// Returns `None` when no face is detected, when no candidate reaches
/// `threshold`, or when the API fails.
pub async fn identify(
    recognizer: &dyn FaceRecognizer,
    candidates: &[Employee],
    image_base64: &str,
    threshold: Decimal,
) -> Option<FaceMatch> {
    match recognizer.detect(image_base64).await {
        Ok(0) => {
            debug!("No face detected in capture");
            return None;
        }
        Ok(_) => {}
        Err(err) => {
            warn!(error = %err, "Face detection failed");
            return None;
        }
    }

    let mut best: Option<FaceMatch> = None;
    for employee in candidates.iter().filter(|e| e.is_recognizable()) {
        let Some(reference) = employee.face_reference.as_deref() else {
            continue;
        };
        let confidence = match recognizer.compare(image_base64, reference).await {
            Ok(confidence) => confidence,
            Err(err) => {
                warn!(employee_id = %employee.id, error = %err, "Face comparison failed");
                continue;
            }
        };
        debug!(employee_id = %employee.id, confidence = %confidence, "Face compared");
        if confidence >= threshold && best.as_ref().is_none_or(|b| confidence > b.confidence) {
            best = Some(FaceMatch {
                employee: employee.clone(),
                confidence,
            });
        }
    }
    best
}
