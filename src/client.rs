//! /predict エンドポイントへの送信

use std::time::Duration;

use async_trait::async_trait;
use batikscan_common::{ClassificationResult, StagedImage};
use reqwest::multipart::{Form, Part};

use crate::config::Config;
use crate::error::{BatikScanError, Result};

pub const UPLOAD_FIELD: &str = "file";
pub const UPLOAD_FILE_NAME: &str = "image.jpg";
/// 元の拡張子に関係なく固定
pub const UPLOAD_MIME: &str = "image/jpeg";

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &StagedImage) -> Result<ClassificationResult>;
}

#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.timeout_seconds.map(Duration::from_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(bytes: Vec<u8>) -> Result<Form> {
        let part = Part::bytes(bytes).file_name(UPLOAD_FILE_NAME).mime_str(UPLOAD_MIME)?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}

#[async_trait]
impl Classifier for PredictClient {
    async fn classify(&self, image: &StagedImage) -> Result<ClassificationResult> {
        let bytes = tokio::fs::read(image.local_path()).await?;
        tracing::debug!(endpoint = %self.endpoint, bytes = bytes.len(), "uploading image");

        // Content-Type: multipart/form-data; boundary=... は reqwest が付与
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(Self::build_form(bytes)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BatikScanError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let result = ClassificationResult::from_json(&body)
            .map_err(|e| BatikScanError::InvalidResponse(e.to_string()))?;
        tracing::debug!(predicted = %result.predicted_class, confidence = result.confidence, "prediction received");
        Ok(result)
    }
}
