//! HTTP analysis service backend.
//!
//! Sends the image, question and selection as a multipart POST and maps the
//! JSON reply onto a [`Response`]. Every failure (transport, timeout,
//! non-200 status, bad body) becomes the fixed error reply; nothing is
//! propagated to the session.

use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, ImageFormat};
use reqwest::StatusCode;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;

use super::{AnnotationInstruction, Response, ResponseEngine};
use crate::config::BackendConfig;
use crate::constants::{NO_IMAGE_MESSAGE, REMOTE_ERROR_MESSAGE, REMOTE_FALLBACK_MESSAGE};
use crate::model::{ChartDataset, Rectangle};

/// Errors talking to the analysis service. Only logged, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with something other than 200 OK
    #[error("Service returned {0}")]
    Status(StatusCode),

    /// Reply body was not the expected JSON
    #[error("Malformed reply: {0}")]
    Json(#[from] serde_json::Error),

    /// Image could not be encoded for upload
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// No service URL configured
    #[error("No endpoint configured")]
    MissingEndpoint,
}

/// Reply body sent by the service.
#[derive(Debug, Deserialize)]
struct RemoteReply {
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    text_response: Option<String>,
    #[serde(default)]
    chart_data: Option<ChartDataset>,
    #[serde(default)]
    annotation: Option<RemoteAnnotation>,
}

#[derive(Debug, Deserialize)]
struct RemoteAnnotation {
    /// `[x1, y1, x2, y2]`; the service may send fractional pixels
    area: [f64; 4],
    label: String,
}

impl RemoteAnnotation {
    fn into_instruction(self) -> AnnotationInstruction {
        let [x1, y1, x2, y2] = self.area.map(|v| v.max(0.0).round() as u32);
        AnnotationInstruction::new(Rectangle::new(x1, y1, x2, y2), self.label)
    }
}

/// Parse a 200 OK reply body into a response.
fn parse_reply(body: &str) -> Result<Response, RemoteError> {
    let reply: RemoteReply = serde_json::from_str(body)?;
    if let Some(status) = &reply.status {
        log::debug!("🌐 Service status: {}", status);
    }

    Ok(Response {
        text: reply
            .text_response
            .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string()),
        chart_data: reply.chart_data.filter(|data| !data.is_empty()),
        annotation: reply.annotation.map(RemoteAnnotation::into_instruction),
    })
}

/// Response engine backed by an HTTP analysis service.
#[derive(Debug)]
pub struct RemoteResponseEngine {
    client: Client,
    endpoint: String,
}

impl RemoteResponseEngine {
    /// Create an engine posting to `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(RemoteError::MissingEndpoint);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, RemoteError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(
        &self,
        question: &str,
        selection: Option<&Rectangle>,
        image: &DynamicImage,
    ) -> Result<Response, RemoteError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let image_part = multipart::Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")?;
        let mut form = multipart::Form::new()
            .part("image", image_part)
            .text("question", question.to_string());
        // Selection goes out as four repeated form fields, omitted when absent
        if let Some(rect) = selection {
            for value in <[u32; 4]>::from(*rect) {
                form = form.text("selection", value.to_string());
            }
        }

        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteError::Status(status));
        }
        let body = response.text()?;
        parse_reply(&body)
    }
}

impl ResponseEngine for RemoteResponseEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn evaluate(
        &self,
        question: &str,
        selection: Option<&Rectangle>,
        image: Option<&DynamicImage>,
    ) -> Response {
        let Some(image) = image else {
            return Response::text(NO_IMAGE_MESSAGE);
        };

        match self.request(question, selection, image) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Analysis request to {} failed: {}", self.endpoint, e);
                Response::text(REMOTE_ERROR_MESSAGE)
            }
        }
    }
}
