//! Live transport
//!
//! Real HTTP via reqwest for native builds (the CLI and integration tests).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

use super::error::GatewayResult;
use super::routes::Method;
use super::transport::{ApiRequest, ApiResponse, RequestBody, Transport};
use crate::model::PredictionUpload;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport backed by a reqwest client
#[derive(Debug, Clone)]
pub struct LiveTransport {
    client: Client,
}

impl LiveTransport {
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn multipart_form(upload: PredictionUpload) -> GatewayResult<Form> {
    let file = Part::bytes(upload.file.bytes.clone())
        .file_name(upload.file.name.clone())
        .mime_str(&upload.file.content_type)?;

    let form = upload
        .text_fields()
        .into_iter()
        .fold(Form::new().part("file", file), |form, (name, value)| {
            form.text(name, value)
        });

    Ok(form)
}

#[async_trait]
impl Transport for LiveTransport {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
        let builder = match request.method() {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(upload) => builder.multipart(multipart_form(upload)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        tracing::debug!(url = %request.url, status, "Live response");
        Ok(ApiResponse::from_text(status, text))
    }
}
