//! gloo-net transport
//!
//! Sends gateway requests with the browser's `fetch`. Prediction uploads go
//! out as `FormData` with the image attached as a `Blob`.

use async_trait::async_trait;
use bioblood::gateway::{
    ApiRequest, ApiResponse, GatewayError, GatewayResult, Method, RequestBody, Transport,
};
use bioblood::model::PredictionUpload;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// Transport backed by `window.fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    fn name(&self) -> &'static str {
        "gloo"
    }

    async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
        let builder = match request.method() {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };

        let outgoing = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(upload) => builder.body(form_data(&upload)?),
        }
        .map_err(|e| GatewayError::Request(e.to_string()))?;

        let response = outgoing
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(ApiResponse::from_text(status, text))
    }
}

/// Text fields first, then the image as `file`
fn form_data(upload: &PredictionUpload) -> GatewayResult<FormData> {
    let form = FormData::new().map_err(js_error)?;

    for (name, value) in upload.text_fields() {
        form.append_with_str(name, &value).map_err(js_error)?;
    }

    let bytes = js_sys::Uint8Array::from(upload.file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&upload.file.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    form.append_with_blob_and_filename("file", &blob, &upload.file.name)
        .map_err(js_error)?;

    Ok(form)
}

fn js_error(err: JsValue) -> GatewayError {
    GatewayError::Request(format!("{:?}", err))
}
