//! `reqwest`-backed transport for native hosts.

use gallery_client::net::transport::{HttpRequest, HttpResponse, Method, RequestBody, Transport, TransportError};
use reqwest::multipart::{Form, Part};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { field, file } => {
                let mut part = Part::bytes(file.bytes).file_name(file.name);
                if let Some(content_type) = &file.content_type {
                    part = part.mime_str(content_type).map_err(|e| TransportError(e.to_string()))?;
                }
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status, "response received");
        Ok(HttpResponse { status, body })
    }
}
