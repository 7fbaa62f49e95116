use std::convert::Infallible;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use reqwest::{Body, Client, Response, Url};
use tracing::debug;

use super::{
    ConnectionError,
    counters::ConnectionProbe,
    payload::UploadPayload,
    request_utils::RequestBuilderExt,
    transport::{TransferKind, TransferRequest, Transport},
};

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn download(
        &self,
        url: Url,
        expected_bytes: u64,
        probe: ConnectionProbe,
    ) -> Result<(), ConnectionError> {
        let response = self.client.get(url).with_no_cache().send().await?;
        let mut response = Self::check_status(response)?;
        let mut received = 0;
        while let Some(chunk) = response.chunk().await? {
            received += chunk.len() as u64;
            probe.on_byte_delta(chunk.len() as u64);
        }
        if received < expected_bytes {
            debug!(
                connection = probe.index(),
                received, expected_bytes, "body ended before the expected payload size"
            );
        }
        Ok(())
    }

    async fn upload(
        &self,
        url: Url,
        payload: UploadPayload,
        probe: ConnectionProbe,
    ) -> Result<(), ConnectionError> {
        // counted as each chunk is handed to the connection
        let body = stream::iter(payload.chunks().map(move |chunk: Bytes| {
            probe.on_byte_delta(chunk.len() as u64);
            Ok::<_, Infallible>(chunk)
        }));
        let response = self
            .client
            .post(url)
            .with_upload_headers(payload.len())
            .body(Body::wrap_stream(body))
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    fn check_status(response: Response) -> Result<Response, ConnectionError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ConnectionError::Status(response.status()))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn transfer(
        &self,
        request: TransferRequest,
        probe: ConnectionProbe,
    ) -> Result<(), ConnectionError> {
        match request.kind {
            TransferKind::Download { expected_bytes } => {
                self.download(request.url, expected_bytes, probe).await
            }
            TransferKind::Upload { payload } => self.upload(request.url, payload, probe).await,
        }
    }
}
