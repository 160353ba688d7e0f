use async_trait::async_trait;
use reqwest::Client;

use crate::domain::TransportError;

/// Issues a body-less request and reports the status of the immediate response.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn head_status(&self, url: &str) -> Result<u16, TransportError>;
}

/// HEAD probe over reqwest. The client must be built with
/// `redirect::Policy::none()` (see `infrastructure::http::probe_client`).
pub struct HttpProbe {
    http: Client,
}

impl HttpProbe {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProbeTransport for HttpProbe {
    async fn head_status(&self, url: &str) -> Result<u16, TransportError> {
        let response = self.http.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}
