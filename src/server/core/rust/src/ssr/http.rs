/* src/server/core/rust/src/ssr/http.rs */

use reqwest::header::CONTENT_TYPE;

use super::{RenderedPage, SsrEngine};
use crate::page::PageObject;
use crate::producer::{BoxError, BoxFuture};

/// SSR over HTTP: POSTs the page object as JSON to `<base>/render` and
/// expects `{"head": [...], "body": "..."}` back.
#[derive(Debug, Clone)]
pub struct HttpSsrEngine {
  client: reqwest::Client,
  endpoint: String,
}

impl HttpSsrEngine {
  pub fn new(base_url: &str) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
    let endpoint = format!("{}/render", base_url.trim_end_matches('/'));
    Self { client, endpoint }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

impl SsrEngine for HttpSsrEngine {
  fn name(&self) -> &str {
    "http"
  }

  fn render(&self, page: &PageObject<'_>) -> BoxFuture<Result<RenderedPage, BoxError>> {
    let body = serde_json::to_vec(page);
    let request = self.client.post(&self.endpoint).header(CONTENT_TYPE, "application/json");
    Box::pin(async move {
      let response = request.body(body?).send().await?.error_for_status()?;
      Ok::<_, BoxError>(response.json::<RenderedPage>().await?)
    })
  }
}
