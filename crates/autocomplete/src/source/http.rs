use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};

use super::{Freshness, OptionPage, OptionRequest, OptionSource};
use crate::error::FetchError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// [`OptionSource`] over HTTP: `GET` for pages, `HEAD` + `If-None-Match` for
/// revalidation.
#[derive(Debug, Clone)]
pub struct HttpSource {
	client: Client,
}

impl HttpSource {
	pub fn new() -> Result<Self, FetchError> {
		let client = Client::builder()
			.connect_timeout(DEFAULT_CONNECT_TIMEOUT)
			.build()
			.map_err(|error| FetchError::Transport(error.to_string()))?;
		Ok(Self { client })
	}

	pub fn with_client(client: Client) -> Self {
		Self { client }
	}
}

fn transport(error: reqwest::Error) -> FetchError {
	if error.is_decode() {
		FetchError::Decode(error.to_string())
	} else {
		FetchError::Transport(error.to_string())
	}
}

#[async_trait]
impl OptionSource for HttpSource {
	async fn fetch(&self, request: &OptionRequest) -> Result<OptionPage, FetchError> {
		let response = self.client.get(request.url()?).send().await.map_err(transport)?;
		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status { status: status.as_u16() });
		}

		let header_validator = response
			.headers()
			.get(ETAG)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let mut page: OptionPage = response.json().await.map_err(|error| FetchError::Decode(error.to_string()))?;
		if let Some(validator) = header_validator {
			page.validator = validator;
		}
		Ok(page)
	}

	async fn revalidate(&self, request: &OptionRequest, validator: &str) -> Result<Freshness, FetchError> {
		let response = self
			.client
			.head(request.url()?)
			.header(IF_NONE_MATCH, validator)
			.send()
			.await
			.map_err(transport)?;
		Ok(if response.status() == StatusCode::NOT_MODIFIED {
			Freshness::NotModified
		} else {
			Freshness::Modified
		})
	}
}
