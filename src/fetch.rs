use std::io;

use log::{debug, trace};

use reqwest;
use reqwest::StatusCode;
use bytes::Bytes;

use thiserror::Error;


#[derive(Debug, Error)]
pub enum FetchError {
	#[error(transparent)]
	Request(#[from] reqwest::Error),
	#[error("permission denied for {0}")]
	PermissionError(String),
	#[error("{0} not found")]
	NotFound(String),
	#[error("unexpected success status {status} for {url}")]
	UnexpectedSuccessStatus{
		url: String,
		status: u16,
	},
	#[error("failed to store {url}: {err}")]
	Store{
		url: String,
		err: io::Error,
	},
}


/// Blocking downloader for the raw source tables. Network errors are fatal;
/// nothing is retried.
pub struct Client {
	client: reqwest::blocking::Client,
}

impl Client {
	pub fn new() -> Self {
		Self{
			client: reqwest::blocking::Client::new(),
		}
	}

	pub fn get(&self, url: &str) -> Result<Bytes, FetchError> {
		trace!("requesting {}", url);
		let resp = self.client.get(url).send()?;
		match resp.status() {
			StatusCode::OK => {
				let body = resp.bytes()?;
				debug!("fetched {} bytes from {}", body.len(), url);
				Ok(body)
			},
			StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(FetchError::PermissionError(url.into())),
			StatusCode::NOT_FOUND => Err(FetchError::NotFound(url.into())),
			status if status.is_success() => Err(FetchError::UnexpectedSuccessStatus{
				url: url.into(),
				status: status.as_u16(),
			}),
			status => match resp.error_for_status() {
				Err(e) => Err(FetchError::Request(e)),
				Ok(_) => Err(FetchError::UnexpectedSuccessStatus{
					url: url.into(),
					status: status.as_u16(),
				}),
			},
		}
	}

	/// Fetch `url` and copy the body to `w`, returning the number of bytes
	/// written.
	pub fn download<W: io::Write>(&self, url: &str, w: &mut W) -> Result<u64, FetchError> {
		let body = self.get(url)?;
		let store_err = |err: io::Error| FetchError::Store{url: url.into(), err};
		w.write_all(&body[..]).map_err(store_err)?;
		w.flush().map_err(store_err)?;
		Ok(body.len() as u64)
	}
}

impl Default for Client {
	fn default() -> Self {
		Self::new()
	}
}
