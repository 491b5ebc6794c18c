// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::params::Parameter;

#[derive(Error, Debug)]
pub enum RepospecError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("No network connection: could not reach {endpoint}")]
  Connectivity {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Repository '{repo}' was not found or is not accessible (HTTP {status})")]
  RepositoryNotFound { repo: String, status: u16 },

  #[error("Unexpected response from {endpoint}: HTTP {status}")]
  RemoteApi { endpoint: String, status: u16 },

  #[error("HTTP Error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Not a recognized repository URL: '{0}'")]
  InvalidRepositoryUrl(String),

  #[error("Required parameter '{0}' has no value (interactive mode is off)")]
  MissingParameter(Parameter),

  #[error("Could not read defaults file '{path}': {source}")]
  DefaultsRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Could not parse defaults file '{path}': {source}")]
  DefaultsParse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Cannot shell-escape generator arguments: {0}")]
  Escape(#[from] shlex::QuoteError),

  #[error("Failed to execute '{program}': {source}")]
  Exec {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("User interaction failed: {0}")]
  Prompt(#[from] dialoguer::Error),
}

impl RepospecError {
  /// Connection-level failures get their own variant so the user sees
  /// "no network" rather than a generic HTTP error.
  pub(crate) fn from_transport(endpoint: &str, error: reqwest::Error) -> Self {
    if error.is_connect() || error.is_timeout() {
      RepospecError::Connectivity {
        endpoint: endpoint.to_string(),
        source: error,
      }
    } else {
      RepospecError::Http(error)
    }
  }
}
