// src/fetch.rs
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Settings;
use crate::error::RepospecError;
use crate::params::{Parameter, ParameterSet};

/// Packaging type used when the repository language has no dedicated template.
pub const FALLBACK_TYPE: &str = "generic";

/// `owner/name` slug identifying a repository on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
  pub owner: String,
  pub name: String,
}

impl RepoId {
  /// Accepts https/ssh clone URLs, scheme-less `github.com/...` and bare `owner/name`.
  pub fn parse(url: &str) -> Result<Self, RepospecError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
      Regex::new(
        r"^(?:(?:https?://|ssh://git@|git@)?(?:www\.)?github\.com[/:])?([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$",
      )
      .expect("repository URL pattern is valid")
    });

    let invalid = || RepospecError::InvalidRepositoryUrl(url.to_string());
    let captures = pattern.captures(url.trim()).ok_or_else(invalid)?;
    let owner = &captures[1];
    // `github.com/owner` has the host where the owner belongs.
    if owner.eq_ignore_ascii_case("github.com") || owner.eq_ignore_ascii_case("www.github.com") {
      return Err(invalid());
    }
    Ok(RepoId {
      owner: owner.to_string(),
      name: captures[2].to_string(),
    })
  }

  /// Web page of the repository.
  pub fn html_url(&self) -> String {
    format!("https://github.com/{}/{}", self.owner, self.name)
  }
}

/// `input` when it is already an http(s) address; slugs and ssh remotes are not.
pub fn web_url(input: &str) -> Option<&str> {
  let input = input.trim();
  (input.starts_with("https://") || input.starts_with("http://")).then_some(input)
}

impl fmt::Display for RepoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

/// Maps the repository's primary language to a packaging type.
pub fn language_to_type(language: Option<&str>) -> &'static str {
  match language {
    Some("Go") => "golang",
    Some("Python") => "python3",
    Some("Ruby") => "ruby",
    Some("Rust") => "rust",
    Some("Perl") => "perl",
    Some("JavaScript") | Some("TypeScript") => "nodejs",
    Some("C") => "c",
    Some("C++") => "cpp",
    Some("Java") => "java",
    Some("Lua") => "lua",
    _ => FALLBACK_TYPE,
  }
}

/// Tags are usually `v1.2.3`; the package version drops one leading `v`.
pub fn version_from_tag(tag: &str) -> &str {
  tag.strip_prefix('v').unwrap_or(tag)
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
  name: String,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  language: Option<String>,
  #[serde(default)]
  html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LicenseInfo {
  #[serde(default)]
  license: Option<LicenseKind>,
}

#[derive(Debug, Deserialize)]
struct LicenseKind {
  #[serde(default)]
  spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagInfo {
  name: String,
}

/// Blocking client for the repository metadata API.
pub struct GithubClient {
  client: Client,
  api_url: String,
  token: Option<String>,
}

impl GithubClient {
  pub fn new(settings: &Settings) -> Result<Self, RepospecError> {
    let client = Client::builder()
      .user_agent(concat!("repospec/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      client,
      api_url: settings.api_url.trim_end_matches('/').to_string(),
      token: settings.github_token.clone(),
    })
  }

  /// Runs the repository, license and tags lookups in that order.
  pub fn fetch(&self, repo: &RepoId) -> Result<ParameterSet, RepospecError> {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Fetching metadata for {}...", repo));

    let result = self.fetch_all(repo);
    spinner.finish_and_clear();
    result
  }

  fn fetch_all(&self, repo: &RepoId) -> Result<ParameterSet, RepospecError> {
    let mut params = ParameterSet::new();

    let info = self.repo_info(repo)?;
    debug!("Repository info: {:?}", info);
    params.set(Parameter::Name, info.name);
    params.set_opt(Parameter::Summary, info.description.filter(|d| !d.trim().is_empty()));
    params.set(Parameter::Type, language_to_type(info.language.as_deref()));
    params.set(Parameter::Url, info.html_url.unwrap_or_else(|| repo.html_url()));

    params.set_opt(Parameter::License, self.license(repo)?);

    if let Some(tag) = self.latest_tag(repo)? {
      params.set(Parameter::Version, version_from_tag(&tag));
      params.set(Parameter::Tag, tag);
    }

    Ok(params)
  }

  fn get(&self, endpoint: &str) -> Result<Response, RepospecError> {
    debug!("GET {}", endpoint);
    let mut request = self
      .client
      .get(endpoint)
      .header("Accept", "application/vnd.github+json");
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }
    request
      .send()
      .map_err(|e| RepospecError::from_transport(endpoint, e))
  }

  fn repo_info(&self, repo: &RepoId) -> Result<RepoInfo, RepospecError> {
    let endpoint = format!("{}/repos/{}", self.api_url, repo);
    let response = self.get(&endpoint)?;
    if !response.status().is_success() {
      return Err(RepospecError::RepositoryNotFound {
        repo: repo.to_string(),
        status: response.status().as_u16(),
      });
    }
    Ok(response.json()?)
  }

  fn license(&self, repo: &RepoId) -> Result<Option<String>, RepospecError> {
    let endpoint = format!("{}/repos/{}/license", self.api_url, repo);
    let response = self.get(&endpoint)?;
    match response.status() {
      StatusCode::NOT_FOUND => {
        info!("No license detected for {}", repo);
        Ok(None)
      }
      status if status.is_success() => {
        let info: LicenseInfo = response.json()?;
        let spdx = info
          .license
          .and_then(|l| l.spdx_id)
          .filter(|id| id != "NOASSERTION");
        if spdx.is_none() {
          warn!("License of {} is not a recognized SPDX license", repo);
        }
        Ok(spdx)
      }
      status => Err(RepospecError::RemoteApi {
        endpoint,
        status: status.as_u16(),
      }),
    }
  }

  /// First tag the API returns; no version ordering is applied.
  fn latest_tag(&self, repo: &RepoId) -> Result<Option<String>, RepospecError> {
    let endpoint = format!("{}/repos/{}/tags", self.api_url, repo);
    let response = self.get(&endpoint)?;
    if !response.status().is_success() {
      return Err(RepospecError::RemoteApi {
        endpoint,
        status: response.status().as_u16(),
      });
    }
    let tags: Vec<TagInfo> = response.json()?;
    if tags.is_empty() {
      info!("Repository {} has no tags", repo);
    }
    Ok(tags.into_iter().next().map(|t| t.name))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{DEFAULT_GENERATOR, DEFAULT_TEMPLATES_DIR};
  use std::path::PathBuf;

  fn client_for(url: &str) -> GithubClient {
    GithubClient::new(&Settings {
      api_url: url.to_string(),
      github_token: None,
      templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
      generator: DEFAULT_GENERATOR.to_string(),
    })
    .unwrap()
  }

  fn json(server: &mut mockito::Server, path: &str, status: usize, body: &str) -> mockito::Mock {
    server
      .mock("GET", path)
      .with_status(status)
      .with_header("content-type", "application/json")
      .with_body(body)
      .create()
  }

  fn repo() -> RepoId {
    RepoId::parse("owner/repo").unwrap()
  }

  #[test]
  fn strips_single_leading_v() {
    assert_eq!(version_from_tag("v0.10.4"), "0.10.4");
    assert_eq!(version_from_tag("1.2.3"), "1.2.3");
    assert_eq!(version_from_tag("vv2"), "v2");
  }

  #[test]
  fn maps_languages_with_generic_fallback() {
    assert_eq!(language_to_type(Some("Go")), "golang");
    assert_eq!(language_to_type(Some("Ruby")), "ruby");
    assert_eq!(language_to_type(Some("COBOL")), FALLBACK_TYPE);
    assert_eq!(language_to_type(None), FALLBACK_TYPE);
  }

  #[test]
  fn parses_repository_urls() {
    let expected = RepoId {
      owner: "owner".into(),
      name: "repo".into(),
    };
    for url in [
      "https://github.com/owner/repo",
      "https://github.com/owner/repo/",
      "https://github.com/owner/repo.git",
      "git@github.com:owner/repo.git",
      "github.com/owner/repo",
      "owner/repo",
    ] {
      assert_eq!(RepoId::parse(url).unwrap(), expected, "url: {}", url);
    }
  }

  #[test]
  fn rejects_unrecognized_urls() {
    for url in [
      "https://gitlab.com/owner/repo",
      "repo",
      "https://github.com/owner",
      "github.com/owner",
      "www.github.com/owner/",
    ] {
      assert!(
        matches!(RepoId::parse(url), Err(RepospecError::InvalidRepositoryUrl(_))),
        "url: {}",
        url
      );
    }
  }

  #[test]
  fn only_http_inputs_count_as_web_urls() {
    assert_eq!(
      web_url(" https://github.com/owner/repo "),
      Some("https://github.com/owner/repo")
    );
    assert_eq!(web_url("http://example.org/repo"), Some("http://example.org/repo"));
    assert_eq!(web_url("owner/repo"), None);
    assert_eq!(web_url("git@github.com:owner/repo.git"), None);
    assert_eq!(web_url("github.com/owner/repo"), None);
  }

  #[test]
  fn fetches_and_maps_metadata() {
    let mut server = mockito::Server::new();
    let _repo = json(
      &mut server,
      "/repos/owner/repo",
      200,
      r#"{"name":"repo","description":"desc","language":"Go","html_url":"https://github.com/owner/repo"}"#,
    );
    let _license = json(
      &mut server,
      "/repos/owner/repo/license",
      200,
      r#"{"license":{"key":"mit","spdx_id":"MIT"}}"#,
    );
    let _tags = json(
      &mut server,
      "/repos/owner/repo/tags",
      200,
      r#"[{"name":"v1.0.0"},{"name":"v2.0.0"}]"#,
    );

    let params = client_for(&server.url()).fetch(&repo()).unwrap();

    assert_eq!(params.get(Parameter::Name), Some("repo"));
    assert_eq!(params.get(Parameter::Summary), Some("desc"));
    assert_eq!(params.get(Parameter::Type), Some("golang"));
    assert_eq!(params.get(Parameter::License), Some("MIT"));
    assert_eq!(params.get(Parameter::Tag), Some("v1.0.0"));
    assert_eq!(params.get(Parameter::Version), Some("1.0.0"));
    assert_eq!(params.get(Parameter::Url), Some("https://github.com/owner/repo"));
    assert!(!params.contains(Parameter::Description));
  }

  #[test]
  fn missing_license_and_tags_stay_unset() {
    let mut server = mockito::Server::new();
    let _repo = json(
      &mut server,
      "/repos/owner/repo",
      200,
      r#"{"name":"repo","description":null,"language":null}"#,
    );
    let _license = json(
      &mut server,
      "/repos/owner/repo/license",
      404,
      r#"{"message":"Not Found"}"#,
    );
    let _tags = json(&mut server, "/repos/owner/repo/tags", 200, "[]");

    let params = client_for(&server.url()).fetch(&repo()).unwrap();

    assert_eq!(params.get(Parameter::Type), Some(FALLBACK_TYPE));
    assert_eq!(params.get(Parameter::Url), Some("https://github.com/owner/repo"));
    assert!(!params.contains(Parameter::License));
    assert!(!params.contains(Parameter::Summary));
    assert!(!params.contains(Parameter::Tag));
    assert!(!params.contains(Parameter::Version));
  }

  #[test]
  fn noassertion_license_is_unset() {
    let mut server = mockito::Server::new();
    let _repo = json(&mut server, "/repos/owner/repo", 200, r#"{"name":"repo"}"#);
    let _license = json(
      &mut server,
      "/repos/owner/repo/license",
      200,
      r#"{"license":{"key":"other","spdx_id":"NOASSERTION"}}"#,
    );
    let _tags = json(&mut server, "/repos/owner/repo/tags", 200, "[]");

    let params = client_for(&server.url()).fetch(&repo()).unwrap();
    assert!(!params.contains(Parameter::License));
  }

  #[test]
  fn unknown_repository_is_reported_as_not_found() {
    let mut server = mockito::Server::new();
    let _repo = json(
      &mut server,
      "/repos/owner/repo",
      404,
      r#"{"message":"Not Found"}"#,
    );

    let err = client_for(&server.url()).fetch(&repo()).unwrap_err();
    assert!(
      matches!(err, RepospecError::RepositoryNotFound { status: 404, .. }),
      "got {:?}",
      err
    );
  }

  #[test]
  fn unreachable_api_is_a_connectivity_error() {
    // Port 1 is reserved and refuses connections on loopback.
    let err = client_for("http://127.0.0.1:1").fetch(&repo()).unwrap_err();
    assert!(
      matches!(err, RepospecError::Connectivity { .. }),
      "got {:?}",
      err
    );
  }
}
