// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::RepospecError;
use crate::params::{Parameter, ParameterSet};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TEMPLATES_DIR: &str = "/usr/share/repospec/templates";
pub const DEFAULT_GENERATOR: &str = "specgen";
pub const TEMPLATE_SUFFIX: &str = ".spec";
/// Flags passed to the generator ahead of `--tag`.
pub const GENERATOR_BASE_FLAGS: [&str; 2] = ["--batch", "--force"];
pub const DEFAULTS_FILE_NAME: &str = "defaults.yaml";

pub const DEFAULT_DESCRIPTION: &str = "%summary";
pub const DEFAULT_CHANGELOG: &str = "Initial build for Sisyphus";

/// Everything that would otherwise be a process-wide constant, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct Settings {
  pub api_url: String,
  pub github_token: Option<String>,
  pub templates_dir: PathBuf,
  pub generator: String,
}

/// How eagerly the user is asked for parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactivity {
  /// Never prompt; a missing value aborts the run.
  Never,
  /// Prompt only for values nothing else supplied.
  Missing,
  /// Prompt for every parameter, offering the merged value as default.
  Always,
}

impl Interactivity {
  /// clap value parser for `--interactive`.
  pub fn parse_level(s: &str) -> Result<Self, String> {
    match s.trim() {
      "0" => Ok(Interactivity::Never),
      "1" => Ok(Interactivity::Missing),
      "2" => Ok(Interactivity::Always),
      other => Err(format!(
        "invalid interactive level '{}' (expected 0, 1 or 2)",
        other
      )),
    }
  }
}

/// User-level defaults, the lowest-precedence layer of the merge.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsFile {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub license: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default, rename = "type")]
  pub kind: Option<String>,
  #[serde(default)]
  pub url: Option<String>,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub changelog: Option<String>,
}

impl DefaultsFile {
  pub fn into_parameters(self) -> ParameterSet {
    let mut params = ParameterSet::new();
    params.set_opt(Parameter::Name, self.name);
    params.set_opt(Parameter::Summary, self.summary);
    params.set_opt(Parameter::License, self.license);
    params.set_opt(Parameter::Description, self.description);
    params.set_opt(Parameter::Type, self.kind);
    params.set_opt(Parameter::Url, self.url);
    params.set_opt(Parameter::Version, self.version);
    params.set_opt(Parameter::Changelog, self.changelog);
    params
  }
}

pub fn builtin_defaults() -> ParameterSet {
  let mut params = ParameterSet::new();
  params.set(Parameter::Description, DEFAULT_DESCRIPTION);
  params.set(Parameter::Changelog, DEFAULT_CHANGELOG);
  params
}

/// Built-in defaults overlaid with the user's defaults file, if any.
///
/// An explicitly requested file must exist. The implicit one in the
/// platform config directory is optional.
pub fn load_defaults(explicit: Option<&Path>) -> Result<ParameterSet, RepospecError> {
  let mut defaults = builtin_defaults();

  let path = match explicit {
    Some(path) => Some(path.to_path_buf()),
    None => implicit_defaults_path().filter(|p| p.is_file()),
  };

  if let Some(path) = path {
    debug!("Loading defaults from {}", path.display());
    defaults.overlay(&read_defaults_file(&path)?.into_parameters());
  }

  Ok(defaults)
}

fn implicit_defaults_path() -> Option<PathBuf> {
  ProjectDirs::from("", "", "repospec").map(|dirs| dirs.config_dir().join(DEFAULTS_FILE_NAME))
}

pub(crate) fn read_defaults_file(path: &Path) -> Result<DefaultsFile, RepospecError> {
  let content = fs::read_to_string(path).map_err(|e| RepospecError::DefaultsRead {
    path: path.to_path_buf(),
    source: e,
  })?;
  serde_yaml::from_str(&content).map_err(|e| RepospecError::DefaultsParse {
    path: path.to_path_buf(),
    source: e,
  })
}
