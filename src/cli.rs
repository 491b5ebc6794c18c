// src/cli.rs
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{Interactivity, DEFAULT_API_URL, DEFAULT_GENERATOR, DEFAULT_TEMPLATES_DIR};
use crate::fetch::web_url;
use crate::params::{Parameter, ParameterSet};

#[derive(Parser, Debug)]
#[command(
    name = "repospec", // Command name users type
    author,
    version,
    about = "Builds a packaging spec generator command from repository metadata.",
    long_about = None,
    disable_version_flag = true
)]
pub struct Cli {
  /// Interactivity: 0 = never prompt, 1 = prompt for missing values, 2 = always prompt
  #[arg(short, long, value_name = "LEVEL", value_parser = Interactivity::parse_level)]
  pub interactive: Option<Interactivity>,

  /// Repository URL; also implies --interactive=0 unless given explicitly
  #[arg(short = 'u', long, visible_short_alias = 'U', value_name = "URL")]
  pub url: Option<String>,

  /// Print the generator command instead of executing it
  #[arg(short, long)]
  pub print_only: bool,

  /// Prefer the "-bin" variant of the resolved type when a template exists
  #[arg(short, long)]
  pub executable: bool,

  /// Print version
  #[arg(short = 'v', long, action = ArgAction::Version)]
  pub version: Option<bool>,

  /// List available packaging types and exit
  #[arg(long)]
  pub list_types: bool,

  /// Increase log verbosity (e.g., --verbose, --verbose --verbose)
  #[arg(long, action = ArgAction::Count)]
  pub verbose: u8,

  #[command(flatten)]
  pub overrides: Overrides,

  #[arg(long, env = "REPOSPEC_TEMPLATES_DIR", default_value = DEFAULT_TEMPLATES_DIR)]
  pub templates_dir: PathBuf,

  /// YAML file with default parameter values
  #[arg(long, env = "REPOSPEC_DEFAULTS")]
  pub defaults_file: Option<PathBuf>,

  /// Spec generator executable
  #[arg(long, env = "REPOSPEC_GENERATOR", default_value = DEFAULT_GENERATOR)]
  pub generator: String,

  #[arg(long, env = "REPOSPEC_API_URL", default_value = DEFAULT_API_URL, hide = true)]
  pub api_url: String,

  #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
  pub github_token: Option<String>,

  /// Arguments passed to the generator untouched
  #[arg(last = true, value_name = "GENERATOR_ARGS")]
  pub passthrough: Vec<String>,
}

#[derive(clap::Args, Debug)]
#[command(next_help_heading = "Parameter overrides")]
pub struct Overrides {
  /// Package name
  #[arg(short = 'N', long)]
  pub name: Option<String>,

  /// One-line summary
  #[arg(short = 'S', long)]
  pub summary: Option<String>,

  /// License (SPDX identifier)
  #[arg(short = 'L', long)]
  pub license: Option<String>,

  /// Long description
  #[arg(short = 'D', long)]
  pub description: Option<String>,

  /// Packaging type (template name)
  #[arg(short = 'T', long = "type")]
  pub kind: Option<String>,

  /// Package version
  #[arg(short = 'V', long)]
  pub pkg_version: Option<String>,

  /// Changelog entry
  #[arg(short = 'C', long)]
  pub changelog: Option<String>,
}

impl Cli {
  /// `--url` switches to non-interactive mode unless a level was chosen.
  pub fn interactivity(&self) -> Interactivity {
    match (self.interactive, &self.url) {
      (Some(level), _) => level,
      (None, Some(_)) => Interactivity::Never,
      (None, None) => Interactivity::Missing,
    }
  }

  /// Command-line layer of the merge. `url` is the resolved source URL.
  pub fn override_parameters(&self, url: &str) -> ParameterSet {
    let o = &self.overrides;
    let mut params = ParameterSet::new();
    params.set_opt(Parameter::Name, o.name.clone());
    params.set_opt(Parameter::Summary, o.summary.clone());
    params.set_opt(Parameter::License, o.license.clone());
    params.set_opt(Parameter::Description, o.description.clone());
    params.set_opt(Parameter::Type, o.kind.clone());
    // Slugs and ssh remotes are not web pages; the fetched `html_url` stands in for them.
    params.set_opt(Parameter::Url, web_url(url).map(str::to_string));
    params.set_opt(Parameter::Version, o.pkg_version.clone());
    params.set_opt(Parameter::Changelog, o.changelog.clone());
    params
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::error::ErrorKind;
  use clap::CommandFactory;

  fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("repospec").chain(args.iter().copied())).unwrap()
  }

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn url_forces_strict_mode() {
    assert_eq!(parse(&["-u", "owner/repo"]).interactivity(), Interactivity::Never);
    assert_eq!(parse(&[]).interactivity(), Interactivity::Missing);
    assert_eq!(
      parse(&["-u", "owner/repo", "-i", "2"]).interactivity(),
      Interactivity::Always
    );
  }

  #[test]
  fn invalid_level_is_rejected_with_value() {
    let err = Cli::try_parse_from(["repospec", "--interactive=5"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(err.to_string().contains("'5'"));
  }

  #[test]
  fn version_flag_is_lowercase_v() {
    let err = Cli::try_parse_from(["repospec", "-v"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
  }

  #[test]
  fn overrides_use_uppercase_short_flags() {
    let cli = parse(&["-L", "MIT", "--type", "golang", "-V", "1.2", "-U", "owner/repo"]);
    let params = cli.override_parameters("owner/repo");

    assert_eq!(params.get(Parameter::License), Some("MIT"));
    assert_eq!(params.get(Parameter::Type), Some("golang"));
    assert_eq!(params.get(Parameter::Version), Some("1.2"));
    assert!(!params.contains(Parameter::Url));
    assert!(!params.contains(Parameter::Name));
  }

  #[test]
  fn only_web_source_urls_override_the_url_parameter() {
    let cli = parse(&["-u", "https://github.com/owner/repo"]);
    let params = cli.override_parameters("https://github.com/owner/repo");
    assert_eq!(params.get(Parameter::Url), Some("https://github.com/owner/repo"));

    let params = cli.override_parameters("git@github.com:owner/repo.git");
    assert!(!params.contains(Parameter::Url));
  }

  #[test]
  fn trailing_arguments_pass_through() {
    let cli = parse(&["-p", "--", "--dry-run", "-n"]);
    assert!(cli.print_only);
    assert_eq!(cli.passthrough, vec!["--dry-run", "-n"]);
  }
}
