// src/prompt.rs
use std::collections::BTreeSet;

use dialoguer::{theme::ColorfulTheme, Input};
use log::{debug, warn};

use crate::config::Interactivity;
use crate::error::RepospecError;
use crate::params::{Parameter, ParameterSet, NEEDED_PARAMETERS};

/// Source of answers for parameter prompts.
pub trait Prompter {
  /// Asks once. `default` is displayed to the user; interpreting a blank
  /// answer is left to the caller.
  fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String, RepospecError>;
}

/// Prompts on the terminal.
pub struct TerminalPrompter {
  theme: ColorfulTheme,
}

impl TerminalPrompter {
  pub fn new() -> Self {
    Self {
      theme: ColorfulTheme::default(),
    }
  }
}

impl Prompter for TerminalPrompter {
  fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String, RepospecError> {
    let mut input = Input::<String>::with_theme(&self.theme)
      .with_prompt(label)
      .allow_empty(true);
    if let Some(default_val) = default {
      input = input.default(default_val.to_string()).show_default(true);
    }
    Ok(input.interact_text()?)
  }
}

/// Asks for `param` until a usable answer arrives.
///
/// Blank answers accept `current`; without a current value they are rejected.
pub fn ask_value(
  prompter: &mut dyn Prompter,
  label: &str,
  param: Parameter,
  current: Option<&str>,
) -> Result<String, RepospecError> {
  loop {
    let answer = prompter.ask(label, current)?;
    let answer = answer.trim();
    if !answer.is_empty() {
      return Ok(answer.to_string());
    }
    if let Some(default_val) = current {
      return Ok(default_val.to_string());
    }
    warn!("A value for '{}' is required", param);
  }
}

fn label_for(param: Parameter, types: &BTreeSet<String>) -> String {
  if param == Parameter::Type && !types.is_empty() {
    let available: Vec<&str> = types.iter().map(String::as_str).collect();
    format!("{} (available: {})", param, available.join(", "))
  } else {
    param.to_string()
  }
}

/// Fills in the required parameters according to `level`.
///
/// Parameters are visited in declared order. Under [`Interactivity::Never`]
/// the first unset parameter aborts the run. Parameters in `settled` were
/// already answered this run and are never asked again.
pub fn resolve(
  merged: ParameterSet,
  types: &BTreeSet<String>,
  level: Interactivity,
  settled: &[Parameter],
  prompter: &mut dyn Prompter,
) -> Result<ParameterSet, RepospecError> {
  let mut params = merged;

  for param in NEEDED_PARAMETERS {
    let current = params.get(param).map(str::to_string);
    let must_ask = match level {
      _ if settled.contains(&param) => false,
      Interactivity::Always => true,
      Interactivity::Missing => current.is_none(),
      Interactivity::Never => false,
    };

    if must_ask {
      let value = ask_value(prompter, &label_for(param, types), param, current.as_deref())?;
      debug!("Resolved '{}' = '{}'", param, value);
      params.set(param, value);
    } else if current.is_none() {
      return Err(RepospecError::MissingParameter(param));
    }
  }

  Ok(params)
}

/// Source URL for the run: the command-line value, else asked for like any other parameter.
///
/// A command-line value is taken as is; at [`Interactivity::Always`] the
/// `url` parameter is still offered for review by [`resolve`].
pub fn resolve_source_url(
  cli_url: Option<&str>,
  level: Interactivity,
  prompter: &mut dyn Prompter,
) -> Result<String, RepospecError> {
  match (cli_url, level) {
    (Some(url), _) => Ok(url.to_string()),
    (None, Interactivity::Never) => Err(RepospecError::MissingParameter(Parameter::Url)),
    (None, _) => ask_value(prompter, &Parameter::Url.to_string(), Parameter::Url, None),
  }
}
