// src/params.rs
use std::collections::BTreeMap;
use std::fmt;

/// Packaging attributes understood by the spec generator.
///
/// Declaration order is significant: it is the order parameters are
/// prompted for and rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
  Name,
  Summary,
  License,
  Description,
  Type,
  Url,
  Version,
  Changelog,
  /// Auxiliary: only feeds the `--tag` argument, never rendered as a parameter flag.
  Tag,
}

/// Parameters that must hold a value before the generator can be invoked.
pub const NEEDED_PARAMETERS: [Parameter; 8] = [
  Parameter::Name,
  Parameter::Summary,
  Parameter::License,
  Parameter::Description,
  Parameter::Type,
  Parameter::Url,
  Parameter::Version,
  Parameter::Changelog,
];

impl Parameter {
  pub fn key(self) -> &'static str {
    match self {
      Parameter::Name => "name",
      Parameter::Summary => "summary",
      Parameter::License => "license",
      Parameter::Description => "description",
      Parameter::Type => "type",
      Parameter::Url => "url",
      Parameter::Version => "version",
      Parameter::Changelog => "changelog",
      Parameter::Tag => "tag",
    }
  }

  pub fn is_required(self) -> bool {
    NEEDED_PARAMETERS.contains(&self)
  }

  /// Generator flag for this parameter: a dash and the first letter of its name.
  pub fn flag(self) -> String {
    let first = self.key().chars().next().unwrap_or_default();
    format!("-{}", first)
  }
}

impl fmt::Display for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Ordered set of parameter values. A parameter without an entry is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
  values: BTreeMap<Parameter, String>,
}

impl ParameterSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, param: Parameter) -> Option<&str> {
    self.values.get(&param).map(String::as_str)
  }

  pub fn contains(&self, param: Parameter) -> bool {
    self.values.contains_key(&param)
  }

  pub fn set(&mut self, param: Parameter, value: impl Into<String>) {
    self.values.insert(param, value.into());
  }

  /// Sets `param` only when `value` is present; `None` leaves any existing value alone.
  pub fn set_opt(&mut self, param: Parameter, value: Option<impl Into<String>>) {
    if let Some(value) = value {
      self.set(param, value);
    }
  }

  pub fn remove(&mut self, param: Parameter) -> Option<String> {
    self.values.remove(&param)
  }

  pub fn iter(&self) -> impl Iterator<Item = (Parameter, &str)> {
    self.values.iter().map(|(p, v)| (*p, v.as_str()))
  }

  /// Values present in `other` replace ours; values absent in `other` fall through.
  pub fn overlay(&mut self, other: &ParameterSet) {
    for (param, value) in other.iter() {
      self.set(param, value);
    }
  }

  /// Three-way merge with precedence `overrides` > `fetched` > `defaults`.
  pub fn merge(defaults: &ParameterSet, fetched: &ParameterSet, overrides: &ParameterSet) -> Self {
    let mut merged = defaults.clone();
    merged.overlay(fetched);
    merged.overlay(overrides);
    merged
  }

  /// Keeps only the parameters the generator recognizes.
  pub fn retain_required(&mut self) {
    self.values.retain(|param, _| param.is_required());
  }

  /// Renders required parameters as `-<letter> <value>` pairs, in declared order.
  /// Unset parameters are skipped.
  pub fn to_args(&self) -> Vec<String> {
    NEEDED_PARAMETERS
      .iter()
      .filter_map(|p| self.get(*p).map(|v| [p.flag(), v.to_string()]))
      .flatten()
      .collect()
  }
}

impl FromIterator<(Parameter, String)> for ParameterSet {
  fn from_iter<I: IntoIterator<Item = (Parameter, String)>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().collect(),
    }
  }
}
