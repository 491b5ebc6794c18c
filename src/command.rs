// src/command.rs
use std::collections::BTreeSet;

use log::{debug, info};

use crate::config::GENERATOR_BASE_FLAGS;
use crate::error::RepospecError;
use crate::params::{Parameter, ParameterSet, NEEDED_PARAMETERS};

/// Generator program plus its full argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCommand {
  pub program: String,
  pub args: Vec<String>,
}

impl GeneratorCommand {
  /// Program followed by its arguments.
  pub fn argv(&self) -> impl Iterator<Item = &str> {
    std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
  }
}

/// Assembles the generator invocation from resolved parameters.
///
/// With `executable_variant`, a `<type>-bin` template replaces the resolved
/// type when one is available. `passthrough` is appended verbatim.
pub fn build(
  params: &ParameterSet,
  executable_variant: bool,
  types: &BTreeSet<String>,
  program: &str,
  passthrough: &[String],
) -> Result<GeneratorCommand, RepospecError> {
  if let Some(missing) = NEEDED_PARAMETERS.iter().find(|p| !params.contains(**p)) {
    return Err(RepospecError::MissingParameter(*missing));
  }

  let mut final_params = params.clone();
  let tag = match final_params.remove(Parameter::Tag) {
    Some(tag) => tag,
    None => format!("v{}", params.get(Parameter::Version).unwrap_or_default()),
  };

  if executable_variant {
    if let Some(kind) = params.get(Parameter::Type) {
      let bin_kind = format!("{}-bin", kind);
      if types.contains(&bin_kind) {
        info!("Using executable template '{}'", bin_kind);
        final_params.set(Parameter::Type, bin_kind);
      } else {
        debug!("No '{}' template available, keeping '{}'", bin_kind, kind);
      }
    }
  }
  final_params.retain_required();

  let mut args: Vec<String> = GENERATOR_BASE_FLAGS.iter().map(|f| f.to_string()).collect();
  args.push("--tag".to_string());
  args.push(tag);
  args.extend(final_params.to_args());
  args.extend(passthrough.iter().cloned());

  Ok(GeneratorCommand {
    program: program.to_string(),
    args,
  })
}
