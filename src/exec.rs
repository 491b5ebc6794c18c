// src/exec.rs
use std::convert::Infallible;

use log::{debug, info};

use crate::command::GeneratorCommand;
use crate::error::RepospecError;

/// What to do with the finished command. Only `Print` hands control back.
#[derive(Debug)]
pub enum Invocation {
  Print(String),
  Replace(GeneratorCommand),
}

impl Invocation {
  pub fn plan(command: GeneratorCommand, print_only: bool) -> Result<Self, RepospecError> {
    if print_only {
      Ok(Invocation::Print(render(&command)?))
    } else {
      Ok(Invocation::Replace(command))
    }
  }
}

/// Single shell-escaped line, suitable for pasting into a terminal.
pub fn render(command: &GeneratorCommand) -> Result<String, RepospecError> {
  Ok(shlex::try_join(command.argv())?)
}

/// Replaces the current process with the generator.
///
/// Returns only if the program could not be started.
#[cfg(unix)]
pub fn replace_process(command: &GeneratorCommand) -> Result<Infallible, RepospecError> {
  use std::os::unix::process::CommandExt;
  use std::process::Command;

  info!("Executing {}", command.program);
  debug!("Generator arguments: {:?}", command.args);
  let err = Command::new(&command.program).args(&command.args).exec();
  Err(RepospecError::Exec {
    program: command.program.clone(),
    source: err,
  })
}

/// No `exec` here: run the generator as a child and exit with its status.
#[cfg(not(unix))]
pub fn replace_process(command: &GeneratorCommand) -> Result<Infallible, RepospecError> {
  info!("Running {}", command.program);
  debug!("Generator arguments: {:?}", command.args);
  let output = duct::cmd(command.program.as_str(), &command.args)
    .unchecked()
    .run()
    .map_err(|e| RepospecError::Exec {
      program: command.program.clone(),
      source: e,
    })?;
  std::process::exit(output.status.code().unwrap_or(1))
}
