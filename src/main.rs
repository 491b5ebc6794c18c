// src/main.rs
mod cli;
mod command;
mod config;
mod error;
mod exec;
mod fetch;
mod list;
mod params;
mod prompt;

use clap::Parser;
use cli::Cli;
use command::GeneratorCommand;
use config::Settings;
use error::RepospecError;
use exec::Invocation;
use fetch::{GithubClient, RepoId};
use log::LevelFilter;
use params::{Parameter, ParameterSet};
use prompt::{Prompter, TerminalPrompter};
use std::process::ExitCode;

fn main() -> ExitCode {
  let cli = Cli::parse();

  // Setup logging based on verbosity
  let log_level = match cli.verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new().filter_level(log_level).init();

  log::debug!("CLI args: {:?}", cli);

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::error!("{}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<(), RepospecError> {
  let settings = settings_from(cli);
  log::info!(
    "Using templates directory: {}",
    settings.templates_dir.display()
  );

  if cli.list_types {
    list::run_list(&settings.templates_dir);
    return Ok(());
  }

  let mut prompter = TerminalPrompter::new();
  let command = prepare_command(cli, &settings, &mut prompter)?;

  match Invocation::plan(command, cli.print_only)? {
    Invocation::Print(line) => {
      println!("{}", line);
      Ok(())
    }
    Invocation::Replace(command) => match exec::replace_process(&command)? {},
  }
}

fn settings_from(cli: &Cli) -> Settings {
  Settings {
    api_url: cli.api_url.clone(),
    github_token: cli.github_token.clone().filter(|t| !t.is_empty()),
    templates_dir: cli.templates_dir.clone(),
    generator: cli.generator.clone(),
  }
}

/// Fetch, merge, prompt and build: everything short of running the generator.
fn prepare_command(
  cli: &Cli,
  settings: &Settings,
  prompter: &mut dyn Prompter,
) -> Result<GeneratorCommand, RepospecError> {
  let level = cli.interactivity();
  let types = list::list_types(&settings.templates_dir);
  log::debug!("Available types: {:?}", types);

  let defaults = config::load_defaults(cli.defaults_file.as_deref())?;

  let source_url = prompt::resolve_source_url(cli.url.as_deref(), level, prompter)?;
  let repo = RepoId::parse(&source_url)?;
  log::info!("Repository: {}", repo);

  let fetched = GithubClient::new(settings)?.fetch(&repo)?;
  log::debug!("Fetched parameters: {:?}", fetched);

  let overrides = cli.override_parameters(&source_url);
  let merged = ParameterSet::merge(&defaults, &fetched, &overrides);
  log::debug!("Merged parameters: {:?}", merged);

  // A source URL typed at the prompt has already been answered for this run.
  let settled: &[Parameter] = if cli.url.is_none() { &[Parameter::Url] } else { &[] };
  let resolved = prompt::resolve(merged, &types, level, settled, prompter)?;

  command::build(
    &resolved,
    cli.executable,
    &types,
    &settings.generator,
    &cli.passthrough,
  )
}
