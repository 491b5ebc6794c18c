// src/list.rs
use crate::config::TEMPLATE_SUFFIX;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Collects the packaging types available in `templates_dir`.
///
/// A type is the file name of a template with [`TEMPLATE_SUFFIX`] stripped.
/// A missing or unreadable directory yields an empty set.
pub fn list_types(templates_dir: &Path) -> BTreeSet<String> {
  let mut types = BTreeSet::new();

  let entries = match fs::read_dir(templates_dir) {
    Ok(entries) => entries,
    Err(e) => {
      warn!(
        "Cannot read templates directory {}: {}",
        templates_dir.display(),
        e
      );
      return types;
    }
  };

  for entry_result in entries {
    let entry = match entry_result {
      Ok(e) => e,
      Err(e) => {
        warn!("Failed to read entry in templates directory: {}", e);
        continue;
      }
    };

    let file_name = entry.file_name();
    let file_name = file_name.to_string_lossy();
    match file_name.strip_suffix(TEMPLATE_SUFFIX) {
      Some(base) if !base.is_empty() => {
        types.insert(base.to_string());
      }
      _ => debug!("Skipping {}: not a template", entry.path().display()),
    }
  }

  types
}

/// `--list-types`: one type per line on stdout.
pub fn run_list(templates_dir: &Path) {
  for kind in list_types(templates_dir) {
    println!("{}", kind);
  }
}
