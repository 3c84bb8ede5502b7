//! Interactive prompts using dialoguer

use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Decide whether `path` may be written.
///
/// New paths are always writable. Existing files are overwritten when
/// `no_confirm` is set, otherwise the user is asked.
pub fn confirm_overwrite(path: &Path, no_confirm: bool) -> Result<bool> {
    if !path.exists() || no_confirm {
        return Ok(true);
    }
    let message = format!("{} already exists. Overwrite?", path.display());
    confirm_step(&message)
}
