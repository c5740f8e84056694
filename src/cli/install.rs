use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::cli::RemoteArgs;
use crate::error::recover;

pub async fn run(remote: &RemoteArgs, module: String, dir: Option<PathBuf>) -> Result<ExitCode> {
    let working_dir = super::working_dir(dir)?;
    let mut manager = remote.open_manager(working_dir)?;

    let outcome = recover(manager.try_install(&module).await)
        .with_context(|| format!("failed to install module '{module}'"))?;
    let Some(report) = outcome else {
        return Ok(ExitCode::FAILURE);
    };

    println!(
        "Installed '{}' from {} at {:.8} into {}",
        report.module,
        manager.reference(),
        report.commit_sha,
        report.module_dir.display()
    );
    for file in &report.files {
        let shown = file.strip_prefix(manager.working_dir()).unwrap_or(file);
        println!("  {}", shown.display());
    }
    Ok(ExitCode::SUCCESS)
}
