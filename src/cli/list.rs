use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::cli::RemoteArgs;
use crate::error::recover;

pub async fn run(remote: &RemoteArgs) -> Result<ExitCode> {
    let working_dir = super::working_dir(None)?;
    let mut manager = remote.open_manager(working_dir)?;

    let mut stdout = std::io::stdout().lock();
    recover(manager.list_modules(&mut stdout).await).context("failed to list modules")?;
    Ok(ExitCode::SUCCESS)
}
