use std::process::ExitCode;

use anyhow::Result;

use crate::cli::RemoteArgs;

pub fn run(remote: &RemoteArgs, module: String) -> Result<ExitCode> {
    let manager = remote.open_manager(super::working_dir(None)?)?;
    let outcome = manager.update(&module);
    super::report_stub(outcome)
}
