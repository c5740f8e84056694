use std::process::ExitCode;

use anyhow::Result;

use crate::cli::RemoteArgs;

pub fn run(remote: &RemoteArgs) -> Result<ExitCode> {
    let manager = remote.open_manager(super::working_dir(None)?)?;
    super::report_stub(manager.check_modules())
}
