use crate::invocation::BuilderInvocation;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::Command;

impl BuilderInvocation {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.arg0);
        }
        cmd.args(&self.args);
        cmd
    }

    /// Replace the current process with the builder.
    ///
    /// Never returns on success. The environment and working directory are
    /// inherited.
    #[cfg(unix)]
    pub fn handoff(&self) -> Result<Infallible, HandoffError> {
        use std::os::unix::process::CommandExt;

        tracing::info!(program = %self.program.display(), argv = ?self.argv(), "handing off to image builder");
        let source = self.command().exec();
        Err(HandoffError::Exec {
            program: self.program.clone(),
            source,
        })
    }

    /// Run the builder to completion and exit with its status.
    #[cfg(not(unix))]
    pub fn handoff(&self) -> Result<Infallible, HandoffError> {
        tracing::info!(program = %self.program.display(), argv = ?self.argv(), "running image builder");
        let status = self
            .command()
            .status()
            .map_err(|e| HandoffError::Exec {
                program: self.program.clone(),
                source: e,
            })?;
        let code = match status.code() {
            Some(code) => code,
            // terminated by a signal
            None => 1,
        };
        std::process::exit(code)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("failed to execute image builder {program}")]
    Exec {
        program: PathBuf,
        source: std::io::Error,
    },
}
