use crate::error::GitError;

/// Abstraction over git CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait GitExecutor: Send + Sync {
    /// Execute a git command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, GitError>;

    /// Execute a git command and capture stdout without decoding it.
    ///
    /// Needed where output carries repository paths, which git does not
    /// restrict to UTF-8.
    async fn exec_bytes(&self, args: &[String]) -> Result<Vec<u8>, GitError> {
        self.exec(args).await.map(String::into_bytes)
    }
}

/// Real git CLI executor.
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, GitError> {
        let stdout = self.exec_bytes(args).await?;
        String::from_utf8(stdout).map_err(|e| GitError::InvalidUtf8 { source: e })
    }

    async fn exec_bytes(&self, args: &[String]) -> Result<Vec<u8>, GitError> {
        use std::process::Stdio;

        tracing::debug!(program = %self.program, ?args, "running git");

        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| GitError::NotFound {
                program: self.program.clone(),
                source: e,
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(GitError::CommandFailed {
                args: args.to_vec(),
                stderr,
            })
        }
    }
}
