#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run {program}; is git installed?")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("git command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("git output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("clone path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),
}
