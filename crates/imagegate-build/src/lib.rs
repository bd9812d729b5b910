//! Image builder invocation for imagegate.
//!
//! # Argument vector
//!
//! ```text
//! executor
//!   --dockerfile=<clone-path>/<dockerfile>
//!   --context=dir://<clone-path>/<context-dir>
//!   --no-push                                   (pr)
//!   --destination=<registry><repo><suffix>:<tag> (commit)
//!   <extra_args...>
//! ```
//!
//! # Handoff
//!
//! [`BuilderInvocation::handoff`] replaces the current process with the
//! builder. Its exit status becomes the exit status of the invocation;
//! nothing runs afterwards. Where exec is unavailable the builder is run
//! as a child and its exit code is propagated.

pub mod handoff;
pub mod invocation;

pub use handoff::HandoffError;
pub use invocation::{BuildMode, BuilderInvocation};
