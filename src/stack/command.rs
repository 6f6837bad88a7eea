//! Reversible commands.

use crate::core::Result;

/// A state mutation that can be recorded on a
/// [`TransactionStack`](super::TransactionStack).
///
/// Commands are plain data. The stack stores a `(redo, undo)` pair and
/// executes one or the other against the target. `execute` must either
/// succeed completely or leave the target untouched.
pub trait Command<T> {
    /// Apply this command to `target`.
    fn execute(&self, target: &mut T) -> Result<()>;
}

/// Commands that are closures, mostly useful in tests and benchmarks.
impl<T, F> Command<T> for F
where
    F: Fn(&mut T) -> Result<()>,
{
    fn execute(&self, target: &mut T) -> Result<()> {
        self(target)
    }
}
