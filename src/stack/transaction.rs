//! Undo/redo stack with nested, abortable macros.
//!
//! Committed history is a list of macros with an index separating the
//! undoable past from the redoable future. Macros under construction live
//! on a separate stack of open levels and only reach history when the
//! outermost level is closed, so aborting never touches committed entries.

use log::{debug, warn};

use super::command::Command;
use crate::core::{Error, HistoryError, Result};

/// One recorded step: a command pair or a closed nested macro.
#[derive(Clone, Debug)]
enum Entry<C> {
    Command { redo: C, undo: C },
    Macro(Macro<C>),
}

/// A group of entries undone and redone as a unit.
#[derive(Clone, Debug)]
pub struct Macro<C> {
    entries: Vec<Entry<C>>,
}

impl<C> Default for Macro<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> Macro<C> {
    /// True if no command was recorded, not even in nested macros.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|entry| match entry {
            Entry::Command { .. } => false,
            Entry::Macro(inner) => inner.is_empty(),
        })
    }

    /// Number of command pairs, counting nested macros.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Command { .. } => 1,
                Entry::Macro(inner) => inner.command_count(),
            })
            .sum()
    }

    fn redo<T>(&self, target: &mut T) -> Result<()>
    where
        C: Command<T>,
    {
        for entry in &self.entries {
            match entry {
                Entry::Command { redo, .. } => redo.execute(target)?,
                Entry::Macro(inner) => inner.redo(target)?,
            }
        }
        Ok(())
    }

    fn undo<T>(&self, target: &mut T) -> Result<()>
    where
        C: Command<T>,
    {
        for entry in self.entries.iter().rev() {
            match entry {
                Entry::Command { undo, .. } => undo.execute(target)?,
                Entry::Macro(inner) => inner.undo(target)?,
            }
        }
        Ok(())
    }
}

/// Reversible command log.
///
/// ## Example
///
/// ```
/// use mage_knight::stack::TransactionStack;
/// use mage_knight::core::Result;
///
/// fn add(n: i32) -> impl Fn(&mut i32) -> Result<()> {
///     move |x: &mut i32| { *x += n; Ok(()) }
/// }
///
/// let mut value = 0;
/// let mut stack = TransactionStack::new();
///
/// stack.begin_macro();
/// stack.push(&mut value, add(2), add(-2)).unwrap();
/// stack.push(&mut value, add(3), add(-3)).unwrap();
/// stack.end_macro(false).unwrap();
/// assert_eq!(value, 5);
///
/// stack.undo(&mut value).unwrap();
/// assert_eq!(value, 0);
/// stack.redo(&mut value).unwrap();
/// assert_eq!(value, 5);
/// ```
#[derive(Clone, Debug)]
pub struct TransactionStack<C> {
    /// Committed macros, oldest first.
    committed: Vec<Macro<C>>,
    /// Number of committed macros currently applied.
    index: usize,
    /// Macros being built, outermost first.
    open: Vec<Macro<C>>,
}

impl<C> Default for TransactionStack<C> {
    fn default() -> Self {
        Self {
            committed: Vec::new(),
            index: 0,
            open: Vec::new(),
        }
    }
}

impl<C> TransactionStack<C> {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the boundary between undoable and redoable entries.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of committed macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// True if nothing was ever committed (or history was cleared).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Whether a macro is under construction.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        !self.open.is_empty()
    }

    /// Nesting depth of open macros.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Whether `undo` would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.is_composing() && self.index > 0
    }

    /// Whether `redo` would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.is_composing() && self.index < self.committed.len()
    }

    /// Open a new nesting level.
    pub fn begin_macro(&mut self) {
        self.open.push(Macro::default());
        debug!("history: begin macro (depth {})", self.open.len());
    }

    /// Execute `redo` and record the pair.
    ///
    /// Inside a macro the pair joins the innermost open level; otherwise it
    /// is committed on its own. If `redo` fails nothing is recorded and the
    /// error is returned.
    pub fn push<T>(&mut self, target: &mut T, redo: C, undo: C) -> Result<()>
    where
        C: Command<T>,
    {
        redo.execute(target)?;
        let entry = Entry::Command { redo, undo };
        match self.open.last_mut() {
            Some(current) => current.entries.push(entry),
            None => self.commit(Macro {
                entries: vec![entry],
            }),
        }
        Ok(())
    }

    /// Close the innermost open level.
    ///
    /// A nested level becomes one entry of its parent. Closing the
    /// outermost level commits it and discards any redoable entries; with
    /// `abort_if_empty` an empty macro is dropped instead.
    pub fn end_macro(&mut self, abort_if_empty: bool) -> Result<(), HistoryError> {
        let finished = self.open.pop().ok_or(HistoryError::NoOpenMacro)?;
        if let Some(parent) = self.open.last_mut() {
            parent.entries.push(Entry::Macro(finished));
        } else if abort_if_empty && finished.is_empty() {
            debug!("history: dropped empty macro");
        } else {
            self.commit(finished);
        }
        Ok(())
    }

    /// Undo everything recorded in all open levels and discard them.
    ///
    /// Committed history is left alone.
    pub fn abort_macro<T>(&mut self, target: &mut T) -> Result<()>
    where
        C: Command<T>,
    {
        if self.open.is_empty() {
            return Err(HistoryError::NoOpenMacro.into());
        }
        let levels = std::mem::take(&mut self.open);
        debug!("history: abort {} open level(s)", levels.len());
        for level in levels.iter().rev() {
            if let Err(err) = level.undo(target) {
                return Err(self.replay_failed(err));
            }
        }
        Ok(())
    }

    /// Undo the last committed macro. Returns `false` if there is none.
    pub fn undo<T>(&mut self, target: &mut T) -> Result<bool>
    where
        C: Command<T>,
    {
        if self.index == 0 {
            return Ok(false);
        }
        self.set_index(target, self.index - 1)?;
        Ok(true)
    }

    /// Redo the next committed macro. Returns `false` if there is none.
    pub fn redo<T>(&mut self, target: &mut T) -> Result<bool>
    where
        C: Command<T>,
    {
        if self.index >= self.committed.len() {
            return Ok(false);
        }
        self.set_index(target, self.index + 1)?;
        Ok(true)
    }

    /// Undo or redo until exactly `index` macros are applied.
    ///
    /// If any command fails during replay, the whole history is cleared
    /// and [`HistoryError::ReplayFailed`] is returned.
    pub fn set_index<T>(&mut self, target: &mut T, index: usize) -> Result<()>
    where
        C: Command<T>,
    {
        if self.is_composing() {
            return Err(HistoryError::Composing.into());
        }
        if index > self.committed.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.committed.len(),
            }
            .into());
        }

        let replay = if index < self.index {
            self.committed[index..self.index]
                .iter()
                .rev()
                .try_for_each(|m| m.undo(target))
        } else {
            self.committed[self.index..index]
                .iter()
                .try_for_each(|m| m.redo(target))
        };

        match replay {
            Ok(()) => {
                debug!("history: index {} -> {}", self.index, index);
                self.index = index;
                Ok(())
            }
            Err(err) => Err(self.replay_failed(err)),
        }
    }

    /// Forget all history.
    ///
    /// Used when hidden information is revealed. Commands already recorded
    /// in open macros stay applied but can no longer be aborted; the open
    /// levels themselves remain so the caller can close them normally.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.index = 0;
        for level in &mut self.open {
            level.entries.clear();
        }
        debug!("history: cleared");
    }

    fn commit(&mut self, finished: Macro<C>) {
        self.committed.truncate(self.index);
        self.committed.push(finished);
        self.index += 1;
        debug!("history: committed entry {}", self.index);
    }

    fn replay_failed(&mut self, err: Error) -> Error {
        warn!("history: replay failed, clearing history: {err}");
        self.committed.clear();
        self.open.clear();
        self.index = 0;
        HistoryError::ReplayFailed(Box::new(err)).into()
    }
}
