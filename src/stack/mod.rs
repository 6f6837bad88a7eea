//! Undo/redo transaction log.
//!
//! Every mutation of a match goes through a [`TransactionStack`] as a pair
//! of commands: one that applies the change and one that reverts it. Pairs
//! are grouped into macros so that a whole player action is undone in one
//! step, and an action that fails halfway is rolled back with
//! [`TransactionStack::abort_macro`].
//!
//! ## Example
//!
//! ```
//! use mage_knight::core::{Error, Result};
//! use mage_knight::stack::TransactionStack;
//!
//! fn push(v: &mut Vec<u8>) -> Result<()> { v.push(1); Ok(()) }
//! fn pop(v: &mut Vec<u8>) -> Result<()> { v.pop(); Ok(()) }
//! fn refuse(_: &mut Vec<u8>) -> Result<()> { Err(Error::invalid("no")) }
//!
//! type Op = fn(&mut Vec<u8>) -> Result<()>;
//!
//! let mut items = Vec::new();
//! let mut stack: TransactionStack<Op> = TransactionStack::new();
//!
//! stack.begin_macro();
//! stack.push(&mut items, push, pop).unwrap();
//! assert!(stack.push(&mut items, refuse, pop).is_err());
//! stack.abort_macro(&mut items).unwrap();
//!
//! assert!(items.is_empty());
//! assert!(stack.is_empty());
//! ```

mod command;
mod transaction;

pub use command::Command;
pub use transaction::{Macro, TransactionStack};
