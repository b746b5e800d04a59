// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declaration lists: the per-frame tree of key listener statements.
//!
//! Each frame the UI layer records what it wants into an [`Ops`] list:
//! which listeners exist, which of them ask for focus, whether the text input
//! surface should be hidden, and nested scopes grouping those statements.
//! The [`KeyQueue`](crate::KeyQueue) later walks the list with an [`OpDecoder`].
//!
//! ## Wire layout
//!
//! Records are stored back to back in a byte buffer. Every record starts with
//! a one-byte [`OpType`] tag followed by a fixed-size payload, and consumes a
//! fixed number of entries from a parallel list of key references.
//!
//! | Type          | Bytes               | Refs  |
//! |---------------|---------------------|-------|
//! | `Push`        | `[tag]`             | 0     |
//! | `Pop`         | `[tag]`             | 0     |
//! | `KeyListener` | `[tag, focus]`      | 1     |
//! | `HideInput`   | `[tag]`             | 0     |
//!
//! ## Minimal example
//!
//! ```
//! use understory_key_focus::ops::{Declaration, HandlerOp, HideInputOp, OpDecoder, Ops, Reader};
//!
//! let mut ops = Ops::new();
//! HandlerOp { key: 1_u32, focus: false }.add(&mut ops);
//! ops.scope(|ops| {
//!     HideInputOp.add(ops);
//!     HandlerOp { key: 2, focus: true }.add(ops);
//! });
//!
//! let mut reader = Reader::new(&ops);
//! let mut decoded = Vec::new();
//! while let Some(op) = reader.decode() {
//!     decoded.push(Declaration::decode(op).unwrap());
//! }
//! assert_eq!(decoded, vec![
//!     Declaration::KeyListener { key: 1, focus: false },
//!     Declaration::Push,
//!     Declaration::HideInput,
//!     Declaration::KeyListener { key: 2, focus: true },
//!     Declaration::Pop,
//! ]);
//! ```

use alloc::vec::Vec;

use crate::error::ContractViolation;

/// Type tag of an encoded record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpType {
    /// Opens a nested scope.
    Push = 0x01,
    /// Closes the innermost open scope.
    Pop = 0x02,
    /// Declares a key listener, optionally requesting focus.
    KeyListener = 0x03,
    /// Requests that the text input surface be closed.
    HideInput = 0x04,
}

impl OpType {
    /// Map a tag byte back to its type, if known.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(Self::Push),
            0x02 => Some(Self::Pop),
            0x03 => Some(Self::KeyListener),
            0x04 => Some(Self::HideInput),
            _ => None,
        }
    }

    /// The tag byte written at the start of each record of this type.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Encoded record size in bytes, tag included.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::KeyListener => 2,
            Self::Push | Self::Pop | Self::HideInput => 1,
        }
    }

    /// Number of key references consumed by a record of this type.
    #[must_use]
    pub fn num_refs(self) -> usize {
        match self {
            Self::KeyListener => 1,
            Self::Push | Self::Pop | Self::HideInput => 0,
        }
    }
}

/// One raw record as produced by an [`OpDecoder`].
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedOp<'a, K> {
    /// Record bytes; the first byte is the type tag.
    pub data: &'a [u8],
    /// Key references attached to the record.
    pub refs: &'a [K],
}

impl<K> Clone for EncodedOp<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for EncodedOp<'_, K> {}

/// Sequential source of encoded records.
///
/// Implement this to feed the [`KeyQueue`](crate::KeyQueue) from a foreign
/// op encoding. The decoder is expected to be positioned at the start of a
/// frame's tree when handed to the queue.
pub trait OpDecoder<K> {
    /// Return the next record, or `None` at the end of the stream.
    fn decode(&mut self) -> Option<EncodedOp<'_, K>>;
}

/// A decoded declaration record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Declaration<K> {
    /// A listener for `key` is present; `focus` requests input focus.
    KeyListener {
        /// Identity of the listener.
        key: K,
        /// Whether the listener asks to become focused this frame.
        focus: bool,
    },
    /// The text input surface should close.
    HideInput,
    /// Start of a nested scope.
    Push,
    /// End of the innermost scope.
    Pop,
}

impl<K: Copy> Declaration<K> {
    /// Decode a raw record, checking it against the wire layout.
    pub fn decode(op: EncodedOp<'_, K>) -> Result<Self, ContractViolation> {
        let &tag = op.data.first().ok_or(ContractViolation::EmptyOp)?;
        let ty = OpType::from_tag(tag).ok_or(ContractViolation::UnknownOp { tag })?;
        if op.data.len() < ty.size() {
            return Err(ContractViolation::Truncated {
                op: ty,
                len: op.data.len(),
            });
        }
        Ok(match ty {
            OpType::KeyListener => {
                let &key = op.refs.first().ok_or(ContractViolation::MissingKey)?;
                Self::KeyListener {
                    key,
                    focus: op.data[1] != 0,
                }
            }
            OpType::HideInput => Self::HideInput,
            OpType::Push => Self::Push,
            OpType::Pop => Self::Pop,
        })
    }
}

/// A recorded list of declarations for one frame.
#[derive(Clone, Debug)]
pub struct Ops<K> {
    data: Vec<u8>,
    refs: Vec<K>,
}

impl<K> Default for Ops<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Ops<K> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            refs: Vec::new(),
        }
    }

    /// Clear all records, keeping allocations for the next frame.
    pub fn reset(&mut self) {
        self.data.clear();
        self.refs.clear();
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw encoded bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Attached key references, in record order.
    #[must_use]
    pub fn refs(&self) -> &[K] {
        &self.refs
    }

    /// Open a nested scope. Must be balanced by [`pop`](Self::pop).
    pub fn push(&mut self) {
        self.data.push(OpType::Push.tag());
    }

    /// Close the innermost scope opened with [`push`](Self::push).
    pub fn pop(&mut self) {
        self.data.push(OpType::Pop.tag());
    }

    /// Record `f`'s declarations inside a balanced scope.
    pub fn scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let out = f(self);
        self.pop();
        out
    }

    /// Append an already decoded declaration.
    pub fn add_declaration(&mut self, declaration: Declaration<K>) {
        match declaration {
            Declaration::KeyListener { key, focus } => {
                self.data
                    .extend_from_slice(&[OpType::KeyListener.tag(), u8::from(focus)]);
                self.refs.push(key);
            }
            Declaration::HideInput => self.data.push(OpType::HideInput.tag()),
            Declaration::Push => self.push(),
            Declaration::Pop => self.pop(),
        }
    }
}

impl<K: Copy> Ops<K> {
    /// Append raw bytes and references without validation.
    ///
    /// Intended for producers with their own encoder; a record that breaks
    /// the layout is reported when the list is resolved.
    pub fn add_raw(&mut self, data: &[u8], refs: &[K]) {
        self.data.extend_from_slice(data);
        self.refs.extend_from_slice(refs);
    }
}

impl<K> Extend<Declaration<K>> for Ops<K> {
    fn extend<I: IntoIterator<Item = Declaration<K>>>(&mut self, iter: I) {
        for declaration in iter {
            self.add_declaration(declaration);
        }
    }
}

impl<K> FromIterator<Declaration<K>> for Ops<K> {
    fn from_iter<I: IntoIterator<Item = Declaration<K>>>(iter: I) -> Self {
        let mut ops = Self::new();
        ops.extend(iter);
        ops
    }
}

/// Declare a key listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HandlerOp<K> {
    /// Identity the listener's events are delivered to.
    pub key: K,
    /// Request focus for this listener.
    pub focus: bool,
}

impl<K> HandlerOp<K> {
    /// Record this op.
    pub fn add(self, ops: &mut Ops<K>) {
        ops.add_declaration(Declaration::KeyListener {
            key: self.key,
            focus: self.focus,
        });
    }
}

/// Request that the text input surface be closed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HideInputOp;

impl HideInputOp {
    /// Record this op.
    pub fn add<K>(self, ops: &mut Ops<K>) {
        ops.add_declaration(Declaration::HideInput);
    }
}

/// Walks the records of an [`Ops`] list.
///
/// The reader itself never fails. When it meets an unknown tag or a record
/// that is too short, it yields everything that is left as one final record
/// and lets [`Declaration::decode`] report the problem.
#[derive(Debug)]
pub struct Reader<'a, K> {
    ops: &'a Ops<K>,
    pc: usize,
    ref_pc: usize,
}

impl<K> Clone for Reader<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Reader<'_, K> {}

impl<'a, K> Reader<'a, K> {
    /// Start reading at the beginning of `ops`.
    #[must_use]
    pub fn new(ops: &'a Ops<K>) -> Self {
        Self {
            ops,
            pc: 0,
            ref_pc: 0,
        }
    }

    /// Rewind to the beginning of another (or the same) list.
    pub fn reset(&mut self, ops: &'a Ops<K>) {
        *self = Self::new(ops);
    }
}

impl<K> OpDecoder<K> for Reader<'_, K> {
    fn decode(&mut self) -> Option<EncodedOp<'_, K>> {
        let data = &self.ops.data[self.pc..];
        let refs = &self.ops.refs[self.ref_pc..];
        let &tag = data.first()?;
        let (size, num_refs) = match OpType::from_tag(tag) {
            Some(ty) if data.len() >= ty.size() && refs.len() >= ty.num_refs() => {
                (ty.size(), ty.num_refs())
            }
            _ => (data.len(), refs.len()),
        };
        self.pc += size;
        self.ref_pc += num_refs;
        Some(EncodedOp {
            data: &data[..size],
            refs: &refs[..num_refs],
        })
    }
}
