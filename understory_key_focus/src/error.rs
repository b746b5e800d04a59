// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised when a declaration stream breaks its wire contract.

use core::fmt;

use crate::ops::OpType;

/// A malformed declaration stream.
///
/// The producer of an [`Ops`](crate::ops::Ops) list and the [`KeyQueue`](crate::KeyQueue)
/// agree on a fixed record layout. Any record that does not follow it aborts the
/// current frame; the queue never guesses at what a broken record meant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContractViolation {
    /// A record with no bytes at all (not even a type tag).
    EmptyOp,
    /// A type tag that is not one of the known [`OpType`]s.
    UnknownOp {
        /// The offending tag byte.
        tag: u8,
    },
    /// A record shorter than its type requires.
    Truncated {
        /// The type named by the record's tag.
        op: OpType,
        /// Number of bytes actually present.
        len: usize,
    },
    /// A key listener record without its attached key reference.
    MissingKey,
    /// A scope end with no open scope to close.
    UnbalancedPop,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyOp => f.write_str("empty op record"),
            Self::UnknownOp { tag } => write!(f, "unknown op type tag {tag:#04x}"),
            Self::Truncated { op, len } => {
                write!(f, "{op:?} record truncated: {len} of {} bytes", op.size())
            }
            Self::MissingKey => f.write_str("key listener record has no key reference"),
            Self::UnbalancedPop => f.write_str("scope end without a matching scope begin"),
        }
    }
}

impl core::error::Error for ContractViolation {}
