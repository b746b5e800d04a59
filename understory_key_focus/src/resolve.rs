// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus resolution: pick one listener out of a frame's declarations.
//!
//! ## Priorities
//!
//! Every key listener declaration is ranked:
//!
//! - [`Priority::NewFocus`] if it requests focus,
//! - else [`Priority::CurrentFocus`] if it is the listener focused last frame,
//! - else [`Priority::Default`].
//!
//! A higher priority always wins. Between equals, the earliest
//! [`Priority::Default`] declaration is kept while the latest
//! [`Priority::NewFocus`] declaration takes over, so the most recent explicit
//! request wins and passive listeners keep tree order. See [`Priority::replaces`].
//!
//! ## Scopes
//!
//! A [`Push`](crate::ops::Declaration::Push) starts a nested resolution that
//! ends at the matching [`Pop`](crate::ops::Declaration::Pop). Its winner
//! competes with the enclosing scope's winner under the same rule, and its hide
//! requests propagate outward.

use alloc::vec;
use core::hash::Hash;

use smallvec::SmallVec;

use crate::error::ContractViolation;
use crate::event::{EventSink, FocusEvent};
use crate::ops::{Declaration, OpDecoder};
use crate::registry::HandlerRegistry;

/// Rank of a focus candidate within one resolution pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// No candidate.
    #[default]
    None,
    /// A listener that neither holds nor requests focus.
    Default,
    /// The listener that held focus at the start of the frame.
    CurrentFocus,
    /// A listener explicitly requesting focus.
    NewFocus,
}

impl Priority {
    /// Returns `true` if a candidate at `self` takes over from one at `other`.
    ///
    /// ```
    /// use understory_key_focus::Priority;
    ///
    /// assert!(Priority::NewFocus.replaces(Priority::NewFocus));
    /// assert!(!Priority::Default.replaces(Priority::Default));
    /// assert!(Priority::CurrentFocus.replaces(Priority::Default));
    /// ```
    #[must_use]
    pub fn replaces(self, other: Self) -> bool {
        self > other || (self == other && self == Self::NewFocus)
    }
}

/// Outcome of resolving a scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution<K> {
    /// The winning listener, if any was declared.
    pub focus: Option<K>,
    /// Priority the winner was chosen at.
    pub priority: Priority,
    /// Whether any declaration asked to hide the text input surface.
    pub hide: bool,
}

impl<K> Default for Resolution<K> {
    fn default() -> Self {
        Self {
            focus: None,
            priority: Priority::None,
            hide: false,
        }
    }
}

impl<K> Resolution<K> {
    fn offer(&mut self, key: K, priority: Priority) {
        if priority.replaces(self.priority) {
            self.focus = Some(key);
            self.priority = priority;
        }
    }

    fn merge(&mut self, inner: Self) {
        self.hide |= inner.hide;
        if inner.priority.replaces(self.priority) {
            self.focus = inner.focus;
            self.priority = inner.priority;
        }
    }
}

/// Resolve the focus candidate for the declarations remaining in `decoder`.
///
/// `current` is the listener focused at the start of the frame. Every declared
/// listener is marked active in `handlers`; listeners seen for the first time
/// get their pending events reset to a single `focus: false` in `events`.
///
/// A [`Pop`](Declaration::Pop) with no open scope, or any record that does not
/// decode, aborts the pass. Listeners first seen by an aborted pass are removed
/// from `handlers` again, so they still count as new in the next pass.
pub fn resolve_focus<K, D, S>(
    decoder: &mut D,
    handlers: &mut HandlerRegistry<K>,
    current: Option<K>,
    events: &mut S,
) -> Result<Resolution<K>, ContractViolation>
where
    K: Copy + Eq + Hash,
    D: OpDecoder<K> + ?Sized,
    S: EventSink<K> + ?Sized,
{
    let mut resolver = Resolver {
        decoder,
        handlers,
        current,
        events,
        fresh: SmallVec::new(),
    };
    let res = resolver.scope(0);
    if res.is_err() {
        for key in &resolver.fresh {
            resolver.handlers.remove(key);
        }
    }
    res
}

struct Resolver<'a, K, D: ?Sized, S: ?Sized> {
    decoder: &'a mut D,
    handlers: &'a mut HandlerRegistry<K>,
    current: Option<K>,
    events: &'a mut S,
    /// Identities inserted into `handlers` during this pass.
    fresh: SmallVec<[K; 4]>,
}

impl<K, D, S> Resolver<'_, K, D, S>
where
    K: Copy + Eq + Hash,
    D: OpDecoder<K> + ?Sized,
    S: EventSink<K> + ?Sized,
{
    fn scope(&mut self, depth: usize) -> Result<Resolution<K>, ContractViolation> {
        let mut res = Resolution::default();
        while let Some(op) = self.decoder.decode() {
            match Declaration::decode(op)? {
                Declaration::KeyListener { key, focus } => {
                    let priority = if focus {
                        Priority::NewFocus
                    } else if self.current == Some(key) {
                        Priority::CurrentFocus
                    } else {
                        Priority::Default
                    };
                    res.offer(key, priority);
                    if self.handlers.ensure(key) {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(depth, "new key handler");
                        self.fresh.push(key);
                        // Fresh listeners start out unfocused.
                        let reset = vec![FocusEvent { focus: false }.into()];
                        self.events.set(key, reset);
                    }
                }
                Declaration::HideInput => res.hide = true,
                Declaration::Push => {
                    let inner = self.scope(depth + 1)?;
                    res.merge(inner);
                }
                Declaration::Pop => {
                    if depth == 0 {
                        return Err(ContractViolation::UnbalancedPop);
                    }
                    return Ok(res);
                }
            }
        }
        // End of stream closes any scope left open.
        Ok(res)
    }
}
