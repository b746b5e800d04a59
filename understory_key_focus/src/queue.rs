// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key queue: per-frame focus coordination.

use core::hash::Hash;

use crate::error::ContractViolation;
use crate::event::{Event, EventSink, FocusEvent};
use crate::ops::{OpDecoder, Ops, Reader};
use crate::registry::HandlerRegistry;
use crate::resolve::{Priority, resolve_focus};

/// What the platform should do with its text input surface (soft keyboard, IME).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextInputState {
    /// Leave the surface as it is.
    #[default]
    Keep,
    /// Close the surface.
    Close,
    /// Open the surface.
    Open,
}

/// Tracks keyboard focus across frames.
///
/// Call [`frame`](Self::frame) once per frame with that frame's declarations.
/// The queue resolves which listener holds focus, notifies listeners of focus
/// changes through an [`EventSink`], and derives a [`TextInputState`] for the
/// platform. Between frames, [`push`](Self::push) routes key input to the
/// focused listener.
///
/// ```
/// use understory_key_focus::event::{Event, FocusEvent, HandlerEvents};
/// use understory_key_focus::ops::{HandlerOp, Ops};
/// use understory_key_focus::{KeyQueue, TextInputState};
///
/// let mut queue = KeyQueue::new();
/// let mut events = HandlerEvents::new();
///
/// let mut ops = Ops::new();
/// HandlerOp { key: "name", focus: true }.add(&mut ops);
/// queue.frame(&ops, &mut events).unwrap();
///
/// assert_eq!(queue.focus(), Some("name"));
/// assert_eq!(queue.input_state(), TextInputState::Open);
/// assert_eq!(
///     events.events(&"name"),
///     vec![
///         Event::Focus(FocusEvent { focus: false }),
///         Event::Focus(FocusEvent { focus: true }),
///     ]
/// );
///
/// // The listener disappears: focus is dropped and the surface closes.
/// ops.reset();
/// queue.frame(&ops, &mut events).unwrap();
/// assert_eq!(queue.focus(), None);
/// assert_eq!(queue.input_state(), TextInputState::Close);
/// ```
#[derive(Clone, Debug)]
pub struct KeyQueue<K> {
    focus: Option<K>,
    handlers: HandlerRegistry<K>,
    state: TextInputState,
}

impl<K> Default for KeyQueue<K> {
    fn default() -> Self {
        Self {
            focus: None,
            handlers: HandlerRegistry::default(),
            state: TextInputState::Keep,
        }
    }
}

impl<K: Copy + Eq + Hash> KeyQueue<K> {
    /// Create a queue with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The listener currently holding focus.
    #[must_use]
    pub fn focus(&self) -> Option<K> {
        self.focus
    }

    /// The text input state computed by the last successful frame.
    #[must_use]
    pub fn input_state(&self) -> TextInputState {
        self.state
    }

    /// Listeners known to the queue.
    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry<K> {
        &self.handlers
    }

    /// Returns `true` if `key` was declared in the last frame.
    #[must_use]
    pub fn is_registered(&self, key: &K) -> bool {
        self.handlers.contains(key)
    }

    /// Process one frame of declarations recorded in `root`.
    pub fn frame<S>(&mut self, root: &Ops<K>, events: &mut S) -> Result<(), ContractViolation>
    where
        S: EventSink<K> + ?Sized,
    {
        self.frame_with(&mut Reader::new(root), events)
    }

    /// Process one frame of declarations read from `decoder`.
    ///
    /// `decoder` must be positioned at the start of the frame's tree. On a
    /// [`ContractViolation`] the frame is abandoned: focus and
    /// [`input_state`](Self::input_state) keep their previous values, nothing
    /// is pruned, and listeners first declared by the aborted frame are not
    /// registered. They are reset again when a later frame declares them.
    pub fn frame_with<D, S>(
        &mut self,
        decoder: &mut D,
        events: &mut S,
    ) -> Result<(), ContractViolation>
    where
        D: OpDecoder<K> + ?Sized,
        S: EventSink<K> + ?Sized,
    {
        self.handlers.reset_liveness();
        let res = match resolve_focus(decoder, &mut self.handlers, self.focus, events) {
            Ok(res) => res,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%err, "malformed key declarations; frame aborted");
                return Err(err);
            }
        };
        let mut hide = res.hide;

        let pruned = self.handlers.prune_dead();
        #[cfg(feature = "tracing")]
        if !pruned.is_empty() {
            tracing::debug!(count = pruned.len(), "pruned key handlers");
        }
        if let Some(focus) = self.focus
            && pruned.contains(&focus)
        {
            self.focus = None;
            hide = true;
        }

        if res.focus != self.focus {
            if let Some(old) = self.focus {
                events.add(old, FocusEvent { focus: false }.into());
            }
            self.focus = res.focus;
            match self.focus {
                Some(new) => events.add(new, FocusEvent { focus: true }.into()),
                None => hide = true,
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                focused = self.focus.is_some(),
                priority = ?res.priority,
                "key focus changed"
            );
        }

        let state = if res.priority == Priority::NewFocus {
            TextInputState::Open
        } else if hide {
            TextInputState::Close
        } else {
            TextInputState::Keep
        };
        #[cfg(feature = "tracing")]
        if state != self.state {
            tracing::trace!(?state, "text input state changed");
        }
        self.state = state;
        Ok(())
    }

    /// Deliver `event` to the focused listener.
    ///
    /// Returns `false`, dropping the event, when nothing is focused.
    pub fn push<S>(&self, event: impl Into<Event>, events: &mut S) -> bool
    where
        S: EventSink<K> + ?Sized,
    {
        match self.focus {
            Some(focus) => {
                events.add(focus, event.into());
                true
            }
            None => false,
        }
    }
}
