// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard events and the sink they are delivered through.
//!
//! The [`KeyQueue`](crate::KeyQueue) never owns listener state. It reports focus
//! transitions and routes key input by handing [`Event`]s to an [`EventSink`],
//! keyed by listener identity. [`HandlerEvents`] is a ready-made sink that
//! buffers events per listener until the UI layer collects them.
//!
//! ```
//! use understory_key_focus::event::{Event, EventSink, FocusEvent, HandlerEvents};
//!
//! let mut events = HandlerEvents::new();
//! events.add("field", Event::Focus(FocusEvent { focus: true }));
//! assert!(events.had_events());
//! assert_eq!(events.events(&"field"), vec![Event::Focus(FocusEvent { focus: true })]);
//! assert!(events.events(&"field").is_empty());
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;

use bitflags::bitflags;
use hashbrown::HashMap;

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// The control key.
        const CTRL = 1 << 0;
        /// The platform command key (Cmd on macOS, Ctrl elsewhere).
        const COMMAND = 1 << 1;
        /// The shift key.
        const SHIFT = 1 << 2;
        /// The alt or option key.
        const ALT = 1 << 3;
        /// The super or logo key.
        const SUPER = 1 << 4;
    }
}

/// Focus gained or lost by a listener.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FocusEvent {
    /// `true` when the listener now holds focus.
    pub focus: bool,
}

/// A key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key, as the character it names.
    pub name: char,
    /// Modifiers held while the key was pressed.
    pub modifiers: Modifiers,
}

/// Text produced by an input method or the text input surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EditEvent {
    /// The inserted text.
    pub text: String,
}

/// Anything delivered to a key listener.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Focus transition.
    Focus(FocusEvent),
    /// Key press.
    Key(KeyEvent),
    /// Text edit.
    Edit(EditEvent),
}

impl From<FocusEvent> for Event {
    fn from(e: FocusEvent) -> Self {
        Self::Focus(e)
    }
}

impl From<KeyEvent> for Event {
    fn from(e: KeyEvent) -> Self {
        Self::Key(e)
    }
}

impl From<EditEvent> for Event {
    fn from(e: EditEvent) -> Self {
        Self::Edit(e)
    }
}

/// Destination for events addressed to listener identities.
pub trait EventSink<K> {
    /// Deliver one event to `key`, after anything already pending.
    fn add(&mut self, key: K, event: Event);

    /// Replace everything pending for `key` with `events`.
    fn set(&mut self, key: K, events: Vec<Event>);
}

/// Buffers events per listener until they are collected.
#[derive(Clone, Debug)]
pub struct HandlerEvents<K> {
    handlers: HashMap<K, Vec<Event>>,
    had_events: bool,
}

impl<K> Default for HandlerEvents<K> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            had_events: false,
        }
    }
}

impl<K: Copy + Eq + Hash> HandlerEvents<K> {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending events for `key`, oldest first.
    pub fn events(&mut self, key: &K) -> Vec<Event> {
        self.handlers
            .get_mut(key)
            .map(core::mem::take)
            .unwrap_or_default()
    }

    /// Pending events for `key` without removing them.
    #[must_use]
    pub fn peek(&self, key: &K) -> &[Event] {
        self.handlers
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if any event was delivered since the last [`clear`](Self::clear).
    #[must_use]
    pub fn had_events(&self) -> bool {
        self.had_events
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.handlers.clear();
        self.had_events = false;
    }
}

impl<K: Copy + Eq + Hash> EventSink<K> for HandlerEvents<K> {
    fn add(&mut self, key: K, event: Event) {
        self.handlers.entry(key).or_default().push(event);
        self.had_events = true;
    }

    fn set(&mut self, key: K, events: Vec<Event>) {
        self.had_events |= !events.is_empty();
        self.handlers.insert(key, events);
    }
}
