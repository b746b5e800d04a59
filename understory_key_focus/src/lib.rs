// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_key_focus --heading-base-level=0

//! Understory Key Focus: per-frame keyboard focus resolution for immediate-mode UI.
//!
//! ## Overview
//!
//! Each frame, the UI layer declares which key listeners exist and whether any
//! of them want focus. This crate walks those declarations, picks the single
//! listener that holds keyboard focus, tells listeners when they gain or lose
//! it, and decides whether the platform's text input surface (soft keyboard,
//! IME window) should open, close, or stay as it is.
//!
//! The pieces, from the bottom up:
//!
//! - [`ops`]: the declaration list ([`Ops`](ops::Ops)) and its readers. Listeners
//!   are declared with [`HandlerOp`](ops::HandlerOp), hide requests with
//!   [`HideInputOp`](ops::HideInputOp), and scopes with `push`/`pop`.
//! - [`registry`]: liveness of known listeners, reset and pruned every frame.
//! - [`resolve`]: the priority walk choosing a focus candidate.
//! - [`KeyQueue`]: the frame coordinator holding focus between frames.
//! - [`event`]: events and the [`EventSink`](event::EventSink) they go through.
//!
//! ## Choosing focus
//!
//! A listener that requests focus wins over everything else, and the last such
//! request in the tree wins. Otherwise the listener that was focused last frame
//! keeps focus if it is still declared. Otherwise the first declared listener
//! gets it. A listener that was never declared before is first sent a
//! `focus: false` event, so it never assumes a focus state it was not told about.
//!
//! ## Text input state
//!
//! [`KeyQueue::input_state`] is [`TextInputState::Open`] when a listener
//! requested focus this frame, [`TextInputState::Close`] when the tree asked to
//! hide input or focus was lost, and [`TextInputState::Keep`] otherwise.
//!
//! ## Example
//!
//! ```rust
//! use understory_key_focus::event::{Event, HandlerEvents, KeyEvent, Modifiers};
//! use understory_key_focus::ops::{HandlerOp, HideInputOp, Ops};
//! use understory_key_focus::{KeyQueue, TextInputState};
//!
//! let mut queue = KeyQueue::new();
//! let mut events = HandlerEvents::new();
//! let mut ops = Ops::new();
//!
//! // Frame 1: two fields; the second asks for focus.
//! HandlerOp { key: 1_u32, focus: false }.add(&mut ops);
//! ops.scope(|ops| HandlerOp { key: 2, focus: true }.add(ops));
//! queue.frame(&ops, &mut events).unwrap();
//! assert_eq!(queue.focus(), Some(2));
//! assert_eq!(queue.input_state(), TextInputState::Open);
//!
//! // Key input goes to the focused field.
//! queue.push(KeyEvent { name: 'a', modifiers: Modifiers::empty() }, &mut events);
//! assert_eq!(events.events(&2).last(), Some(&Event::Key(KeyEvent {
//!     name: 'a',
//!     modifiers: Modifiers::empty(),
//! })));
//!
//! // Frame 2: same fields, no request, but a hide. Focus stays, input closes.
//! ops.reset();
//! HandlerOp { key: 1, focus: false }.add(&mut ops);
//! HandlerOp { key: 2, focus: false }.add(&mut ops);
//! HideInputOp.add(&mut ops);
//! queue.frame(&ops, &mut events).unwrap();
//! assert_eq!(queue.focus(), Some(2));
//! assert_eq!(queue.input_state(), TextInputState::Close);
//! ```
//!
//! ## Errors
//!
//! A record that breaks the wire layout, or a scope end without a scope begin,
//! aborts the frame with a [`ContractViolation`]. Nothing is retried; the next
//! frame is resolved from scratch. Listeners first declared by an aborted frame
//! are not kept, so they still get their `focus: false` reset later.
//!
//! ## Features
//!
//! - `std` (default): build dependencies with `std`.
//! - `tracing`: emit `tracing` events for focus changes, pruning and aborted frames.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
pub mod event;
pub mod ops;
mod queue;
pub mod registry;
pub mod resolve;

pub use error::ContractViolation;
pub use queue::{KeyQueue, TextInputState};
pub use resolve::{Priority, Resolution};
