// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for focus resolution.
//!
//! Verifies:
//! 1. Among passive listeners, the first declared wins.
//! 2. A single focus request beats any number of passive or focused listeners.
//! 3. Among several focus requests, the last declared wins.
//! 4. Scopes do not change the outcome of a flat walk over the same declarations.
//! 5. The text input state follows from requests, hides, and focus loss.
//! 6. After a frame, exactly the declared listeners stay registered.

use std::collections::HashSet;

use proptest::prelude::*;
use understory_key_focus::event::HandlerEvents;
use understory_key_focus::ops::{Declaration, Ops};
use understory_key_focus::{KeyQueue, TextInputState};

type Key = u8;

#[derive(Clone, Debug)]
enum Node {
    Decl(Declaration<Key>),
    Scope(Vec<Node>),
}

fn arb_key() -> impl Strategy<Value = Key> {
    0..8_u8
}

fn arb_declaration() -> impl Strategy<Value = Declaration<Key>> {
    prop_oneof![
        6 => (arb_key(), prop::bool::weighted(0.2))
            .prop_map(|(key, focus)| Declaration::KeyListener { key, focus }),
        1 => Just(Declaration::HideInput),
    ]
}

fn arb_tree() -> impl Strategy<Value = Vec<Node>> {
    let leaf = arb_declaration().prop_map(Node::Decl);
    let node = leaf.prop_recursive(4, 48, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Node::Scope)
    });
    prop::collection::vec(node, 0..12)
}

fn write(nodes: &[Node], ops: &mut Ops<Key>) {
    for node in nodes {
        match node {
            Node::Decl(d) => ops.add_declaration(*d),
            Node::Scope(children) => ops.scope(|ops| write(children, ops)),
        }
    }
}

fn flatten(nodes: &[Node], out: &mut Vec<Declaration<Key>>) {
    for node in nodes {
        match node {
            Node::Decl(d) => out.push(*d),
            Node::Scope(children) => flatten(children, out),
        }
    }
}

fn listeners(keys: &[Key], requests: &[bool]) -> Ops<Key> {
    keys.iter()
        .zip(requests.iter().chain(std::iter::repeat(&false)))
        .map(|(&key, &focus)| Declaration::KeyListener { key, focus })
        .collect()
}

fn run(queue: &mut KeyQueue<Key>, ops: &Ops<Key>) {
    queue.frame(ops, &mut HandlerEvents::new()).unwrap();
}

proptest! {
    #[test]
    fn first_passive_listener_wins(keys in prop::collection::vec(arb_key(), 1..16)) {
        let mut q = KeyQueue::new();
        run(&mut q, &listeners(&keys, &[]));
        prop_assert_eq!(q.focus(), Some(keys[0]));
        prop_assert_eq!(q.input_state(), TextInputState::Keep);
    }

    #[test]
    fn single_request_overrides(
        keys in prop::collection::vec(0..7_u8, 1..16),
        at in any::<prop::sample::Index>(),
        focused in any::<prop::sample::Index>(),
    ) {
        let mut q = KeyQueue::new();
        // Establish some other listener as the current focus.
        let current = keys[focused.index(keys.len())];
        run(&mut q, &listeners(&[current], &[true]));

        let mut keys = keys;
        let at = at.index(keys.len() + 1);
        keys.insert(at, 7);
        let mut requests = vec![false; keys.len()];
        requests[at] = true;
        run(&mut q, &listeners(&keys, &requests));
        prop_assert_eq!(q.focus(), Some(7));
        prop_assert_eq!(q.input_state(), TextInputState::Open);
    }

    #[test]
    fn last_request_wins(
        decls in prop::collection::vec((arb_key(), any::<bool>()), 1..16),
    ) {
        let (keys, requests): (Vec<_>, Vec<_>) = decls.iter().copied().unzip();
        let mut q = KeyQueue::new();
        run(&mut q, &listeners(&keys, &requests));
        let expected = decls
            .iter()
            .rev()
            .find(|(_, focus)| *focus)
            .map_or(keys[0], |&(key, _)| key);
        prop_assert_eq!(q.focus(), Some(expected));
    }

    #[test]
    fn scopes_match_flat_walk(warmup in arb_tree(), tree in arb_tree()) {
        let mut nested = KeyQueue::new();
        let mut flat = KeyQueue::new();
        for nodes in [&warmup, &tree] {
            let mut scoped = Ops::new();
            write(nodes, &mut scoped);
            let mut decls = Vec::new();
            flatten(nodes, &mut decls);
            let flat_ops: Ops<Key> = decls.into_iter().collect();

            run(&mut nested, &scoped);
            run(&mut flat, &flat_ops);
            prop_assert_eq!(nested.focus(), flat.focus());
            prop_assert_eq!(nested.input_state(), flat.input_state());
        }
    }

    #[test]
    fn input_state_derivation(warmup in arb_tree(), tree in arb_tree()) {
        let mut q = KeyQueue::new();
        let mut ops = Ops::new();
        write(&warmup, &mut ops);
        run(&mut q, &ops);
        let before = q.focus();

        let mut decls = Vec::new();
        flatten(&tree, &mut decls);
        ops.reset();
        write(&tree, &mut ops);
        run(&mut q, &ops);

        let requested = decls
            .iter()
            .any(|d| matches!(d, Declaration::KeyListener { focus: true, .. }));
        let hidden = decls.contains(&Declaration::HideInput);
        let lost = before.is_some_and(|k| {
            !decls
                .iter()
                .any(|d| matches!(d, Declaration::KeyListener { key, .. } if *key == k))
        });
        let now_none = q.focus().is_none() && before.is_some();
        let expected = if requested {
            TextInputState::Open
        } else if hidden || lost || now_none {
            TextInputState::Close
        } else {
            TextInputState::Keep
        };
        prop_assert_eq!(q.input_state(), expected);
    }

    #[test]
    fn registry_tracks_last_frame(warmup in arb_tree(), tree in arb_tree()) {
        let mut q = KeyQueue::new();
        for nodes in [&warmup, &tree] {
            let mut ops = Ops::new();
            write(nodes, &mut ops);
            run(&mut q, &ops);
        }
        let mut decls = Vec::new();
        flatten(&tree, &mut decls);
        let declared: HashSet<Key> = decls
            .iter()
            .filter_map(|d| match d {
                Declaration::KeyListener { key, .. } => Some(*key),
                _ => None,
            })
            .collect();
        let registered: HashSet<Key> = q.handlers().keys().collect();
        prop_assert_eq!(registered, declared);
        if let Some(focus) = q.focus() {
            prop_assert!(q.is_registered(&focus));
        }
    }
}
