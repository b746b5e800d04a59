// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key focus basics.
//!
//! Drive a tiny form of text fields through a few frames with `KeyQueue` and
//! print who holds focus and what the text input surface should do.
//!
//! Run:
//! - `cargo run -p understory_demos --example key_focus_basics`
//! - `RUST_LOG=understory_key_focus=trace cargo run -p understory_demos --example key_focus_basics`

use tracing_subscriber::EnvFilter;
use understory_demos::{TextField, WidgetId};
use understory_key_focus::KeyQueue;
use understory_key_focus::event::{EditEvent, HandlerEvents, KeyEvent, Modifiers};
use understory_key_focus::ops::{HideInputOp, Ops};

struct Form {
    fields: Vec<TextField>,
    /// Show the search field in a nested scope.
    show_search: bool,
    /// Ask the platform to dismiss the keyboard.
    dismiss: bool,
}

impl Form {
    fn layout(&mut self, events: &mut HandlerEvents<WidgetId>, ops: &mut Ops<WidgetId>) {
        ops.reset();
        let (search, rest) = self.fields.split_last_mut().unwrap();
        for field in rest {
            field.layout(events, ops);
        }
        if self.show_search {
            ops.scope(|ops| search.layout(events, ops));
        }
        if std::mem::take(&mut self.dismiss) {
            HideInputOp.add(ops);
        }
    }
}

/// The form plus the per-frame state a UI loop keeps around.
struct App {
    form: Form,
    queue: KeyQueue<WidgetId>,
    events: HandlerEvents<WidgetId>,
    ops: Ops<WidgetId>,
}

impl App {
    fn step(&mut self, label: &str) {
        self.form.layout(&mut self.events, &mut self.ops);
        self.queue
            .frame(&self.ops, &mut self.events)
            .expect("well-formed declarations");
        println!(
            "{label:<28} focus={:<10} input={:?}",
            format!("{:?}", self.queue.focus()),
            self.queue.input_state()
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let form = Form {
        fields: vec![
            TextField::new("name"),
            TextField::new("email"),
            TextField::new("search"),
        ],
        show_search: true,
        dismiss: false,
    };
    let mut app = App {
        form,
        queue: KeyQueue::new(),
        events: HandlerEvents::new(),
        ops: Ops::new(),
    };

    app.step("first frame");

    app.form.fields[1].clicked = true;
    app.step("click email");

    let edit = EditEvent {
        text: "me@example.com".into(),
    };
    let backspace = KeyEvent {
        name: '\u{8}',
        modifiers: Modifiers::empty(),
    };
    app.queue.push(edit, &mut app.events);
    app.queue.push(backspace, &mut app.events);
    app.step("type into email");
    println!("{:<28} email={:?}", "", app.form.fields[1].text);

    app.form.fields[2].clicked = true;
    app.step("click search");

    // The search field drops out of the tree; it is pruned without a focus
    // event and focus falls back to the first remaining field.
    app.form.show_search = false;
    app.step("hide search");

    app.form.dismiss = true;
    app.step("dismiss keyboard");

    for field in &app.form.fields {
        println!("{:<28} {}: focused={}", "", field.id, field.focused);
    }
}
