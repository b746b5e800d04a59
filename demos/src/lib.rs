// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small widgets shared by the demos.

use understory_key_focus::event::{Event, HandlerEvents};
use understory_key_focus::ops::{HandlerOp, Ops};

/// Identity of a demo widget.
pub type WidgetId = &'static str;

/// A single-line text field in an immediate-mode UI.
#[derive(Debug)]
pub struct TextField {
    /// Listener identity.
    pub id: WidgetId,
    /// Current contents.
    pub text: String,
    /// Whether the field believes it holds keyboard focus.
    pub focused: bool,
    /// Set for one frame when the user clicks the field.
    pub clicked: bool,
}

impl TextField {
    /// Create an empty, unfocused field.
    pub fn new(id: WidgetId) -> Self {
        Self {
            id,
            text: String::new(),
            focused: false,
            clicked: false,
        }
    }

    /// Consume pending events, then declare the field's listener.
    pub fn layout(&mut self, events: &mut HandlerEvents<WidgetId>, ops: &mut Ops<WidgetId>) {
        for event in events.events(&self.id) {
            match event {
                Event::Focus(f) => self.focused = f.focus,
                Event::Key(k) if k.name == '\u{8}' => {
                    self.text.pop();
                }
                Event::Key(_) => {}
                Event::Edit(e) => self.text.push_str(&e.text),
            }
        }
        HandlerOp {
            key: self.id,
            focus: std::mem::take(&mut self.clicked),
        }
        .add(ops);
    }
}
