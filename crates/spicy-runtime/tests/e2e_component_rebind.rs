#![forbid(unsafe_code)]

//! E2E: a list component re-rendered many times.
//!
//! Simulates a host that renders a row per item on every frame and
//! re-attaches a listener only when the handler it is given changes.
//! Validates that:
//! 1. Steady-state renders re-attach nothing.
//! 2. Changing one row's bound arguments re-attaches only that row.
//! 3. A text field bound through `bind_value` sees every edit.
//! 4. Unmounting the component lets a sweep reclaim every entry.

use std::cell::RefCell;
use std::rc::Rc;

use spicy_core::event::{Element, Event, EventKind, fixtures};
use spicy_runtime::{Arg, BindConfig, BindContext, Callback, Handler, ValueCallback};

// ── Fake host ───────────────────────────────────────────────────────────

/// Remembers the last listener per slot and counts re-attachments.
#[derive(Default)]
struct Host {
    rows: Vec<Option<Callback>>,
    field: Option<Handler>,
    attaches: usize,
}

impl Host {
    fn mount_row(&mut self, slot: usize, listener: Callback) {
        if self.rows.len() <= slot {
            self.rows.resize(slot + 1, None);
        }
        if self.rows[slot].as_ref() != Some(&listener) {
            self.attaches += 1;
            self.rows[slot] = Some(listener);
        }
    }

    fn mount_field(&mut self, handler: Handler) {
        if self.field.as_ref() != Some(&handler) {
            self.attaches += 1;
            self.field = Some(handler);
        }
    }

    fn click(&self, slot: usize) {
        if let Some(listener) = &self.rows[slot] {
            listener.emit(&[Arg::from("click")]);
        }
    }

    fn type_text(&self, text: &str) {
        if let Some(handler) = &self.field {
            handler.emit(&Event::new(EventKind::Input).with_target(Element::input(text)));
        }
    }
}

// ── Component ───────────────────────────────────────────────────────────

struct TodoList {
    items: Vec<(u32, String)>,
    on_select: Callback,
    on_filter: ValueCallback,
}

impl TodoList {
    fn new(log: Rc<RefCell<Vec<String>>>) -> Self {
        let select_log = Rc::clone(&log);
        let on_select = Callback::new(move |args: &[Arg]| {
            let id = args[0].as_int().unwrap_or(-1);
            let title = args[1].as_str().unwrap_or("?").to_string();
            let what = args[2].as_str().unwrap_or("?").to_string();
            select_log.borrow_mut().push(format!("{what} {id} {title}"));
        });
        let on_filter = ValueCallback::new(move |value, _| {
            log.borrow_mut().push(format!("filter {value}"));
        });
        Self {
            items: (1..=5).map(|id| (id, format!("item {id}"))).collect(),
            on_select,
            on_filter,
        }
    }

    fn render(&self, cx: &BindContext, host: &mut Host) {
        for (slot, (id, title)) in self.items.iter().enumerate() {
            host.mount_row(slot, cx.bind_with((*id, title.as_str()), &self.on_select));
        }
        host.mount_field(cx.bind_value(&self.on_filter));
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[test]
fn steady_state_renders_reattach_nothing() {
    let cx = BindContext::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let list = TodoList::new(Rc::clone(&log));
    let mut host = Host::default();

    list.render(&cx, &mut host);
    assert_eq!(host.attaches, 6);

    for _ in 0..100 {
        list.render(&cx, &mut host);
    }
    assert_eq!(host.attaches, 6);
    assert_eq!(cx.stats().misses, 6);
    assert_eq!(cx.stats().hits, 600);
}

#[test]
fn changed_row_is_the_only_reattach() {
    let cx = BindContext::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut list = TodoList::new(Rc::clone(&log));
    let mut host = Host::default();
    list.render(&cx, &mut host);

    list.items[2].1 = "renamed".to_string();
    list.render(&cx, &mut host);
    assert_eq!(host.attaches, 7);

    host.click(2);
    host.click(0);
    assert_eq!(
        *log.borrow(),
        vec!["click 3 renamed".to_string(), "click 1 item 1".to_string()]
    );
}

#[test]
fn text_field_sees_every_edit() {
    let cx = BindContext::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let list = TodoList::new(Rc::clone(&log));
    let mut host = Host::default();
    list.render(&cx, &mut host);

    for text in ["b", "bu", "buy"] {
        host.type_text(text);
        list.render(&cx, &mut host);
    }
    host.field
        .as_ref()
        .expect("field mounted")
        .emit(&fixtures::click_event());
    assert_eq!(
        *log.borrow(),
        vec!["filter b", "filter bu", "filter buy", "filter "]
    );
    assert_eq!(host.attaches, 6);
}

#[test]
fn unmount_lets_sweep_reclaim_everything() {
    let cx = BindContext::new(BindConfig::manual());
    {
        let log = Rc::new(RefCell::new(Vec::new()));
        let list = TodoList::new(log);
        let mut host = Host::default();
        list.render(&cx, &mut host);
        assert_eq!(cx.sweep(), 0);
    }
    let stats = cx.stats();
    assert_eq!(stats.value_entries, 1);
    assert_eq!(stats.arg_callbacks, 1);
    assert_eq!(stats.arg_entries, 5);

    assert_eq!(cx.sweep(), 2);
    let stats = cx.stats();
    assert_eq!(stats.value_entries + stats.arg_callbacks, 0);
    assert_eq!(stats.reclaimed, 2);
}
