//! Browser event wiring for the input manager
//!
//! Every listener is wrapped in a `ListenerGuard` owned by the manager, so
//! `InputManager::destroy` (or dropping it) removes them all. Handlers hold a
//! weak reference to avoid a manager <-> closure cycle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

use crate::input::{InputManager, Key, ListenerGuard, PointerButton};
use crate::platform::{Clock, SystemClock};

/// Register `handler` for `event` on `target`; the guard unregisters it
fn listen(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> ListenerGuard {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("Failed to add '{event}' listener");
    }
    let target = target.clone();
    ListenerGuard::new(move || {
        let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        drop(closure);
    })
}

/// Run `f` against the manager if it still exists and isn't mid-update
fn with_manager(weak: &Weak<RefCell<InputManager>>, f: impl FnOnce(&mut InputManager)) {
    if let Some(m) = weak.upgrade() {
        if let Ok(mut m) = m.try_borrow_mut() {
            f(&mut m);
        }
    }
}

/// Touch position relative to the canvas
fn touch_pos(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        touch.client_x() as f32 - rect.left() as f32,
        touch.client_y() as f32 - rect.top() as f32,
    )
}

/// Attach keyboard (window), mouse and touch (canvas) listeners
pub fn attach_input(manager: &Rc<RefCell<InputManager>>, canvas: &HtmlCanvasElement) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window, input not attached");
        return;
    };
    let window_target: &EventTarget = window.as_ref();
    let canvas_target: &EventTarget = canvas.as_ref();
    let clock = Rc::new(SystemClock::new());
    let mut guards = Vec::new();

    // Keyboard
    for (event, pressed) in [("keydown", true), ("keyup", false)] {
        let weak = Rc::downgrade(manager);
        guards.push(listen(window_target, event, move |e| {
            let e: &KeyboardEvent = e.unchecked_ref();
            let key = e.key();
            if let Some(k) = Key::from_dom(&key) {
                // Keep arrows and space from scrolling the page
                e.prevent_default();
                with_manager(&weak, |m| m.set_key(k, pressed));
            }
        }));
    }

    // Focus loss drops every held key
    {
        let weak = Rc::downgrade(manager);
        guards.push(listen(window_target, "blur", move |_| {
            with_manager(&weak, |m| m.reset());
        }));
    }

    // Mouse
    {
        let weak = Rc::downgrade(manager);
        guards.push(listen(canvas_target, "mousemove", move |e| {
            let e: &MouseEvent = e.unchecked_ref();
            let pos = Vec2::new(e.offset_x() as f32, e.offset_y() as f32);
            with_manager(&weak, |m| m.pointer_move(pos));
        }));
    }
    {
        let weak = Rc::downgrade(manager);
        let clock = clock.clone();
        guards.push(listen(canvas_target, "mousedown", move |e| {
            let e: &MouseEvent = e.unchecked_ref();
            let pos = Vec2::new(e.offset_x() as f32, e.offset_y() as f32);
            let button = PointerButton::from_dom(e.button());
            let now = clock.now();
            with_manager(&weak, |m| m.pointer_down(button, pos, now));
        }));
    }
    {
        // Release anywhere, not just over the canvas
        let weak = Rc::downgrade(manager);
        guards.push(listen(window_target, "mouseup", move |e| {
            let e: &MouseEvent = e.unchecked_ref();
            let button = PointerButton::from_dom(e.button());
            with_manager(&weak, |m| m.pointer_up(button));
        }));
    }
    guards.push(listen(canvas_target, "contextmenu", |e| e.prevent_default()));

    // Touch
    {
        let weak = Rc::downgrade(manager);
        let canvas = canvas.clone();
        let clock = clock.clone();
        guards.push(listen(canvas_target, "touchstart", move |e| {
            e.prevent_default();
            let e: &TouchEvent = e.unchecked_ref();
            let width = canvas.client_width() as f32;
            let now = clock.now();
            let touches = e.changed_touches();
            for i in 0..touches.length() {
                if let Some(t) = touches.get(i) {
                    let pos = touch_pos(&canvas, &t);
                    with_manager(&weak, |m| m.touch_start(t.identifier(), pos, width, now));
                }
            }
        }));
    }
    {
        let weak = Rc::downgrade(manager);
        let canvas = canvas.clone();
        guards.push(listen(canvas_target, "touchmove", move |e| {
            e.prevent_default();
            let e: &TouchEvent = e.unchecked_ref();
            let touches = e.changed_touches();
            for i in 0..touches.length() {
                if let Some(t) = touches.get(i) {
                    let pos = touch_pos(&canvas, &t);
                    with_manager(&weak, |m| m.touch_move(t.identifier(), pos));
                }
            }
        }));
    }
    for event in ["touchend", "touchcancel"] {
        let weak = Rc::downgrade(manager);
        guards.push(listen(canvas_target, event, move |e| {
            e.prevent_default();
            let e: &TouchEvent = e.unchecked_ref();
            let touches = e.changed_touches();
            for i in 0..touches.length() {
                if let Some(t) = touches.get(i) {
                    with_manager(&weak, |m| m.touch_end(t.identifier()));
                }
            }
        }));
    }

    let count = guards.len();
    let mut m = manager.borrow_mut();
    for g in guards {
        m.attach(g);
    }
    log::info!("Attached {} input listeners", count);
}
