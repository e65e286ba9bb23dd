// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll and resize sampling.
//!
//! [`ScrollSource`] listens for `scroll` and `resize` on the window and
//! schedules at most one `requestAnimationFrame` callback per burst of
//! events. Each callback receives a [`ScrollFrame`] with the current
//! viewport in document coordinates, so the stage is measured once per
//! painted frame no matter how many events fired.
//!
//! Starting the source schedules one frame immediately (flagged as a
//! layout change), so regions that are already in view reveal without any
//! scroll.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use unveil_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods; these are
// called on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// One coalesced scroll/resize frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollFrame {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Timestamp of the animation frame.
    pub now: HostTime,
    /// Viewport in document coordinates.
    pub viewport: Rect,
    /// Whether a resize (or the initial frame) happened since the previous
    /// frame, so region bounds must be read again.
    pub layout_changed: bool,
}

/// Window scroll/resize listener that emits [`ScrollFrame`]s.
///
/// Create with [`ScrollSource::new`], then call [`start`](Self::start) to
/// attach the listeners. Listeners are removed on [`stop`](Self::stop) or
/// when the `ScrollSource` is dropped.
pub struct ScrollSource {
    inner: Rc<ScrollInner>,
}

type FrameClosure = Closure<dyn FnMut(f64)>;
type EventClosure = Closure<dyn FnMut(JsValue)>;

struct ScrollInner {
    /// The JS closure registered with `requestAnimationFrame`.
    frame: RefCell<Option<FrameClosure>>,

    /// Window `scroll` listener.
    on_scroll: RefCell<Option<EventClosure>>,

    /// Window `resize` listener.
    on_resize: RefCell<Option<EventClosure>>,

    /// The user-supplied callback that receives [`ScrollFrame`] events.
    callback: RefCell<Box<dyn FnMut(ScrollFrame)>>,

    /// Monotonically increasing frame counter.
    frame_counter: Cell<u64>,

    /// Whether the listeners are attached.
    running: Cell<bool>,

    /// Pending `requestAnimationFrame` ID, if a frame is scheduled.
    raf_id: Cell<Option<i32>>,

    /// Set by the resize listener, consumed by the next frame.
    layout_changed: Cell<bool>,
}

impl ScrollInner {
    /// Schedules a frame unless one is already pending.
    fn request_frame(&self) {
        if !self.running.get() || self.raf_id.get().is_some() {
            return;
        }
        if let Some(ref closure) = *self.frame.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.raf_id.set(Some(id));
        }
    }

    fn on_frame(&self, timestamp_ms: f64) {
        self.raf_id.set(None);
        if !self.running.get() {
            return;
        }
        let Some(viewport) = crate::viewport() else {
            return;
        };

        let frame_index = self.frame_counter.get();
        self.frame_counter.set(frame_index + 1);

        let frame = ScrollFrame {
            frame_index,
            now: crate::host_time_from_millis(timestamp_ms),
            viewport,
            layout_changed: self.layout_changed.replace(false),
        };
        self.callback.borrow_mut()(frame);
    }
}

impl ScrollSource {
    /// Creates a new `ScrollSource` that is **not yet listening**.
    ///
    /// `callback` receives a [`ScrollFrame`] for every animation frame that
    /// follows a scroll or resize once [`start`](Self::start) is called.
    pub fn new(callback: impl FnMut(ScrollFrame) + 'static) -> Self {
        Self {
            inner: Rc::new(ScrollInner {
                frame: RefCell::new(None),
                on_scroll: RefCell::new(None),
                on_resize: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(None),
                layout_changed: Cell::new(false),
            }),
        }
    }

    /// Attaches the listeners and schedules an initial frame.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        self.inner.running.set(true);

        let inner = Rc::clone(&self.inner);
        let frame = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            inner.on_frame(timestamp_ms);
        }) as Box<dyn FnMut(f64)>);
        *self.inner.frame.borrow_mut() = Some(frame);

        let inner = Rc::clone(&self.inner);
        let on_scroll = Closure::wrap(Box::new(move |_: JsValue| {
            inner.request_frame();
        }) as Box<dyn FnMut(JsValue)>);
        let inner = Rc::clone(&self.inner);
        let on_resize = Closure::wrap(Box::new(move |_: JsValue| {
            inner.layout_changed.set(true);
            inner.request_frame();
        }) as Box<dyn FnMut(JsValue)>);

        let _ = window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
        let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        *self.inner.on_scroll.borrow_mut() = Some(on_scroll);
        *self.inner.on_resize.borrow_mut() = Some(on_resize);

        // Initial measurement: bounds have never been read.
        self.inner.layout_changed.set(true);
        self.inner.request_frame();
    }

    /// Detaches the listeners and cancels a pending frame.
    ///
    /// Can be restarted by calling [`start`](Self::start) again.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        if let Some(id) = self.inner.raf_id.take() {
            cancel_animation_frame(id);
        }
        if let Some(window) = web_sys::window() {
            if let Some(ref f) = *self.inner.on_scroll.borrow() {
                let _ = window.remove_event_listener_with_callback("scroll", f.as_ref().unchecked_ref());
            }
            if let Some(ref f) = *self.inner.on_resize.borrow() {
                let _ = window.remove_event_listener_with_callback("resize", f.as_ref().unchecked_ref());
            }
        }
    }

    /// Marks the layout as changed and schedules a frame, for callers that
    /// know the page reflowed without a resize (e.g. content loaded).
    pub fn invalidate_layout(&self) {
        self.inner.layout_changed.set(true);
        self.inner.request_frame();
    }

    /// Returns `true` if the listeners are attached.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for ScrollSource {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closures so the Rc cycle through them is broken.
        self.inner.frame.borrow_mut().take();
        self.inner.on_scroll.borrow_mut().take();
        self.inner.on_resize.borrow_mut().take();
    }
}

impl core::fmt::Debug for ScrollSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollSource")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .field("frame_pending", &self.inner.raf_id.get().is_some())
            .finish()
    }
}
