//! `setInterval` and `requestAnimationFrame` handles.
//!
//! Both are cheap-to-clone handles over shared state. `start` is idempotent,
//! `stop` cancels any pending callback, and dropping the last handle stops it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct IntervalInner {
    period_ms: i32,
    callback: Closure<dyn FnMut()>,
    handle: Cell<Option<i32>>,
}

impl Drop for IntervalInner {
    fn drop(&mut self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            w.clear_interval_with_handle(id);
        }
    }
}

#[derive(Clone)]
pub struct Interval {
    inner: Rc<IntervalInner>,
}

impl Interval {
    pub fn new(period_ms: u32, mut body: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(IntervalInner {
                period_ms: period_ms.min(i32::MAX as u32) as i32,
                callback: Closure::wrap(Box::new(move || body()) as Box<dyn FnMut()>),
                handle: Cell::new(None),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.handle.get().is_some()
    }

    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        let Some(w) = web::window() else {
            return;
        };
        match w.set_interval_with_callback_and_timeout_and_arguments_0(
            self.inner.callback.as_ref().unchecked_ref(),
            self.inner.period_ms,
        ) {
            Ok(id) => self.inner.handle.set(Some(id)),
            Err(e) => log::error!("[timer] setInterval failed: {:?}", e),
        }
    }

    pub fn stop(&self) {
        if let (Some(id), Some(w)) = (self.inner.handle.take(), web::window()) {
            w.clear_interval_with_handle(id);
        }
    }

    /// Start or stop so that the interval runs exactly while `running`.
    pub fn set_running(&self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }
}

struct FrameLoopInner {
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
    handle: Cell<Option<i32>>,
    running: Cell<bool>,
}

impl FrameLoopInner {
    fn request(&self) {
        let Some(w) = web::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => {
                self.running.set(false);
                log::error!("[timer] requestAnimationFrame failed: {:?}", e);
            }
        }
    }

    fn cancel(&self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameLoopInner {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Self-rescheduling animation-frame loop.
#[derive(Clone)]
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
    pub fn new(mut body: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(FrameLoopInner {
            callback: RefCell::new(None),
            handle: Cell::new(None),
            running: Cell::new(false),
        });
        let weak: Weak<FrameLoopInner> = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            if !inner.running.get() {
                return;
            }
            body();
            if inner.running.get() {
                inner.request();
            }
        }) as Box<dyn FnMut()>);
        *inner.callback.borrow_mut() = Some(closure);
        Self { inner }
    }

    pub fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }
        self.inner.request();
    }

    pub fn stop(&self) {
        self.inner.cancel();
    }

    pub fn set_running(&self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }
}
