use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::host::{Scheduler, TimerId};

/// Collapses a burst of calls into one, fired `wait_ms` after the last call
/// with that call's arguments.
pub fn debounce<S, A, F>(scheduler: Rc<S>, wait_ms: u32, f: F) -> impl FnMut(A)
where
    S: Scheduler + ?Sized + 'static,
    A: 'static,
    F: FnMut(A) + 'static,
{
    let f = Rc::new(RefCell::new(f));
    let pending: Rc<Cell<Option<TimerId>>> = Rc::default();

    move |args: A| {
        if let Some(timer) = pending.take() {
            scheduler.clear_timeout(timer);
        }
        let f = f.clone();
        let slot = pending.clone();
        let timer = scheduler.set_timeout(
            wait_ms,
            Box::new(move || {
                slot.set(None);
                (f.borrow_mut())(args);
            }),
        );
        pending.set(Some(timer));
    }
}

/// Runs the first call immediately, then drops calls until `limit_ms` has
/// passed.
pub fn throttle<S, A, F>(scheduler: Rc<S>, limit_ms: u32, mut f: F) -> impl FnMut(A)
where
    S: Scheduler + ?Sized + 'static,
    F: FnMut(A) + 'static,
{
    let cooling = Rc::new(Cell::new(false));

    move |args: A| {
        if cooling.get() {
            return;
        }
        cooling.set(true);
        f(args);
        let flag = cooling.clone();
        scheduler.set_timeout(limit_ms, Box::new(move || flag.set(false)));
    }
}
