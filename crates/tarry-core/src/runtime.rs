use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
}

#[derive(Default)]
pub struct Composer {
    pub frame: u64,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// One composition pass. Bumps the frame counter and opens a root scope that
/// lives until the guard drops.
pub struct ComposeGuard {
    scope: Scope,
}

impl ComposeGuard {
    pub fn begin() -> Self {
        let scope = Scope::new();

        let frame = COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.frame += 1;
            c.frame
        });
        log::trace!("compose: frame {frame}");

        ComposeGuard { scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

/// Runs `f` as one composition pass.
pub fn compose<R>(f: impl FnOnce() -> R) -> R {
    let guard = ComposeGuard::begin();
    guard.scope().run(f)
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let existing = COMPOSER.with(|c| {
        let c = c.borrow();
        match c.keyed_slots.get(&key) {
            Some(b) => match b.downcast_ref::<Rc<T>>() {
                Some(rc) => Ok(rc.clone()),
                None => Err(true),
            },
            None => Err(false),
        }
    });
    match existing {
        Ok(rc) => return rc,
        Err(true) => log::warn!(
            "remember_with_key: key '{}' reused with a different type; replacing.",
            key
        ),
        Err(false) => {}
    }

    // init runs outside the composer borrow; it may remember too
    let rc: Rc<T> = Rc::new(init());
    let replaced = COMPOSER.with(|c| c.borrow_mut().keyed_slots.insert(key, Box::new(rc.clone())));
    drop(replaced);
    rc
}

/// Drops the keyed slot, if any. Returns whether one existed.
pub fn forget_key(key: &str) -> bool {
    let removed = COMPOSER.with(|c| c.borrow_mut().keyed_slots.remove(key));
    // dropping may run disposers that touch the composer
    removed.is_some()
}

/// Looks up a keyed slot without creating it.
pub fn peek_key<T: 'static>(key: &str) -> Option<Rc<T>> {
    COMPOSER.with(|c| {
        c.borrow()
            .keyed_slots
            .get(key)
            .and_then(|b| b.downcast_ref::<Rc<T>>())
            .cloned()
    })
}
