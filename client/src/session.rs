use std::cell::RefCell;
use std::collections::BTreeMap;

use bellwether_shared::session::CHECK_INTERVAL;
use chrono::Utc;
use gloo_timers::callback::Interval;
use leptos::prelude::*;

use crate::app::redirect;
use crate::storage::session_guard;

/// Timers keyed by the view that started them, so disposing one view leaves
/// the others running.
struct CheckSlots<T> {
    next: u64,
    live: BTreeMap<u64, T>,
}

impl<T> CheckSlots<T> {
    const fn new() -> Self {
        Self {
            next: 0,
            live: BTreeMap::new(),
        }
    }

    fn insert(&mut self, item: T) -> u64 {
        let id = self.next;
        self.next += 1;
        self.live.insert(id, item);
        id
    }

    fn remove(&mut self, id: u64) -> Option<T> {
        self.live.remove(&id)
    }
}

thread_local! {
    static EXPIRY_CHECKS: RefCell<CheckSlots<Interval>> = const { RefCell::new(CheckSlots::new()) };
}

/// Purge-and-redirect check run by the periodic timer.
fn session_still_valid() -> bool {
    let valid = session_guard().check(Utc::now()).is_authenticated();
    if !valid {
        redirect("/login");
    }
    valid
}

fn release_expiry_check(id: u64) {
    let interval = EXPIRY_CHECKS.with(|slots| slots.borrow_mut().remove(id));
    if let Some(interval) = interval {
        interval.cancel();
    }
}

/// Whether the stored session is valid, kept current for the calling view.
///
/// The first check purges an expired session. While the session is valid it
/// is re-checked every [`CHECK_INTERVAL`]; expiry purges it, flips the signal
/// and sends the user to the login view. The timer stops when the view is
/// disposed.
pub fn use_session_check() -> RwSignal<bool> {
    let valid = RwSignal::new(session_guard().check(Utc::now()).is_authenticated());
    if !valid.get_untracked() {
        return valid;
    }
    // A failed check must not drop the interval from inside its own callback.
    let interval = Interval::new(CHECK_INTERVAL.as_millis() as u32, move || {
        if valid.get_untracked() && !session_still_valid() {
            valid.set(false);
        }
    });
    let id = EXPIRY_CHECKS.with(|slots| slots.borrow_mut().insert(interval));
    on_cleanup(move || release_expiry_check(id));
    valid
}

/// Renders `children` only while a valid session is stored. Without one the
/// user is sent to the login view.
#[component]
pub fn AuthGuard(children: ChildrenFn) -> impl IntoView {
    let authenticated = use_session_check();
    if !authenticated.get_untracked() {
        redirect("/login");
    }

    view! {
        {move || {
            if authenticated.get() {
                children().into_any()
            } else {
                view! {
                    <p style="padding: 24px; color: #4a5568; font-family: 'Inter', system-ui, sans-serif;">
                        "Redirecting to login..."
                    </p>
                }
                .into_any()
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releasing_one_check_keeps_the_others() {
        let mut slots = CheckSlots::new();
        let guard = slots.insert("admin guard");
        let detail = slots.insert("detail page");
        assert_ne!(guard, detail);

        assert_eq!(slots.remove(guard), Some("admin guard"));
        assert_eq!(slots.remove(guard), None);
        assert_eq!(slots.remove(detail), Some("detail page"));
        assert!(slots.live.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_release() {
        let mut slots = CheckSlots::new();
        let first = slots.insert(1);
        slots.remove(first);
        let second = slots.insert(2);
        assert_ne!(first, second);
        assert_eq!(slots.remove(first), None);
        assert_eq!(slots.remove(second), Some(2));
    }
}
