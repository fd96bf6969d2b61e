mod admin;
mod api;
mod app;
mod detail;
mod editor;
mod insets;
mod legend;
mod login;
mod map_view;
mod session;
mod state_info;
mod storage;
mod viewport;

use leptos::mount::mount_to;
use std::any::Any;
use std::cell::RefCell;
use wasm_bindgen::JsCast;

thread_local! {
    /// Dropping the handle unmounts the tree.
    static MOUNTED: RefCell<Option<Box<dyn Any>>> = const { RefCell::new(None) };
}

fn mount_point() -> Option<web_sys::HtmlElement> {
    let document = web_sys::window()?.document()?;
    document
        .get_element_by_id("app")
        .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body())
}

fn main() {
    console_error_panic_hook::set_once();
    let Some(target) = mount_point() else {
        web_sys::console::error_1(&"bellwether: no mount point".into());
        return;
    };

    MOUNTED.with(|slot| {
        drop(slot.borrow_mut().take());
        let handle = mount_to(target, app::App);
        *slot.borrow_mut() = Some(Box::new(handle));
    });
}
