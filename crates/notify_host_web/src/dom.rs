//! Status element and enable button adapters for the dashboard page.

use notify_host::{ActivationHandler, EnableControl, StatusDisplay};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Writes status text into the element with `element_id`, looked up on every write.
pub struct WebStatusDisplay {
    element_id: String,
}

impl WebStatusDisplay {
    /// Targets the element with `element_id`.
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl StatusDisplay for WebStatusDisplay {
    fn set_status(&self, message: &str) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(element) = lookup(&self.element_id) else {
                return false;
            };
            element.set_text_content(Some(message));
            true
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = message;
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Binds the click of the element with `element_id` to the permission prompt.
pub struct WebEnableControl {
    element_id: String,
}

impl WebEnableControl {
    /// Targets the element with `element_id`.
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl EnableControl for WebEnableControl {
    fn bind_activation(&self, handler: ActivationHandler) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::{closure::Closure, JsCast};

            let Some(button) = lookup(&self.element_id)
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
            else {
                return false;
            };
            let mut handler = handler;
            let on_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
                event.prevent_default();
                handler();
            }) as Box<dyn FnMut(web_sys::Event)>);
            button.set_onclick(Some(on_click.as_ref().unchecked_ref()));
            // The button lives as long as the page.
            on_click.forget();
            true
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = handler;
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn lookup(element_id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(element_id)
}
