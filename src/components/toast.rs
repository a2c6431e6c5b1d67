use leptos::{component, view, IntoView, Signal, SignalWith};

/// Transient status message, e.g. the outcome of a verification
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Toast {
    pub message: String,
    pub visible: bool,
}

impl Toast {
    #[must_use]
    pub fn new(message: String) -> Self {
        Self {
            message,
            visible: true,
        }
    }
}

#[component]
#[must_use]
pub fn ToastNotification(#[prop(into)] toast: Signal<Toast>) -> impl IntoView {
    view! {
        <div
            class=move || toast.with(|t| if t.visible { "toast toast-visible" } else { "toast" })
            role="status"
        >
            {move || toast.with(|t| t.message.clone())}
        </div>
    }
}
