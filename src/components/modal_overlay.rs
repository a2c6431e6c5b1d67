use leptos::{component, view, Callable, Callback, ChildrenFn, IntoView, Signal, SignalGet, store_value};

/// Dialog over a dimmed backdrop; clicking the backdrop or the close button calls `on_close`
#[component]
#[must_use]
pub fn ModalOverlay(
    #[prop(into)] is_open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let children = store_value(children);

    view! {
        {move || if is_open.get() {
            view! {
                <div class="modal-overlay" on:click=move |_| on_close.call(())>
                    <div class="modal" on:click=|ev| ev.stop_propagation()>
                        <div class="modal-header">
                            <h2>{move || title.get()}</h2>
                            <button class="modal-close" title="Close" on:click=move |_| on_close.call(())>
                                "×"
                            </button>
                        </div>
                        <div class="modal-body">
                            {children.with_value(|children| children())}
                        </div>
                    </div>
                </div>
            }.into_view()
        } else {
            ().into_view()
        }}
    }
}
