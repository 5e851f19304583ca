//! File view UI components.
//!
//! Renders the [`mollify_core::FileView`] model held by
//! [`AppContext`](crate::app::AppContext).
//!
//! Components:
//! - [`FileViewPage`] - Toolbar, folder header, item widget and overlays
//! - [`ListView`] - Table of items with sortable, resizable columns
//! - [`IconGrid`] - Small or large icon tiles
//! - [`UploadProgress`] - Upload indicator
//! - [`ItemDetails`] - Item details popup

mod file_list;
mod header;
mod icon_view;
mod item_details;
mod upload_progress;

pub use file_list::ListView;
pub use header::{FolderHeader, Toolbar};
pub use icon_view::IconGrid;
pub use item_details::ItemDetails;
pub use upload_progress::UploadProgress;

use leptos::prelude::*;
use mollify_core::{Action, DragPayload, FilesystemItem, Notice, WidgetEvent};
use wasm_bindgen::JsCast;

use crate::app::AppContext;

stylance::import_crate_style!(css, "src/components/file_view/file_view.module.css");

/// The whole file view.
#[component]
pub fn FileViewPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let is_list = Signal::derive(move || ctx.view.with(|v| v.view_style().is_list()));
    let is_loading = Signal::derive(move || ctx.view.with(|v| v.is_loading()));

    // Files dragged in from the desktop
    let on_dragover = move |ev: leptos::ev::DragEvent| {
        if has_files(&ev) && ctx.view.with_untracked(|v| v.upload_target().is_some()) {
            ev.prevent_default();
        }
    };
    let on_drop = move |ev: leptos::ev::DragEvent| {
        if !has_files(&ev) {
            return;
        }
        ev.prevent_default();
        ctx.upload(dropped_files(&ev));
    };

    view! {
        <div class=css::fileView>
            <Toolbar />
            <FolderHeader />

            <div
                class=move || {
                    if is_loading.get() {
                        format!("{} {}", css::content, css::loading)
                    } else {
                        css::content.to_string()
                    }
                }
                on:dragover=on_dragover
                on:drop=on_drop
            >
                <Show when=move || ctx.ready.get() fallback=|| view! { <div class=css::spinner></div> }>
                    {move || if is_list.get() {
                        view! { <ListView /> }.into_any()
                    } else {
                        view! { <IconGrid /> }.into_any()
                    }}
                </Show>
            </div>

            <UploadProgress />
            <ItemDetails />
            <Notices />
        </div>
    }
}

/// Transient notices, newest last.
#[component]
fn Notices() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <div class=css::notices aria-live="polite">
            <For
                each=move || ctx.notices.get()
                key=|shown| shown.id
                children=move |shown| {
                    let (class, text) = match shown.notice {
                        Notice::Success(text) => (css::noticeSuccess, text),
                        Notice::Warning(text) => (css::noticeWarning, text),
                        Notice::Error(text) => (css::noticeError, text),
                    };
                    let id = shown.id;
                    view! {
                        <div
                            class=format!("{} {}", css::notice, class)
                            role="status"
                            on:click=move |_| ctx.dismiss(id)
                        >
                            {text}
                        </div>
                    }
                }
            />
        </div>
    }
}

// =============================================================================
// Widget Events
// =============================================================================

/// Feed a widget event to the view and carry out the resulting action.
pub(crate) fn dispatch(ctx: AppContext, event: Option<WidgetEvent>) {
    let Some(event) = event else {
        return;
    };
    let Some(action) = ctx.view.try_update(|v| v.handle_event(event)) else {
        return;
    };
    match action {
        Action::Navigate(step) => ctx.run(step),
        Action::OpenContext { item, .. } | Action::OpenMenu(item) => ctx.details.set(Some(item)),
        Action::SelectionChanged | Action::None => {}
    }
}

// =============================================================================
// Drag and Drop
// =============================================================================

/// Start dragging `item` (with the selection, in select mode).
pub(crate) fn start_drag(ctx: AppContext, item: &FilesystemItem, ev: &leptos::ev::DragEvent) {
    let payload = ctx.view.with_untracked(|v| v.drag_payload(item));
    if let Some(transfer) = ev.data_transfer() {
        transfer.set_effect_allowed("copyMove");
        let _ = transfer.set_data("text/plain", &item.name);
    }
    ctx.drag.set(Some(payload));
}

pub(crate) fn end_drag(ctx: AppContext) {
    ctx.drag.set(None);
}

/// Allow the drop on a folder if the current payload may go there.
pub(crate) fn drag_over(ctx: AppContext, target: &FilesystemItem, ev: &leptos::ev::DragEvent) {
    let allowed = ctx.drag.with_untracked(|drag| match drag {
        Some(payload) => ctx.view.with_untracked(|v| v.can_drop(payload, target)),
        None => false,
    });
    if allowed {
        ev.prevent_default();
        if let Some(transfer) = ev.data_transfer() {
            let effect = match current_drop(ctx, target) {
                Some(mollify_core::DropType::Move) => "move",
                _ => "copy",
            };
            transfer.set_drop_effect(effect);
        }
    }
}

fn current_drop(ctx: AppContext, target: &FilesystemItem) -> Option<mollify_core::DropType> {
    ctx.drag.with_untracked(|drag| {
        drag.as_ref()
            .map(|payload| mollify_core::dnd::drop_type(payload, target))
    })
}

/// Drop the current payload on `target`.
pub(crate) fn drop_on(ctx: AppContext, target: &FilesystemItem, ev: &leptos::ev::DragEvent) {
    let Some(payload): Option<DragPayload> = ctx.drag.get_untracked() else {
        return;
    };
    ev.prevent_default();
    ev.stop_propagation();
    ctx.drag.set(None);
    if let Some(command) = ctx.view.with_untracked(|v| v.drop_on(&payload, target)) {
        ctx.execute(command);
    }
}

fn has_files(ev: &leptos::ev::DragEvent) -> bool {
    ev.data_transfer()
        .map(|t| t.types().includes(&"Files".into(), 0))
        .unwrap_or(false)
}

fn dropped_files(ev: &leptos::ev::DragEvent) -> Vec<web_sys::File> {
    ev.data_transfer()
        .and_then(|t| t.files())
        .map(|list| collect_files(&list))
        .unwrap_or_default()
}

/// Files of a `FileList` (drop or file input).
pub(crate) fn collect_files(list: &web_sys::FileList) -> Vec<web_sys::File> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .collect()
}

/// Element under an event, as an `HtmlInputElement`.
pub(crate) fn event_input(ev: &leptos::ev::Event) -> Option<web_sys::HtmlInputElement> {
    ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()
}
