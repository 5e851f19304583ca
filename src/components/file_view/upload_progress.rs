//! Upload progress indicator.

use leptos::prelude::*;
use leptos_icons::Icon;
use mollify_core::upload::UploadPhase;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/file_view/upload_progress.module.css");

#[component]
pub fn UploadProgress() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let phase = Signal::derive(move || ctx.view.with(|v| v.upload_progress().phase()));
    let title = Signal::derive(move || ctx.view.with(|v| v.upload_progress().title().to_string()));
    let percent = Signal::derive(move || ctx.view.with(|v| v.upload_progress().percent()));
    let speed = Signal::derive(move || ctx.view.with(|v| v.upload_progress().speed().to_string()));

    let class = move || match phase.get() {
        UploadPhase::Hiding => format!("{} {}", css::progress, css::hiding),
        UploadPhase::Completing => format!("{} {}", css::progress, css::complete),
        _ => css::progress.to_string(),
    };

    view! {
        <Show when=move || phase.get() != UploadPhase::Hidden>
            <div class=class role="progressbar" aria-valuenow=move || percent.get().to_string()>
                <div class=css::heading>
                    <Icon icon=ic::UPLOAD />
                    <span class=css::title>{move || title.get()}</span>
                </div>
                <div class=css::bar>
                    <div class=css::fill style=move || format!("width: {}%;", percent.get())></div>
                </div>
                <div class=css::details>
                    <span>{move || format!("{}%", percent.get())}</span>
                    <span class=css::speed>{move || speed.get()}</span>
                </div>
            </div>
        </Show>
    }
}
