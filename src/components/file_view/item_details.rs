//! Item details popup, opened from the info badge or a right click.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::sanitize_html;

stylance::import_crate_style!(css, "src/components/file_view/item_details.module.css");

#[component]
pub fn ItemDetails() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let details = Memo::new(move |_| {
        ctx.details
            .get()
            .map(|item| ctx.view.with(|v| v.item_details(&item)))
    });
    let close = move || ctx.details.set(None);

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            close();
        }
    };

    view! {
        {move || details.get().map(|details| {
            let icon = ic::for_item(details.item.is_file, details.item.file_extension());
            view! {
                <div class=css::backdrop on:click=move |_| close()>
                    <div
                        class=css::popup
                        role="dialog"
                        tabindex="-1"
                        on:click=|ev| ev.stop_propagation()
                        on:keydown=on_keydown
                    >
                        <div class=css::heading>
                            <span class=css::icon><Icon icon=icon /></span>
                            <h3 class=css::name>{details.item.name.clone()}</h3>
                            <button class=css::close on:click=move |_| close() title="Close">
                                <Icon icon=ic::CLOSE />
                            </button>
                        </div>
                        <dl class=css::fields>
                            <dt>"Location"</dt>
                            <dd>{details.location.clone()}</dd>
                            {details.size.clone().map(|size| view! {
                                <dt>"Size"</dt>
                                <dd>{size}</dd>
                            })}
                            {details.modified.clone().map(|modified| view! {
                                <dt>"Modified"</dt>
                                <dd>{modified}</dd>
                            })}
                        </dl>
                        {details.description.clone().map(|description| view! {
                            <div class=css::description inner_html=sanitize_html(&description)></div>
                        })}
                    </div>
                </div>
            }
        })}
    }
}
