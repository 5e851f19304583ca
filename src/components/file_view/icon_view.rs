//! Icon grid view of the shown folder.

use leptos::prelude::*;
use leptos_icons::Icon;
use mollify_core::widgets::{IconRegion, Tile};

use super::{dispatch, drag_over, drop_on, end_drag, start_drag};
use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/file_view/icon_view.module.css");

#[component]
pub fn IconGrid() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let grid = move || {
        ctx.view.with(|v| match v.widget().as_icons() {
            Some(icons) => (icons.tiles(), icons.is_large(), v.selection().is_active()),
            None => (Vec::new(), false, false),
        })
    };

    view! {
        {move || {
            let (tiles, large, select_mode) = grid();
            let class = if large {
                format!("{} {}", css::grid, css::large)
            } else {
                format!("{} {}", css::grid, css::small)
            };
            view! {
                <div class=class role="listbox">
                    {tiles
                        .into_iter()
                        .map(|tile| view! { <IconTile tile=tile select_mode=select_mode /> })
                        .collect_view()}
                </div>
            }
        }}
    }
}

#[component]
fn IconTile(tile: Tile, select_mode: bool) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let Tile {
        item,
        type_class,
        thumbnail,
    } = tile;
    let id = item.id.clone();
    let selected = ctx.view.with_untracked(|v| v.selection().contains(&id));
    let tooltip = ctx
        .view
        .with_untracked(|v| v.item_tooltip(&id).map(str::to_string));

    let click = {
        let id = id.clone();
        move |ev: leptos::ev::MouseEvent, region: IconRegion| {
            ev.stop_propagation();
            let event = ctx
                .view
                .with_untracked(|v| v.widget().as_icons().and_then(|i| i.click(&id, region)));
            dispatch(ctx, event);
        }
    };
    let right_id = id.clone();
    let on_contextmenu = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let event = ctx
            .view
            .with_untracked(|v| v.widget().as_icons().and_then(|i| i.right_click(&right_id)));
        dispatch(ctx, event);
    };
    let dbl_id = id.clone();
    let on_dblclick = move |_: leptos::ev::MouseEvent| {
        let event = ctx
            .view
            .with_untracked(|v| v.widget().as_icons().and_then(|i| i.dbl_click(&dbl_id)));
        dispatch(ctx, event);
    };

    let is_folder = item.is_folder();
    let drag_item = item.clone();
    let over_item = item.clone();
    let drop_item = item.clone();

    let class = if selected {
        format!("{} {} {}", css::tile, type_class, css::selected)
    } else {
        format!("{} {}", css::tile, type_class)
    };
    let check_icon = if selected { ic::CHECKED } else { ic::UNCHECKED };
    let fallback_icon = ic::for_item(item.is_file, item.file_extension());
    let thumbnail = thumbnail.map(|path| ctx.service_url(&path));

    let body_click = click.clone();
    let info_click = click.clone();
    let select_click = click;

    view! {
        <div
            class=class
            role="option"
            title=tooltip
            aria-selected=selected.to_string()
            draggable="true"
            on:click=move |ev| body_click(ev, IconRegion::Body)
            on:contextmenu=on_contextmenu
            on:dblclick=on_dblclick
            on:dragstart=move |ev: leptos::ev::DragEvent| start_drag(ctx, &drag_item, &ev)
            on:dragend=move |_| end_drag(ctx)
            on:dragover=move |ev: leptos::ev::DragEvent| {
                if is_folder {
                    drag_over(ctx, &over_item, &ev);
                }
            }
            on:drop=move |ev: leptos::ev::DragEvent| {
                if is_folder {
                    drop_on(ctx, &drop_item, &ev);
                }
            }
        >
            {select_mode.then(|| view! {
                <span
                    class=css::selectOption
                    on:click=move |ev| select_click(ev, IconRegion::SelectOption)
                >
                    <Icon icon=check_icon />
                </span>
            })}
            <div class=css::preview>
                {match thumbnail {
                    Some(src) => view! {
                        <img class=css::thumbnail src=src alt=item.name.clone() loading="lazy" />
                    }
                    .into_any(),
                    None => view! { <Icon icon=fallback_icon /> }.into_any(),
                }}
            </div>
            <span class=css::name>{item.name.clone()}</span>
            <button
                class=css::info
                title="Details"
                on:click=move |ev| info_click(ev, IconRegion::Info)
            >
                <Icon icon=ic::INFO />
            </button>
        </div>
    }
}
