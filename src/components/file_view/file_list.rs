//! List (table) view of the shown folder.
//!
//! Column 0 is the select box, column 1 the item icon; the configured
//! columns follow. Cell clicks are routed through the core list widget so
//! the column index mapping lives in one place.

use leptos::prelude::*;
use leptos_icons::Icon;
use mollify_core::widgets::{HeaderCell, Row};
use mollify_core::{CellContent, SortDirection};

use super::{dispatch, drag_over, drop_on, end_drag, start_drag};
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::sanitize_html;

stylance::import_crate_style!(css, "src/components/file_view/file_list.module.css");

/// Index of the first configured column in click routing.
const FIRST_COLUMN: usize = 2;

/// A column resize in progress.
#[derive(Clone, Debug)]
struct Resize {
    column: String,
    start_x: i32,
    start_width: u32,
}

#[component]
pub fn ListView() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let resizing = RwSignal::new(None::<Resize>);

    let on_mousemove = move |ev: leptos::ev::MouseEvent| {
        let Some(resize) = resizing.get_untracked() else {
            return;
        };
        let delta = ev.client_x() - resize.start_x;
        let width = (resize.start_width as i32 + delta).max(0) as u32;
        ctx.view.update(|v| {
            v.resize_column(&resize.column, width);
        });
    };
    let stop_resize = move |_: leptos::ev::MouseEvent| resizing.set(None);

    let table = move || {
        ctx.view.with(|v| {
            let Some(list) = v.widget().as_list() else {
                return (Vec::new(), Vec::new(), false);
            };
            (
                list.header_cells(v.texts()),
                list.rows(),
                v.selection().is_active(),
            )
        })
    };

    view! {
        <div
            class=css::list
            role="grid"
            on:mousemove=on_mousemove
            on:mouseup=stop_resize
            on:mouseleave=stop_resize
        >
            {move || {
                let (headers, rows, select_mode) = table();
                let widths: Vec<Option<u32>> = headers.iter().map(|h| h.width).collect();
                view! {
                    <div class=css::headerRow role="row">
                        {select_mode.then(|| view! { <span class=css::selectCell></span> })}
                        <span class=css::iconCell></span>
                        {headers
                            .into_iter()
                            .map(|cell| view! { <HeaderCellView cell=cell resizing=resizing /> })
                            .collect_view()}
                    </div>
                    {rows
                        .into_iter()
                        .map(|row| view! {
                            <ListRow row=row widths=widths.clone() select_mode=select_mode />
                        })
                        .collect_view()}
                }
            }}
        </div>
    }
}

#[component]
fn HeaderCellView(cell: HeaderCell, resizing: RwSignal<Option<Resize>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let HeaderCell {
        id,
        title,
        width,
        min_width,
        sort,
    } = cell;
    let sort_id = id.clone();
    let on_click = move |_: leptos::ev::MouseEvent| {
        ctx.view.update(|v| v.sort_by(&sort_id));
    };

    let resize_id = id.clone();
    let on_resize_start = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        ev.prevent_default();
        resizing.set(Some(Resize {
            column: resize_id.clone(),
            start_x: ev.client_x(),
            start_width: width.unwrap_or(min_width),
        }));
    };

    let class = match sort {
        Some(direction) => format!("{} {}", css::headerCell, direction.css_class()),
        None => css::headerCell.to_string(),
    };

    view! {
        <span
            class=class
            role="columnheader"
            style=column_style(width, min_width)
            on:click=on_click
            data-column=id
        >
            <span class=css::headerTitle>{title}</span>
            {sort.map(|direction| {
                let icon = match direction {
                    SortDirection::Ascending => ic::SORT_ASC,
                    SortDirection::Descending => ic::SORT_DESC,
                };
                view! { <span class=css::sortIndicator><Icon icon=icon /></span> }
            })}
            <span class=css::resizeHandle on:mousedown=on_resize_start></span>
        </span>
    }
}

fn column_style(width: Option<u32>, min_width: u32) -> String {
    match width {
        Some(width) => format!("width: {}px; min-width: {}px;", width, min_width),
        None => format!("flex: 1; min-width: {}px;", min_width),
    }
}

#[component]
fn ListRow(row: Row, widths: Vec<Option<u32>>, select_mode: bool) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let Row {
        item,
        type_class,
        cells,
    } = row;
    let id = item.id.clone();
    let selected = ctx.view.with_untracked(|v| v.selection().contains(&id));
    let tooltip = ctx
        .view
        .with_untracked(|v| v.item_tooltip(&id).map(str::to_string));
    let icon = ic::for_item(item.is_file, item.file_extension());

    let click = {
        let id = id.clone();
        move |column: usize| {
            let event = ctx
                .view
                .with_untracked(|v| v.widget().as_list().and_then(|l| l.click(&id, column)));
            dispatch(ctx, event);
        }
    };
    let right_click = {
        let id = id.clone();
        move |column: usize| {
            let event = ctx.view.with_untracked(|v| {
                v.widget()
                    .as_list()
                    .and_then(|l| l.right_click(&id, column))
            });
            dispatch(ctx, event);
        }
    };
    let dbl_id = id.clone();
    let on_dblclick = move |_: leptos::ev::MouseEvent| {
        let event = ctx
            .view
            .with_untracked(|v| v.widget().as_list().and_then(|l| l.dbl_click(&dbl_id)));
        dispatch(ctx, event);
    };

    let drag_item = item.clone();
    let over_item = item.clone();
    let drop_item = item.clone();
    let is_folder = item.is_folder();

    let class = {
        let mut class = format!("{} {}", css::row, type_class);
        if selected {
            class = format!("{} {}", class, css::selected);
        }
        class
    };

    let cell_views = cells
        .into_iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (cell, width))| {
            let column = index + FIRST_COLUMN;
            let click = click.clone();
            let right_click = right_click.clone();
            view! {
                <span
                    class=css::cell
                    role="gridcell"
                    style=column_style(width, 0)
                    on:click=move |_| click(column)
                    on:contextmenu=move |ev: leptos::ev::MouseEvent| {
                        ev.prevent_default();
                        right_click(column);
                    }
                >
                    {cell_view(cell)}
                </span>
            }
        })
        .collect_view();

    let check_icon = if selected { ic::CHECKED } else { ic::UNCHECKED };
    let select_click = click.clone();
    let icon_click = click.clone();
    let icon_right_click = right_click.clone();

    view! {
        <div
            class=class
            role="row"
            title=tooltip
            aria-selected=selected.to_string()
            draggable="true"
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
            on:dblclick=on_dblclick
        >
            {select_mode.then(|| view! {
                <span class=css::selectCell on:click=move |_| select_click(0)>
                    <Icon icon=check_icon />
                </span>
            })}
            <span
                class=css::iconCell
                on:click=move |_| icon_click(1)
                on:contextmenu=move |ev: leptos::ev::MouseEvent| {
                    ev.prevent_default();
                    icon_right_click(1);
                }
            >
                <Icon icon=icon />
            </span>
            {cell_views}
        </div>
    }
}

fn cell_view(cell: CellContent) -> AnyView {
    match cell {
        CellContent::Empty => ().into_any(),
        CellContent::Text(text) => view! { <span>{text}</span> }.into_any(),
        CellContent::RootPath { root, path } => view! {
            <span class=css::rootName>{root}</span>
            <span>{format!("/{}", path)}</span>
        }
        .into_any(),
        CellContent::Html { html, tooltip } => {
            view! { <span title=tooltip inner_html=sanitize_html(&html)></span> }.into_any()
        }
        CellContent::GoIntoFolder => view! {
            <span class=css::goInto><Icon icon=ic::CHEVRON_RIGHT /></span>
        }
        .into_any(),
    }
}
