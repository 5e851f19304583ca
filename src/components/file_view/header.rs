//! Toolbar and folder header.
//!
//! The toolbar holds navigation, search, view style, selection and folder
//! actions. The folder header shows where the view is: the hierarchy as
//! breadcrumbs plus the folder description.

use leptos::prelude::*;
use leptos_icons::Icon;
use mollify_core::{FilesystemItem, FolderTarget, Header, Root, ViewStyle};

use super::{collect_files, event_input};
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::{dom, sanitize_html};

stylance::import_crate_style!(css, "src/components/file_view/header.module.css");

fn button_class(disabled: bool) -> String {
    if disabled {
        format!("{} {}", css::button, css::buttonDisabled)
    } else {
        css::button.to_string()
    }
}

fn toggle_class(active: bool) -> String {
    if active {
        format!("{} {}", css::button, css::buttonActive)
    } else {
        css::button.to_string()
    }
}

// =============================================================================
// Toolbar
// =============================================================================

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let can_back = Signal::derive(move || ctx.view.with(|v| v.can_go_back()));
    let can_forward = Signal::derive(move || ctx.view.with(|v| v.can_go_forward()));

    let on_back = move |_: leptos::ev::MouseEvent| ctx.navigate(|v| v.go_back());
    let on_forward = move |_: leptos::ev::MouseEvent| ctx.navigate(|v| v.go_forward());
    let on_refresh = move |_: leptos::ev::MouseEvent| ctx.navigate(|v| v.refresh());

    view! {
        <div class=css::toolbar role="toolbar">
            <div class=css::group>
                <button
                    class=move || button_class(!can_back.get())
                    on:click=on_back
                    disabled=move || !can_back.get()
                    title="Back"
                >
                    <Icon icon=ic::CHEVRON_LEFT />
                </button>
                <button
                    class=move || button_class(!can_forward.get())
                    on:click=on_forward
                    disabled=move || !can_forward.get()
                    title="Forward"
                >
                    <Icon icon=ic::CHEVRON_RIGHT />
                </button>
                <button class=css::button on:click=on_refresh title="Refresh">
                    <Icon icon=ic::REFRESH />
                </button>
            </div>

            <SearchBox />
            <ViewStyleButtons />
            <SelectionButtons />
            <FolderActions />
        </div>
    }
}

#[component]
fn SearchBox() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let text = RwSignal::new(String::new());

    let submit = move || {
        let query = text.get_untracked();
        ctx.navigate(|v| v.search(&query));
    };
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            submit();
        }
    };

    view! {
        <div class=css::search>
            <span class=css::searchIcon><Icon icon=ic::SEARCH /></span>
            <input
                class=css::searchInput
                type="search"
                placeholder="Search"
                prop:value=move || text.get()
                on:input=move |ev| text.set(event_target_value(&ev))
                on:keydown=on_keydown
            />
        </div>
    }
}

#[component]
fn ViewStyleButtons() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let style = Signal::derive(move || ctx.view.with(|v| v.view_style()));

    let set_style = move |target: ViewStyle| {
        ctx.navigate(|v| v.set_view_style(target));
    };

    view! {
        <div class=css::group>
            <button
                class=move || toggle_class(style.get() == ViewStyle::List)
                on:click=move |_| set_style(ViewStyle::List)
                title="List"
            >
                <Icon icon=ic::LIST />
            </button>
            <button
                class=move || toggle_class(style.get() == ViewStyle::SmallIcons)
                on:click=move |_| set_style(ViewStyle::SmallIcons)
                title="Small icons"
            >
                <Icon icon=ic::GRID />
            </button>
            <button
                class=move || {
                    format!("{} {}", toggle_class(style.get() == ViewStyle::LargeIcons), css::large)
                }
                on:click=move |_| set_style(ViewStyle::LargeIcons)
                title="Large icons"
            >
                <Icon icon=ic::GRID />
            </button>
        </div>
    }
}

#[component]
fn SelectionButtons() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let active = Signal::derive(move || ctx.view.with(|v| v.selection().is_active()));
    let count = Signal::derive(move || ctx.view.with(|v| v.selection().len()));

    view! {
        <div class=css::group>
            <button
                class=move || toggle_class(active.get())
                on:click=move |_| ctx.view.update(|v| v.toggle_select_mode())
                title="Select"
            >
                <Icon icon=ic::CHECKED />
            </button>
            <Show when=move || active.get()>
                <button
                    class=css::textButton
                    on:click=move |_| ctx.view.update(|v| v.select_all())
                >
                    {ctx.text("mainViewFileViewSelectAll")}
                </button>
                <button
                    class=css::textButton
                    on:click=move |_| ctx.view.update(|v| v.select_none())
                >
                    {ctx.text("mainViewFileViewSelectNone")}
                </button>
                <span class=css::count>{move || count.get()}</span>
            </Show>
        </div>
    }
}

#[component]
fn FolderActions() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let writable = Signal::derive(move || ctx.view.with(|v| v.upload_target().is_some()));
    let can_retrieve = Signal::derive(move || ctx.view.with(|v| v.can_retrieve_url()));

    let on_new_folder = move |_: leptos::ev::MouseEvent| {
        let Some(name) = dom::prompt(&ctx.text("mainviewCreateFolderMessage"), "") else {
            return;
        };
        if let Some(command) = ctx.view.with_untracked(|v| v.create_folder(&name)) {
            ctx.execute(command);
        }
    };

    let on_retrieve = move |_: leptos::ev::MouseEvent| {
        let Some(url) = dom::prompt(&ctx.text("mainviewRetrieveFileMessage"), "http://") else {
            return;
        };
        match ctx.view.with_untracked(|v| v.retrieve_url(&url)) {
            Some(command) => ctx.execute(command),
            None => log::debug!("Ignoring retrieve of {:?}", url),
        }
    };

    let on_files = move |ev: leptos::ev::Event| {
        let Some(input) = event_input(&ev) else {
            return;
        };
        if let Some(list) = input.files() {
            ctx.upload(collect_files(&list));
        }
        input.set_value("");
    };

    view! {
        <Show when=move || writable.get()>
            <div class=css::group>
                <button
                    class=css::button
                    on:click=on_new_folder
                    title=ctx.text("mainviewCreateFolderTitle")
                >
                    <Icon icon=ic::PLUS />
                </button>
                <Show when=move || can_retrieve.get()>
                    <button
                        class=css::button
                        on:click=on_retrieve
                        title=ctx.text("mainviewRetrieveFileTitle")
                    >
                        <Icon icon=ic::DOWNLOAD />
                    </button>
                </Show>
                <label class=css::button title="Upload">
                    <Icon icon=ic::UPLOAD />
                    <input class=css::fileInput type="file" multiple=true on:change=on_files />
                </label>
            </div>
        </Show>
    }
}

// =============================================================================
// Folder Header
// =============================================================================

#[component]
pub fn FolderHeader() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let header = Memo::new(move |_| ctx.view.with(|v| v.header()));

    view! {
        {move || match header.get() {
            Header::None => ().into_any(),
            Header::NoRoots { message } => view! {
                <div class=css::folderHeader>
                    <span class=css::titleIcon><Icon icon=ic::HOME /></span>
                    <span class=css::message>{message}</span>
                </div>
            }
            .into_any(),
            Header::Roots { title } => view! {
                <div class=css::folderHeader>
                    <span class=css::titleIcon><Icon icon=ic::HOME /></span>
                    <h2 class=css::title>{title}</h2>
                </div>
            }
            .into_any(),
            Header::Folder {
                name,
                writable,
                hierarchy,
                root,
                description,
                description_editable,
            } => view! {
                <div class=css::folderHeader>
                    <Breadcrumbs root=root hierarchy=hierarchy />
                    <h2 class=css::title>
                        <span class=css::titleIcon><Icon icon=ic::FOLDER /></span>
                        {name}
                        {(!writable).then(|| view! { <span class=css::readOnly>"read-only"</span> })}
                    </h2>
                    <Description description=description editable=description_editable />
                </div>
            }
            .into_any(),
            Header::Custom(custom) => view! {
                <div class=css::folderHeader>
                    <h2 class=css::title>
                        <span class=css::titleIcon><Icon icon=ic::SEARCH /></span>
                        {custom.title}
                    </h2>
                    <p class=css::description>{custom.description}</p>
                </div>
            }
            .into_any(),
        }}
    }
}

/// Root and ancestors of the shown folder; each navigates there.
#[component]
fn Breadcrumbs(root: Option<Root>, hierarchy: Vec<FilesystemItem>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let open = move |target: FolderTarget| {
        ctx.navigate(|v| match v.change_to_folder(target, true) {
            Ok(step) => step,
            Err(e) => {
                log::warn!("Breadcrumb navigation failed: {}", e);
                mollify_core::Step::Idle
            }
        });
    };

    let root_crumb = root.map(|root| {
        let name = root.name.clone();
        let target = FolderTarget::from(&root);
        view! {
            <button class=css::crumb on:click=move |_| open(target.clone())>
                <Icon icon=ic::HOME />
                <span>{name}</span>
            </button>
        }
    });

    let crumbs = hierarchy
        .into_iter()
        .filter(|item| !item.is_root())
        .map(|item| {
            let target = FolderTarget::from(&item);
            view! {
                <span class=css::separator><Icon icon=ic::CHEVRON_RIGHT /></span>
                <button class=css::crumb on:click=move |_| open(target.clone())>
                    {item.name}
                </button>
            }
        })
        .collect_view();

    view! {
        <nav class=css::breadcrumbs aria-label="Folder hierarchy">
            {root_crumb}
            {crumbs}
        </nav>
    }
}

#[component]
fn Description(description: Option<String>, editable: bool) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let current = description.clone().unwrap_or_default();
    let on_edit = move |_: leptos::ev::MouseEvent| {
        let Some(text) = dom::prompt(&ctx.text("mainviewDescriptionHint"), &current) else {
            return;
        };
        if let Some(command) = ctx.view.with_untracked(|v| v.set_description(&text)) {
            ctx.execute(command);
        }
    };

    let html = description.map(|d| sanitize_html(&d));
    if html.is_none() && !editable {
        return ().into_any();
    }

    view! {
        <div class=css::descriptionRow>
            {html.map(|html| view! { <div class=css::description inner_html=html></div> })}
            {editable.then(|| view! {
                <button
                    class=css::button
                    on:click=on_edit
                    title=ctx.text("mainviewDescriptionHint")
                >
                    <Icon icon=ic::EDIT />
                </button>
            })}
        </div>
    }
    .into_any()
}
