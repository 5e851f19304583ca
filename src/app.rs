//! Root application module.
//!
//! Contains the App component and [`AppContext`], which owns the
//! [`FileView`] state and runs the I/O it asks for.

use std::sync::Arc;

use leptos::prelude::*;
use mollify_core::service::{ApiRequest, Method, decode_response, endpoints};
use mollify_core::upload::HideTicket;
use mollify_core::{
    ActivateParams, Command, DragPayload, FileView, FilesystemItem, Notice, Outcome, Session,
    SharedService, Step, Texts, ViewEnv,
};
use wasm_bindgen_futures::spawn_local;

use crate::components::file_view::FileViewPage;
use crate::config::{NOTICE_TIMEOUT_MS, PATH_PARAM, SERVICE_BASE_URL, SESSION_PATH, TEXTS_PATH};
use crate::utils::{HttpService, delay, dom, fetch, upload_files};

// ============================================================================
// AppContext
// ============================================================================

/// A notice on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShownNotice {
    pub id: u64,
    pub notice: Notice,
}

/// Application-wide reactive context.
///
/// `Copy` because every field is a signal or stored value handle.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// View model; every transition goes through `update`.
    pub view: RwSignal<FileView>,
    /// Session loaded and view activated.
    pub ready: RwSignal<bool>,
    pub notices: RwSignal<Vec<ShownNotice>>,
    /// Item shown in the details popup.
    pub details: RwSignal<Option<FilesystemItem>>,
    /// Current drag, typed at the source.
    pub drag: RwSignal<Option<DragPayload>>,
    service: StoredValue<SharedService>,
    http: StoredValue<Arc<HttpService>>,
    notice_seq: StoredValue<u64>,
}

impl AppContext {
    pub fn new() -> Self {
        let http = Arc::new(HttpService::new(SERVICE_BASE_URL));
        let service: SharedService = http.clone();
        Self {
            view: RwSignal::new(FileView::new(ViewEnv::new(
                Session::default(),
                Texts::default(),
            ))),
            ready: RwSignal::new(false),
            notices: RwSignal::new(Vec::new()),
            details: RwSignal::new(None),
            drag: RwSignal::new(None),
            service: StoredValue::new(service),
            http: StoredValue::new(http),
            notice_seq: StoredValue::new(0),
        }
    }

    /// Localized text.
    pub fn text(&self, key: &str) -> String {
        self.view.with_untracked(|v| v.texts().get(key))
    }

    /// Absolute URL of a service path.
    pub fn service_url(&self, path: &str) -> String {
        self.http.with_value(|http| http.url(path))
    }

    // ------------------------------------------------------------------------
    // Running view requests
    // ------------------------------------------------------------------------

    /// Apply a transition and run whatever it asks for.
    pub fn navigate(self, transition: impl FnOnce(&mut FileView) -> Step) {
        if let Some(step) = self.view.try_update(transition) {
            self.run(step);
        }
    }

    /// Resolve a pending request and feed the result back.
    pub fn run(self, step: Step) {
        let Step::Fetch(pending) = step else {
            return;
        };
        let service = self.service.get_value();
        spawn_local(async move {
            let resolution = pending.resolve(service.as_ref()).await;
            if let Some(outcome) = self.view.try_update(|v| v.apply(resolution)) {
                self.settle(outcome);
            }
        });
    }

    /// Run a backend mutation.
    pub fn execute(self, command: Command) {
        let service = self.service.get_value();
        spawn_local(async move {
            let result = command.run(service.as_ref()).await;
            if let Some(outcome) = self.view.try_update(|v| v.command_finished(&command, result)) {
                self.settle(outcome);
            }
        });
    }

    fn settle(self, outcome: Outcome) {
        let Outcome {
            applied,
            notices,
            next,
            hide_progress,
        } = outcome;
        for notice in notices {
            self.notify(notice);
        }
        if let Some(ticket) = hide_progress {
            self.schedule_hide(ticket);
        }
        if applied {
            self.sync_location();
        }
        self.run(next);
    }

    fn sync_location(self) {
        if let Some(location) = self.view.with_untracked(|v| v.location()) {
            dom::replace_hash(&location);
        }
    }

    // ------------------------------------------------------------------------
    // Notices
    // ------------------------------------------------------------------------

    pub fn notify(self, notice: Notice) {
        let id = self.notice_seq.get_value() + 1;
        self.notice_seq.set_value(id);
        self.notices.update(|n| n.push(ShownNotice { id, notice }));
        spawn_local(async move {
            delay(NOTICE_TIMEOUT_MS).await;
            self.dismiss(id);
        });
    }

    pub fn dismiss(self, id: u64) {
        self.notices.update(|n| n.retain(|shown| shown.id != id));
    }

    // ------------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------------

    /// Upload files into the shown folder.
    pub fn upload(self, files: Vec<web_sys::File>) {
        if files.is_empty() {
            return;
        }
        let names: Vec<String> = files.iter().map(|f| f.name()).collect();
        let Some(target) = self
            .view
            .with_untracked(|v| v.upload_target().map(str::to_string))
        else {
            log::debug!("Upload ignored, folder is not writable");
            return;
        };
        if let Err(notice) = self.view.with_untracked(|v| v.is_upload_allowed(&names)) {
            self.notify(notice);
            return;
        }

        self.view.update(|v| v.upload_started(&names));
        let url = self.service_url(&endpoints::files(&target));
        let view = self.view;
        spawn_local(async move {
            let result = upload_files(&url, &files, move |percent, speed| {
                view.update(|v| v.upload_progress_changed(percent, speed));
            })
            .await;
            let outcome = self.view.try_update(|v| match result {
                Ok(()) => v.upload_finished(),
                Err(err) => {
                    log::warn!("Upload to {} failed: {}", target, err);
                    v.upload_failed()
                }
            });
            if let Some(outcome) = outcome {
                self.settle(outcome);
            }
        });
    }

    fn schedule_hide(self, ticket: HideTicket) {
        use mollify_core::config::{UPLOAD_ANIMATION_MS, UPLOAD_HIDE_DELAY_MS};

        spawn_local(async move {
            delay(UPLOAD_HIDE_DELAY_MS as i32).await;
            let started = self
                .view
                .try_update(|v| v.upload_progress_mut().begin_hide(ticket));
            if started == Some(true) {
                delay(UPLOAD_ANIMATION_MS as i32).await;
                self.view.update(|v| {
                    v.upload_progress_mut().finish_hide(ticket);
                });
            }
        });
    }

    // ------------------------------------------------------------------------
    // Startup
    // ------------------------------------------------------------------------

    /// Load the session, build the view and open the initial folder.
    pub fn boot(self) {
        spawn_local(async move {
            let session = match load_session().await {
                Ok(session) => session,
                Err(err) => {
                    log::error!("Cannot load session: {}", err);
                    Session::default()
                }
            };
            log::debug!("Session with {} roots", session.roots.len());
            let texts = match load_texts().await {
                Ok(texts) => texts,
                Err(err) => {
                    log::warn!("Using built-in texts: {}", err);
                    Texts::default()
                }
            };

            let params = ActivateParams {
                path: dom::query_param(PATH_PARAM),
                view_id: Some(dom::get_hash()).filter(|h| !h.is_empty()),
            };
            let env = ViewEnv::new(session, texts);
            self.view.set(FileView::new(env));
            self.navigate(|v| v.activate(params));
            self.ready.set(true);
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

async fn load_session() -> Result<Session, mollify_core::ServiceError> {
    let request = ApiRequest {
        method: Method::Get,
        path: SESSION_PATH.to_string(),
        body: None,
    };
    let response = fetch::send(SERVICE_BASE_URL, &request).await?;
    decode_response(response.status, &response.body)
}

async fn load_texts() -> Result<Texts, mollify_core::ServiceError> {
    let request = ApiRequest {
        method: Method::Get,
        path: TEXTS_PATH.to_string(),
        body: None,
    };
    let response = fetch::send("", &request).await?;
    Texts::from_response(response.status, &response.body)
}

// ============================================================================
// App
// ============================================================================

/// Root application component with error boundary.
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);
    ctx.boot();

    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::Closure;

        // Location bar edits and browser navigation
        let closure = Closure::wrap(Box::new(move || {
            let hash = dom::get_hash();
            if !hash.is_empty() && ctx.ready.get_untracked() {
                ctx.navigate(|v| v.restore(&hash));
            }
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    font-family: sans-serif;
                ">
                    <h1 style="color: #c0392b; margin-bottom: 1rem;">
                        "Something went wrong"
                    </h1>
                    <ul style="color: #c0392b; font-size: 0.9rem;">
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button
                        on:click=move |_| {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                        style="padding: 0.5rem 1.5rem; cursor: pointer;"
                    >
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <FileViewPage />
        </ErrorBoundary>
    }
}
