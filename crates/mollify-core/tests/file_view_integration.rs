//! File view navigation against the mock service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mollify_core::config::{FEATURE_DESCRIPTIONS, FEATURE_RETRIEVE_URL, Features};
use mollify_core::error::codes;
use mollify_core::mock::{MockService, folder_info};
use mollify_core::upload::UploadRules;
use mollify_core::widgets::IconRegion;
use mollify_core::{
    Action, ActivateParams, ClickTarget, Command, CustomFolder, DataRequest, DragPayload,
    FileView, FilesystemItem, FilesystemService, FolderData, FolderTarget, FolderType, Header,
    ItemWidget, MatchInfo, NavState, Notice, Outcome, Root, SearchMatch, SearchResult,
    ServiceError, ServiceFuture, Session, Step, Texts, ViewEnv, ViewStyle, WidgetEvent,
};

// =============================================================================
// Fixtures
// =============================================================================

fn root() -> Root {
    Root::new("r1", "Docs")
}

fn docs() -> FilesystemItem {
    FilesystemItem::folder("d1", "r1", "docs", "docs/").with_parent("r1")
}

fn file(id: &str, name: &str, size: u64) -> FilesystemItem {
    FilesystemItem::file(id, "r1", name, name, size).with_parent("r1")
}

fn root_listing() -> MockService {
    MockService::new()
        .with_folder(folder_info(
            root().to_item(),
            vec![docs(), file("f1", "b.txt", 100), file("f2", "a.txt", 9)],
        ))
        .with_folder(folder_info(
            docs(),
            vec![FilesystemItem::file("f3", "r1", "c.txt", "docs/c.txt", 20).with_parent("d1")],
        ))
}

fn view_with(session: Session) -> FileView {
    FileView::new(ViewEnv::new(session, Texts::default()))
}

fn view(roots: Vec<Root>) -> FileView {
    view_with(Session::with_roots(roots))
}

/// Resolve and apply a step and every follow-up step.
async fn run(view: &mut FileView, service: &MockService, mut step: Step) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    while let Step::Fetch(pending) = step {
        let resolution = pending.resolve(service).await;
        let mut outcome = view.apply(resolution);
        step = std::mem::replace(&mut outcome.next, Step::Idle);
        outcomes.push(outcome);
    }
    outcomes
}

async fn run_command(view: &mut FileView, service: &MockService, command: Command) -> Outcome {
    let result = command.run(service).await;
    let mut outcome = view.command_finished(&command, result);
    let next = std::mem::replace(&mut outcome.next, Step::Idle);
    run(view, service, next).await;
    outcome
}

fn ids(view: &FileView) -> Vec<&str> {
    view.widget().items().iter().map(|i| i.id.as_str()).collect()
}

// =============================================================================
// Activation
// =============================================================================

#[tokio::test]
async fn test_single_root_opens_directly() {
    let service = root_listing();
    let mut view = view(vec![root()]);

    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    assert_eq!(view.state(), &NavState::Folder("r1".into()));
    assert_eq!(service.calls(), ["folder_info:r1"]);
    assert_eq!(view.location().as_deref(), Some("r1"));
    assert!(matches!(view.header(), Header::Folder { writable: true, .. }));
}

#[tokio::test]
async fn test_no_roots_never_fetches() {
    let service = root_listing();
    let mut view = view(Vec::new());

    let step = view.activate(ActivateParams {
        path: Some("Docs/docs".into()),
        view_id: Some("r1".into()),
    });
    assert!(!step.is_fetch());
    assert_eq!(view.state(), &NavState::NoRoots);
    assert!(service.calls().is_empty());
    assert!(matches!(view.header(), Header::NoRoots { .. }));
}

#[tokio::test]
async fn test_path_lookup() {
    let service = root_listing().with_path("Docs/docs", Ok(folder_info(docs(), Vec::new())));
    let mut view = view(vec![root()]);

    let step = view.activate(ActivateParams {
        path: Some("Docs/docs".into()),
        view_id: None,
    });
    run(&mut view, &service, step).await;

    assert_eq!(view.state(), &NavState::Folder("d1".into()));
    assert_eq!(service.calls(), ["find_folder:Docs/docs"]);
}

#[tokio::test]
async fn test_missing_path_falls_back_to_initial_folder() {
    let service = root_listing();
    let mut view = view(vec![root()]);

    let step = view.activate(ActivateParams {
        path: Some("Docs/gone".into()),
        view_id: None,
    });
    let outcomes = run(&mut view, &service, step).await;

    assert_eq!(
        outcomes[0].notices,
        [Notice::Error("Folder \"Docs/gone\" was not found.".into())]
    );
    assert_eq!(service.calls(), ["find_folder:Docs/gone", "folder_info:r1"]);
    assert_eq!(view.state(), &NavState::Folder("r1".into()));
}

#[tokio::test]
async fn test_stored_view_id_is_restored() {
    let service = root_listing();
    let mut view = view(vec![root(), Root::new("r2", "Media")]);

    let step = view.activate(ActivateParams {
        path: None,
        view_id: Some("d1".into()),
    });
    run(&mut view, &service, step).await;
    assert_eq!(view.state(), &NavState::Folder("d1".into()));
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_change_clears_selection_before_data_arrives() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    view.select_all();
    assert_eq!(view.selection().len(), 3);

    let step = view
        .change_to_folder(FolderTarget::from(&docs()), true)
        .unwrap();
    assert!(view.selection().is_empty());
    assert!(view.is_loading());

    run(&mut view, &service, step).await;
    assert!(view.selection().is_empty());
    assert_eq!(ids(&view), ["f3"]);
}

#[tokio::test]
async fn test_failure_keeps_current_folder() {
    let service = root_listing().with_folder_error("d9", ServiceError::Http(500));
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;
    view.select_all();

    let step = view
        .change_to_folder(FolderTarget::Id("d9".into()), true)
        .unwrap();
    let outcomes = run(&mut view, &service, step).await;

    assert!(outcomes[0].notices.is_empty());
    assert_eq!(view.state(), &NavState::Folder("r1".into()));
    assert_eq!(view.location().as_deref(), Some("r1"));
    assert!(view.selection().is_empty());
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let service = root_listing();
    let mut view = view(vec![root()]);

    let slow = view
        .change_to_folder(FolderTarget::Id("r1".into()), true)
        .unwrap()
        .pending()
        .unwrap();
    let fast = view
        .change_to_folder(FolderTarget::from(&docs()), true)
        .unwrap()
        .pending()
        .unwrap();
    assert!(fast.token() > slow.token());

    let fast_result = fast.resolve(&service).await;
    assert!(view.apply(fast_result).applied);
    let slow_result = slow.resolve(&service).await;
    assert!(!view.apply(slow_result).applied);

    assert_eq!(view.state(), &NavState::Folder("d1".into()));
    assert_eq!(ids(&view), ["f3"]);
}

#[tokio::test]
async fn test_deactivate_discards_in_flight_results() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let pending = view.activate(ActivateParams::default()).pending().unwrap();
    view.deactivate();

    let result = pending.resolve(&service).await;
    assert!(!view.apply(result).applied);
    assert_eq!(view.state(), &NavState::NoFolder);
}

#[tokio::test]
async fn test_refresh_reconciles_selection() {
    let mut service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;
    view.select_all();

    service = service.with_folder(folder_info(root().to_item(), vec![file("f1", "b.txt", 100)]));
    let step = view.refresh();
    run(&mut view, &service, step).await;

    assert_eq!(view.selection().ids(), ["f1"]);
    assert!(view.selection().is_active());
}

#[tokio::test]
async fn test_refresh_without_folder_is_noop() {
    let mut view = view(vec![root()]);
    assert!(!view.refresh().is_fetch());
}

#[tokio::test]
async fn test_filesystem_events_refresh() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    assert!(!view.on_event("session/end").is_fetch());
    let step = view.on_event("filesystem/copy");
    run(&mut view, &service, step).await;
    assert_eq!(service.call_count("folder_info:r1"), 2);
}

#[tokio::test]
async fn test_history_back_and_forward() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;
    let step = view
        .change_to_folder(FolderTarget::from(&docs()), true)
        .unwrap();
    run(&mut view, &service, step).await;

    let step = view.go_back();
    run(&mut view, &service, step).await;
    assert_eq!(view.location().as_deref(), Some("r1"));
    assert!(view.can_go_forward());

    let step = view.go_forward();
    run(&mut view, &service, step).await;
    assert_eq!(view.location().as_deref(), Some("d1"));
    assert!(!view.can_go_forward());
}

#[tokio::test]
async fn test_data_request_follows_columns() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    let rq = &service.data_requests()[0];
    assert!(rq.contains("core-file-modified"));
    assert!(rq.contains("core-parent-description"));
}

// =============================================================================
// Search
// =============================================================================

fn search_result() -> SearchResult {
    let mut result = SearchResult {
        count: 1,
        ..SearchResult::default()
    };
    result.matches.insert(
        "f1".into(),
        SearchMatch {
            item: file("f1", "report.txt", 10),
            matches: vec![MatchInfo {
                match_type: "name".into(),
                extra: Default::default(),
            }],
        },
    );
    result
}

#[tokio::test]
async fn test_search_results() {
    let service = root_listing().with_search("report", search_result());
    let mut view = view(vec![root()]);

    let step = view.search("report");
    run(&mut view, &service, step).await;

    assert_eq!(
        view.state(),
        &NavState::CustomFolder {
            folder_type: "search".into(),
            id: "report".into()
        }
    );
    assert_eq!(view.location().as_deref(), Some("search/report"));
    assert_eq!(ids(&view), ["f1"]);
    assert_eq!(view.item_tooltip("f1"), Some("Matches: name"));
    match view.header() {
        Header::Custom(header) => {
            assert_eq!(header.description, "Found 1 items matching \"report\"")
        }
        other => panic!("unexpected header {:?}", other),
    }
    assert!(!service.data_requests()[0].contains("core-parent-description"));
}

#[tokio::test]
async fn test_empty_search_id_skips_backend() {
    let service = root_listing();
    let mut view = view(vec![root()]);

    let step = view
        .change_to_folder(FolderTarget::Id("search/".into()), true)
        .unwrap();
    run(&mut view, &service, step).await;

    assert!(service.calls().is_empty());
    assert!(view.widget().items().is_empty());
}

#[tokio::test]
async fn test_unknown_folder_type_is_rejected() {
    let mut view = view(vec![root()]);
    assert!(
        view.change_to_folder(FolderTarget::Id("tags/red".into()), true)
            .is_err()
    );
    assert!(!view.is_loading());
}

/// Custom type counting how often its folders are left.
#[derive(Default)]
struct TaggedFolders {
    deselected: AtomicUsize,
}

impl FolderType for TaggedFolders {
    fn select_folder<'a>(
        &'a self,
        _id: &'a str,
        _service: &'a dyn FilesystemService,
        _data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderData> {
        Box::pin(async {
            Ok(FolderData {
                items: vec![file("f1", "b.txt", 100)],
                ..FolderData::default()
            })
        })
    }

    fn on_folder_deselect(&self, folder: &CustomFolder) {
        assert_eq!(folder.id, "red");
        self.deselected.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_leaving_custom_folder_runs_deselect_hook() {
    let service = root_listing();
    let tags = Arc::new(TaggedFolders::default());
    let mut env = ViewEnv::new(Session::with_roots(vec![root()]), Texts::default());
    env.folder_types.register("tags", tags.clone());
    let mut view = FileView::new(env);

    let step = view
        .change_to_folder(FolderTarget::Id("tags/red".into()), true)
        .unwrap();
    run(&mut view, &service, step).await;
    assert_eq!(ids(&view), ["f1"]);
    assert_eq!(tags.deselected.load(Ordering::SeqCst), 0);

    let step = view
        .change_to_folder(FolderTarget::Id("r1".into()), true)
        .unwrap();
    run(&mut view, &service, step).await;
    assert_eq!(tags.deselected.load(Ordering::SeqCst), 1);

    // Leaving a regular folder does not call it again
    let step = view.change_to_folder(FolderTarget::from(&docs()), true).unwrap();
    run(&mut view, &service, step).await;
    assert_eq!(tags.deselected.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Widgets
// =============================================================================

#[tokio::test]
async fn test_size_column_sorts_numerically() {
    let service = MockService::new().with_folder(folder_info(
        root().to_item(),
        vec![
            file("f1", "a.txt", 100),
            file("f2", "b.txt", 9),
            file("f3", "c.txt", 20),
        ],
    ));
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    view.sort_by("size");
    assert_eq!(ids(&view), ["f2", "f3", "f1"]);
    view.sort_by("size");
    assert_eq!(ids(&view), ["f1", "f3", "f2"]);
}

#[tokio::test]
async fn test_list_click_routing() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    let action = view.handle_event(WidgetEvent::Click {
        item: file("f1", "b.txt", 100),
        target: ClickTarget::Column("name".into()),
    });
    assert!(matches!(action, Action::OpenContext { view: "list", .. }));

    let action = view.handle_event(WidgetEvent::Click {
        item: docs(),
        target: ClickTarget::Icon,
    });
    assert!(matches!(action, Action::OpenContext { .. }));

    let action = view.handle_event(WidgetEvent::DblClick(file("f1", "b.txt", 100)));
    assert!(matches!(action, Action::None));

    let action = view.handle_event(WidgetEvent::RightClick {
        item: docs(),
        target: ClickTarget::Column("size".into()),
    });
    assert!(matches!(action, Action::OpenMenu(_)));

    let action = view.handle_event(WidgetEvent::Click {
        item: docs(),
        target: ClickTarget::Column("name".into()),
    });
    let Action::Navigate(step) = action else {
        panic!("expected navigation");
    };
    run(&mut view, &service, step).await;
    assert_eq!(view.location().as_deref(), Some("d1"));
}

#[tokio::test]
async fn test_icon_view_click_routing() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    let step = view.set_view_style(ViewStyle::LargeIcons);
    run(&mut view, &service, step).await;
    assert_eq!(view.view_style(), ViewStyle::LargeIcons);
    assert_eq!(ids(&view).len(), 3);

    let icons = view.widget().as_icons().unwrap();
    let info = icons.click("d1", IconRegion::Info).unwrap();
    assert!(matches!(view.handle_event(info), Action::OpenContext { view: "icon", .. }));

    let icons = view.widget().as_icons().unwrap();
    let body = icons.click("d1", IconRegion::Body).unwrap();
    assert!(matches!(view.handle_event(body), Action::Navigate(Step::Fetch(_))));
}

#[tokio::test]
async fn test_column_widths_survive_style_switch() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    assert_eq!(view.resize_column("size", 140), Some(140));
    let step = view.set_view_style(ViewStyle::SmallIcons);
    run(&mut view, &service, step).await;
    let step = view.set_view_style(ViewStyle::List);
    run(&mut view, &service, step).await;

    assert_eq!(view.widget().as_list().unwrap().width("size"), Some(140));
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_select_mode_toggle_starts_empty() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    view.set_select_mode(true);
    view.handle_event(WidgetEvent::SelectUnselect(file("f1", "b.txt", 100)));
    assert_eq!(view.selection().len(), 1);

    view.toggle_select_mode();
    view.toggle_select_mode();
    assert!(view.selection().is_active());
    assert!(view.selection().is_empty());

    view.select_all();
    view.select_none();
    assert!(view.selection().is_empty());
    assert!(view.widget().select_mode());
}

// =============================================================================
// Drag and drop
// =============================================================================

#[tokio::test]
async fn test_drop_moves_within_root_and_refreshes() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    let payload = view.drag_payload(&file("f1", "b.txt", 100));
    assert!(matches!(payload, DragPayload::Item(_)));
    assert!(!view.can_drop(&payload, &root().to_item()));

    let command = view.drop_on(&payload, &docs()).unwrap();
    run_command(&mut view, &service, command).await;

    assert_eq!(
        service.calls(),
        ["folder_info:r1", "transfer:move:f1:d1", "folder_info:r1"]
    );
}

#[tokio::test]
async fn test_dragging_selection_copies() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    view.set_select_mode(true);
    view.handle_event(WidgetEvent::SelectUnselect(file("f2", "a.txt", 9)));
    let payload = view.drag_payload(&file("f1", "b.txt", 100));
    assert_eq!(payload.items().len(), 2);

    let command = view.drop_on(&payload, &docs()).unwrap();
    run_command(&mut view, &service, command).await;
    assert_eq!(service.call_count("transfer:copy:f2,f1:d1"), 1);
}

// =============================================================================
// Folder actions
// =============================================================================

fn session_with(features: Features) -> Session {
    Session {
        features,
        ..Session::with_roots(vec![root()])
    }
}

#[tokio::test]
async fn test_retrieve_not_found_notice() {
    let service = root_listing().failing(
        "retrieve",
        ServiceError::backend(codes::RESOURCE_NOT_FOUND, "not found"),
    );
    let mut view = view_with(session_with(Features::default().with(FEATURE_RETRIEVE_URL)));
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    assert!(view.retrieve_url("ftp://example.com/a").is_none());
    let command = view.retrieve_url("HTTP://example.com/a.zip").unwrap();
    let outcome = run_command(&mut view, &service, command).await;

    assert_eq!(
        outcome.notices,
        [Notice::Error(
            "Resource \"HTTP://example.com/a.zip\" was not found.".into()
        )]
    );
}

#[tokio::test]
async fn test_create_folder_refreshes() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    assert!(view.create_folder("  ").is_none());
    let command = view.create_folder("new").unwrap();
    run_command(&mut view, &service, command).await;
    assert_eq!(service.call_count("create_folder:r1:new"), 1);
    assert_eq!(service.call_count("folder_info:r1"), 2);
}

#[tokio::test]
async fn test_description_editing() {
    let mut info = folder_info(root().to_item(), Vec::new());
    info.permissions = info.permissions.with("edit_description", true);
    let service = MockService::new().with_folder(info);

    let mut plain = view(vec![root()]);
    let step = plain.activate(ActivateParams::default());
    run(&mut plain, &service, step).await;
    assert!(plain.set_description("x").is_none());

    let mut view = view_with(session_with(Features::default().with(FEATURE_DESCRIPTIONS)));
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;

    let command = view.set_description("<b>Shared</b>").unwrap();
    run_command(&mut view, &service, command).await;
    match view.header() {
        Header::Folder {
            description,
            description_editable,
            ..
        } => {
            assert_eq!(description.as_deref(), Some("<b>Shared</b>"));
            assert!(description_editable);
        }
        other => panic!("unexpected header {:?}", other),
    }
}

// =============================================================================
// Uploads
// =============================================================================

#[tokio::test]
async fn test_forbidden_upload_warns_once() {
    let session = Session {
        filesystem: UploadRules::default().forbid(&["exe"]),
        ..Session::with_roots(vec![root()])
    };
    let view = view_with(session);

    let result = view.is_upload_allowed(&["a.txt", "setup.exe", "b.exe"]);
    assert_eq!(
        result,
        Err(Notice::Warning(
            "Uploading files of type \"exe\" is not allowed.".into()
        ))
    );
    assert!(view.is_upload_allowed(&["a.txt"]).is_ok());
}

#[tokio::test]
async fn test_upload_lifecycle() {
    let service = root_listing();
    let mut view = view(vec![root()]);
    let step = view.activate(ActivateParams::default());
    run(&mut view, &service, step).await;
    assert_eq!(view.upload_target(), Some("r1"));

    view.upload_started(&["a.txt", "b.txt"]);
    assert_eq!(view.upload_progress().title(), "Uploading 2 files");
    view.upload_progress_changed(40, 3072.0);
    assert_eq!(view.upload_progress().speed(), "3 kB/s");

    let mut outcome = view.upload_finished();
    assert_eq!(outcome.notices, [Notice::Success("Upload complete.".into())]);
    let ticket = outcome.hide_progress.unwrap();
    let next = std::mem::replace(&mut outcome.next, Step::Idle);
    run(&mut view, &service, next).await;

    assert!(view.upload_progress_mut().begin_hide(ticket));
    assert!(view.upload_progress_mut().finish_hide(ticket));
    assert!(!view.upload_progress().is_visible());
}
