//! The folder view.
//!
//! [`FileView`] owns navigation, selection, the active item widget and the
//! upload indicator. It never performs I/O: navigation returns a [`Step`]
//! whose [`Pending`] request the caller resolves against a
//! [`FilesystemService`] and feeds back through [`FileView::apply`].
//! Every pending request carries a token; only the latest is applied.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::columns::{ColumnRegistry, FILE_MODIFIED_REQUEST, ITEM_DESCRIPTION_REQUEST};
use crate::config::{
    FEATURE_DESCRIPTIONS, FEATURE_RETRIEVE_URL, FEATURE_THUMBNAILS, MAX_HISTORY, SEARCH_FOLDER_TYPE,
    Session,
};
use crate::dnd::{self, DragPayload, Transfer};
use crate::error::{NavigationError, ServiceError, codes};
use crate::folder_types::{CustomHeader, FolderType, FolderTypeRegistry, ItemHint};
use crate::format::Formatters;
use crate::models::{
    AccessLevel, CustomFolder, DataRequest, EDIT_DESCRIPTION, FilesystemItem, Folder, FolderData,
    FolderId, FolderInfo, FolderTarget, ITEM_ACCESS, PARENT_DESCRIPTION, Root, ViewStyle,
};
use crate::selection::Selection;
use crate::service::FilesystemService;
use crate::texts::Texts;
use crate::upload::{HideTicket, UploadProgress, upload_title};
use crate::widgets::{ClickTarget, FileList, IconView, ItemWidget, Widget, WidgetEvent};

// =============================================================================
// Environment
// =============================================================================

/// Everything a view needs that outlives a single activation.
#[derive(Clone, Debug)]
pub struct ViewEnv {
    pub session: Session,
    pub texts: Texts,
    pub formatters: Formatters,
    pub columns: ColumnRegistry,
    pub folder_types: FolderTypeRegistry,
}

impl ViewEnv {
    /// Environment with the built-in columns and folder types.
    pub fn new(session: Session, texts: Texts) -> Self {
        Self {
            formatters: Formatters::new(&texts),
            session,
            texts,
            columns: ColumnRegistry::with_builtins(),
            folder_types: FolderTypeRegistry::with_builtins(),
        }
    }

    pub fn roots(&self) -> &[Root] {
        &self.session.roots
    }
}

// =============================================================================
// State
// =============================================================================

/// Navigation state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NavState {
    /// Nothing selected yet, or the root selection screen.
    #[default]
    NoFolder,
    /// The user has no roots.
    NoRoots,
    Loading,
    Folder(String),
    CustomFolder { folder_type: String, id: String },
}

/// User-facing feedback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

/// Query parameters the view is activated with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivateParams {
    /// `root/path` to open.
    pub path: Option<String>,
    /// Public id of a previously shown folder.
    pub view_id: Option<String>,
}

#[derive(Clone)]
enum PendingKind {
    FolderInfo { folder_id: String },
    FindPath { path: String },
    Custom {
        folder: CustomFolder,
        handler: Arc<dyn FolderType>,
    },
}

/// A folder request waiting to be resolved.
#[derive(Clone)]
pub struct Pending {
    token: u64,
    record: bool,
    data: DataRequest,
    kind: PendingKind,
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.kind {
            PendingKind::FolderInfo { folder_id } => folder_id.clone(),
            PendingKind::FindPath { path } => format!("path:{}", path),
            PendingKind::Custom { folder, .. } => format!("{}/{}", folder.folder_type, folder.id),
        };
        f.debug_struct("Pending")
            .field("token", &self.token)
            .field("target", &target)
            .finish()
    }
}

impl Pending {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn data_request(&self) -> &DataRequest {
        &self.data
    }

    /// Run the request.
    pub async fn resolve(self, service: &dyn FilesystemService) -> Resolution {
        let result = match &self.kind {
            PendingKind::FolderInfo { folder_id } => service
                .folder_info(folder_id, &self.data)
                .await
                .map(Resolved::Folder),
            PendingKind::FindPath { path } => service
                .find_folder(path, &self.data)
                .await
                .map(Resolved::Folder),
            PendingKind::Custom { folder, handler } => handler
                .select_folder(&folder.id, service, &self.data)
                .await
                .map(Resolved::Custom),
        };
        Resolution {
            pending: self,
            result,
        }
    }
}

enum Resolved {
    Folder(FolderInfo),
    Custom(FolderData),
}

/// Result of a resolved [`Pending`].
pub struct Resolution {
    pending: Pending,
    result: Result<Resolved, ServiceError>,
}

impl Resolution {
    pub fn token(&self) -> u64 {
        self.pending.token
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// What the caller has to do next.
#[derive(Debug)]
pub enum Step {
    Idle,
    Fetch(Pending),
}

impl Step {
    pub fn pending(self) -> Option<Pending> {
        match self {
            Self::Idle => None,
            Self::Fetch(pending) => Some(pending),
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

/// Effect of applying a result.
#[derive(Debug)]
pub struct Outcome {
    /// False when a stale result was discarded.
    pub applied: bool,
    pub notices: Vec<Notice>,
    pub next: Step,
    /// Upload indicator to hide after the grace period.
    pub hide_progress: Option<HideTicket>,
}

impl Outcome {
    fn applied() -> Self {
        Self {
            applied: true,
            notices: Vec::new(),
            next: Step::Idle,
            hide_progress: None,
        }
    }

    fn discarded() -> Self {
        Self {
            applied: false,
            ..Self::applied()
        }
    }

    fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    fn then(mut self, next: Step) -> Self {
        self.next = next;
        self
    }
}

/// Reaction to a widget event.
#[derive(Debug)]
pub enum Action {
    None,
    Navigate(Step),
    SelectionChanged,
    /// Show the item details popup.
    OpenContext { item: FilesystemItem, view: &'static str },
    /// Show the item action menu.
    OpenMenu(FilesystemItem),
}

/// Backend mutation requested by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SetDescription { folder_id: String, description: String },
    CreateFolder { parent_id: String, name: String },
    Retrieve { folder_id: String, url: String },
    Transfer(Transfer),
}

impl Command {
    pub async fn run(&self, service: &dyn FilesystemService) -> Result<(), ServiceError> {
        match self {
            Self::SetDescription {
                folder_id,
                description,
            } => service.set_description(folder_id, description).await,
            Self::CreateFolder { parent_id, name } => service.create_folder(parent_id, name).await,
            Self::Retrieve { folder_id, url } => service.retrieve(folder_id, url).await,
            Self::Transfer(transfer) => service.transfer(transfer).await,
        }
    }
}

/// Folder header render model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Header {
    None,
    NoRoots { message: String },
    Roots { title: String },
    Folder {
        name: String,
        writable: bool,
        hierarchy: Vec<FilesystemItem>,
        root: Option<Root>,
        description: Option<String>,
        description_editable: bool,
    },
    Custom(CustomHeader),
}

/// Item details popup render model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: FilesystemItem,
    pub location: String,
    pub size: Option<String>,
    pub modified: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// History
// =============================================================================

#[derive(Clone, Debug, Default)]
struct History {
    entries: Vec<String>,
    position: usize,
}

impl History {
    fn push(&mut self, id: String) {
        if self.entries.get(self.position) == Some(&id) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.position + 1);
        }
        self.entries.push(id);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        self.position = self.entries.len() - 1;
    }

    fn back(&mut self) -> Option<String> {
        if self.position == 0 || self.entries.is_empty() {
            return None;
        }
        self.position -= 1;
        self.entries.get(self.position).cloned()
    }

    fn forward(&mut self) -> Option<String> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        self.entries.get(self.position).cloned()
    }

    fn can_back(&self) -> bool {
        self.position > 0
    }

    fn can_forward(&self) -> bool {
        self.position + 1 < self.entries.len()
    }
}

// =============================================================================
// FileView
// =============================================================================

pub struct FileView {
    env: ViewEnv,
    state: NavState,
    /// Last settled state, restored when a request fails.
    settled: NavState,
    current: Option<Folder>,
    folder_data: FolderData,
    widget: Widget,
    column_widths: HashMap<String, u32>,
    selection: Selection,
    history: History,
    token: u64,
    upload: UploadProgress,
    hints: Vec<ItemHint>,
}

impl std::fmt::Debug for FileView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileView")
            .field("state", &self.state)
            .field("current", &self.current)
            .field("token", &self.token)
            .field("selected", &self.selection.len())
            .finish_non_exhaustive()
    }
}

impl FileView {
    pub fn new(env: ViewEnv) -> Self {
        let style = env.session.file_view.default_view_mode;
        let widget = build_widget(&env, style, HashMap::new());
        Self {
            env,
            state: NavState::NoFolder,
            settled: NavState::NoFolder,
            current: None,
            folder_data: FolderData::default(),
            widget,
            column_widths: HashMap::new(),
            selection: Selection::new(),
            history: History::default(),
            token: 0,
            upload: UploadProgress::new(),
            hints: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn env(&self) -> &ViewEnv {
        &self.env
    }

    pub fn texts(&self) -> &Texts {
        &self.env.texts
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == NavState::Loading
    }

    pub fn current(&self) -> Option<&Folder> {
        self.current.as_ref()
    }

    /// Public id of the shown folder, for the location bar.
    pub fn location(&self) -> Option<String> {
        self.current.as_ref().map(Folder::public_id)
    }

    pub fn folder_data(&self) -> &FolderData {
        &self.folder_data
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn view_style(&self) -> ViewStyle {
        self.widget.style()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn upload_progress(&self) -> &UploadProgress {
        &self.upload
    }

    pub fn upload_progress_mut(&mut self) -> &mut UploadProgress {
        &mut self.upload
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_forward()
    }

    pub fn item_tooltip(&self, item_id: &str) -> Option<&str> {
        self.hints
            .iter()
            .find(|h| h.item_id == item_id)
            .map(|h| h.tooltip.as_str())
    }

    fn current_item(&self) -> Option<&FilesystemItem> {
        self.current.as_ref().and_then(Folder::as_item)
    }

    fn current_custom(&self) -> Option<&CustomFolder> {
        self.current.as_ref().and_then(Folder::as_custom)
    }

    /// Whether the shown folder accepts new items.
    pub fn is_writable(&self) -> bool {
        self.current_item().is_some()
            && self
                .folder_data
                .permissions
                .allows(ITEM_ACCESS, AccessLevel::ReadWrite)
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Open the view: a path lookup, a stored folder or the initial folder.
    pub fn activate(&mut self, params: ActivateParams) -> Step {
        if self.env.roots().is_empty() {
            log::debug!("No roots, nothing to show");
            self.enter_no_roots();
            return Step::Idle;
        }
        if let Some(path) = params.path.filter(|p| !p.is_empty()) {
            log::debug!("Looking up folder by path '{}'", path);
            return self.dispatch(PendingKind::FindPath { path }, true, true);
        }
        if let Some(view_id) = params.view_id.filter(|v| !v.is_empty()) {
            match self.change_to_folder(FolderTarget::Id(view_id), true) {
                Ok(step) => return step,
                Err(e) => log::warn!("Cannot restore view: {}", e),
            }
        }
        self.open_initial_folder()
    }

    /// Navigate to the only root, or show the root selection screen.
    pub fn open_initial_folder(&mut self) -> Step {
        match self.env.roots() {
            [] => {
                self.enter_no_roots();
                Step::Idle
            }
            [root] => {
                let target = FolderTarget::from(root);
                self.change_to_folder(target, true).unwrap_or(Step::Idle)
            }
            roots => {
                let items: Vec<FilesystemItem> = roots.iter().map(Root::to_item).collect();
                self.leave_current();
                self.token += 1;
                self.selection.clear();
                self.current = None;
                self.state = NavState::NoFolder;
                self.settled = NavState::NoFolder;
                self.hints.clear();
                self.folder_data = FolderData {
                    items,
                    ..FolderData::default()
                };
                self.update_list();
                Step::Idle
            }
        }
    }

    /// Leave the view; in-flight results are discarded.
    pub fn deactivate(&mut self) {
        self.leave_current();
        self.token += 1;
        self.selection.set_mode(false);
        self.widget.set_select_mode(false);
        self.current = None;
        self.state = NavState::NoFolder;
        self.settled = NavState::NoFolder;
        self.folder_data = FolderData::default();
        self.hints.clear();
        self.widget.set_content(Vec::new(), Default::default());
    }

    fn enter_no_roots(&mut self) {
        self.token += 1;
        self.current = None;
        self.state = NavState::NoRoots;
        self.settled = NavState::NoRoots;
        self.folder_data = FolderData::default();
        self.selection.clear();
        self.widget.set_content(Vec::new(), Default::default());
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Start navigating to `target`.
    ///
    /// Clears the selection and enters `Loading`; `record` adds the target
    /// to the navigation history.
    pub fn change_to_folder(
        &mut self,
        target: FolderTarget,
        record: bool,
    ) -> Result<Step, NavigationError> {
        let kind = match target {
            FolderTarget::Default => match self.env.roots().first() {
                Some(root) => PendingKind::FolderInfo {
                    folder_id: root.id.clone(),
                },
                None => {
                    self.enter_no_roots();
                    return Ok(Step::Idle);
                }
            },
            FolderTarget::Id(id) => match FolderId::parse(&id) {
                None => return self.change_to_folder(FolderTarget::Default, record),
                Some(FolderId::Plain(folder_id)) => PendingKind::FolderInfo { folder_id },
                Some(FolderId::Typed { folder_type, id: custom_id }) => {
                    self.custom_kind(CustomFolder::new(folder_type, custom_id), &id)?
                }
            },
            FolderTarget::Folder(Folder::Item(item)) => PendingKind::FolderInfo { folder_id: item.id },
            FolderTarget::Folder(Folder::Custom(folder)) => {
                let id = format!("{}/{}", folder.folder_type, folder.id);
                self.custom_kind(folder, &id)?
            }
        };

        if record {
            self.history.push(public_id(&kind));
        }
        self.leave_current();
        Ok(self.dispatch(kind, false, true))
    }

    fn custom_kind(
        &self,
        folder: CustomFolder,
        public_id: &str,
    ) -> Result<PendingKind, NavigationError> {
        match self.env.folder_types.get(&folder.folder_type) {
            Some(handler) => Ok(PendingKind::Custom { folder, handler }),
            None => {
                log::warn!("Rejected folder id '{}'", public_id);
                Err(NavigationError::InvalidFolderId(public_id.to_string()))
            }
        }
    }

    /// Run the outgoing folder type's deselect hook.
    fn leave_current(&self) {
        if let Some(folder) = self.current_custom() {
            if let Some(handler) = self.env.folder_types.get(&folder.folder_type) {
                handler.on_folder_deselect(folder);
            }
        }
    }

    fn dispatch(&mut self, kind: PendingKind, record: bool, clear_selection: bool) -> Step {
        if clear_selection {
            self.selection.clear();
        }
        if self.state != NavState::Loading {
            self.settled = self.state.clone();
        }
        self.state = NavState::Loading;
        self.token += 1;

        let mut data = self.widget.data_request();
        if !matches!(kind, PendingKind::Custom { .. }) {
            data.insert(PARENT_DESCRIPTION);
        }
        let pending = Pending {
            token: self.token,
            record,
            data,
            kind,
        };
        log::debug!("Requesting {:?}", pending);
        Step::Fetch(pending)
    }

    /// Re-fetch the shown folder. No-op without one.
    pub fn refresh(&mut self) -> Step {
        let kind = match (&self.state, &self.current) {
            (NavState::Folder(_), Some(Folder::Item(item))) => PendingKind::FolderInfo {
                folder_id: item.id.clone(),
            },
            (NavState::CustomFolder { .. }, Some(Folder::Custom(folder))) => {
                match self.env.folder_types.get(&folder.folder_type) {
                    Some(handler) => PendingKind::Custom {
                        folder: folder.clone(),
                        handler,
                    },
                    None => return Step::Idle,
                }
            }
            _ => return Step::Idle,
        };
        self.dispatch(kind, false, false)
    }

    pub fn go_back(&mut self) -> Step {
        match self.history.back() {
            Some(id) => self.restore(&id),
            None => Step::Idle,
        }
    }

    pub fn go_forward(&mut self) -> Step {
        match self.history.forward() {
            Some(id) => self.restore(&id),
            None => Step::Idle,
        }
    }

    /// Show a folder from history or the location bar without recording it.
    pub fn restore(&mut self, view_id: &str) -> Step {
        if self.location().as_deref() == Some(view_id) && !self.is_loading() {
            return Step::Idle;
        }
        self.change_to_folder(FolderTarget::Id(view_id.to_string()), false)
            .unwrap_or(Step::Idle)
    }

    /// Show search results for `text`; blank input is ignored.
    pub fn search(&mut self, text: &str) -> Step {
        let text = text.trim();
        if text.is_empty() {
            return Step::Idle;
        }
        let folder = CustomFolder::new(SEARCH_FOLDER_TYPE, text);
        self.change_to_folder(FolderTarget::from(folder), true)
            .unwrap_or(Step::Idle)
    }

    /// React to a backend event; filesystem changes refresh the view.
    pub fn on_event(&mut self, event_type: &str) -> Step {
        if event_type.starts_with("filesystem/") {
            self.refresh()
        } else {
            Step::Idle
        }
    }

    // -------------------------------------------------------------------------
    // Applying results
    // -------------------------------------------------------------------------

    /// Apply a resolved request. Results of superseded requests are dropped.
    pub fn apply(&mut self, resolution: Resolution) -> Outcome {
        let Resolution { pending, result } = resolution;
        if pending.token != self.token {
            log::warn!(
                "Discarding stale response {} (latest {})",
                pending.token,
                self.token
            );
            return Outcome::discarded();
        }

        match (pending.kind, result) {
            (PendingKind::Custom { folder, handler }, Ok(Resolved::Custom(data))) => {
                self.hints = handler.on_item_list_rendered(&folder, &data, &self.env.texts);
                self.state = NavState::CustomFolder {
                    folder_type: folder.folder_type.clone(),
                    id: folder.id.clone(),
                };
                self.current = Some(Folder::Custom(folder));
                self.folder_data = data;
            }
            (_, Ok(Resolved::Folder(info))) => {
                if pending.record {
                    self.history.push(info.folder.id.clone());
                }
                self.hints.clear();
                self.state = NavState::Folder(info.folder.id.clone());
                self.current = Some(Folder::Item(info.folder.clone()));
                self.folder_data = FolderData::from(info);
            }
            (kind, Ok(Resolved::Custom(_))) => {
                log::error!("Unexpected custom result for {}", public_id(&kind));
                self.state = self.settled.clone();
                return Outcome::applied();
            }
            (kind, Err(err)) => {
                log::warn!("Request for {} failed: {}", public_id(&kind), err);
                self.state = self.settled.clone();
                if let PendingKind::FindPath { path } = kind {
                    if err.code() == Some(codes::FOLDER_NOT_FOUND) {
                        let message = self.env.texts.get_with("mainviewFolderNotFound", &[&path]);
                        let next = self.open_initial_folder();
                        return Outcome::applied()
                            .notice(Notice::Error(message))
                            .then(next);
                    }
                }
                return Outcome::applied();
            }
        }
        self.settled = self.state.clone();
        self.update_list();
        Outcome::applied()
    }

    /// Hand the items to the widget and drop vanished selections.
    fn update_list(&mut self) {
        self.widget
            .set_content(self.folder_data.items.clone(), self.folder_data.data.clone());
        self.selection.reconcile(self.widget.items());
    }

    // -------------------------------------------------------------------------
    // Headers and details
    // -------------------------------------------------------------------------

    pub fn header(&self) -> Header {
        match (&self.state, &self.current) {
            (NavState::NoRoots, _) => Header::NoRoots {
                message: self.env.texts.get("mainviewNoRoots"),
            },
            (_, Some(Folder::Item(item))) => {
                let root = self
                    .env
                    .roots()
                    .iter()
                    .find(|r| r.id == item.root_id)
                    .cloned();
                Header::Folder {
                    name: item.name.clone(),
                    writable: self.is_writable(),
                    hierarchy: self.folder_data.hierarchy.clone(),
                    root,
                    description: self
                        .folder_data
                        .data
                        .parent_description()
                        .map(str::to_string),
                    description_editable: self.can_edit_description(),
                }
            }
            (_, Some(Folder::Custom(folder))) => self
                .env
                .folder_types
                .get(&folder.folder_type)
                .and_then(|h| h.render_header(folder, &self.folder_data, &self.env.texts))
                .map(Header::Custom)
                .unwrap_or(Header::None),
            (NavState::NoFolder, None) if !self.folder_data.items.is_empty() => Header::Roots {
                title: self.env.texts.get("mainViewRootsTitle"),
            },
            _ => Header::None,
        }
    }

    pub fn item_details(&self, item: &FilesystemItem) -> ItemDetails {
        let data = &self.folder_data.data;
        let root = self
            .env
            .roots()
            .iter()
            .find(|r| r.id == item.root_id)
            .map(|r| r.name.as_str())
            .unwrap_or_default();
        ItemDetails {
            item: item.clone(),
            location: format!("{}/{}", root, item.path),
            size: item
                .is_file
                .then_some(item.size)
                .flatten()
                .map(|s| self.env.formatters.byte_size.format(s)),
            modified: data
                .text(FILE_MODIFIED_REQUEST, &item.id)
                .map(|t| self.env.formatters.timestamp.format_internal(&t))
                .filter(|t| !t.is_empty()),
            description: data.text(ITEM_DESCRIPTION_REQUEST, &item.id),
        }
    }

    // -------------------------------------------------------------------------
    // Widget events
    // -------------------------------------------------------------------------

    fn navigate_into(&mut self, item: &FilesystemItem) -> Action {
        match self.change_to_folder(FolderTarget::from(item), true) {
            Ok(step) => Action::Navigate(step),
            Err(e) => {
                log::warn!("{}", e);
                Action::None
            }
        }
    }

    fn open_context(&self, item: FilesystemItem) -> Action {
        Action::OpenContext {
            item,
            view: self.view_style().kind(),
        }
    }

    pub fn handle_event(&mut self, event: WidgetEvent) -> Action {
        match event {
            WidgetEvent::SelectUnselect(item) => {
                self.selection.toggle(&item);
                Action::SelectionChanged
            }
            WidgetEvent::DblClick(item) if item.is_folder() => self.navigate_into(&item),
            WidgetEvent::DblClick(_) => Action::None,
            WidgetEvent::RightClick { item, .. } => Action::OpenMenu(item),
            WidgetEvent::Click { item, target } => self.handle_click(item, target),
        }
    }

    fn handle_click(&mut self, item: FilesystemItem, target: ClickTarget) -> Action {
        if let (ClickTarget::Column(id), Widget::List(list)) = (&target, &self.widget) {
            let action = list
                .columns()
                .iter()
                .find(|c| &c.id == id)
                .and_then(|c| c.on_click);
            if action.is_some() {
                return if item.is_folder() {
                    self.navigate_into(&item)
                } else {
                    Action::None
                };
            }
        }

        match target {
            ClickTarget::Info => self.open_context(item),
            ClickTarget::Icon => self.open_context(item),
            ClickTarget::Column(ref id) if id == "name" => {
                if item.is_folder() {
                    self.navigate_into(&item)
                } else {
                    self.open_context(item)
                }
            }
            ClickTarget::Column(_) => Action::None,
            ClickTarget::Tile if item.is_file => self.open_context(item),
            ClickTarget::Tile => self.navigate_into(&item),
        }
    }

    // -------------------------------------------------------------------------
    // View style
    // -------------------------------------------------------------------------

    /// Switch between list and icon styles; re-creates the widget.
    pub fn set_view_style(&mut self, style: ViewStyle) -> Step {
        if style == self.view_style() {
            return Step::Idle;
        }
        if let Widget::List(list) = &self.widget {
            self.column_widths = list.widths().clone();
        }
        self.widget = build_widget(&self.env, style, self.column_widths.clone());
        self.widget.set_select_mode(self.selection.is_active());
        match self.refresh() {
            Step::Idle => {
                self.update_list();
                Step::Idle
            }
            step => step,
        }
    }

    /// Sort the list by a column (header click).
    pub fn sort_by(&mut self, column_id: &str) {
        if let Some(list) = self.widget.as_list_mut() {
            list.header_click(column_id);
        }
    }

    pub fn resize_column(&mut self, column_id: &str, width: u32) -> Option<u32> {
        let width = self.widget.as_list_mut()?.resize(column_id, width)?;
        self.column_widths.insert(column_id.to_string(), width);
        Some(width)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn set_select_mode(&mut self, on: bool) {
        self.selection.set_mode(on);
        self.widget.set_select_mode(on);
    }

    pub fn toggle_select_mode(&mut self) {
        self.set_select_mode(!self.selection.is_active());
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.widget.items());
        self.widget.set_select_mode(true);
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
        self.widget.set_select_mode(true);
    }

    // -------------------------------------------------------------------------
    // Drag and drop
    // -------------------------------------------------------------------------

    pub fn drag_payload(&self, item: &FilesystemItem) -> DragPayload {
        let selection: &[FilesystemItem] = if self.selection.is_active() {
            self.selection.items()
        } else {
            &[]
        };
        DragPayload::for_drag(item, selection)
    }

    pub fn can_drop(&self, payload: &DragPayload, target: &FilesystemItem) -> bool {
        dnd::can_drop(payload, target)
    }

    /// Copy or move the dragged items onto `target`.
    pub fn drop_on(&self, payload: &DragPayload, target: &FilesystemItem) -> Option<Command> {
        let transfer = Transfer::for_drop(payload, target)?;
        log::debug!("Dropping {:?}", transfer);
        Some(Command::Transfer(transfer))
    }

    // -------------------------------------------------------------------------
    // Folder actions
    // -------------------------------------------------------------------------

    pub fn can_edit_description(&self) -> bool {
        self.current_item().is_some()
            && self.env.session.has_feature(FEATURE_DESCRIPTIONS)
            && self.folder_data.permissions.has(EDIT_DESCRIPTION)
    }

    pub fn set_description(&self, description: &str) -> Option<Command> {
        if !self.can_edit_description() {
            return None;
        }
        Some(Command::SetDescription {
            folder_id: self.current_item()?.id.clone(),
            description: description.to_string(),
        })
    }

    pub fn create_folder(&self, name: &str) -> Option<Command> {
        let name = name.trim();
        if name.is_empty() || !self.is_writable() {
            return None;
        }
        Some(Command::CreateFolder {
            parent_id: self.current_item()?.id.clone(),
            name: name.to_string(),
        })
    }

    pub fn can_retrieve_url(&self) -> bool {
        self.is_writable() && self.env.session.has_feature(FEATURE_RETRIEVE_URL)
    }

    /// Retrieve a file from an `http(s)` URL into the shown folder.
    pub fn retrieve_url(&self, url: &str) -> Option<Command> {
        let url = url.trim();
        let is_http = url.len() >= 4
            && url
                .get(..4)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"));
        if !is_http || !self.can_retrieve_url() {
            return None;
        }
        Some(Command::Retrieve {
            folder_id: self.current_item()?.id.clone(),
            url: url.to_string(),
        })
    }

    /// Handle the result of a [`Command`].
    pub fn command_finished(
        &mut self,
        command: &Command,
        result: Result<(), ServiceError>,
    ) -> Outcome {
        match (command, result) {
            (Command::SetDescription { description, .. }, Ok(())) => {
                self.folder_data
                    .data
                    .set_parent_description(description.clone());
                Outcome::applied()
            }
            (_, Ok(())) => Outcome::applied().then(self.refresh()),
            (Command::Retrieve { url, .. }, Err(err))
                if err.code() == Some(codes::RESOURCE_NOT_FOUND) =>
            {
                let message = self
                    .env
                    .texts
                    .get_with("mainviewRetrieveFileResourceNotFound", &[url.as_str()]);
                Outcome::applied().notice(Notice::Error(message))
            }
            (command, Err(err)) => {
                log::warn!("{:?} failed: {}", command, err);
                Outcome::applied()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Uploads
    // -------------------------------------------------------------------------

    /// Folder receiving uploads, if the shown folder is writable.
    pub fn upload_target(&self) -> Option<&str> {
        if !self.is_writable() {
            return None;
        }
        self.current_item().map(|i| i.id.as_str())
    }

    /// Check a batch against the upload type rules.
    pub fn is_upload_allowed<S: AsRef<str>>(&self, names: &[S]) -> Result<(), Notice> {
        self.env
            .session
            .filesystem
            .check(names)
            .map_err(|rejection| Notice::Warning(rejection.message(&self.env.texts)))
    }

    pub fn upload_started<S: AsRef<str>>(&mut self, names: &[S]) {
        let title = upload_title(&self.env.texts, names);
        self.upload.show(title);
    }

    pub fn upload_progress_changed(&mut self, percent: u8, bytes_per_second: f64) {
        let speed = self.env.formatters.speed(bytes_per_second);
        self.upload.set(percent, speed);
    }

    pub fn upload_finished(&mut self) -> Outcome {
        let mut outcome = Outcome::applied()
            .notice(Notice::Success(self.env.texts.get("mainviewFileUploadComplete")))
            .then(self.refresh());
        outcome.hide_progress = self.upload.hide();
        outcome
    }

    pub fn upload_failed(&mut self) -> Outcome {
        let mut outcome = Outcome::applied()
            .notice(Notice::Error(self.env.texts.get("mainviewFileUploadFailed")));
        outcome.hide_progress = self.upload.hide();
        outcome
    }

    /// Context payload of the shown folder type (e.g. search matches).
    pub fn context(&self) -> &Value {
        &self.folder_data.context
    }
}

fn public_id(kind: &PendingKind) -> String {
    match kind {
        PendingKind::FolderInfo { folder_id } => folder_id.clone(),
        PendingKind::FindPath { path } => path.clone(),
        PendingKind::Custom { folder, .. } => format!("{}/{}", folder.folder_type, folder.id),
    }
}

fn build_widget(env: &ViewEnv, style: ViewStyle, widths: HashMap<String, u32>) -> Widget {
    match style {
        ViewStyle::List => Widget::List(FileList::new(
            env.columns.select(&env.session.file_view.list_view_columns),
            env.session.roots.clone(),
            env.formatters.clone(),
            widths,
        )),
        style => Widget::Icons(IconView::new(
            style,
            env.session.has_feature(FEATURE_THUMBNAILS),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(roots: Vec<Root>) -> FileView {
        FileView::new(ViewEnv::new(Session::with_roots(roots), Texts::default()))
    }

    #[test]
    fn test_history_navigation() {
        let mut history = History::default();
        assert!(history.back().is_none());
        history.push("a".into());
        history.push("b".into());
        history.push("b".into());
        history.push("c".into());
        assert_eq!(history.back().as_deref(), Some("b"));
        assert_eq!(history.back().as_deref(), Some("a"));
        assert!(history.back().is_none());
        assert_eq!(history.forward().as_deref(), Some("b"));
        history.push("d".into());
        assert!(!history.can_forward());
        assert_eq!(history.entries, ["a", "b", "d"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::default();
        for i in 0..(MAX_HISTORY + 5) {
            history.push(i.to_string());
        }
        assert_eq!(history.entries.len(), MAX_HISTORY);
        assert_eq!(history.entries[0], "5");
    }

    #[test]
    fn test_unknown_type_rejected_without_fetch() {
        let mut view = view(vec![Root::new("r1", "Docs")]);
        let err = view
            .change_to_folder(FolderTarget::Id("tags/red".into()), true)
            .unwrap_err();
        assert_eq!(err, NavigationError::InvalidFolderId("tags/red".into()));
        assert_eq!(view.state(), &NavState::NoFolder);
        assert!(!view.can_go_back());
    }

    #[test]
    fn test_empty_id_means_first_root() {
        let mut view = view(vec![Root::new("r1", "Docs"), Root::new("r2", "Media")]);
        let pending = view
            .change_to_folder(FolderTarget::Id(String::new()), false)
            .unwrap()
            .pending()
            .unwrap();
        assert_eq!(format!("{:?}", pending), "Pending { token: 1, target: \"r1\" }");
        assert!(pending.data_request().contains(PARENT_DESCRIPTION));
        assert!(view.is_loading());
    }

    #[test]
    fn test_root_selection_screen() {
        let mut view = view(vec![Root::new("r1", "Docs"), Root::new("r2", "Media")]);
        assert!(!view.activate(ActivateParams::default()).is_fetch());
        assert_eq!(view.state(), &NavState::NoFolder);
        assert_eq!(view.widget().items().len(), 2);
        assert_eq!(
            view.header(),
            Header::Roots {
                title: "Folders".into()
            }
        );
    }

    #[test]
    fn test_search_ignores_blank_input() {
        let mut view = view(vec![Root::new("r1", "Docs")]);
        assert!(!view.search("   ").is_fetch());
        let pending = view.search(" report ").pending().unwrap();
        assert_eq!(public_id(&pending.kind), "search/report");
        assert!(!pending.data_request().contains(PARENT_DESCRIPTION));
    }

    #[test]
    fn test_retrieve_requires_writable_folder() {
        let view = view(vec![Root::new("r1", "Docs")]);
        assert!(!view.can_retrieve_url());
        assert_eq!(view.retrieve_url("http://example.com/a"), None);
    }
}
