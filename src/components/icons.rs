//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuBookOpen as FilePdf, LuCheck as Check, LuChevronDown as SortDescending,
        LuChevronLeft as ChevronLeft, LuChevronRight as ChevronRight,
        LuChevronUp as SortAscending, LuDownload as Download, LuEllipsisVertical as More,
        LuFile as File, LuFileText as FileText, LuFolder as Folder, LuHouse as Home,
        LuImage as FileImage, LuInfo as Info, LuLayoutGrid as Grid, LuList as List,
        LuPencil as Edit, LuPlus as Plus, LuRefreshCw as Refresh, LuSearch as Search,
        LuSquare as Unchecked, LuUpload as Upload, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsCheck2 as Check, BsChevronDown as SortDescending, BsChevronLeft as ChevronLeft,
        BsChevronRight as ChevronRight, BsChevronUp as SortAscending, BsDownload as Download,
        BsFileEarmark as File, BsFileEarmarkImage as FileImage, BsFileEarmarkPdf as FilePdf,
        BsFileEarmarkText as FileText, BsFolderFill as Folder, BsGrid as Grid,
        BsHouseFill as Home, BsInfoCircle as Info, BsListUl as List, BsPencil as Edit,
        BsPlusLg as Plus, BsArrowClockwise as Refresh, BsSearch as Search,
        BsSquare as Unchecked, BsThreeDotsVertical as More, BsUpload as Upload, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(CHEVRON_LEFT, ChevronLeft);
themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(HOME, Home);
themed_icon!(FOLDER, Folder);
themed_icon!(FILE, File);
themed_icon!(FILE_TEXT, FileText);
themed_icon!(FILE_PDF, FilePdf);
themed_icon!(FILE_IMAGE, FileImage);
themed_icon!(SEARCH, Search);
themed_icon!(LIST, List);
themed_icon!(GRID, Grid);
themed_icon!(PLUS, Plus);
themed_icon!(MORE, More);
themed_icon!(CLOSE, Close);
themed_icon!(EDIT, Edit);
themed_icon!(DOWNLOAD, Download);
themed_icon!(UPLOAD, Upload);
themed_icon!(REFRESH, Refresh);
themed_icon!(INFO, Info);
themed_icon!(CHECKED, Check);
themed_icon!(UNCHECKED, Unchecked);
themed_icon!(SORT_ASC, SortAscending);
themed_icon!(SORT_DESC, SortDescending);

/// Icon for an item, by its type class.
pub fn for_item(is_file: bool, extension: &str) -> Icon {
    if !is_file {
        return FOLDER;
    }
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => FILE_PDF,
        "jpg" | "jpeg" | "png" | "gif" | "svg" | "webp" => FILE_IMAGE,
        "txt" | "md" | "html" | "htm" | "doc" | "docx" | "odt" | "rtf" => FILE_TEXT,
        _ => FILE,
    }
}
