//! Upload type rules and the upload progress indicator state.

use serde::Deserialize;

use crate::texts::Texts;

// =============================================================================
// Upload Rules
// =============================================================================

/// File type restrictions from the session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadRules {
    #[serde(default, rename = "allowed_file_upload_types")]
    pub allowed: Vec<String>,
    #[serde(default, rename = "forbidden_file_upload_types")]
    pub forbidden: Vec<String>,
}

/// First file that may not be uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRejection {
    pub name: String,
    pub extension: String,
}

impl UploadRejection {
    /// Warning shown to the user.
    pub fn message(&self, texts: &Texts) -> String {
        texts.get_with("mainviewFileUploadNotAllowed", &[&self.extension])
    }
}

/// Extension used for type checks: text after the last dot, lowercase.
///
/// A name without a dot is its own extension.
pub fn upload_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

impl UploadRules {
    pub fn forbid(mut self, extensions: &[&str]) -> Self {
        self.forbidden = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn allow(mut self, extensions: &[&str]) -> Self {
        self.allowed = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    /// Check a single extension. The forbidden list wins; a non-empty
    /// allowed list restricts everything else.
    pub fn allows_extension(&self, extension: &str) -> bool {
        let ext = extension.to_lowercase();
        if self.forbidden.iter().any(|f| f.to_lowercase() == ext) {
            return false;
        }
        self.allowed.is_empty() || self.allowed.iter().any(|a| a.to_lowercase() == ext)
    }

    /// Check a batch; stops at the first rejected file.
    ///
    /// Files without a name or with an empty extension are not checked.
    pub fn check<S: AsRef<str>>(&self, names: &[S]) -> Result<(), UploadRejection> {
        for name in names {
            let name = name.as_ref();
            let extension = upload_extension(name);
            if name.is_empty() || extension.is_empty() {
                continue;
            }
            if !self.allows_extension(&extension) {
                return Err(UploadRejection {
                    name: name.to_string(),
                    extension,
                });
            }
        }
        Ok(())
    }
}

/// Progress title for a batch.
pub fn upload_title<S: AsRef<str>>(texts: &Texts, names: &[S]) -> String {
    match names {
        [one] => texts.get_with("mainviewUploadProgressOneMessage", &[one.as_ref()]),
        many => texts.get_with(
            "mainviewUploadProgressManyMessage",
            &[&many.len().to_string()],
        ),
    }
}

// =============================================================================
// Upload Progress
// =============================================================================

/// Visibility phase of the indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Hidden,
    /// Visible and updating.
    Showing,
    /// Finished; kept visible for the grace period.
    Completing,
    /// Animating out.
    Hiding,
}

/// Identifies one `hide` request; a later `show` invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HideTicket(u64);

/// Upload progress indicator: hidden → showing → hiding → hidden.
///
/// Timers live in the front end; this only tracks which transition
/// is still current.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadProgress {
    phase: UploadPhase,
    title: String,
    percent: u8,
    speed: String,
    generation: u64,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase != UploadPhase::Hidden
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn speed(&self) -> &str {
        &self.speed
    }

    /// Show (or retitle) the indicator and reset progress.
    pub fn show(&mut self, title: impl Into<String>) {
        self.generation += 1;
        self.phase = UploadPhase::Showing;
        self.title = title.into();
        self.percent = 0;
        self.speed.clear();
    }

    pub fn set(&mut self, percent: u8, speed: impl Into<String>) {
        self.percent = percent.min(100);
        self.speed = speed.into();
    }

    /// Start the delayed hide. The caller waits `UPLOAD_HIDE_DELAY_MS`
    /// then calls [`begin_hide`](Self::begin_hide).
    pub fn hide(&mut self) -> Option<HideTicket> {
        if self.phase == UploadPhase::Hidden {
            return None;
        }
        self.phase = UploadPhase::Completing;
        Some(HideTicket(self.generation))
    }

    /// Start the hide animation. Returns false for a stale ticket.
    pub fn begin_hide(&mut self, ticket: HideTicket) -> bool {
        if ticket.0 != self.generation || self.phase != UploadPhase::Completing {
            return false;
        }
        self.phase = UploadPhase::Hiding;
        true
    }

    /// Animation finished. Returns false for a stale ticket.
    pub fn finish_hide(&mut self, ticket: HideTicket) -> bool {
        if ticket.0 != self.generation || self.phase != UploadPhase::Hiding {
            return false;
        }
        self.phase = UploadPhase::Hidden;
        self.percent = 0;
        self.speed.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_wins() {
        let rules = UploadRules::default().allow(&["exe", "txt"]).forbid(&["EXE"]);
        assert!(!rules.allows_extension("exe"));
        assert!(rules.allows_extension("TXT"));
        assert!(!rules.allows_extension("pdf"));
    }

    #[test]
    fn test_empty_lists_allow_everything() {
        let rules = UploadRules::default();
        assert!(rules.check(&["a.bin", "noext"]).is_ok());
    }

    #[test]
    fn test_check_reports_first_rejection() {
        let rules = UploadRules::default().forbid(&["exe", "bat"]);
        let err = rules.check(&["a.txt", "setup.EXE", "run.bat"]).unwrap_err();
        assert_eq!(err.name, "setup.EXE");
        assert_eq!(err.extension, "exe");
        assert_eq!(
            err.message(&Texts::default()),
            "Uploading files of type \"exe\" is not allowed."
        );
    }

    #[test]
    fn test_unnamed_or_extensionless_files_are_not_checked() {
        let rules = UploadRules::default().allow(&["txt"]);
        assert!(rules.check(&["notes.", ""]).is_ok());
        let err = rules.check(&["notes.", "a.pdf"]).unwrap_err();
        assert_eq!(err.name, "a.pdf");
    }

    #[test]
    fn test_extension_without_dot() {
        assert_eq!(upload_extension("Makefile"), "makefile");
        assert_eq!(upload_extension("a.tar.GZ"), "gz");
    }

    #[test]
    fn test_titles() {
        let texts = Texts::default();
        assert_eq!(upload_title(&texts, &["a.txt"]), "Uploading file \"a.txt\"");
        assert_eq!(upload_title(&texts, &["a", "b"]), "Uploading 2 files");
    }

    #[test]
    fn test_progress_lifecycle() {
        let mut progress = UploadProgress::new();
        assert!(progress.hide().is_none());

        progress.show("Uploading");
        progress.set(120, "1 kB/s");
        assert_eq!(progress.percent(), 100);

        let ticket = progress.hide().unwrap();
        assert!(progress.is_visible());
        assert!(progress.begin_hide(ticket));
        assert_eq!(progress.phase(), UploadPhase::Hiding);
        assert!(progress.finish_hide(ticket));
        assert!(!progress.is_visible());
    }

    #[test]
    fn test_show_during_hide_cancels_it() {
        let mut progress = UploadProgress::new();
        progress.show("first");
        let ticket = progress.hide().unwrap();
        progress.show("second");
        assert!(!progress.begin_hide(ticket));
        assert_eq!(progress.phase(), UploadPhase::Showing);
        assert_eq!(progress.title(), "second");
    }
}
