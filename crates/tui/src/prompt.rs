use std::path::{Path, PathBuf};

use tracing::warn;
use txplayers_core::browse::{self, BrowseEntry};

use crate::input::TextInput;

/// What a file prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    Export,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Open => "Open player export (*.json)",
            PromptKind::Export => "Export view to CSV (*.csv)",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PromptKind::Open => "json",
            PromptKind::Export => "csv",
        }
    }
}

/// Result of pressing Enter in the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// Stay open; the directory changed or the input was empty.
    Stay,
    /// The user picked this file.
    Submit(PathBuf),
}

/// Path entry with a listing of the current directory.
#[derive(Debug, Clone)]
pub struct FilePrompt {
    pub kind: PromptKind,
    pub input: TextInput,
    dir: PathBuf,
    entries: Vec<BrowseEntry>,
    cursor: Option<usize>,
    file_name: String,
    pub error: Option<String>,
}

impl FilePrompt {
    /// Open a prompt in `dir`. `file_name` pre-fills the input when set.
    pub fn new(kind: PromptKind, dir: PathBuf, file_name: Option<&str>) -> Self {
        let mut prompt = Self {
            kind,
            input: TextInput::default(),
            dir,
            entries: Vec::new(),
            cursor: None,
            file_name: file_name.unwrap_or_default().to_string(),
            error: None,
        };
        prompt.change_dir(prompt.dir.clone());
        prompt
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[BrowseEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Move the list selection and mirror it into the input.
    pub fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        let next = match self.cursor {
            Some(current) => (current as isize + delta).clamp(0, last),
            None if delta < 0 => last,
            None => 0,
        } as usize;
        self.cursor = Some(next);
        self.input.set(self.entries[next].path.display().to_string());
    }

    /// Typing detaches the input from the list selection.
    pub fn edited(&mut self) {
        self.cursor = None;
        self.error = None;
    }

    /// Resolve the input: directories are entered, files are returned.
    pub fn submit(&mut self) -> PromptAction {
        let raw = self.input.value().trim();
        if raw.is_empty() {
            return PromptAction::Stay;
        }
        let path = self.resolve(raw);
        if path.is_dir() {
            self.change_dir(path);
            return PromptAction::Stay;
        }
        PromptAction::Submit(path)
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    fn change_dir(&mut self, dir: PathBuf) {
        self.dir = dir;
        self.cursor = None;
        match browse::list_dir(&self.dir, self.kind.extension()) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                warn!(dir = %self.dir.display(), "{err:#}");
                self.entries = Vec::new();
                self.error = Some(format!("{err:#}"));
            }
        }
        if self.file_name.is_empty() {
            self.input.clear();
        } else {
            self.input
                .set(self.dir.join(&self.file_name).display().to_string());
        }
    }
}
