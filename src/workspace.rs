//! Workspace discovery and initialization.

use {
    crate::{
        error::Error,
        language::{LanguageProfile, profile},
        template::TemplateStore,
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::{
        fs,
        path::{Path, PathBuf},
    },
    tracing::{debug, info},
};

/// File marking the workspace root.
pub const MARKER_FILE: &str = ".katabox.json";

/// Whole-workspace files copied from the store root, with their targets.
const ROOT_FILES: &[(&str, &str)] = &[("README.md", "README.md"), ("gitignore", ".gitignore")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMarker {
    pub version: String,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceMarker {
    pub fn now() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Outcome of initializing a language workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageInit {
    Created { files: Vec<PathBuf> },
    /// The directory was already there and was left alone.
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Nearest directory at or above `start` that holds the marker file.
    pub fn discover(start: &Path) -> Result<Self, Error> {
        let found = start
            .ancestors()
            .find(|dir| dir.join(MARKER_FILE).is_file())
            .ok_or_else(|| Error::WorkspaceNotFound {
                start: start.to_path_buf(),
            })?;
        debug!(root = ?found, "workspace discovered");
        Ok(Self {
            root: found.to_path_buf(),
        })
    }

    /// Initialize a new workspace in `dir`, creating the directory if needed.
    pub fn create(dir: &Path, store: &TemplateStore) -> Result<Self, Error> {
        let marker_path = dir.join(MARKER_FILE);
        if marker_path.exists() {
            return Err(Error::AlreadyInitialized(dir.to_path_buf()));
        }
        fs::create_dir_all(dir)?;

        let marker = serde_json::to_string_pretty(&WorkspaceMarker::now())
            .map_err(std::io::Error::other)?;
        fs::write(&marker_path, marker)?;

        for (source, target) in ROOT_FILES {
            match store.root_file(source) {
                Some(file) => fs::write(dir.join(target), &file.contents)?,
                None => debug!(file = source, "store has no root file"),
            }
        }
        info!(root = ?dir, "workspace created");
        Ok(Self {
            root: dir.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Marker contents, `None` when the file cannot be read or parsed.
    pub fn marker(&self) -> Option<WorkspaceMarker> {
        let source = fs::read_to_string(self.root.join(MARKER_FILE)).ok()?;
        serde_json::from_str(&source).ok()
    }

    pub fn language_root(&self, profile: &LanguageProfile) -> PathBuf {
        self.root.join(profile.id)
    }

    /// Languages initialized in this workspace, sorted by id.
    pub fn languages(&self) -> Vec<&'static LanguageProfile> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut found: Vec<&'static LanguageProfile> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| profile(&e.file_name().to_string_lossy()))
            .collect();
        found.sort_by_key(|p| p.id);
        found
    }

    /// Copy the configuration files of `profile` into its language root.
    pub fn init_language(
        &self,
        store: &TemplateStore,
        profile: &LanguageProfile,
    ) -> Result<LanguageInit, Error> {
        let lang_root = self.language_root(profile);
        if lang_root.exists() {
            debug!(language = profile.id, "language workspace already exists");
            return Ok(LanguageInit::Existing);
        }
        let tree = store.tree(profile.id).ok_or_else(|| Error::TemplateMissing {
            language: profile.id.to_string(),
        })?;

        fs::create_dir_all(&lang_root)?;
        let mut files = Vec::new();
        for (rel, file) in tree.config_files() {
            let target = lang_root.join(&rel);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.contents)?;
            files.push(rel);
        }
        // Exercises land here, keep the directories even while empty.
        fs::create_dir_all(lang_root.join(profile.search_root()))?;
        if let Some(test_root) = profile.test_root() {
            fs::create_dir_all(lang_root.join(test_root))?;
        }

        info!(language = profile.id, files = files.len(), "language workspace created");
        Ok(LanguageInit::Created { files })
    }

    /// Initialize the language when missing and return its root.
    pub fn ensure_language(
        &self,
        store: &TemplateStore,
        profile: &LanguageProfile,
    ) -> Result<PathBuf, Error> {
        self.init_language(store, profile)?;
        Ok(self.language_root(profile))
    }
}
