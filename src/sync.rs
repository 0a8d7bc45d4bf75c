//! Reconcile a language workspace's configuration files with the templates.
//!
//! Exercises are never touched: only configuration files from the template
//! tree are added or updated. The module registry of registry layouts is
//! skipped too, since it lists the user's exercises.

use {
    crate::{
        error::Error,
        language::LanguageProfile,
        template::{TemplateFile, TemplateStore},
    },
    sha2::{Digest, Sha256},
    std::{
        fs,
        path::{Path, PathBuf},
    },
    tracing::{debug, info, warn},
};

/// A configuration file superseded by a pair of newer tool configurations.
pub struct ObsoleteRule {
    pub file: &'static str,
    pub replaced_by: [&'static str; 2],
}

/// Biome gave way to ESLint + Prettier in the JavaScript-family templates.
pub static OBSOLETE_FILES: &[ObsoleteRule] = &[ObsoleteRule {
    file: "biome.json",
    replaced_by: ["eslint.config.js", ".prettierrc"],
}];

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Report only; leave the filesystem alone.
    pub dry_run: bool,
    /// Delete obsolete files instead of only reporting them.
    pub prune: bool,
}

/// Staged changes of one language. Paths are relative to the language root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    /// Obsolete files left in place because pruning was not requested.
    pub stale: Vec<PathBuf>,
}

impl SyncReport {
    /// Number of changes, stale files excluded.
    pub fn changes(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes() == 0
    }
}

fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Whether the workspace copy differs from the template. Unreadable files
/// always need syncing.
fn differs(template: &TemplateFile, target: &Path) -> bool {
    match fs::read(target) {
        Ok(current) => digest(&current) != digest(&template.contents),
        Err(e) => {
            debug!(path = ?target, error = %e, "cannot read file for comparison");
            true
        }
    }
}

/// Sync one language workspace rooted at `lang_root`.
pub fn sync_language(
    store: &TemplateStore,
    profile: &LanguageProfile,
    lang_root: &Path,
    options: SyncOptions,
) -> Result<SyncReport, Error> {
    if !lang_root.is_dir() {
        return Err(Error::LanguageNotInitialized {
            language: profile.id.to_string(),
            path: lang_root.to_path_buf(),
        });
    }
    let tree = store.tree(profile.id).ok_or_else(|| Error::TemplateMissing {
        language: profile.id.to_string(),
    })?;

    let registry = profile.registry().map(PathBuf::from);
    let mut report = SyncReport::default();
    let config_files = tree.config_files();

    for (rel, template) in &config_files {
        if registry.as_ref() == Some(rel) {
            continue;
        }
        let target = lang_root.join(rel);
        let exists = target.exists();
        if exists && !differs(template, &target) {
            continue;
        }
        if !options.dry_run {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &template.contents)?;
            info!(language = profile.id, path = ?rel, "synced configuration file");
        }
        if exists {
            report.updated.push(rel.clone());
        } else {
            report.added.push(rel.clone());
        }
    }

    let provided = |name: &str| {
        lang_root.join(name).exists() || config_files.iter().any(|(rel, _)| rel == Path::new(name))
    };
    for rule in OBSOLETE_FILES {
        let target = lang_root.join(rule.file);
        if !target.exists() || !rule.replaced_by.iter().all(|name| provided(name)) {
            continue;
        }
        if !options.prune {
            warn!(language = profile.id, file = rule.file, "obsolete file kept; pass --prune to remove it");
            report.stale.push(PathBuf::from(rule.file));
            continue;
        }
        if !options.dry_run {
            fs::remove_file(&target)?;
            info!(language = profile.id, file = rule.file, "removed obsolete file");
        }
        report.removed.push(PathBuf::from(rule.file));
    }

    // Template order follows template names, not the renamed targets.
    for paths in [
        &mut report.added,
        &mut report.updated,
        &mut report.removed,
        &mut report.stale,
    ] {
        paths.sort();
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::language::profile, tempfile::TempDir};

    fn store() -> TemplateStore {
        TemplateStore::from_entries([
            ("typescript", "package.json", "{\"v\": 2}"),
            ("typescript", "eslint.config.js", "export default [];"),
            ("typescript", ".prettierrc", "{}"),
            ("typescript", "gitignore", "node_modules/\n"),
            ("typescript", "__PROBLEM_DIR__/exercise_template.ts", "x"),
            ("rust", "Cargo.toml", "[package]"),
            ("rust", "src/lib.rs", "pub struct Solution;\n"),
            ("rust", "src/exercise_template.rs", "x"),
        ])
    }

    fn ts_root() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("package.json"), "{\"v\": 1}").unwrap();
        fs::write(tmp.path().join(".prettierrc"), "{}").unwrap();
        tmp
    }

    #[test]
    fn stages_adds_and_updates() {
        let tmp = ts_root();
        let ts = profile("typescript").unwrap();
        let report = sync_language(&store(), ts, tmp.path(), SyncOptions::default()).unwrap();

        assert_eq!(
            report.added,
            vec![PathBuf::from(".gitignore"), PathBuf::from("eslint.config.js")]
        );
        assert_eq!(report.updated, vec![PathBuf::from("package.json")]);
        assert_eq!(
            fs::read_to_string(tmp.path().join("package.json")).unwrap(),
            "{\"v\": 2}"
        );
        assert!(!tmp.path().join("__PROBLEM_DIR__").exists());
    }

    #[test]
    fn report_is_sorted_by_target_path() {
        let store = TemplateStore::from_entries([
            ("go", "go.mod", "module katas"),
            ("go", "gitignore", "bin/\n"),
            ("go", "cmd/a.txt", "a"),
        ]);
        let tmp = TempDir::new().unwrap();
        let go = profile("go").unwrap();
        let report = sync_language(&store, go, tmp.path(), SyncOptions::default()).unwrap();
        assert_eq!(
            report.added,
            vec![
                PathBuf::from(".gitignore"),
                PathBuf::from("cmd/a.txt"),
                PathBuf::from("go.mod"),
            ]
        );
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = ts_root();
        let ts = profile("typescript").unwrap();
        let options = SyncOptions {
            dry_run: true,
            prune: true,
        };
        fs::write(tmp.path().join("biome.json"), "{}").unwrap();

        let report = sync_language(&store(), ts, tmp.path(), options).unwrap();
        assert_eq!(report.changes(), 4);
        assert_eq!(report.removed, vec![PathBuf::from("biome.json")]);
        assert!(tmp.path().join("biome.json").exists());
        assert!(!tmp.path().join("eslint.config.js").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("package.json")).unwrap(),
            "{\"v\": 1}"
        );
    }

    #[test]
    fn second_run_reports_no_changes() {
        let tmp = ts_root();
        let ts = profile("typescript").unwrap();
        fs::write(tmp.path().join("biome.json"), "{}").unwrap();

        let first = sync_language(&store(), ts, tmp.path(), SyncOptions::default()).unwrap();
        assert!(!first.is_empty());
        assert_eq!(first.stale, vec![PathBuf::from("biome.json")]);

        let second = sync_language(&store(), ts, tmp.path(), SyncOptions::default()).unwrap();
        assert!(second.is_empty(), "{second:?}");
        assert!(tmp.path().join("biome.json").exists());
    }

    #[test]
    fn obsolete_file_needs_both_replacements() {
        let store = TemplateStore::from_entries([("javascript", "eslint.config.js", "x")]);
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("biome.json"), "{}").unwrap();
        let options = SyncOptions {
            dry_run: false,
            prune: true,
        };

        let js = profile("javascript").unwrap();
        let report = sync_language(&store, js, tmp.path(), options).unwrap();
        assert!(report.removed.is_empty());
        assert!(tmp.path().join("biome.json").exists());

        fs::write(tmp.path().join(".prettierrc"), "{}").unwrap();
        let report = sync_language(&store, js, tmp.path(), options).unwrap();
        assert_eq!(report.removed, vec![PathBuf::from("biome.json")]);
        assert!(!tmp.path().join("biome.json").exists());
    }

    #[test]
    fn registry_file_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/lib.rs"), "pub mod problem_0001;\n").unwrap();

        let rust = profile("rust").unwrap();
        let report = sync_language(&store(), rust, tmp.path(), SyncOptions::default()).unwrap();
        assert_eq!(report.added, vec![PathBuf::from("Cargo.toml")]);
        assert_eq!(
            fs::read_to_string(tmp.path().join("src/lib.rs")).unwrap(),
            "pub mod problem_0001;\n"
        );
    }

    #[test]
    fn unreadable_target_counts_as_changed() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateFile {
            path: PathBuf::from("package.json"),
            contents: b"{}".to_vec(),
        };
        // A directory cannot be read as a file.
        fs::create_dir_all(tmp.path().join("package.json")).unwrap();
        assert!(differs(&template, &tmp.path().join("package.json")));
    }

    #[test]
    fn missing_language_workspace_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = sync_language(
            &store(),
            profile("typescript").unwrap(),
            &tmp.path().join("typescript"),
            SyncOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::LanguageNotInitialized { .. }));
    }
}
