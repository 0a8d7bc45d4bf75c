//! The template store.
//!
//! One tree per language. Each tree holds configuration files, which are
//! copied into a language workspace as they are, and per-problem templates
//! (any file with [`TEMPLATE_MARKER`] in its name), which are rendered for
//! every fetched problem. A directory named [`PROBLEM_DIR_SENTINEL`] stands
//! for the exercise directory and only takes part in problem rendering.

use {
    crate::language,
    anyhow::{Context, Result},
    include_dir::{Dir, DirEntry, include_dir},
    std::{
        collections::BTreeMap,
        fs,
        path::{Component, Path, PathBuf},
    },
    tracing::debug,
    walkdir::WalkDir,
};

pub static TPL_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/tpl");

/// Substring identifying per-problem template files.
pub const TEMPLATE_MARKER: &str = "_template.";

/// Directory name replaced by the exercise directory or package name.
pub const PROBLEM_DIR_SENTINEL: &str = "__PROBLEM_DIR__";

/// Exercise template file stem.
pub const EXERCISE_TEMPLATE: &str = "exercise_template";

/// Test template file stem.
pub const TEST_TEMPLATE: &str = "test_template";

pub fn is_template(file_name: &str) -> bool {
    file_name.contains(TEMPLATE_MARKER)
}

/// A path component handed to a rename function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Dir(&'a str),
    File(&'a str),
}

/// Rename used when copying configuration files: per-problem templates and
/// the exercise sentinel are skipped, `gitignore` becomes `.gitignore`.
pub fn config_rename(node: Node<'_>) -> Option<String> {
    match node {
        Node::Dir(PROBLEM_DIR_SENTINEL) => None,
        Node::Dir(name) => Some(name.to_string()),
        Node::File(name) if is_template(name) => None,
        Node::File("gitignore") => Some(".gitignore".to_string()),
        Node::File(name) => Some(name.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Path relative to the language tree.
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl TemplateFile {
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.contents)
            .with_context(|| format!("template {:?} is not valid UTF-8", self.path))
    }
}

/// All files of one language, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    files: Vec<TemplateFile>,
}

impl TemplateTree {
    pub fn new(mut files: Vec<TemplateFile>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self { files }
    }

    #[cfg(test)]
    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    /// Walk every file, mapping each path component through `rename`.
    ///
    /// Returns the renamed relative path of every file that survived. A
    /// `None` from `rename` drops the file, or the whole subtree when
    /// returned for a directory.
    pub fn walk<F>(&self, mut rename: F) -> Vec<(PathBuf, &TemplateFile)>
    where
        F: FnMut(Node<'_>) -> Option<String>,
    {
        let mut out = Vec::new();
        'files: for file in &self.files {
            let components: Vec<&str> = file
                .path
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => s.to_str(),
                    _ => None,
                })
                .collect();
            let mut target = PathBuf::new();
            for (i, component) in components.iter().copied().enumerate() {
                let node = if i + 1 == components.len() {
                    Node::File(component)
                } else {
                    Node::Dir(component)
                };
                match rename(node) {
                    Some(name) => target.push(name),
                    None => continue 'files,
                }
            }
            out.push((target, file));
        }
        out
    }

    /// Configuration files with their workspace-relative target paths.
    pub fn config_files(&self) -> Vec<(PathBuf, &TemplateFile)> {
        self.walk(config_rename)
    }
}

/// Per-language template trees.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    languages: BTreeMap<String, TemplateTree>,
    /// Files at the store root (workspace README, gitignore).
    root_files: Vec<TemplateFile>,
}

impl TemplateStore {
    /// The store compiled into the binary.
    pub fn embedded() -> Self {
        let mut store = Self::default();
        for entry in TPL_DIR.entries() {
            match entry {
                DirEntry::Dir(dir) => {
                    let Some(lang) = dir.path().file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    let mut files = Vec::new();
                    collect_embedded(dir, dir.path(), &mut files);
                    store.insert(lang, TemplateTree::new(files));
                }
                DirEntry::File(file) => store.root_files.push(TemplateFile {
                    path: file.path().to_path_buf(),
                    contents: file.contents().to_vec(),
                }),
            }
        }
        store
    }

    /// Load a store laid out the same way from disk.
    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut store = Self::default();
        for entry in fs::read_dir(root)
            .with_context(|| format!("failed to read template directory {root:?}"))?
        {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if path.is_dir() {
                let mut files = Vec::new();
                for file in WalkDir::new(&path)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                {
                    let rel = file
                        .path()
                        .strip_prefix(&path)
                        .context("template path outside its language tree")?;
                    files.push(TemplateFile {
                        path: rel.to_path_buf(),
                        contents: fs::read(file.path())
                            .with_context(|| format!("failed to read template {:?}", file.path()))?,
                    });
                }
                store.insert(&name, TemplateTree::new(files));
            } else if path.is_file() {
                store.root_files.push(TemplateFile {
                    path: PathBuf::from(&name),
                    contents: fs::read(&path)?,
                });
            }
        }
        Ok(store)
    }

    /// Build a store from literal `(language, path, contents)` entries.
    #[cfg(test)]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let mut grouped: BTreeMap<String, Vec<TemplateFile>> = BTreeMap::new();
        for (lang, path, contents) in entries {
            grouped.entry(lang.to_string()).or_default().push(TemplateFile {
                path: PathBuf::from(path),
                contents: contents.as_bytes().to_vec(),
            });
        }
        let mut store = Self::default();
        for (lang, files) in grouped {
            store.insert(&lang, TemplateTree::new(files));
        }
        store
    }

    fn insert(&mut self, lang: &str, tree: TemplateTree) {
        if language::profile(lang).is_none() {
            debug!(lang, "ignoring template tree without a language profile");
            return;
        }
        self.languages.insert(lang.to_string(), tree);
    }

    pub fn tree(&self, lang: &str) -> Option<&TemplateTree> {
        self.languages.get(lang)
    }

    /// Languages with a template tree, in alphabetical order.
    pub fn languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    pub fn root_file(&self, name: &str) -> Option<&TemplateFile> {
        self.root_files.iter().find(|f| f.path == Path::new(name))
    }

    #[cfg(test)]
    pub fn add_root_file(&mut self, name: &str, contents: &str) {
        self.root_files.push(TemplateFile {
            path: PathBuf::from(name),
            contents: contents.as_bytes().to_vec(),
        });
    }
}

fn collect_embedded(dir: &Dir, base: &Path, out: &mut Vec<TemplateFile>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect_embedded(sub, base, out),
            DirEntry::File(file) => {
                // Embedded paths are relative to the store root.
                let rel = file.path().strip_prefix(base).unwrap_or(file.path());
                out.push(TemplateFile {
                    path: rel.to_path_buf(),
                    contents: file.contents().to_vec(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    fn sample() -> TemplateStore {
        TemplateStore::from_entries([
            ("typescript", "package.json", "{}"),
            ("typescript", "gitignore", "node_modules/\n"),
            ("typescript", "__PROBLEM_DIR__/exercise_template.ts", "x"),
            ("typescript", "__PROBLEM_DIR__/test_template.ts", "y"),
            ("cobol", "README", "ignored"),
        ])
    }

    #[test]
    fn unknown_language_trees_are_ignored() {
        let store = sample();
        assert_eq!(store.languages(), vec!["typescript"]);
        assert!(store.tree("cobol").is_none());
    }

    #[test]
    fn config_walk_skips_templates_and_renames_gitignore() {
        let store = sample();
        let files: Vec<PathBuf> = store
            .tree("typescript")
            .unwrap()
            .config_files()
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(
            files,
            vec![PathBuf::from(".gitignore"), PathBuf::from("package.json")]
        );
    }

    #[test]
    fn walk_renames_sentinel_directory() {
        let store = sample();
        let rendered = store.tree("typescript").unwrap().walk(|node| match node {
            Node::Dir(PROBLEM_DIR_SENTINEL) => Some("problem_0001".to_string()),
            Node::Dir(name) => Some(name.to_string()),
            Node::File(name) if is_template(name) => Some(name.to_string()),
            Node::File(_) => None,
        });
        let paths: Vec<PathBuf> = rendered.into_iter().map(|(path, _)| path).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("problem_0001/exercise_template.ts"),
                PathBuf::from("problem_0001/test_template.ts"),
            ]
        );
    }

    #[test]
    fn embedded_store_covers_every_profile() {
        let store = TemplateStore::embedded();
        for profile in language::PROFILES {
            let tree = store
                .tree(profile.id)
                .unwrap_or_else(|| panic!("missing templates for {}", profile.id));
            let exercise = format!("{EXERCISE_TEMPLATE}.{}", profile.extension);
            assert!(
                tree.files().iter().any(|f| f.path.ends_with(&exercise)),
                "{} has no {exercise}",
                profile.id
            );
        }
        assert!(store.root_file("README.md").is_some());
        assert!(store.root_file("gitignore").is_some());
    }

    #[test]
    fn loads_from_disk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("go/__PROBLEM_DIR__")).unwrap();
        fs::write(root.join("go/go.mod"), "module katabox\n").unwrap();
        fs::write(root.join("go/__PROBLEM_DIR__/exercise_template.go"), "package x\n").unwrap();
        fs::write(root.join("README.md"), "# hi\n").unwrap();

        let store = TemplateStore::from_dir(root).unwrap();
        assert_eq!(store.languages(), vec!["go"]);
        assert_eq!(store.tree("go").unwrap().files().len(), 2);
        assert_eq!(store.root_file("README.md").unwrap().contents, b"# hi\n");
    }
}
