//! Per-language conventions.
//!
//! Everything that differs between languages lives in [`PROFILES`]: file
//! extension, snippet tag of the remote service, how exercise and test files
//! are named, where exercises are placed and which commands test and fix them.
//! The scaffold engine and the problem locator both read their naming from
//! here, so whatever one creates the other can find.

use {
    crate::{
        error::Error,
        naming::{ID_WIDTH, to_module_name, to_type_name, zero_pad_id},
    },
    std::path::{Path, PathBuf},
};

/// How the exercise file stem is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// `TwoSum`, `Problem3sum`
    Pascal,
    /// `two_sum`, `problem_3sum`
    Snake,
    /// `problem_0001`, shared with the module name.
    Module,
}

/// How the test file name is derived from the exercise stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestNaming {
    /// `<stem><suffix>.<ext>`, e.g. `TwoSum.test.ts`, `two_sum_test.go`.
    Suffix(&'static str),
    /// `<prefix><stem>.<ext>`, e.g. `test_two_sum.py`.
    Prefix(&'static str),
    /// Tests live in the exercise file itself.
    Inline,
}

/// Where an exercise lives inside the language workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `problem_0001/` directly under the language root.
    Flat,
    /// `src/main/<lang>/problem0001/` plus `src/test/<lang>/problem0001/`.
    NestedPackage,
    /// `src/problem_0001.<ext>` registered in a shared module list.
    ModuleRegistry { registry: &'static str },
}

/// Syntax of starter snippets, used to find the function to implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    TypeScript,
    JavaScript,
    Python,
    Go,
    Cpp,
    Java,
    Kotlin,
    Rust,
}

#[derive(Debug)]
pub struct LanguageProfile {
    pub id: &'static str,
    pub display_name: &'static str,
    pub extension: &'static str,
    /// `langSlug` of the matching starter snippet.
    pub snippet_tag: &'static str,
    pub syntax: Syntax,
    pub casing: Casing,
    pub test_naming: TestNaming,
    pub layout: Layout,
    /// Starter body used when the problem has no snippet for this language.
    /// `{title}` is replaced with the problem title.
    pub fallback_code: &'static str,
    /// Statement placed in blocks the starter code leaves empty.
    pub empty_block: Option<&'static str>,
    /// Runs the tests of one exercise. `{path}` and `{name}` are substituted.
    pub test_command: &'static [&'static str],
    pub test_all_command: &'static [&'static str],
    /// Lint and format commands, run in order.
    pub fix_commands: &'static [&'static [&'static str]],
}

pub static PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        id: "typescript",
        display_name: "TypeScript",
        extension: "ts",
        snippet_tag: "typescript",
        syntax: Syntax::TypeScript,
        casing: Casing::Pascal,
        test_naming: TestNaming::Suffix(".test"),
        layout: Layout::Flat,
        fallback_code: "// TODO: Implement solution for {title}",
        empty_block: None,
        test_command: &["npx", "vitest", "run", "{path}"],
        test_all_command: &["npx", "vitest", "run"],
        fix_commands: &[&["npm", "run", "lint:fix"], &["npm", "run", "format"]],
    },
    LanguageProfile {
        id: "javascript",
        display_name: "JavaScript",
        extension: "js",
        snippet_tag: "javascript",
        syntax: Syntax::JavaScript,
        casing: Casing::Pascal,
        test_naming: TestNaming::Suffix(".test"),
        layout: Layout::Flat,
        fallback_code: "// TODO: Implement solution for {title}",
        empty_block: None,
        test_command: &["npx", "vitest", "run", "{path}"],
        test_all_command: &["npx", "vitest", "run"],
        fix_commands: &[&["npm", "run", "lint:fix"], &["npm", "run", "format"]],
    },
    LanguageProfile {
        id: "python",
        display_name: "Python",
        extension: "py",
        snippet_tag: "python3",
        syntax: Syntax::Python,
        casing: Casing::Snake,
        test_naming: TestNaming::Prefix("test_"),
        layout: Layout::Flat,
        fallback_code: "class Solution:\n    # TODO: Implement solution for {title}\n    pass",
        empty_block: Some("pass"),
        test_command: &["python", "-m", "pytest", "{path}", "-v"],
        test_all_command: &["python", "-m", "pytest", "-v"],
        fix_commands: &[&["ruff", "check", "--fix", "."], &["ruff", "format", "."]],
    },
    LanguageProfile {
        id: "go",
        display_name: "Go",
        extension: "go",
        snippet_tag: "golang",
        syntax: Syntax::Go,
        casing: Casing::Snake,
        test_naming: TestNaming::Suffix("_test"),
        layout: Layout::Flat,
        fallback_code: "// TODO: Implement solution for {title}",
        empty_block: None,
        test_command: &["go", "test", "./{path}/..."],
        test_all_command: &["go", "test", "./..."],
        fix_commands: &[&["go", "vet", "./..."], &["gofmt", "-w", "."]],
    },
    LanguageProfile {
        id: "cpp",
        display_name: "C++",
        extension: "cpp",
        snippet_tag: "cpp",
        syntax: Syntax::Cpp,
        casing: Casing::Snake,
        test_naming: TestNaming::Suffix(".test"),
        layout: Layout::Flat,
        fallback_code: "class Solution {\npublic:\n    // TODO: Implement solution for {title}\n};",
        empty_block: None,
        test_command: &["make", "test", "PROBLEM={path}"],
        test_all_command: &["make", "test"],
        fix_commands: &[&["make", "format"]],
    },
    LanguageProfile {
        id: "java",
        display_name: "Java",
        extension: "java",
        snippet_tag: "java",
        syntax: Syntax::Java,
        casing: Casing::Pascal,
        test_naming: TestNaming::Suffix("Test"),
        layout: Layout::NestedPackage,
        fallback_code: "class Solution {\n    // TODO: Implement solution for {title}\n}",
        empty_block: None,
        test_command: &["gradle", "test", "--tests", "{name}.*"],
        test_all_command: &["gradle", "test"],
        fix_commands: &[&["gradle", "spotlessApply"]],
    },
    LanguageProfile {
        id: "kotlin",
        display_name: "Kotlin",
        extension: "kt",
        snippet_tag: "kotlin",
        syntax: Syntax::Kotlin,
        casing: Casing::Pascal,
        test_naming: TestNaming::Suffix("Test"),
        layout: Layout::NestedPackage,
        fallback_code: "class Solution {\n    // TODO: Implement solution for {title}\n}",
        empty_block: None,
        test_command: &["gradle", "test", "--tests", "{name}.*"],
        test_all_command: &["gradle", "test"],
        fix_commands: &[&["gradle", "spotlessApply"]],
    },
    LanguageProfile {
        id: "rust",
        display_name: "Rust",
        extension: "rs",
        snippet_tag: "rust",
        syntax: Syntax::Rust,
        casing: Casing::Module,
        test_naming: TestNaming::Inline,
        layout: Layout::ModuleRegistry {
            registry: "src/lib.rs",
        },
        fallback_code: "impl Solution {\n    // TODO: Implement solution for {title}\n}",
        empty_block: None,
        test_command: &["cargo", "test", "{name}::"],
        test_all_command: &["cargo", "test"],
        fix_commands: &[
            &["cargo", "clippy", "--fix", "--allow-dirty", "--allow-staged"],
            &["cargo", "fmt"],
        ],
    },
];

/// Look up a profile by its identifier.
pub fn profile(id: &str) -> Option<&'static LanguageProfile> {
    PROFILES.iter().find(|p| p.id == id)
}

/// Look up a profile, failing with the list of supported languages.
pub fn require_profile(id: &str) -> Result<&'static LanguageProfile, Error> {
    profile(id).ok_or_else(|| Error::UnsupportedLanguage {
        language: id.to_string(),
        available: PROFILES.iter().map(|p| p.id.to_string()).collect(),
    })
}

/// Names of one exercise in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseNames {
    pub padded_id: String,
    /// Directory (flat), package (nested) or module stem (registry).
    pub name: String,
    pub exercise_file: String,
    pub test_file: Option<String>,
}

impl ExerciseNames {
    pub fn exercise_stem(&self) -> &str {
        self.exercise_file
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.exercise_file)
    }
}

impl LanguageProfile {
    /// Directory, package or module name for a padded identifier.
    pub fn exercise_name(&self, padded_id: &str) -> String {
        match self.layout {
            Layout::NestedPackage => format!("problem{padded_id}"),
            Layout::Flat | Layout::ModuleRegistry { .. } => format!("problem_{padded_id}"),
        }
    }

    /// Deterministic names for `(id, title)` in this language.
    pub fn names(&self, id: &str, title: &str) -> ExerciseNames {
        let padded_id = zero_pad_id(id, ID_WIDTH);
        let name = self.exercise_name(&padded_id);
        let stem = match self.casing {
            Casing::Pascal => to_type_name(title),
            Casing::Snake => to_module_name(title),
            Casing::Module => name.clone(),
        };
        let ext = self.extension;
        let test_file = match self.test_naming {
            TestNaming::Suffix(suffix) => Some(format!("{stem}{suffix}.{ext}")),
            TestNaming::Prefix(prefix) => Some(format!("{prefix}{stem}.{ext}")),
            TestNaming::Inline => None,
        };
        ExerciseNames {
            exercise_file: format!("{stem}.{ext}"),
            test_file,
            name,
            padded_id,
        }
    }

    /// Directory searched for existing exercises, relative to the language root.
    pub fn search_root(&self) -> PathBuf {
        match self.layout {
            Layout::Flat => PathBuf::new(),
            Layout::NestedPackage => Path::new("src").join("main").join(self.id),
            Layout::ModuleRegistry { .. } => PathBuf::from("src"),
        }
    }

    /// Test counterpart of [`Self::search_root`] for nested layouts.
    pub fn test_root(&self) -> Option<PathBuf> {
        match self.layout {
            Layout::NestedPackage => Some(Path::new("src").join("test").join(self.id)),
            Layout::Flat | Layout::ModuleRegistry { .. } => None,
        }
    }

    /// Paths making up the exercise location, relative to the language root.
    ///
    /// The first entry is the primary location: the exercise directory, or
    /// the module file for registry layouts.
    pub fn locations(&self, name: &str) -> Vec<PathBuf> {
        let mut paths = vec![match self.layout {
            Layout::ModuleRegistry { .. } => self
                .search_root()
                .join(format!("{name}.{}", self.extension)),
            Layout::Flat | Layout::NestedPackage => self.search_root().join(name),
        }];
        if let Some(test_root) = self.test_root() {
            paths.push(test_root.join(name));
        }
        paths
    }

    pub fn registry(&self) -> Option<&'static str> {
        match self.layout {
            Layout::ModuleRegistry { registry } => Some(registry),
            Layout::Flat | Layout::NestedPackage => None,
        }
    }

    pub fn fallback_code(&self, title: &str) -> String {
        self.fallback_code.replace("{title}", title)
    }
}
