//! Resolve a user-supplied identifier to an existing exercise.
//!
//! Identifiers may be the exercise name (`problem_0001`), a problem number
//! (`1`, `0001`) or a slug (`two-sum`, `two_sum`). Candidates are the
//! exercises found under the language's search root, in name order. The
//! first strategy that produces a match wins:
//!
//! 1. exact name,
//! 2. number: the padded name pattern, then any name containing the padded id,
//! 3. slug: compared against the `[<id>] <title>` header inside the exercise,
//! 4. otherwise the problem is not found.

use {
    crate::{
        error::Error,
        language::{Layout, LanguageProfile},
        naming::{ID_WIDTH, normalize_query, slugify, zero_pad_id},
    },
    regex::Regex,
    std::{
        fs,
        path::{Path, PathBuf},
        sync::LazyLock,
    },
    tracing::debug,
};

/// Matches a header line such as ` * [1] Two Sum`, `# [1] Two Sum` or
/// `//! [1] Two Sum`.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:(?://[/!]?|#+|/?\*+|"""|'''|--)\s*)?\[(\d+)\]\s+(.+?)\s*(?:\*/|"""|''')?\s*$"#,
    )
    .unwrap()
});

/// Directories that never hold exercises.
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "build",
    "dist",
    "out",
    "venv",
    "__pycache__",
];

/// An exercise found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Directory, package or module name.
    pub name: String,
    /// Primary location, relative to the language root.
    pub path: PathBuf,
}

/// Title header embedded in an exercise file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: u32,
    pub title: String,
}

impl Header {
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

pub fn parse_header(source: &str) -> Option<Header> {
    source.lines().find_map(|line| {
        let caps = HEADER.captures(line)?;
        Some(Header {
            id: caps[1].parse().ok()?,
            title: caps[2].to_string(),
        })
    })
}

#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    /// Primary location, relative to the language root.
    path: PathBuf,
}

impl Candidate {
    fn located(&self) -> Located {
        Located {
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }
}

/// Finds exercises of one language workspace.
pub struct Locator<'a> {
    profile: &'a LanguageProfile,
    lang_root: &'a Path,
}

impl<'a> Locator<'a> {
    pub fn new(profile: &'a LanguageProfile, lang_root: &'a Path) -> Self {
        Self { profile, lang_root }
    }

    /// Resolve `query` to an exercise.
    pub fn locate(&self, query: &str) -> Result<Located, Error> {
        let not_found = || Error::ProblemNotFound {
            query: query.to_string(),
            language: self.profile.id.to_string(),
        };
        let query = query.trim();
        if query.is_empty() {
            return Err(not_found());
        }

        let candidates = self.candidates()?;
        debug!(
            language = self.profile.id,
            query,
            candidates = candidates.len(),
            "locating exercise"
        );

        let found = by_exact_name(&candidates, query)
            .or_else(|| self.by_number(&candidates, query))
            .or_else(|| self.by_slug(&candidates, query));
        match found {
            Some(candidate) => {
                debug!(name = %candidate.name, "exercise located");
                Ok(candidate.located())
            }
            None => Err(not_found()),
        }
    }

    /// Every exercise under the search root, sorted by name.
    pub fn exercises(&self) -> Result<Vec<Located>, Error> {
        Ok(self.candidates()?.iter().map(Candidate::located).collect())
    }

    fn candidates(&self) -> Result<Vec<Candidate>, Error> {
        let search_root = self.profile.search_root();
        let dir = self.lang_root.join(&search_root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type()?;
            let name = match self.profile.layout {
                Layout::ModuleRegistry { registry } => {
                    let path = Path::new(&file_name);
                    let is_source = file_type.is_file()
                        && path.extension().and_then(|e| e.to_str()) == Some(self.profile.extension);
                    if !is_source || search_root.join(&file_name) == Path::new(registry) {
                        continue;
                    }
                    match path.file_stem().and_then(|s| s.to_str()) {
                        Some("main" | "lib" | "mod") | None => continue,
                        Some(stem) => stem.to_string(),
                    }
                }
                Layout::Flat | Layout::NestedPackage => {
                    if !file_type.is_dir() || IGNORED_DIRS.contains(&file_name.as_str()) {
                        continue;
                    }
                    file_name.clone()
                }
            };
            candidates.push(Candidate {
                name,
                path: search_root.join(&file_name),
            });
        }
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(candidates)
    }

    fn by_number<'c>(&self, candidates: &'c [Candidate], query: &str) -> Option<&'c Candidate> {
        if !query.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let padded = zero_pad_id(query.trim_start_matches('0'), ID_WIDTH);
        let expected = self.profile.exercise_name(&padded);
        candidates
            .iter()
            .find(|c| c.name == expected)
            .or_else(|| candidates.iter().find(|c| c.name.contains(&padded)))
    }

    fn by_slug<'c>(&self, candidates: &'c [Candidate], query: &str) -> Option<&'c Candidate> {
        let term = normalize_query(query);
        let spaced = term.replace('-', " ");

        // Lower rank wins: exact slug, slug containing the term, title
        // containing the term. Ties go to the lowest problem id.
        candidates
            .iter()
            .filter_map(|candidate| {
                let header = self.header(candidate)?;
                let slug = header.slug();
                let rank = if slug == term {
                    0
                } else if slug.contains(&term) {
                    1
                } else if header.title.to_lowercase().contains(&spaced) {
                    2
                } else {
                    return None;
                };
                Some(((rank, header.id), candidate))
            })
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, candidate)| candidate)
    }

    /// First header found in the files at a candidate location.
    fn header(&self, candidate: &Candidate) -> Option<Header> {
        let location = self.lang_root.join(&candidate.path);
        let mut files = if location.is_dir() {
            fs::read_dir(&location)
                .ok()?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect::<Vec<_>>()
        } else {
            vec![location]
        };
        files.sort();
        files
            .iter()
            .filter_map(|path| fs::read_to_string(path).ok())
            .find_map(|source| parse_header(&source))
    }
}

fn by_exact_name<'c>(candidates: &'c [Candidate], query: &str) -> Option<&'c Candidate> {
    candidates.iter().find(|c| c.name == query)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::language::profile, tempfile::TempDir};

    fn exercise(root: &Path, dir: &str, file: &str, header: &str) {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), format!("/*\n * {header}\n */\n")).unwrap();
    }

    #[test]
    fn header_variants() {
        let expected = Some(Header {
            id: 1,
            title: "Two Sum".to_string(),
        });
        for source in [
            "/*\n * [1] Two Sum\n */",
            "\"\"\"\n[1] Two Sum\n\"\"\"",
            "# [1] Two Sum",
            "//! [1] Two Sum\n//!\n",
            "// [1] Two Sum",
            "/* [1] Two Sum */",
        ] {
            assert_eq!(parse_header(source), expected, "{source}");
        }
        assert_eq!(parse_header("let x = [1] + 2;"), None);
    }

    #[test]
    fn flat_lookup_by_name_number_and_slug() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        exercise(root, "problem_0001", "TwoSum.ts", "[1] Two Sum");
        exercise(root, "problem_0015", "ThreeSum.ts", "[15] 3Sum");
        fs::create_dir_all(root.join("node_modules/problem_0001x")).unwrap();

        let ts = profile("typescript").unwrap();
        let locator = Locator::new(ts, root);
        let expected = Located {
            name: "problem_0001".to_string(),
            path: PathBuf::from("problem_0001"),
        };
        for query in ["problem_0001", "1", "0001", "two-sum", "two_sum", "Two-Sum"] {
            assert_eq!(locator.locate(query).unwrap(), expected, "{query}");
        }
        assert_eq!(locator.locate("3sum").unwrap().name, "problem_0015");
        assert_eq!(locator.exercises().unwrap().len(), 2);
    }

    #[test]
    fn number_falls_back_to_substring() {
        let tmp = TempDir::new().unwrap();
        exercise(tmp.path(), "0042_trapping_rain_water", "a.py", "# [42] Trapping Rain Water");
        let locator = Locator::new(profile("python").unwrap(), tmp.path());
        assert_eq!(locator.locate("42").unwrap().name, "0042_trapping_rain_water");
    }

    #[test]
    fn slug_prefers_exact_then_lowest_id() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        exercise(root, "problem_0167", "a.ts", "[167] Two Sum II - Input Array Is Sorted");
        exercise(root, "problem_0653", "a.ts", "[653] Two Sum IV - Input is a BST");
        exercise(root, "problem_0001", "a.ts", "[1] Two Sum");
        let locator = Locator::new(profile("typescript").unwrap(), root);

        assert_eq!(locator.locate("two-sum").unwrap().name, "problem_0001");
        assert_eq!(locator.locate("input").unwrap().name, "problem_0167");
        assert_eq!(locator.locate("bst").unwrap().name, "problem_0653");
    }

    #[test]
    fn nested_layout_searches_main_packages() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        exercise(root, "src/main/kotlin/problem0704", "BinarySearch.kt", "[704] Binary Search");
        exercise(root, "src/test/kotlin/problem0704", "BinarySearchTest.kt", "[704] Binary Search");

        let locator = Locator::new(profile("kotlin").unwrap(), root);
        let found = locator.locate("704").unwrap();
        assert_eq!(found.name, "problem0704");
        assert_eq!(found.path, PathBuf::from("src/main/kotlin/problem0704"));
        assert_eq!(locator.locate("binary-search").unwrap(), found);
    }

    #[test]
    fn registry_layout_searches_module_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("lib.rs"), "//! [9] Not An Exercise\npub mod problem_0001;\n").unwrap();
        fs::write(src.join("problem_0001.rs"), "//! [1] Two Sum\n").unwrap();

        let locator = Locator::new(profile("rust").unwrap(), tmp.path());
        let found = locator.locate("1").unwrap();
        assert_eq!(found.path, PathBuf::from("src/problem_0001.rs"));
        assert_eq!(locator.locate("two-sum").unwrap(), found);
        assert!(locator.locate("not-an-exercise").is_err());
    }

    #[test]
    fn unknown_identifier_reports_search_context() {
        let tmp = TempDir::new().unwrap();
        exercise(tmp.path(), "problem_0001", "TwoSum.ts", "[1] Two Sum");
        let locator = Locator::new(profile("typescript").unwrap(), tmp.path());
        match locator.locate("median-of-two-sorted-arrays") {
            Err(Error::ProblemNotFound { query, language }) => {
                assert_eq!(query, "median-of-two-sorted-arrays");
                assert_eq!(language, "typescript");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(locator.locate("").is_err());
        assert!(locator.locate("2").is_err());
    }

    #[test]
    fn missing_search_root_finds_nothing() {
        let tmp = TempDir::new().unwrap();
        let locator = Locator::new(profile("java").unwrap(), tmp.path());
        assert!(locator.exercises().unwrap().is_empty());
    }
}
