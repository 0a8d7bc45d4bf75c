//! Placeholder substitution for per-problem templates.
//!
//! Placeholders look like `__PROBLEM_TITLE__`. Substitution is one regex
//! pass over the template, so a value that contains a placeholder-looking
//! token is never expanded a second time.

use {
    crate::{
        api::Problem,
        language::{ExerciseNames, LanguageProfile, Syntax},
        naming::{slugify, to_function_name, to_snake_case, to_type_name},
    },
    regex::{Captures, Regex},
    std::{collections::BTreeMap, sync::LazyLock},
    tracing::debug,
};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*)__").unwrap());

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Named entities decoded in the description. `&amp;` is decoded separately,
/// after all of these, so `&amp;lt;` stays `&lt;`.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&ldquo;", "\""),
    ("&rdquo;", "\""),
    ("&lsquo;", "'"),
    ("&rsquo;", "'"),
];

/// Strip markup from an HTML description and decode common entities.
pub fn clean_description(html: &str) -> String {
    let mut text = HTML_TAG.replace_all(html, "").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    text.replace("&amp;", "&").trim().to_string()
}

type Matcher = fn(&str) -> Option<String>;

fn capture(re: &Regex, code: &str) -> Option<String> {
    re.captures(code).map(|caps| caps[1].to_string())
}

macro_rules! matcher {
    ($name:ident, $pattern:expr) => {
        fn $name(code: &str) -> Option<String> {
            static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
            capture(&RE, code)
        }
    };
}

// `vector<int> twoSum(vector<int>& nums, int target) {`
matcher!(c_family_method, r"[\w<>]+\s+(\w+)\s*\([^)]*\)\s*\{");
// `public int[] twoSum(int[] nums, int target) {`
matcher!(java_method, r"public\s+[\w<>\[\]]+\s+(\w+)\s*\([^)]*\)\s*\{");
// `fun twoSum(nums: IntArray, target: Int): IntArray {`
matcher!(kotlin_fun, r"fun\s+(\w+)\s*\(");
// `function twoSum(nums: number[], target: number): number[] {`
matcher!(js_function, r"function\s+(\w+)\s*\(");
// `var twoSum = function(nums, target) {`
matcher!(js_function_binding, r"(?:var|let|const)\s+(\w+)\s*=\s*(?:async\s+)?function\b");
// `func twoSum(nums []int, target int) []int {`
matcher!(go_func, r"func\s+(\w+)\s*\(");
// `pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32> {`
matcher!(rust_fn, r"fn\s+(\w+)\s*[<(]");
// `def twoSum(self, nums: List[int], target: int) -> List[int]:`
matcher!(python_def, r"def\s+(\w+)\s*\(");
// `twoSum = (nums) => ...`, `twoSum: (nums) => ...`
matcher!(binding, r"(\w+)\s*[=:]\s*\(");

/// Patterns tried for each snippet syntax, first hit wins.
fn function_matchers(syntax: Syntax) -> &'static [Matcher] {
    match syntax {
        Syntax::TypeScript => &[js_function, js_function_binding, binding],
        Syntax::JavaScript => &[js_function_binding, js_function, binding],
        Syntax::Python => &[python_def],
        Syntax::Go => &[go_func],
        Syntax::Cpp => &[c_family_method],
        Syntax::Java => &[java_method, c_family_method],
        Syntax::Kotlin => &[kotlin_fun],
        Syntax::Rust => &[rust_fn],
    }
}

fn is_comment(line: &str) -> bool {
    let line = line.trim_start();
    ["//", "/*", "*", "#"].iter().any(|prefix| line.starts_with(prefix))
}

/// Best-effort name of the function the starter code asks to implement.
///
/// Comment lines are ignored: starter code often documents helper types
/// such as `ListNode` in a commented-out definition.
pub fn extract_function_name(code: &str, syntax: Syntax) -> Option<String> {
    let code = code
        .lines()
        .filter(|line| !is_comment(line))
        .collect::<Vec<_>>()
        .join("\n");
    function_matchers(syntax).iter().find_map(|matcher| matcher(&code))
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Put `statement` into every indentation block of `code` that has no body,
/// e.g. the method stubs of Python starter code.
pub fn fill_empty_blocks(code: &str, statement: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let mut out = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        out.push(line.trim_end().to_string());
        if !line.trim_end().ends_with(':') || is_comment(line) {
            continue;
        }
        let indent = indentation(line);
        let body = lines[i + 1..]
            .iter()
            .find(|next| !next.trim().is_empty() && !is_comment(next));
        if body.is_none_or(|next| indentation(next) <= indent) {
            out.push(format!("{}    {statement}", " ".repeat(indent)));
        }
    }
    out.join("\n").trim_end().to_string()
}

/// Placeholder values for one problem in one language.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: BTreeMap<&'static str, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_problem(problem: &Problem, profile: &LanguageProfile, names: &ExerciseNames) -> Self {
        let mut default_code = match problem.snippet(profile.snippet_tag) {
            Some(snippet) => snippet.code.clone(),
            None => {
                debug!(language = profile.id, "no starter snippet, using fallback body");
                profile.fallback_code(&problem.title)
            }
        };
        if let Some(statement) = profile.empty_block {
            default_code = fill_empty_blocks(&default_code, statement);
        }
        let function_name = extract_function_name(&default_code, profile.syntax)
            .unwrap_or_else(|| to_function_name(&problem.title));
        let class_name = to_type_name(&problem.title);

        let mut vars = Self::new();
        vars.set("PROBLEM_ID", problem.question_frontend_id.trim())
            .set("PROBLEM_PADDED_ID", &names.padded_id)
            .set("PROBLEM_TITLE", &problem.title)
            .set("PROBLEM_SLUG", &slugify(&problem.title_slug))
            .set("PROBLEM_DIFFICULTY", &problem.difficulty)
            .set(
                "PROBLEM_DESC",
                &clean_description(problem.content.as_deref().unwrap_or_default()),
            )
            .set("PROBLEM_DEFAULT_CODE", &default_code)
            .set("PROBLEM_NAME_FORMATTED", &function_name)
            .set("CLASS_NAME", &class_name)
            .set("PROBLEM_CLASS_NAME", &class_name)
            .set("SNAKE_CASE_NAME", &to_snake_case(&problem.title))
            .set("PROBLEM_PACKAGE", &format!("problem{}", names.padded_id))
            .set("EXERCISE_FILE_NAME", &names.exercise_file)
            .set("EXERCISE_FILE_NAME_NO_EXT", names.exercise_stem())
            .set(
                "EXAMPLE_TESTCASES",
                problem
                    .example_testcases
                    .as_deref()
                    .or(problem.sample_test_case.as_deref())
                    .unwrap_or_default(),
            );
        vars
    }

    pub fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.values.insert(key, value.to_string());
        self
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Replace every known placeholder in `template`. Unknown tokens are kept.
    pub fn substitute(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
