//! Name derivation from problem titles.
//!
//! All functions are total: any input yields some (possibly empty) name.
//! Characters outside `[A-Za-z0-9]` and whitespace are dropped before casing.

/// Width used for padded problem identifiers (`1` -> `0001`).
pub const ID_WIDTH: usize = 4;

fn words(title: &str) -> Vec<String> {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// `"Two Sum"` -> `"twoSum"`.
pub fn to_camel_case(title: &str) -> String {
    words(title)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                word.to_ascii_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

/// `"Two Sum"` -> `"TwoSum"`.
pub fn to_pascal_case(title: &str) -> String {
    words(title).iter().map(|word| capitalize(word)).collect()
}

/// `"Roman to Integer"` -> `"roman_to_integer"`.
pub fn to_snake_case(title: &str) -> String {
    words(title)
        .iter()
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Prefix `name` when it cannot start an identifier.
fn identifier(name: String, prefix: &str) -> String {
    match name.chars().next() {
        Some(c) if !c.is_ascii_digit() => name,
        _ => format!("{prefix}{name}"),
    }
}

/// Class-like name usable as an identifier: `"3Sum"` -> `"Problem3sum"`.
pub fn to_type_name(title: &str) -> String {
    identifier(to_pascal_case(title), "Problem")
}

/// Function-like name usable as an identifier: `"3Sum"` -> `"problem3sum"`.
pub fn to_function_name(title: &str) -> String {
    identifier(to_camel_case(title), "problem")
}

/// Module-like name usable as an identifier: `"3Sum"` -> `"problem_3sum"`.
pub fn to_module_name(title: &str) -> String {
    identifier(to_snake_case(title), "problem_")
}

/// Left-pad `id` with zeros up to `width`. Wider identifiers are kept intact.
pub fn zero_pad_id(id: &str, width: usize) -> String {
    format!("{:0>width$}", id.trim(), width = width)
}

/// URL-style slug of a title: lower-case, punctuation dropped, words joined by
/// hyphens. `"Pow(x, n)"` -> `"powx-n"`.
pub fn slugify(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalize a user query for slug comparison: lower-case, `_` and `-` are the
/// same separator.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_ascii_lowercase().replace('_', "-")
}
