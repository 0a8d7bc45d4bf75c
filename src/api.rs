//! Problem metadata from the remote GraphQL service.

use {
    crate::error::Error,
    reqwest::{
        StatusCode,
        blocking::Client,
        header::{CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT},
    },
    serde::{Deserialize, Serialize},
    serde_json::json,
    tracing::debug,
};

pub const DEFAULT_GRAPHQL_URL: &str = "https://leetcode.com/graphql";
const USER_AGENT_VALUE: &str = concat!("katabox/", env!("CARGO_PKG_VERSION"));

const QUESTION_QUERY: &str = r#"
query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
        questionId
        questionFrontendId
        title
        titleSlug
        content
        difficulty
        codeSnippets {
            lang
            langSlug
            code
        }
        exampleTestcases
        sampleTestCase
    }
}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub lang: String,
    pub lang_slug: String,
    pub code: String,
}

/// A fetched problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub question_id: String,
    pub question_frontend_id: String,
    pub title: String,
    pub title_slug: String,
    /// HTML description. Missing for locked problems.
    #[serde(default)]
    pub content: Option<String>,
    pub difficulty: String,
    #[serde(default)]
    pub code_snippets: Option<Vec<CodeSnippet>>,
    #[serde(default)]
    pub example_testcases: Option<String>,
    #[serde(default)]
    pub sample_test_case: Option<String>,
}

impl Problem {
    pub fn snippet(&self, lang_slug: &str) -> Option<&CodeSnippet> {
        self.code_snippets
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|s| s.lang_slug.eq_ignore_ascii_case(lang_slug))
    }
}

/// Anything that can produce a problem for a slug.
pub trait ProblemSource {
    fn fetch_problem(&self, slug: &str) -> Result<Problem, Error>;
}

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    data: Option<QuestionData>,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<Problem>,
}

pub struct LeetCodeClient {
    client: Client,
    endpoint: String,
}

impl LeetCodeClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .default_headers(Self::default_headers(&endpoint))
            .build()
            .map_err(|e| Error::Transport {
                slug: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, endpoint })
    }

    fn default_headers(endpoint: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Ok(referer) = HeaderValue::from_str(endpoint.trim_end_matches("graphql")) {
            headers.insert(REFERER, referer);
        }
        headers
    }
}

impl ProblemSource for LeetCodeClient {
    fn fetch_problem(&self, slug: &str) -> Result<Problem, Error> {
        let transport = |reason: String| Error::Transport {
            slug: slug.to_string(),
            reason,
        };

        debug!(slug, endpoint = %self.endpoint, "fetching problem");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "operationName": "questionData",
                "variables": { "titleSlug": slug },
                "query": QUESTION_QUERY,
            }))
            .send()
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::RemoteNotFound {
                slug: slug.to_string(),
            });
        }
        if !status.is_success() {
            return Err(transport(format!("server responded with {status}")));
        }

        let body: QuestionResponse = response
            .json()
            .map_err(|e| transport(format!("malformed response: {e}")))?;
        body.data
            .and_then(|data| data.question)
            .ok_or_else(|| Error::RemoteNotFound {
                slug: slug.to_string(),
            })
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// In-memory source returning clones of the problems it holds.
    #[derive(Default)]
    pub struct StubSource {
        pub problems: Vec<Problem>,
    }

    impl ProblemSource for StubSource {
        fn fetch_problem(&self, slug: &str) -> Result<Problem, Error> {
            self.problems
                .iter()
                .find(|p| p.title_slug == slug)
                .cloned()
                .ok_or_else(|| Error::RemoteNotFound {
                    slug: slug.to_string(),
                })
        }
    }

    pub fn two_sum() -> Problem {
        Problem {
            question_id: "1".to_string(),
            question_frontend_id: "1".to_string(),
            title: "Two Sum".to_string(),
            title_slug: "two-sum".to_string(),
            content: Some(
                "<p>Given an array of integers <code>nums</code>&nbsp;and an integer <code>target</code>, return <em>indices of the two numbers such that they add up to <code>target</code></em>.</p>"
                    .to_string(),
            ),
            difficulty: "Easy".to_string(),
            code_snippets: Some(vec![
                CodeSnippet {
                    lang: "TypeScript".to_string(),
                    lang_slug: "typescript".to_string(),
                    code: "function twoSum(nums: number[], target: number): number[] {\n    \n};"
                        .to_string(),
                },
                CodeSnippet {
                    lang: "Python3".to_string(),
                    lang_slug: "python3".to_string(),
                    code: "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:\n        "
                        .to_string(),
                },
                CodeSnippet {
                    lang: "Rust".to_string(),
                    lang_slug: "rust".to_string(),
                    code: "impl Solution {\n    pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32> {\n        \n    }\n}"
                        .to_string(),
                },
                CodeSnippet {
                    lang: "Java".to_string(),
                    lang_slug: "java".to_string(),
                    code: "class Solution {\n    public int[] twoSum(int[] nums, int target) {\n        \n    }\n}"
                        .to_string(),
                },
            ]),
            example_testcases: Some("[2,7,11,15]\n9".to_string()),
            sample_test_case: Some("[2,7,11,15]\n9".to_string()),
        }
    }

    pub fn binary_search() -> Problem {
        Problem {
            question_id: "792".to_string(),
            question_frontend_id: "704".to_string(),
            title: "Binary Search".to_string(),
            title_slug: "binary-search".to_string(),
            content: Some("<p>Search a sorted array.</p>".to_string()),
            difficulty: "Easy".to_string(),
            code_snippets: None,
            example_testcases: None,
            sample_test_case: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{testing::*, *};

    #[test]
    fn decodes_graphql_response() {
        let body = r#"{
            "data": {
                "question": {
                    "questionId": "1",
                    "questionFrontendId": "1",
                    "title": "Two Sum",
                    "titleSlug": "two-sum",
                    "content": "<p>Hi</p>",
                    "difficulty": "Easy",
                    "codeSnippets": [
                        {"lang": "Go", "langSlug": "golang", "code": "func twoSum() {}"}
                    ],
                    "exampleTestcases": "[2,7]\n9",
                    "sampleTestCase": "[2,7]\n9"
                }
            }
        }"#;
        let response: QuestionResponse = serde_json::from_str(body).unwrap();
        let problem = response.data.unwrap().question.unwrap();
        assert_eq!(problem.question_frontend_id, "1");
        assert_eq!(problem.snippet("GOLANG").unwrap().code, "func twoSum() {}");
        assert!(problem.snippet("rust").is_none());
    }

    #[test]
    fn null_question_means_not_found() {
        let response: QuestionResponse =
            serde_json::from_str(r#"{"data": {"question": null}}"#).unwrap();
        assert!(response.data.unwrap().question.is_none());
    }

    #[test]
    fn locked_problem_without_content_decodes() {
        let body = r#"{"questionFrontendId": "9", "title": "T", "titleSlug": "t",
                       "content": null, "difficulty": "Hard", "codeSnippets": null}"#;
        let problem: Problem = serde_json::from_str(body).unwrap();
        assert!(problem.content.is_none());
        assert!(problem.snippet("rust").is_none());
    }

    #[test]
    fn stub_source_reports_missing_slug() {
        let source = StubSource {
            problems: vec![two_sum()],
        };
        assert_eq!(source.fetch_problem("two-sum").unwrap().title, "Two Sum");
        assert!(matches!(
            source.fetch_problem("three-sum"),
            Err(Error::RemoteNotFound { .. })
        ));
    }
}
