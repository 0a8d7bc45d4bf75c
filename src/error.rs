//! Errors surfaced to the user.
//!
//! Every expected failure has its own variant so the entry point can print a
//! readable message and, where it helps, a short list of next steps.

use {
    std::{path::PathBuf, process::ExitStatus},
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("no katabox workspace found at or above {start:?}")]
    WorkspaceNotFound { start: PathBuf },

    #[error("workspace already initialized at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("language '{language}' is not supported")]
    UnsupportedLanguage {
        language: String,
        available: Vec<String>,
    },

    #[error("{language} workspace not found at {path:?}")]
    LanguageNotInitialized { language: String, path: PathBuf },

    #[error("problem '{query}' not found in {language} workspace")]
    ProblemNotFound { query: String, language: String },

    #[error("no templates found for '{language}'")]
    TemplateMissing { language: String },

    #[error("template file '{file}' is missing for {language}")]
    TemplateFileMissing { language: String, file: String },

    #[error("{language} template renders '{found}', but its layout expects '{expected}'")]
    TemplateLayout {
        language: String,
        expected: String,
        found: String,
    },

    #[error("exercise '{name}' already exists in {language}")]
    Conflict {
        name: String,
        language: String,
        path: PathBuf,
        identical: bool,
    },

    #[error("failed to fetch problem '{slug}': {reason}")]
    Transport { slug: String, reason: String },

    #[error("problem '{slug}' does not exist")]
    RemoteNotFound { slug: String },

    #[error("`{command}` exited with {status}")]
    ChildProcess { command: String, status: ExitStatus },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Next steps printed below the error message.
    pub fn hints(&self) -> Vec<String> {
        match self {
            Error::WorkspaceNotFound { .. } => vec![
                "run `katabox init` to create a workspace".to_string(),
                "or run the command from inside an existing workspace (a directory containing .katabox.json)".to_string(),
            ],
            Error::UnsupportedLanguage { available, .. } => {
                vec![format!("available languages: {}", available.join(", "))]
            }
            Error::LanguageNotInitialized { language, .. } => {
                vec![format!("run `katabox add {language}` first")]
            }
            Error::ProblemNotFound { language, .. } => vec![
                "identify the problem by number (`1`), slug (`two-sum`) or directory name (`problem_0001`)".to_string(),
                format!("fetch it first with `katabox fetch <slug> --language {language}`"),
            ],
            Error::Conflict {
                path, identical, ..
            } => {
                let mut hints = Vec::new();
                if *identical {
                    hints.push("the existing files already match a fresh copy".to_string());
                }
                hints.push("use --force to overwrite the existing files".to_string());
                hints.push("choose a different language".to_string());
                hints.push(format!("remove {path:?} manually"));
                hints
            }
            _ => Vec::new(),
        }
    }
}
