pub mod add;
pub mod fetch;
pub mod fix;
pub mod init;
pub mod languages;
pub mod sync;

use {
    crate::{
        error::Error,
        language::{LanguageProfile, profile},
        template::TemplateStore,
        workspace::Workspace,
    },
    add::AddSubCmd,
    anyhow::{Context, Result},
    argh::FromArgs,
    fetch::FetchSubCmd,
    fix::FixSubCmd,
    init::InitSubCmd,
    languages::LanguagesSubCmd,
    sync::SyncSubCmd,
    test::TestSubCmd,
    std::env,
};

pub trait SubCmd {
    fn run(&self) -> anyhow::Result<()>;
}

/// Scaffold and test coding-problem exercises in many languages.
#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help", "help"))]
pub struct MainCmd {
    #[argh(subcommand)]
    nested: Cmd,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Cmd {
    Init(InitSubCmd),
    Add(AddSubCmd),
    Fetch(FetchSubCmd),
    Test(TestSubCmd),
    Sync(SyncSubCmd),
    Fix(FixSubCmd),
    Languages(LanguagesSubCmd),
}

impl MainCmd {
    /// Run the nested command.
    pub fn run(&self) -> Result<()> {
        match &self.nested {
            Cmd::Init(cmd) => cmd.run(),
            Cmd::Add(cmd) => cmd.run(),
            Cmd::Fetch(cmd) => cmd.run(),
            Cmd::Test(cmd) => cmd.run(),
            Cmd::Sync(cmd) => cmd.run(),
            Cmd::Fix(cmd) => cmd.run(),
            Cmd::Languages(cmd) => cmd.run(),
        }
    }
}

/// The workspace enclosing the current directory.
pub fn current_workspace() -> Result<Workspace> {
    let cwd = env::current_dir().context("failed to read current directory")?;
    Ok(Workspace::discover(&cwd)?)
}

/// Profile of `language`, provided it also has templates in `store`.
pub fn store_profile(store: &TemplateStore, language: &str) -> Result<&'static LanguageProfile, Error> {
    match profile(language) {
        Some(profile) if store.tree(language).is_some() => Ok(profile),
        _ => Err(Error::UnsupportedLanguage {
            language: language.to_string(),
            available: store.languages().into_iter().map(String::from).collect(),
        }),
    }
}

/// `language` when given, otherwise every language initialized in `workspace`.
pub fn selected_languages(
    workspace: &Workspace,
    language: Option<&str>,
) -> Result<Vec<&'static LanguageProfile>, Error> {
    match language {
        Some(language) => {
            let profile = crate::language::require_profile(language)?;
            let lang_root = workspace.language_root(profile);
            if !lang_root.is_dir() {
                return Err(Error::LanguageNotInitialized {
                    language: language.to_string(),
                    path: lang_root,
                });
            }
            Ok(vec![profile])
        }
        None => Ok(workspace.languages()),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[test]
    fn store_profile_needs_templates() {
        let store = TemplateStore::from_entries([("go", "go.mod", "module x\n")]);
        assert_eq!(store_profile(&store, "go").unwrap().id, "go");
        match store_profile(&store, "rust") {
            Err(Error::UnsupportedLanguage { available, .. }) => assert_eq!(available, vec!["go"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn selected_languages_defaults_to_initialized_ones() {
        let tmp = TempDir::new().unwrap();
        let store = TemplateStore::from_entries([("go", "go.mod", "module x\n")]);
        let ws = Workspace::create(tmp.path(), &store).unwrap();
        assert!(selected_languages(&ws, None).unwrap().is_empty());
        assert!(matches!(
            selected_languages(&ws, Some("go")),
            Err(Error::LanguageNotInitialized { .. })
        ));

        ws.init_language(&store, profile("go").unwrap()).unwrap();
        let ids: Vec<_> = selected_languages(&ws, None).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["go"]);
        assert!(matches!(
            selected_languages(&ws, Some("cobol")),
            Err(Error::UnsupportedLanguage { .. })
        ));
    }
}
