use {
    crate::{
        cmd::{SubCmd, current_workspace, store_profile},
        config::Settings,
        workspace::LanguageInit,
    },
    anyhow::Result,
    argh::FromArgs,
};

/// Add a language workspace to the current workspace.
#[derive(FromArgs)]
#[argh(subcommand, name = "add")]
pub struct AddSubCmd {
    #[argh(positional)]
    /// language to add, e.g. `typescript`
    language: String,
}

impl SubCmd for AddSubCmd {
    fn run(&self) -> Result<()> {
        let store = Settings::from_env().store()?;
        let profile = store_profile(&store, &self.language)?;
        let workspace = current_workspace()?;
        let lang_root = workspace.language_root(profile);

        match workspace.init_language(&store, profile)? {
            LanguageInit::Existing => {
                println!("{} workspace already exists at {lang_root:?}", profile.display_name);
            }
            LanguageInit::Created { files } => {
                println!("Created {} workspace at {lang_root:?}", profile.display_name);
                for file in files {
                    println!("  {}", file.display());
                }
            }
        }
        Ok(())
    }
}
