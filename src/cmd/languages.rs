use {
    crate::{
        cmd::{SubCmd, store_profile},
        config::Settings,
        locate::Locator,
        workspace::Workspace,
    },
    anyhow::Result,
    argh::FromArgs,
    std::env,
};

/// List the supported languages.
#[derive(FromArgs)]
#[argh(subcommand, name = "languages")]
pub struct LanguagesSubCmd {}

impl SubCmd for LanguagesSubCmd {
    fn run(&self) -> Result<()> {
        let store = Settings::from_env().store()?;
        // Outside a workspace every language is simply listed.
        let workspace = env::current_dir()
            .ok()
            .and_then(|cwd| Workspace::discover(&cwd).ok());
        let initialized: Vec<&str> = workspace
            .as_ref()
            .map(|ws| ws.languages().iter().map(|p| p.id).collect())
            .unwrap_or_default();

        if let Some(ws) = &workspace {
            match ws.marker() {
                Some(marker) => println!(
                    "Workspace {:?} (katabox {}, created {})",
                    ws.root(),
                    marker.version,
                    marker.created_at.format("%Y-%m-%d")
                ),
                None => println!("Workspace {:?}", ws.root()),
            }
            println!();
        }

        for id in store.languages() {
            let profile = store_profile(&store, id)?;
            match workspace.as_ref().filter(|_| initialized.contains(&id)) {
                Some(ws) => {
                    let lang_root = ws.language_root(profile);
                    let count = Locator::new(profile, &lang_root).exercises()?.len();
                    println!(
                        "* {:<12} {} ({count} exercise(s))",
                        profile.id, profile.display_name
                    );
                }
                None => println!("  {:<12} {}", profile.id, profile.display_name),
            }
        }
        if !initialized.is_empty() {
            println!();
            println!("* initialized in this workspace");
        }
        Ok(())
    }
}
