use {
    crate::{cmd::SubCmd, config::Settings, workspace::Workspace},
    anyhow::{Context, Result},
    argh::FromArgs,
    std::path::PathBuf,
};

/// Initialize a new practice workspace.
#[derive(FromArgs)]
#[argh(subcommand, name = "init")]
pub struct InitSubCmd {
    #[argh(positional, default = "String::from(\".\")")]
    /// directory to initialize (created if missing)
    path: String,
}

impl SubCmd for InitSubCmd {
    fn run(&self) -> Result<()> {
        let store = Settings::from_env().store()?;
        let target = PathBuf::from(&self.path);
        let workspace = Workspace::create(&target, &store)?;
        let root = workspace
            .root()
            .canonicalize()
            .context("failed to canonicalize workspace path")?;

        println!("Workspace initialized at {root:?}");
        println!();
        println!("Next steps:");
        println!("  katabox add <language>");
        println!("  katabox fetch <problem-slug> --language <language>");
        Ok(())
    }
}
