use {
    crate::{
        cmd::{SubCmd, current_workspace, selected_languages},
        runner,
    },
    anyhow::Result,
    argh::FromArgs,
};

/// Run lint and format fixes in language workspaces.
#[derive(FromArgs)]
#[argh(subcommand, name = "fix")]
pub struct FixSubCmd {
    #[argh(positional)]
    /// language to fix; omit to fix every initialized language
    language: Option<String>,
}

impl SubCmd for FixSubCmd {
    fn run(&self) -> Result<()> {
        let workspace = current_workspace()?;
        let profiles = selected_languages(&workspace, self.language.as_deref())?;
        if profiles.is_empty() {
            println!("No languages in this workspace. Use `katabox add <language>` first.");
            return Ok(());
        }

        let (mut ran, mut failed) = (0, 0);
        for profile in profiles {
            println!("Fixing {}...", profile.display_name);
            let report = runner::run_fix(profile, &workspace.language_root(profile));
            for failure in &report.failures {
                println!("  {failure}");
            }
            ran += report.ran;
            failed += report.failures.len();
        }

        if failed == 0 {
            println!("All fixes completed");
        } else {
            println!("Fixes completed, {failed} of {ran} command(s) failed");
        }
        Ok(())
    }
}
