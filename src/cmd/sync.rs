use {
    crate::{
        cmd::{SubCmd, current_workspace, selected_languages},
        config::Settings,
        sync::{SyncOptions, SyncReport, sync_language},
    },
    anyhow::{Result, bail},
    argh::FromArgs,
    tracing::warn,
};

/// Bring language workspaces up to date with the templates.
#[derive(FromArgs)]
#[argh(subcommand, name = "sync")]
pub struct SyncSubCmd {
    #[argh(positional)]
    /// language to sync; omit to sync every initialized language
    language: Option<String>,

    #[argh(switch)]
    /// show what would change without writing anything
    dry_run: bool,

    #[argh(switch)]
    /// delete configuration files that newer templates replaced
    prune: bool,
}

impl SubCmd for SyncSubCmd {
    fn run(&self) -> Result<()> {
        let store = Settings::from_env().store()?;
        let workspace = current_workspace()?;
        let profiles = selected_languages(&workspace, self.language.as_deref())?;
        if profiles.is_empty() {
            println!("No languages in this workspace. Use `katabox add <language>` first.");
            return Ok(());
        }

        let options = SyncOptions {
            dry_run: self.dry_run,
            prune: self.prune,
        };
        let (mut total, mut failed) = (0, Vec::new());
        for profile in profiles {
            let lang_root = workspace.language_root(profile);
            match sync_language(&store, profile, &lang_root, options) {
                Ok(report) => {
                    print_report(profile.display_name, &report);
                    total += report.changes();
                }
                Err(e) => {
                    warn!(language = profile.id, error = %e, "sync failed");
                    println!("{}: {e}", profile.display_name);
                    failed.push(profile.id);
                }
            }
        }

        match (total, self.dry_run) {
            (0, _) => println!("Everything is up to date"),
            (n, true) => println!("{n} change(s) would be made; run without --dry-run to apply"),
            (n, false) => println!("{n} change(s) applied"),
        }
        if !failed.is_empty() {
            bail!("failed to sync {}", failed.join(", "));
        }
        Ok(())
    }
}

fn print_report(language: &str, report: &SyncReport) {
    if report.is_empty() && report.stale.is_empty() {
        println!("{language}: up to date");
        return;
    }
    println!("{language}:");
    for path in &report.added {
        println!("  + {}", path.display());
    }
    for path in &report.updated {
        println!("  ~ {}", path.display());
    }
    for path in &report.removed {
        println!("  - {}", path.display());
    }
    for path in &report.stale {
        println!("  ! {} is obsolete (use --prune to remove)", path.display());
    }
}
