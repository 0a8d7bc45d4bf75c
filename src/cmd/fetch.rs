use {
    crate::{
        api::{LeetCodeClient, ProblemSource},
        cmd::{SubCmd, current_workspace, store_profile},
        config::Settings,
        error::Error,
        language::LanguageProfile,
        scaffold::{self, CreatedExercise},
        template::TemplateStore,
        workspace::Workspace,
    },
    anyhow::Result,
    argh::FromArgs,
};

/// Fetch a problem and create its exercise files.
#[derive(FromArgs)]
#[argh(subcommand, name = "fetch")]
pub struct FetchSubCmd {
    #[argh(positional)]
    /// problem slug, e.g. `two-sum`
    slug: String,

    #[argh(option, short = 'l')]
    /// language of the exercise
    language: String,

    #[argh(switch, short = 'f')]
    /// overwrite the exercise if it already exists
    force: bool,
}

impl SubCmd for FetchSubCmd {
    fn run(&self) -> Result<()> {
        let settings = Settings::from_env();
        let store = settings.store()?;
        let profile = store_profile(&store, &self.language)?;
        let workspace = current_workspace()?;
        let client = LeetCodeClient::new(settings.graphql_url)?;

        println!("Fetching problem: {}...", self.slug);
        let created = fetch_into(&workspace, &store, &client, profile, &self.slug, self.force)?;

        if created.overwritten {
            println!("Overwrote existing exercise");
        }
        println!("Created {} exercise at {:?}", profile.display_name, created.location);
        for file in &created.files {
            println!("  {}", file.display());
        }
        if created.registered {
            println!("Registered module in {}", profile.registry().unwrap_or_default());
        }
        Ok(())
    }
}

/// Fetch `slug` from `source` and scaffold it into `workspace`, initializing
/// the language workspace on demand.
pub fn fetch_into(
    workspace: &Workspace,
    store: &TemplateStore,
    source: &dyn ProblemSource,
    profile: &'static LanguageProfile,
    slug: &str,
    force: bool,
) -> Result<CreatedExercise, Error> {
    let problem = source.fetch_problem(slug.trim())?;
    println!("Found: [{}] {}", problem.question_frontend_id, problem.title);

    // Render first so a broken template leaves the workspace untouched.
    let plan = scaffold::plan(store, profile, &problem)?;
    let lang_root = workspace.ensure_language(store, profile)?;
    plan.write(&lang_root, force)
}
