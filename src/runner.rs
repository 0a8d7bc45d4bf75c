//! Spawning the per-language test and fix tools.

use {
    crate::{error::Error, language::LanguageProfile, locate::Located},
    std::{
        path::Path,
        process::{Command, ExitStatus},
    },
    tracing::{debug, warn},
};

/// Substitute `{path}` and `{name}` in a command template.
pub fn expand(template: &[&str], path: &str, name: &str) -> Vec<String> {
    template
        .iter()
        .map(|arg| arg.replace("{path}", path).replace("{name}", name))
        .collect()
}

/// Run `argv` in `dir` with inherited stdio and wait for it.
pub fn run(argv: &[String], dir: &Path) -> Result<ExitStatus, Error> {
    let Some((program, args)) = argv.split_first() else {
        return Err(std::io::Error::other("empty command").into());
    };
    debug!(command = %argv.join(" "), dir = ?dir, "spawning");
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|e| std::io::Error::new(e.kind(), format!("failed to run `{program}`: {e}")))?;
    debug!(%status, "child exited");
    Ok(status)
}

/// The test command of one exercise, or of the whole language when `exercise`
/// is `None`.
pub fn test_command(profile: &LanguageProfile, exercise: Option<&Located>) -> Vec<String> {
    match exercise {
        Some(located) => {
            let path = located.path.to_string_lossy().replace('\\', "/");
            expand(profile.test_command, &path, &located.name)
        }
        None => expand(profile.test_all_command, "", ""),
    }
}

pub fn run_tests(
    profile: &LanguageProfile,
    lang_root: &Path,
    exercise: Option<&Located>,
) -> Result<ExitStatus, Error> {
    let argv = test_command(profile, exercise);
    println!("Running: {}", argv.join(" "));
    run(&argv, lang_root)
}

/// Commands of a fix run that did not succeed.
#[derive(Debug, Default)]
pub struct FixReport {
    pub ran: usize,
    pub failures: Vec<Error>,
}

/// Run every lint and format command of `profile`. A failing command is
/// logged and the remaining ones still run.
pub fn run_fix(profile: &LanguageProfile, lang_root: &Path) -> FixReport {
    let mut report = FixReport::default();
    for template in profile.fix_commands {
        let argv = expand(template, "", "");
        let command = argv.join(" ");
        println!("Running: {command}");
        report.ran += 1;
        let failure = match run(&argv, lang_root) {
            Ok(status) if status.success() => continue,
            Ok(status) => Error::ChildProcess { command, status },
            Err(e) => e,
        };
        warn!(language = profile.id, error = %failure, "fix command failed");
        report.failures.push(failure);
    }
    report
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::language::profile,
        std::path::PathBuf,
        tempfile::TempDir,
    };

    fn located(name: &str, path: &str) -> Located {
        Located {
            name: name.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn single_exercise_commands() {
        let go = profile("go").unwrap();
        assert_eq!(
            test_command(go, Some(&located("problem_0001", "problem_0001"))),
            vec!["go", "test", "./problem_0001/..."]
        );

        let rust = profile("rust").unwrap();
        assert_eq!(
            test_command(rust, Some(&located("problem_0001", "src/problem_0001.rs"))),
            vec!["cargo", "test", "problem_0001::"]
        );

        let kotlin = profile("kotlin").unwrap();
        assert_eq!(
            test_command(
                kotlin,
                Some(&located("problem0704", "src/main/kotlin/problem0704"))
            ),
            vec!["gradle", "test", "--tests", "problem0704.*"]
        );
    }

    #[test]
    fn whole_language_command_has_no_placeholders() {
        for profile in crate::language::PROFILES {
            let argv = test_command(profile, None);
            assert!(!argv.is_empty());
            assert!(argv.iter().all(|arg| !arg.contains('{')), "{argv:?}");
        }
    }

    #[test]
    fn missing_program_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let argv = vec!["katabox-definitely-not-installed".to_string()];
        assert!(matches!(run(&argv, tmp.path()), Err(Error::Io(_))));
        assert!(run(&[], tmp.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_is_passed_through() {
        let tmp = TempDir::new().unwrap();
        let argv: Vec<String> = ["sh", "-c", "exit 3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(run(&argv, tmp.path()).unwrap().code(), Some(3));
    }
}
