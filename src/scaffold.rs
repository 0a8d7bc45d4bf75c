//! Exercise creation.
//!
//! Creating an exercise happens in two steps. [`plan`] reads and renders
//! every template in memory and fails before anything touches the disk;
//! [`ExercisePlan::write`] then checks the target location and writes.

use {
    crate::{
        api::Problem,
        error::Error,
        language::{ExerciseNames, Layout, LanguageProfile, TestNaming},
        render::Placeholders,
        template::{EXERCISE_TEMPLATE, Node, PROBLEM_DIR_SENTINEL, TEST_TEMPLATE, TemplateStore},
    },
    regex::Regex,
    std::{
        fs,
        io::ErrorKind,
        path::{Path, PathBuf},
    },
    tracing::{debug, info, warn},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Relative to the language root.
    pub path: PathBuf,
    pub contents: String,
}

/// A module declaration to add to a shared registry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Relative to the language root.
    pub registry: PathBuf,
    pub module: String,
}

impl Registration {
    pub fn line(&self) -> String {
        format!("pub mod {};", self.module)
    }

    /// Whether `source` already declares the module, with or without `pub`.
    pub fn is_declared(&self, source: &str) -> bool {
        let pattern = format!(
            r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+{}\s*;",
            regex::escape(&self.module)
        );
        Regex::new(&pattern).is_ok_and(|re| re.is_match(source))
    }

    /// Append the declaration unless it is already there.
    pub fn apply(&self, lang_root: &Path) -> Result<bool, Error> {
        let path = lang_root.join(&self.registry);
        let mut source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if self.is_declared(&source) {
            debug!(module = %self.module, "module already registered");
            return Ok(false);
        }
        if !source.is_empty() && !source.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(&self.line());
        source.push('\n');
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, source)?;
        Ok(true)
    }
}

/// What the filesystem holds at an exercise location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseState {
    Absent,
    /// Every planned file exists with exactly the planned content.
    Matching,
    Conflicting,
}

/// Everything needed to write one exercise.
#[derive(Debug, Clone)]
pub struct ExercisePlan {
    pub language: &'static str,
    pub names: ExerciseNames,
    /// Exercise location(s), relative to the language root. The first entry
    /// is the primary one.
    pub locations: Vec<PathBuf>,
    pub files: Vec<PlannedFile>,
    pub registration: Option<Registration>,
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedExercise {
    pub location: PathBuf,
    pub files: Vec<PathBuf>,
    pub overwritten: bool,
    pub registered: bool,
}

/// Render all files of `problem` for `profile` without touching the disk.
pub fn plan(
    store: &TemplateStore,
    profile: &'static LanguageProfile,
    problem: &Problem,
) -> Result<ExercisePlan, Error> {
    let tree = store.tree(profile.id).ok_or_else(|| Error::TemplateMissing {
        language: profile.id.to_string(),
    })?;
    let names = profile.names(&problem.question_frontend_id, &problem.title);
    let vars = Placeholders::for_problem(problem, profile, &names);

    let exercise_template = format!("{EXERCISE_TEMPLATE}.{}", profile.extension);
    let test_template = format!("{TEST_TEMPLATE}.{}", profile.extension);
    let test_file = names.test_file.clone();

    let rendered = tree.walk(|node| match node {
        Node::Dir(PROBLEM_DIR_SENTINEL) => Some(names.name.clone()),
        Node::Dir(name) => Some(name.to_string()),
        Node::File(name) if name == exercise_template => Some(names.exercise_file.clone()),
        Node::File(name) if name == test_template => test_file.clone(),
        Node::File(_) => None,
    });

    let mut exercise = None;
    let mut test = None;
    let mut files = Vec::new();
    for (path, template) in rendered {
        let file_name = template.path.file_name().and_then(|n| n.to_str());
        if file_name == Some(exercise_template.as_str()) {
            exercise = Some(path.clone());
        } else {
            test = Some(path.clone());
        }
        let text = template.text().map_err(|e| Error::TemplateFileMissing {
            language: profile.id.to_string(),
            file: format!("{} ({e:#})", template.path.display()),
        })?;
        files.push(PlannedFile {
            path,
            contents: vars.substitute(text),
        });
    }

    let exercise = exercise.ok_or_else(|| Error::TemplateFileMissing {
        language: profile.id.to_string(),
        file: exercise_template.clone(),
    })?;
    if profile.test_naming != TestNaming::Inline && test.is_none() {
        return Err(Error::TemplateFileMissing {
            language: profile.id.to_string(),
            file: test_template,
        });
    }

    let locations = profile.locations(&names.name);
    check_layout(profile, &locations, &exercise, test.as_deref())?;

    let registration = profile.registry().map(|registry| Registration {
        registry: PathBuf::from(registry),
        module: names.name.clone(),
    });

    debug!(
        language = profile.id,
        name = %names.name,
        files = files.len(),
        "planned exercise"
    );
    Ok(ExercisePlan {
        language: profile.id,
        names,
        locations,
        files,
        registration,
    })
}

/// The template tree decides where files land; the profile decides where
/// the locator looks. Both must agree.
fn check_layout(
    profile: &LanguageProfile,
    locations: &[PathBuf],
    exercise: &Path,
    test: Option<&Path>,
) -> Result<(), Error> {
    let mismatch = |expected: &Path, found: &Path| Error::TemplateLayout {
        language: profile.id.to_string(),
        expected: expected.display().to_string(),
        found: found.display().to_string(),
    };

    let primary = &locations[0];
    let exercise_ok = match profile.layout {
        Layout::ModuleRegistry { .. } => exercise == primary,
        Layout::Flat | Layout::NestedPackage => exercise.parent() == Some(primary.as_path()),
    };
    if !exercise_ok {
        return Err(mismatch(primary, exercise));
    }

    if let Some(test) = test {
        let test_location = locations.last().unwrap_or(primary);
        if test.parent() != Some(test_location.as_path()) {
            return Err(mismatch(test_location, test));
        }
    }
    Ok(())
}

impl ExercisePlan {
    /// Primary exercise location, relative to the language root.
    pub fn location(&self) -> &Path {
        &self.locations[0]
    }

    pub fn state(&self, lang_root: &Path) -> ExerciseState {
        let present = self
            .locations
            .iter()
            .any(|location| lang_root.join(location).exists());
        if !present {
            return ExerciseState::Absent;
        }
        let matching = self.files.iter().all(|file| {
            fs::read(lang_root.join(&file.path))
                .map(|bytes| bytes == file.contents.as_bytes())
                .unwrap_or(false)
        });
        if matching {
            ExerciseState::Matching
        } else {
            ExerciseState::Conflicting
        }
    }

    /// Write the planned files under `lang_root`.
    ///
    /// An existing exercise is a [`Error::Conflict`] unless `overwrite` is
    /// set, in which case the planned files are replaced and anything else
    /// at the location is left alone.
    pub fn write(&self, lang_root: &Path, overwrite: bool) -> Result<CreatedExercise, Error> {
        let state = self.state(lang_root);
        let overwritten = match state {
            ExerciseState::Absent => false,
            _ if !overwrite => {
                return Err(Error::Conflict {
                    name: self.names.name.clone(),
                    language: self.language.to_string(),
                    path: lang_root.join(self.location()),
                    identical: state == ExerciseState::Matching,
                });
            }
            _ => {
                warn!(name = %self.names.name, language = self.language, "overwriting existing exercise");
                true
            }
        };

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = lang_root.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &file.contents)?;
            written.push(path);
        }

        let registered = match &self.registration {
            Some(registration) => registration.apply(lang_root)?,
            None => false,
        };

        info!(name = %self.names.name, language = self.language, "exercise written");
        Ok(CreatedExercise {
            location: lang_root.join(self.location()),
            files: written,
            overwritten,
            registered,
        })
    }
}
