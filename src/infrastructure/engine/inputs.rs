//! Input gathering and tag substitution
//!
//! Scripts may reference `@v{name}` (a run variable) and `@f{id}` (the
//! contents of a declared input file). Command lines may reference `@v{name}`.
//! Every tag must resolve; unresolved tags fail the run before anything is
//! staged.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde_yaml_ng::Value;

use crate::domain::ports::engine::ExecutionError;
use crate::domain::run::RunSpec;

/// Rendered inputs for one run, ready to stage
#[derive(Debug, Default)]
pub struct Inputs {
    /// Variable name -> rendered scalar
    pub variables: BTreeMap<String, String>,
    /// Staged file name -> content
    pub files: Vec<(String, String)>,
    /// Staged script name -> content, tags already substituted
    pub scripts: Vec<(String, String)>,
}

impl Inputs {
    /// Names of every staged file and script
    pub fn staged_names(&self) -> Vec<String> {
        self.scripts
            .iter()
            .chain(self.files.iter())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Compiles the tag patterns once and renders run inputs
pub struct Renderer {
    var_tag: Regex,
    file_tag: Regex,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            var_tag: Regex::new(r"@v\{([^}]+)\}").expect("static pattern"),
            file_tag: Regex::new(r"@f\{([^}]+)\}").expect("static pattern"),
        }
    }

    /// Rendered variable map for a run
    pub fn variables(&self, run: &RunSpec) -> BTreeMap<String, String> {
        run.variables
            .iter()
            .map(|(name, value)| (name.clone(), render_scalar(value)))
            .collect()
    }

    /// Read, substitute, and collect a run's input files and scripts.
    ///
    /// Relative input paths resolve against `base`.
    pub fn gather(&self, base: &Path, run: &RunSpec) -> Result<Inputs, ExecutionError> {
        let variables = self.variables(run);

        let mut by_id: BTreeMap<String, (String, String)> = BTreeMap::new();
        for (file_id, relative) in &run.files {
            let (name, content) = read_input(&base.join(relative))?;
            by_id.insert(file_id.clone(), (name, content));
        }

        let mut scripts: Vec<(String, String)> = Vec::new();
        for relative in &run.scripts {
            let (name, content) = read_input(&base.join(relative))?;
            if scripts.iter().any(|(existing, _)| existing == &name) {
                return Err(ExecutionError::DuplicateScript { name });
            }

            let context = relative.display().to_string();
            let content = self.substitute_variables(&content, &variables, &context)?;
            let content = self.substitute_file_tags(&content, &by_id, &context)?;
            scripts.push((name, content));
        }

        Ok(Inputs {
            variables,
            files: by_id.into_values().collect(),
            scripts,
        })
    }

    /// Substitute `@v{...}` tags in each command line
    pub fn render_commands(
        &self,
        commands: &[String],
        variables: &BTreeMap<String, String>,
    ) -> Result<Vec<String>, ExecutionError> {
        commands
            .iter()
            .map(|command| {
                let context = format!("command '{}'", command);
                self.substitute_variables(command, variables, &context)
            })
            .collect()
    }

    fn substitute_variables(
        &self,
        text: &str,
        variables: &BTreeMap<String, String>,
        context: &str,
    ) -> Result<String, ExecutionError> {
        self.substitute(&self.var_tag, text, |name| {
            variables
                .get(name)
                .cloned()
                .ok_or_else(|| ExecutionError::UnknownVariable {
                    name: name.to_string(),
                    context: context.to_string(),
                })
        })
    }

    fn substitute_file_tags(
        &self,
        text: &str,
        by_id: &BTreeMap<String, (String, String)>,
        context: &str,
    ) -> Result<String, ExecutionError> {
        self.substitute(&self.file_tag, text, |name| {
            by_id
                .get(name)
                .map(|(_, content)| content.clone())
                .ok_or_else(|| ExecutionError::UnknownFileRef {
                    name: name.to_string(),
                    context: context.to_string(),
                })
        })
    }

    fn substitute<F>(
        &self,
        pattern: &Regex,
        text: &str,
        mut lookup: F,
    ) -> Result<String, ExecutionError>
    where
        F: FnMut(&str) -> Result<String, ExecutionError>,
    {
        let mut rendered = String::with_capacity(text.len());
        let mut last = 0;
        for captures in pattern.captures_iter(text) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            rendered.push_str(&text[last..whole.start()]);
            rendered.push_str(&lookup(name.as_str())?);
            last = whole.end();
        }
        rendered.push_str(&text[last..]);
        Ok(rendered)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn read_input(path: &Path) -> Result<(String, String), ExecutionError> {
    if !path.exists() {
        return Err(ExecutionError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(ExecutionError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ExecutionError::NotAFile {
            path: path.to_path_buf(),
        })?;
    let content = fs::read_to_string(path).map_err(crate::domain::ports::WsError::Io)?;
    Ok((name, content))
}

/// Render a YAML scalar the way it reads in the document
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        other => serde_yaml_ng::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}
