//! Rules locating a tool's real output file and moving it where the caller
//! expects it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::{ModelError, Parameter, ParameterTree};

const TEMP_TOKEN: &str = "%TEMP%";
const PWD_TOKEN: &str = "%PWD%";
const BASENAME_TOKEN: &str = "%BASENAME%";

fn basename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%BASENAME\[([^\]]+)\]%").expect("valid basename pattern"))
}

/// Directories substituted into location patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationContext {
    /// Replaces `%TEMP%`; defaults to the process temp directory.
    pub temp_dir: PathBuf,
    /// Replaces `%PWD%` and anchors relative paths.
    pub working_dir: PathBuf,
}

impl RelocationContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        RelocationContext {
            temp_dir: std::env::temp_dir(),
            working_dir: working_dir.into(),
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    fn anchor(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Relocation rule: `reference` names an output file parameter, and
/// `location_pattern` describes where the tool actually writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocator {
    pub reference: String,
    pub location_pattern: String,
}

impl Relocator {
    pub fn new(reference: impl Into<String>, location_pattern: impl Into<String>) -> Self {
        Relocator {
            reference: reference.into(),
            location_pattern: location_pattern.into(),
        }
    }

    /// Resolve the reference; it must be an output file parameter.
    pub fn validate<'a>(&self, tree: &'a ParameterTree) -> Result<&'a Parameter, ModelError> {
        let param = tree.resolve(&self.reference)?;
        if !param.is_output_file() {
            return Err(ModelError::invalid(
                &self.reference,
                "relocator target is not an output file",
            ));
        }
        Ok(param)
    }

    /// Path the caller expects the output at, anchored at the working dir.
    pub fn target(&self, tree: &ParameterTree, ctx: &RelocationContext) -> Result<PathBuf, ModelError> {
        let param = self.validate(tree)?;
        let value = param
            .list_representation()
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid(&self.reference, "no target file set"))?;
        Ok(ctx.anchor(Path::new(&value)))
    }

    /// Substitute `%TEMP%`, `%PWD%`, `%BASENAME%` (stem of `target`) and
    /// `%BASENAME[key]%` (stem of the file value of parameter `key`).
    pub fn resolve_location(
        &self,
        tree: &ParameterTree,
        ctx: &RelocationContext,
        target: &Path,
    ) -> Result<PathBuf, ModelError> {
        let mut failure = None;
        let expanded = basename_pattern().replace_all(&self.location_pattern, |caps: &Captures<'_>| {
            let key = &caps[1];
            match tree.resolve(key) {
                Ok(param) => param
                    .list_representation()
                    .first()
                    .map(|value| file_stem(Path::new(value)))
                    .unwrap_or_default(),
                Err(err) => {
                    failure.get_or_insert(err);
                    String::new()
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        let resolved = expanded
            .replace(BASENAME_TOKEN, &file_stem(target))
            .replace(TEMP_TOKEN, &ctx.temp_dir.to_string_lossy())
            .replace(PWD_TOKEN, &ctx.working_dir.to_string_lossy());
        debug!(reference = %self.reference, pattern = %self.location_pattern, resolved = %resolved, "resolved relocator pattern");
        Ok(ctx.anchor(Path::new(&resolved)))
    }

    /// Move the pattern-resolved file onto the referenced output path.
    /// Returns the final location.
    pub fn relocate(&self, tree: &ParameterTree, ctx: &RelocationContext) -> Result<PathBuf, ModelError> {
        let target = self.target(tree, ctx)?;
        let source = self.resolve_location(tree, ctx, &target)?;
        if !source.exists() {
            return Err(ModelError::RelocationFailed { path: source });
        }
        if source == target {
            return Ok(target);
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::rename(&source, &target).is_err() {
            fs::copy(&source, &target)?;
            fs::remove_file(&source)?;
        }
        info!(from = %source.display(), to = %target.display(), "relocated output file");
        Ok(target)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileDirection, FileParameter, StringParameter};

    fn tree(output: &str) -> ParameterTree {
        let mut tree = ParameterTree::new();
        let mut input = FileParameter::new("Tool.1.in", FileDirection::Input);
        input.set_value(Some("/data/sample.mzML".into()));
        tree.insert(Parameter::File(input));
        let mut out = FileParameter::new("Tool.1.out", FileDirection::Output);
        out.set_value(Some(output.into()));
        tree.insert(Parameter::File(out));
        tree.insert(Parameter::String(StringParameter::new("Tool.1.name")));
        tree
    }

    #[test]
    fn pattern_substitution() {
        let tree = tree("result.featureXML");
        let ctx = RelocationContext::new("/work").with_temp_dir("/tmp/x");
        let rule = Relocator::new("Tool.1.out", "%TEMP%/%BASENAME[Tool.1.in]%_%BASENAME%.xml");
        let target = rule.target(&tree, &ctx).expect("target");
        assert_eq!(target, PathBuf::from("/work/result.featureXML"));
        let resolved = rule.resolve_location(&tree, &ctx, &target).expect("resolve");
        assert_eq!(resolved, PathBuf::from("/tmp/x/sample_result.xml"));

        let rule = Relocator::new("Tool.1.out", "%PWD%/out.xml");
        let resolved = rule.resolve_location(&tree, &ctx, &target).expect("resolve");
        assert_eq!(resolved, PathBuf::from("/work/out.xml"));
    }

    #[test]
    fn references_are_checked() {
        let tree = tree("out.xml");
        let ctx = RelocationContext::new("/work");
        let missing = Relocator::new("Tool.1.nope", "%PWD%/x");
        assert!(matches!(
            missing.relocate(&tree, &ctx).unwrap_err(),
            ModelError::UnresolvedReference(_)
        ));
        let not_output = Relocator::new("Tool.1.in", "%PWD%/x");
        assert!(matches!(
            not_output.validate(&tree).unwrap_err(),
            ModelError::InvalidValue { .. }
        ));
        let bad_basename = Relocator::new("Tool.1.out", "%BASENAME[Tool.9]%");
        assert!(matches!(
            bad_basename.resolve_location(&tree, &ctx, Path::new("x")).unwrap_err(),
            ModelError::UnresolvedReference(ref key) if key == "Tool.9"
        ));
    }

    #[test]
    fn relocate_moves_file() {
        let work = tempfile::tempdir().expect("tempdir");
        let produced = work.path().join("tool_output.tmp");
        fs::write(&produced, b"payload").expect("write produced");
        let tree = tree("final/result.txt");
        let ctx = RelocationContext::new(work.path());
        let rule = Relocator::new("Tool.1.out", "%PWD%/tool_output.tmp");
        let moved = rule.relocate(&tree, &ctx).expect("relocate");
        assert_eq!(moved, work.path().join("final/result.txt"));
        assert_eq!(fs::read(&moved).expect("read moved"), b"payload");
        assert!(!produced.exists());
    }

    #[test]
    fn missing_source_is_an_error() {
        let work = tempfile::tempdir().expect("tempdir");
        let tree = tree("result.txt");
        let ctx = RelocationContext::new(work.path());
        let rule = Relocator::new("Tool.1.out", "%PWD%/%BASENAME%.tmp");
        match rule.relocate(&tree, &ctx).unwrap_err() {
            ModelError::RelocationFailed { path } => {
                assert_eq!(path, work.path().join("result.tmp"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
