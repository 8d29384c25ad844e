//! Flat, insertion-ordered parameter namespace with section descriptions.

use std::collections::{HashMap, HashSet};

use crate::{ModelError, Parameter};

/// Separator between the segments of a parameter key.
pub const KEY_SEPARATOR: char = '.';

/// A named section of the namespace, such as `Tool.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub path: String,
    pub description: String,
    /// Number of parameters stored when the section was first recorded;
    /// sections without parameters of their own are written at this point.
    pub position: usize,
}

/// Ordered mapping from dot-separated key to [`Parameter`].
///
/// Nesting is never stored explicitly; section boundaries are derived from
/// key prefixes when needed. The tree keeps its own copy of every key, so
/// the index and key order stay consistent whatever is done through
/// [`ParameterTree::get_mut`].
#[derive(Debug, Clone, Default)]
pub struct ParameterTree {
    keys: Vec<String>,
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
    sections: Vec<Section>,
    section_index: HashMap<String, usize>,
}

impl ParameterTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter. Replacing an existing key keeps its position and
    /// returns the previous parameter.
    pub fn insert(&mut self, param: Parameter) -> Option<Parameter> {
        match self.index.get(param.key()) {
            Some(&idx) => Some(std::mem::replace(&mut self.params[idx], param)),
            None => {
                let key = param.key().to_string();
                self.index.insert(key.clone(), self.params.len());
                self.keys.push(key);
                self.params.push(param);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.index.get(key).map(|&idx| &self.params[idx])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Parameter> {
        let idx = *self.index.get(key)?;
        self.params.get_mut(idx)
    }

    /// Look up a parameter, reporting an unresolved reference otherwise.
    pub fn resolve(&self, key: &str) -> Result<&Parameter, ModelError> {
        self.get(key)
            .ok_or_else(|| ModelError::UnresolvedReference(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Stored keys paired with their parameters, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.keys.iter().map(String::as_str).zip(&self.params)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parse `text` into the parameter stored under `key`.
    pub fn fill_from_str(&mut self, key: &str, text: &str) -> Result<(), ModelError> {
        self.get_mut(key)
            .ok_or_else(|| ModelError::UnresolvedReference(key.to_string()))?
            .fill_from_str(text)
    }

    /// Record or overwrite the description of a section path such as `Tool.1`.
    /// A new section is positioned after the parameters stored so far.
    pub fn set_section_description(&mut self, path: impl Into<String>, description: impl Into<String>) {
        let path = path.into();
        let description = description.into();
        match self.section_index.get(&path) {
            Some(&idx) => self.sections[idx].description = description,
            None => {
                self.section_index.insert(path.clone(), self.sections.len());
                self.sections.push(Section {
                    path,
                    description,
                    position: self.params.len(),
                });
            }
        }
    }

    pub fn section_description(&self, path: &str) -> Option<&str> {
        self.section_index
            .get(path)
            .map(|&idx| self.sections[idx].description.as_str())
    }

    /// Known sections as `(path, description)`, in the order recorded.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .map(|s| (s.path.as_str(), s.description.as_str()))
    }

    /// Recorded sections that hold no parameter, directly or nested.
    pub fn empty_sections(&self) -> Vec<&Section> {
        let occupied: HashSet<&str> = self
            .keys
            .iter()
            .flat_map(|key| section_prefixes(section_path(key)))
            .collect();
        self.sections
            .iter()
            .filter(|s| !occupied.contains(s.path.as_str()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParameterTree {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Section part of a key: everything before the last separator.
pub fn section_path(key: &str) -> &str {
    key.rsplit_once(KEY_SEPARATOR).map_or("", |(path, _)| path)
}

/// Last segment of a key.
pub fn leaf_name(key: &str) -> &str {
    key.rsplit_once(KEY_SEPARATOR).map_or(key, |(_, name)| name)
}

/// Append `name` to a section path.
pub fn join_key(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}{KEY_SEPARATOR}{name}")
    }
}

/// Segments of a section path; the empty path has none.
pub fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(KEY_SEPARATOR).collect()
    }
}

/// Every prefix of a section path: `a.b.c` yields `a`, `a.b`, `a.b.c`.
pub fn section_prefixes(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices(KEY_SEPARATOR)
        .map(move |(idx, _)| &path[..idx])
        .chain((!path.is_empty()).then_some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntParameter, StringParameter};

    fn string(key: &str) -> Parameter {
        Parameter::String(StringParameter::new(key))
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut tree = ParameterTree::new();
        for key in ["Tool.z", "Tool.a", "Other.m"] {
            tree.insert(string(key));
        }
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["Tool.z", "Tool.a", "Other.m"]);

        let replaced = tree.insert(Parameter::Int(IntParameter::new("Tool.a")));
        assert!(matches!(replaced, Some(Parameter::String(_))));
        assert_eq!(tree.len(), 3);
        assert!(matches!(tree.get("Tool.a"), Some(Parameter::Int(_))));
        assert_eq!(tree.keys().nth(1), Some("Tool.a"));
    }

    #[test]
    fn key_helpers() {
        assert_eq!(section_path("Tool.1.input"), "Tool.1");
        assert_eq!(section_path("input"), "");
        assert_eq!(leaf_name("Tool.1.input"), "input");
        assert_eq!(join_key("", "x"), "x");
        assert_eq!(join_key("Tool.1", "x"), "Tool.1.x");
        assert_eq!(
            section_prefixes("a.b.c").collect::<Vec<_>>(),
            vec!["a", "a.b", "a.b.c"]
        );
        assert_eq!(section_prefixes("").count(), 0);
        assert!(segments("").is_empty());
    }

    #[test]
    fn sections_keep_recording_order_and_position() {
        let mut tree = ParameterTree::new();
        tree.set_section_description("Tool", "the tool");
        tree.set_section_description("Tool.1", "");
        tree.insert(string("Tool.1.a"));
        tree.set_section_description("Tool.1.debug", "nothing here");
        tree.set_section_description("Tool", "renamed");
        assert_eq!(
            tree.sections().collect::<Vec<_>>(),
            vec![("Tool", "renamed"), ("Tool.1", ""), ("Tool.1.debug", "nothing here")]
        );
        let empty = tree.empty_sections();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].path, "Tool.1.debug");
        assert_eq!(empty[0].position, 1);
    }

    #[test]
    fn keys_cannot_drift_through_mutable_access() {
        let mut tree = ParameterTree::new();
        tree.insert(string("T.a"));
        tree.insert(string("T.b"));
        tree.get_mut("T.a").expect("T.a").info_mut().description = "first".into();
        *tree.get_mut("T.b").expect("T.b") = string("T.a");

        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["T.a", "T.b"]);
        assert_eq!(tree.get("T.a").map(Parameter::description), Some("first"));
        assert!(tree.contains_key("T.b"));
        assert_eq!(
            tree.entries().map(|(key, _)| key).collect::<Vec<_>>(),
            vec!["T.a", "T.b"]
        );
    }

    #[test]
    fn fill_unknown_key_is_unresolved() {
        let mut tree = ParameterTree::new();
        let err = tree.fill_from_str("missing", "1").unwrap_err();
        assert!(matches!(err, ModelError::UnresolvedReference(ref key) if key == "missing"));
    }
}
