//! Typed tool parameters with bounds and membership rules.

use std::fmt;

use crate::ModelError;

/// Separator joining list elements in [`Parameter::string_representation`].
///
/// Chosen so that it never collides with values containing commas.
pub const LIST_SEPARATOR: &str = "@@@__@@@";

const UNBOUNDED_LOWER: &str = "-inf";
const UNBOUNDED_UPPER: &str = "+inf";

/// Render a double without locale influence, trimming trailing zeros and a
/// dangling decimal point (`2.50` -> `2.5`, `3.0` -> `3`).
pub fn format_double(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 {
            UNBOUNDED_UPPER.to_string()
        } else {
            UNBOUNDED_LOWER.to_string()
        };
    }
    let mut text = format!("{value}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    text
}

/// Scalar types usable as numeric parameter values.
pub trait Numeric: Copy + PartialOrd + fmt::Debug {
    /// Value of the CTD `type` attribute.
    const XML_TYPE: &'static str;
    /// Human readable type name used in mnemonics.
    const LABEL: &'static str;

    fn parse_text(text: &str) -> Option<Self>;
    fn render(self) -> String;
    /// Whether the value stands for an unbounded side.
    fn is_unbounded_marker(self) -> bool;
}

impl Numeric for i64 {
    const XML_TYPE: &'static str = "int";
    const LABEL: &'static str = "integer";

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn render(self) -> String {
        self.to_string()
    }

    fn is_unbounded_marker(self) -> bool {
        self == i64::MIN || self == i64::MAX
    }
}

impl Numeric for f64 {
    const XML_TYPE: &'static str = "double";
    const LABEL: &'static str = "double";

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }

    fn render(self) -> String {
        format_double(self)
    }

    fn is_unbounded_marker(self) -> bool {
        self.is_infinite()
    }
}

/// Inclusive numeric range. `None` on a side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    lower: Option<T>,
    upper: Option<T>,
}

impl<T: Numeric> Default for Bounds<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: Numeric> Bounds<T> {
    pub fn unbounded() -> Self {
        Bounds {
            lower: None,
            upper: None,
        }
    }

    /// Build bounds; the type's min/max (or infinities) collapse to "unbounded".
    pub fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Bounds {
            lower: lower.filter(|v| !v.is_unbounded_marker()),
            upper: upper.filter(|v| !v.is_unbounded_marker()),
        }
    }

    pub fn lower(&self) -> Option<T> {
        self.lower
    }

    pub fn upper(&self) -> Option<T> {
        self.upper
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.lower.map_or(true, |lo| value >= lo) && self.upper.map_or(true, |hi| value <= hi)
    }

    /// `lo:hi` with `-inf` / `+inf` standing in for missing sides.
    pub fn render(&self) -> String {
        let lower = self
            .lower
            .map_or_else(|| UNBOUNDED_LOWER.to_string(), T::render);
        let upper = self
            .upper
            .map_or_else(|| UNBOUNDED_UPPER.to_string(), T::render);
        format!("{lower}:{upper}")
    }

    /// Parse `lo:hi`, `lo:` or `:hi`. Returns `None` when the text is not a
    /// range or either side is unparsable.
    pub fn parse(text: &str) -> Option<Self> {
        let (lower, upper) = text.split_once(':')?;
        Some(Bounds::new(parse_side(lower)?, parse_side(upper)?))
    }
}

fn parse_side<T: Numeric>(text: &str) -> Option<Option<T>> {
    match text.trim() {
        "" | UNBOUNDED_LOWER | UNBOUNDED_UPPER | "inf" => Some(None),
        other => T::parse_text(other).map(Some),
    }
}

/// Metadata shared by every parameter kind.
///
/// The key is fixed at construction; only the descriptive fields are
/// mutable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterInfo {
    key: String,
    pub description: String,
    pub advanced: bool,
    pub optional: bool,
}

impl ParameterInfo {
    pub fn new(key: impl Into<String>) -> Self {
        ParameterInfo {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Dot-separated key, unique within a configuration.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Boolean flag, emitted as a `string` item restricted to `true,false`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolParameter {
    pub info: ParameterInfo,
    value: Option<bool>,
}

impl BoolParameter {
    pub fn new(key: impl Into<String>) -> Self {
        BoolParameter {
            info: ParameterInfo::new(key),
            value: None,
        }
    }

    pub fn value(&self) -> Option<bool> {
        self.value
    }

    pub fn set_value(&mut self, value: Option<bool>) {
        self.value = value;
    }

    pub fn fill_from_str(&mut self, text: &str) -> Result<(), ModelError> {
        self.value = parse_bool(self.info.key(), text)?;
        Ok(())
    }
}

fn parse_bool(key: &str, text: &str) -> Result<Option<bool>, ModelError> {
    let text = text.trim();
    if text.is_empty() {
        Ok(None)
    } else if text.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if text.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(ModelError::invalid(key, format!("'{text}' is not a boolean")))
    }
}

/// Numeric scalar parameter with inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberParameter<T: Numeric> {
    pub info: ParameterInfo,
    value: Option<T>,
    bounds: Bounds<T>,
}

pub type IntParameter = NumberParameter<i64>;
pub type DoubleParameter = NumberParameter<f64>;

impl<T: Numeric> NumberParameter<T> {
    pub fn new(key: impl Into<String>) -> Self {
        NumberParameter {
            info: ParameterInfo::new(key),
            value: None,
            bounds: Bounds::unbounded(),
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds<T>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn value(&self) -> Option<T> {
        self.value
    }

    pub fn bounds(&self) -> &Bounds<T> {
        &self.bounds
    }

    /// Assign a value; an out-of-range value is rejected and the prior value kept.
    pub fn set_value(&mut self, value: Option<T>) -> Result<(), ModelError> {
        if let Some(v) = value {
            if !self.bounds.contains(v) {
                return Err(ModelError::invalid(
                    self.info.key(),
                    format!("{} outside {}", v.render(), self.bounds.render()),
                ));
            }
        }
        self.value = value;
        Ok(())
    }

    pub fn fill_from_str(&mut self, text: &str) -> Result<(), ModelError> {
        let parsed = parse_number(self.info.key(), text)?;
        self.set_value(parsed)
    }

    pub fn mnemonic(&self) -> String {
        format!("{} [{}]", T::LABEL, self.bounds.render())
    }
}

fn parse_number<T: Numeric>(key: &str, text: &str) -> Result<Option<T>, ModelError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    T::parse_text(text)
        .map(Some)
        .ok_or_else(|| ModelError::invalid(key, format!("'{text}' is not a valid {}", T::LABEL)))
}

/// Free-text parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct StringParameter {
    pub info: ParameterInfo,
    value: Option<String>,
}

impl StringParameter {
    pub fn new(key: impl Into<String>) -> Self {
        StringParameter {
            info: ParameterInfo::new(key),
            value: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value.filter(|v| !v.is_empty());
    }

    pub fn fill_from_str(&mut self, text: &str) {
        self.set_value(Some(text.to_string()));
    }
}

/// String restricted to an ordered set of choices.
///
/// The empty string is an allowed value exactly when the parameter is
/// optional; it is stored as "no value".
#[derive(Debug, Clone, PartialEq)]
pub struct StringChoiceParameter {
    pub info: ParameterInfo,
    value: Option<String>,
    choices: Vec<String>,
    labels: Vec<String>,
}

impl StringChoiceParameter {
    pub fn new<I, S>(key: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.is_empty())
            .collect();
        StringChoiceParameter {
            info: ParameterInfo::new(key),
            value: None,
            labels: choices.clone(),
            choices,
        }
    }

    /// Display labels parallel to the choices. Missing labels fall back to
    /// the choice itself.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.truncate(self.choices.len());
        labels.extend(self.choices[labels.len()..].iter().cloned());
        self.labels = labels;
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Choices without the implicit empty member.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_for(&self, choice: &str) -> Option<&str> {
        self.choices
            .iter()
            .position(|c| c == choice)
            .map(|idx| self.labels[idx].as_str())
    }

    /// Allowed values including `""` when the parameter is optional.
    pub fn allowed_values(&self) -> Vec<&str> {
        let mut allowed = Vec::with_capacity(self.choices.len() + 1);
        if self.info.optional {
            allowed.push("");
        }
        allowed.extend(self.choices.iter().map(String::as_str));
        allowed
    }

    pub fn is_allowed(&self, value: &str) -> bool {
        self.allowed_values().contains(&value)
    }

    pub fn set_value(&mut self, value: Option<String>) -> Result<(), ModelError> {
        if let Some(v) = &value {
            if !self.is_allowed(v) {
                return Err(ModelError::invalid(
                    self.info.key(),
                    format!("'{v}' is not one of [{}]", self.choices.join(",")),
                ));
            }
        }
        self.value = value.filter(|v| !v.is_empty());
        Ok(())
    }

    pub fn fill_from_str(&mut self, text: &str) -> Result<(), ModelError> {
        if text.is_empty() {
            self.value = None;
            return Ok(());
        }
        self.set_value(Some(text.to_string()))
    }
}

/// Ordered list of numbers, each constrained by the same bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberListParameter<T: Numeric> {
    pub info: ParameterInfo,
    values: Option<Vec<T>>,
    bounds: Bounds<T>,
}

pub type IntListParameter = NumberListParameter<i64>;
pub type DoubleListParameter = NumberListParameter<f64>;

impl<T: Numeric> NumberListParameter<T> {
    pub fn new(key: impl Into<String>) -> Self {
        NumberListParameter {
            info: ParameterInfo::new(key),
            values: None,
            bounds: Bounds::unbounded(),
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds<T>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn values(&self) -> Option<&[T]> {
        self.values.as_deref()
    }

    pub fn bounds(&self) -> &Bounds<T> {
        &self.bounds
    }

    pub fn set_value(&mut self, values: Option<Vec<T>>) -> Result<(), ModelError> {
        if let Some(items) = &values {
            if let Some(bad) = items.iter().find(|v| !self.bounds.contains(**v)) {
                return Err(ModelError::invalid(
                    self.info.key(),
                    format!("{} outside {}", bad.render(), self.bounds.render()),
                ));
            }
        }
        self.values = values;
        Ok(())
    }

    pub fn fill_from_strings<S: AsRef<str>>(&mut self, items: &[S]) -> Result<(), ModelError> {
        if items.is_empty() {
            self.values = None;
            return Ok(());
        }
        let parsed = items
            .iter()
            .map(|item| {
                parse_number::<T>(self.info.key(), item.as_ref())?.ok_or_else(|| {
                    ModelError::invalid(self.info.key(), "empty list element")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.set_value(Some(parsed))
    }

    pub fn mnemonic(&self) -> String {
        format!("{} list [{}]", T::LABEL, self.bounds.render())
    }
}

/// Ordered list of strings, optionally restricted to a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct StringListParameter {
    pub info: ParameterInfo,
    values: Option<Vec<String>>,
    allowed: Vec<String>,
}

impl StringListParameter {
    pub fn new(key: impl Into<String>) -> Self {
        StringListParameter {
            info: ParameterInfo::new(key),
            values: None,
            allowed: Vec::new(),
        }
    }

    pub fn with_allowed<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = allowed
            .into_iter()
            .map(Into::into)
            .filter(|a: &String| !a.is_empty())
            .collect();
        self
    }

    pub fn values(&self) -> Option<&[String]> {
        self.values.as_deref()
    }

    /// Permitted element values; empty means unrestricted.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn set_value(&mut self, values: Option<Vec<String>>) -> Result<(), ModelError> {
        if let Some(items) = &values {
            if !self.allowed.is_empty() {
                if let Some(bad) = items.iter().find(|v| !self.allowed.contains(v)) {
                    return Err(ModelError::invalid(
                        self.info.key(),
                        format!("'{bad}' is not one of [{}]", self.allowed.join(",")),
                    ));
                }
            }
        }
        self.values = values;
        Ok(())
    }

    pub fn fill_from_strings<S: AsRef<str>>(&mut self, items: &[S]) -> Result<(), ModelError> {
        if items.is_empty() {
            self.values = None;
            return Ok(());
        }
        self.set_value(Some(
            items.iter().map(|s| s.as_ref().to_string()).collect(),
        ))
    }
}

/// Role of a file parameter in the tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDirection {
    Input,
    Output,
    /// Output path prefix; the tool appends its own suffixes.
    OutputPrefix,
}

impl FileDirection {
    pub fn xml_type(self) -> &'static str {
        match self {
            FileDirection::Input => "input-file",
            FileDirection::Output => "output-file",
            FileDirection::OutputPrefix => "output-prefix",
        }
    }

    pub fn from_xml_type(text: &str) -> Option<Self> {
        match text {
            "input-file" => Some(FileDirection::Input),
            "output-file" => Some(FileDirection::Output),
            "output-prefix" => Some(FileDirection::OutputPrefix),
            _ => None,
        }
    }

    pub fn is_output(self) -> bool {
        !matches!(self, FileDirection::Input)
    }

    fn label(self) -> &'static str {
        match self {
            FileDirection::Input => "input file",
            FileDirection::Output => "output file",
            FileDirection::OutputPrefix => "output prefix",
        }
    }
}

/// Single file path with its direction and supported formats.
#[derive(Debug, Clone, PartialEq)]
pub struct FileParameter {
    pub info: ParameterInfo,
    pub direction: FileDirection,
    /// Accepted formats such as `*.mzML`.
    pub formats: Vec<String>,
    value: Option<String>,
}

impl FileParameter {
    pub fn new(key: impl Into<String>, direction: FileDirection) -> Self {
        FileParameter {
            info: ParameterInfo::new(key),
            direction,
            formats: Vec::new(),
            value: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value.filter(|v| !v.is_empty());
    }
}

/// List of file paths.
#[derive(Debug, Clone, PartialEq)]
pub struct FileListParameter {
    pub info: ParameterInfo,
    pub direction: FileDirection,
    pub formats: Vec<String>,
    values: Option<Vec<String>>,
}

impl FileListParameter {
    pub fn new(key: impl Into<String>, direction: FileDirection) -> Self {
        FileListParameter {
            info: ParameterInfo::new(key),
            direction,
            formats: Vec::new(),
            values: None,
        }
    }

    pub fn values(&self) -> Option<&[String]> {
        self.values.as_deref()
    }

    pub fn set_value(&mut self, values: Option<Vec<String>>) {
        self.values = values.filter(|v| !v.is_empty());
    }
}

/// Closed set of parameter kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Bool(BoolParameter),
    Int(IntParameter),
    Double(DoubleParameter),
    String(StringParameter),
    StringChoice(StringChoiceParameter),
    IntList(IntListParameter),
    DoubleList(DoubleListParameter),
    StringList(StringListParameter),
    File(FileParameter),
    FileList(FileListParameter),
}

impl Parameter {
    pub fn info(&self) -> &ParameterInfo {
        match self {
            Parameter::Bool(p) => &p.info,
            Parameter::Int(p) => &p.info,
            Parameter::Double(p) => &p.info,
            Parameter::String(p) => &p.info,
            Parameter::StringChoice(p) => &p.info,
            Parameter::IntList(p) => &p.info,
            Parameter::DoubleList(p) => &p.info,
            Parameter::StringList(p) => &p.info,
            Parameter::File(p) => &p.info,
            Parameter::FileList(p) => &p.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut ParameterInfo {
        match self {
            Parameter::Bool(p) => &mut p.info,
            Parameter::Int(p) => &mut p.info,
            Parameter::Double(p) => &mut p.info,
            Parameter::String(p) => &mut p.info,
            Parameter::StringChoice(p) => &mut p.info,
            Parameter::IntList(p) => &mut p.info,
            Parameter::DoubleList(p) => &mut p.info,
            Parameter::StringList(p) => &mut p.info,
            Parameter::File(p) => &mut p.info,
            Parameter::FileList(p) => &mut p.info,
        }
    }

    pub fn key(&self) -> &str {
        self.info().key()
    }

    pub fn description(&self) -> &str {
        &self.info().description
    }

    pub fn is_advanced(&self) -> bool {
        self.info().advanced
    }

    pub fn is_optional(&self) -> bool {
        self.info().optional
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info_mut().description = description.into();
        self
    }

    pub fn with_advanced(mut self, advanced: bool) -> Self {
        self.info_mut().advanced = advanced;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.info_mut().optional = optional;
        self
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Parameter::IntList(_)
                | Parameter::DoubleList(_)
                | Parameter::StringList(_)
                | Parameter::FileList(_)
        )
    }

    /// Whether the parameter names a file the tool writes.
    pub fn is_output_file(&self) -> bool {
        match self {
            Parameter::File(p) => p.direction.is_output(),
            Parameter::FileList(p) => p.direction.is_output(),
            _ => false,
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            Parameter::Bool(p) => p.value.is_some(),
            Parameter::Int(p) => p.value.is_some(),
            Parameter::Double(p) => p.value.is_some(),
            Parameter::String(p) => p.value.is_some(),
            Parameter::StringChoice(p) => p.value.is_some(),
            Parameter::IntList(p) => p.values.is_some(),
            Parameter::DoubleList(p) => p.values.is_some(),
            Parameter::StringList(p) => p.values.is_some(),
            Parameter::File(p) => p.value.is_some(),
            Parameter::FileList(p) => p.values.is_some(),
        }
    }

    /// Drop the current value.
    pub fn clear(&mut self) {
        match self {
            Parameter::Bool(p) => p.value = None,
            Parameter::Int(p) => p.value = None,
            Parameter::Double(p) => p.value = None,
            Parameter::String(p) => p.value = None,
            Parameter::StringChoice(p) => p.value = None,
            Parameter::IntList(p) => p.values = None,
            Parameter::DoubleList(p) => p.values = None,
            Parameter::StringList(p) => p.values = None,
            Parameter::File(p) => p.value = None,
            Parameter::FileList(p) => p.values = None,
        }
    }

    /// Parse the textual form produced by [`Parameter::string_representation`].
    ///
    /// The empty string clears the value. List kinds split on
    /// [`LIST_SEPARATOR`].
    pub fn fill_from_str(&mut self, text: &str) -> Result<(), ModelError> {
        if self.is_list() {
            let items: Vec<&str> = if text.is_empty() {
                Vec::new()
            } else {
                text.split(LIST_SEPARATOR).collect()
            };
            return self.fill_from_strings(items.as_slice());
        }
        match self {
            Parameter::Bool(p) => p.fill_from_str(text),
            Parameter::Int(p) => p.fill_from_str(text),
            Parameter::Double(p) => p.fill_from_str(text),
            Parameter::String(p) => {
                p.fill_from_str(text);
                Ok(())
            }
            Parameter::StringChoice(p) => p.fill_from_str(text),
            Parameter::File(p) => {
                p.set_value(Some(text.to_string()));
                Ok(())
            }
            Parameter::IntList(_)
            | Parameter::DoubleList(_)
            | Parameter::StringList(_)
            | Parameter::FileList(_) => unreachable!("list kinds handled above"),
        }
    }

    /// Fill from individual elements. Scalars accept at most one element.
    pub fn fill_from_strings<S: AsRef<str>>(&mut self, items: &[S]) -> Result<(), ModelError> {
        match self {
            Parameter::IntList(p) => p.fill_from_strings(items),
            Parameter::DoubleList(p) => p.fill_from_strings(items),
            Parameter::StringList(p) => p.fill_from_strings(items),
            Parameter::FileList(p) => {
                p.set_value(Some(items.iter().map(|s| s.as_ref().to_string()).collect()));
                Ok(())
            }
            _ => match items {
                [] => {
                    self.clear();
                    Ok(())
                }
                [single] => self.fill_from_str(single.as_ref()),
                _ => Err(ModelError::invalid(
                    self.key(),
                    format!("{} values given for a scalar parameter", items.len()),
                )),
            },
        }
    }

    /// Per-element textual values; a scalar yields at most one entry.
    pub fn list_representation(&self) -> Vec<String> {
        match self {
            Parameter::IntList(p) => render_all(p.values()),
            Parameter::DoubleList(p) => render_all(p.values()),
            Parameter::StringList(p) => p.values().map(<[String]>::to_vec).unwrap_or_default(),
            Parameter::FileList(p) => p.values().map(<[String]>::to_vec).unwrap_or_default(),
            _ if self.has_value() => vec![self.string_representation()],
            _ => Vec::new(),
        }
    }

    /// Canonical text used for command lines and the XML `value` attribute.
    /// An unset parameter renders as the empty string.
    pub fn string_representation(&self) -> String {
        match self {
            Parameter::Bool(p) => p.value.map(|v| v.to_string()).unwrap_or_default(),
            Parameter::Int(p) => p.value.map(Numeric::render).unwrap_or_default(),
            Parameter::Double(p) => p.value.map(Numeric::render).unwrap_or_default(),
            Parameter::String(p) => p.value.clone().unwrap_or_default(),
            Parameter::StringChoice(p) => p.value.clone().unwrap_or_default(),
            Parameter::File(p) => p.value.clone().unwrap_or_default(),
            Parameter::IntList(_)
            | Parameter::DoubleList(_)
            | Parameter::StringList(_)
            | Parameter::FileList(_) => self.list_representation().join(LIST_SEPARATOR),
        }
    }

    /// Human readable type and bounds label, e.g. `integer [0:+inf]`.
    pub fn mnemonic(&self) -> String {
        match self {
            Parameter::Bool(_) => "boolean".to_string(),
            Parameter::Int(p) => p.mnemonic(),
            Parameter::Double(p) => p.mnemonic(),
            Parameter::String(_) => "string".to_string(),
            Parameter::StringChoice(p) => format!("string choice [{}]", p.choices.join(",")),
            Parameter::IntList(p) => p.mnemonic(),
            Parameter::DoubleList(p) => p.mnemonic(),
            Parameter::StringList(p) if p.allowed.is_empty() => "string list".to_string(),
            Parameter::StringList(p) => format!("string list [{}]", p.allowed.join(",")),
            Parameter::File(p) => file_mnemonic(p.direction.label(), &p.formats),
            Parameter::FileList(p) => {
                file_mnemonic(&format!("{} list", p.direction.label()), &p.formats)
            }
        }
    }

    /// A non-optional parameter must carry a value.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.is_optional() && !self.has_value() {
            return Err(ModelError::invalid(self.key(), "required parameter has no value"));
        }
        Ok(())
    }
}

fn render_all<T: Numeric>(values: Option<&[T]>) -> Vec<String> {
    values
        .map(|items| items.iter().map(|v| v.render()).collect())
        .unwrap_or_default()
}

fn file_mnemonic(label: &str, formats: &[String]) -> String {
    if formats.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{}]", formats.join(","))
    }
}
