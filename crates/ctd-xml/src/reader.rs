//! Streaming CTD reader.
//!
//! The document nests four unrelated grammars inside `<tool>`: the
//! `PARAMETERS` tree, the `cli` mapping, `relocators` and `citations`. Each
//! gets its own handler; the root state hands control to a handler on the
//! subtree's opening tag and takes it back when the handler sees its own
//! closing tag.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ctd_model::tree::join_key;
use ctd_model::{
    BoolParameter, Bounds, Citation, CliElement, CliReference, DoubleListParameter,
    DoubleParameter, FileDirection, FileListParameter, FileParameter, IntListParameter,
    IntParameter, ModelError, NodeConfiguration, Numeric, Parameter, Relocator,
    StringChoiceParameter, StringListParameter, StringParameter, KEY_SEPARATOR,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::{ReaderOptions, XmlError};

/// Parse a CTD document from any buffered byte source.
pub fn read_config<R: BufRead>(input: R) -> Result<NodeConfiguration, XmlError> {
    read_config_with_options(input, &ReaderOptions::default())
}

pub fn read_config_str(xml: &str) -> Result<NodeConfiguration, XmlError> {
    read_config(xml.as_bytes())
}

/// Open `path`, parse it, and release the handle before returning.
pub fn read_config_file(path: impl AsRef<Path>) -> Result<NodeConfiguration, XmlError> {
    read_config_file_with_options(path, &ReaderOptions::default())
}

pub fn read_config_file_with_options(
    path: impl AsRef<Path>,
    options: &ReaderOptions,
) -> Result<NodeConfiguration, XmlError> {
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "reading CTD file");
    read_config_with_options(BufReader::new(file), options)
}

pub fn read_config_with_options<R: BufRead>(
    input: R,
    options: &ReaderOptions,
) -> Result<NodeConfiguration, XmlError> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut machine = CtdStateMachine::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                machine.depth += 1;
                machine.start(&e)?;
            }
            Event::Empty(e) => {
                machine.start(&e)?;
                machine.end(e.name().as_ref())?;
            }
            Event::End(e) => {
                machine.depth = machine.depth.saturating_sub(1);
                machine.end(e.name().as_ref())?;
            }
            Event::Text(t) => machine.text.push_str(&t.unescape()?),
            Event::CData(c) => machine
                .text
                .push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let config = machine.finish()?;
    if options.validate_references {
        config.validate()?;
    }
    Ok(config)
}

/// Outcome of a closing tag seen by a subtree handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handoff {
    Stay,
    /// The handler's subtree is complete; control returns to the root.
    Return,
}

/// Grammar of one subtree below `<tool>`.
trait SubtreeHandler {
    fn start(
        &mut self,
        event: &BytesStart<'_>,
        config: &mut NodeConfiguration,
    ) -> Result<(), XmlError>;

    fn end(&mut self, name: &[u8], config: &mut NodeConfiguration) -> Result<Handoff, XmlError>;
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Root,
    InParameters(ParametersHandler),
    InCli(CliHandler),
    InRelocators(RelocatorsHandler),
    InCitations(CitationsHandler),
}

impl State {
    fn handler(&mut self) -> Option<&mut dyn SubtreeHandler> {
        match self {
            State::Root => None,
            State::InParameters(h) => Some(h),
            State::InCli(h) => Some(h),
            State::InRelocators(h) => Some(h),
            State::InCitations(h) => Some(h),
        }
    }
}

#[derive(Debug, Default)]
struct CtdStateMachine {
    config: NodeConfiguration,
    state: State,
    /// Character data of the element currently open in the root state.
    text: String,
    depth: usize,
    saw_tool: bool,
}

impl CtdStateMachine {
    fn start(&mut self, event: &BytesStart<'_>) -> Result<(), XmlError> {
        if let Some(handler) = self.state.handler() {
            return handler.start(event, &mut self.config);
        }
        match event.name().as_ref() {
            name if is_text_element(name) => self.text.clear(),
            b"tool" => {
                self.saw_tool = true;
                self.config.name = attribute(event, "name")?.unwrap_or_default();
                self.config.version = attribute(event, "version")?.unwrap_or_default();
                self.config.doc_url = attribute(event, "docurl")?.unwrap_or_default();
                self.config.category = attribute(event, "category")?.unwrap_or_default();
                debug!(tool = %self.config.name, version = %self.config.version, "reading tool");
            }
            b"PARAMETERS" => self.state = State::InParameters(ParametersHandler::default()),
            b"cli" => self.state = State::InCli(CliHandler::default()),
            b"relocators" => self.state = State::InRelocators(RelocatorsHandler),
            b"citations" => self.state = State::InCitations(CitationsHandler),
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<(), XmlError> {
        if let Some(handler) = self.state.handler() {
            if handler.end(name, &mut self.config)? == Handoff::Return {
                self.state = State::Root;
            }
            return Ok(());
        }
        if !is_text_element(name) {
            return Ok(());
        }
        let text = std::mem::take(&mut self.text);
        match name {
            b"description" => self.config.description = text,
            b"manual" => self.config.manual = text,
            b"executableName" => self.config.executable_name = Some(text),
            _ => self.config.executable_path = Some(text),
        }
        Ok(())
    }

    fn finish(self) -> Result<NodeConfiguration, XmlError> {
        if self.depth != 0 || !matches!(self.state, State::Root) {
            return Err(XmlError::Malformed("unexpected end of document".into()));
        }
        if !self.saw_tool {
            return Err(XmlError::Malformed("missing <tool> root element".into()));
        }
        Ok(self.config)
    }
}

/// Direct children of `<tool>` whose character data is kept; markup nested
/// inside them contributes its text.
fn is_text_element(name: &[u8]) -> bool {
    matches!(
        name,
        b"description" | b"manual" | b"executableName" | b"executablePath"
    )
}

/// `PARAMETERS` subtree: nested `NODE` sections with `ITEM`/`ITEMLIST` leaves.
#[derive(Debug, Default)]
struct ParametersHandler {
    path: Vec<String>,
    pending_list: Option<PendingList>,
}

#[derive(Debug)]
struct PendingList {
    param: Parameter,
    items: Vec<String>,
}

impl ParametersHandler {
    fn current_path(&self) -> String {
        let separator = KEY_SEPARATOR.to_string();
        self.path.join(separator.as_str())
    }
}

impl SubtreeHandler for ParametersHandler {
    fn start(
        &mut self,
        event: &BytesStart<'_>,
        config: &mut NodeConfiguration,
    ) -> Result<(), XmlError> {
        match event.name().as_ref() {
            b"NODE" => {
                self.path.push(required_attribute(event, "NODE", "name")?);
                let description = match attribute(event, "descriptions")? {
                    Some(text) => text,
                    None => attribute(event, "description")?.unwrap_or_default(),
                };
                let path = self.current_path();
                debug!(section = %path, "entering section");
                config
                    .parameters_mut()
                    .set_section_description(path, description);
            }
            b"ITEM" => {
                let param = build_item(event, &self.current_path(), false)?;
                debug!(key = %param.key(), kind = %param.mnemonic(), "read parameter");
                config.parameters_mut().insert(param);
            }
            b"ITEMLIST" => {
                let param = build_item(event, &self.current_path(), true)?;
                self.pending_list = Some(PendingList {
                    param,
                    items: Vec::new(),
                });
            }
            b"LISTITEM" => {
                if let Some(pending) = self.pending_list.as_mut() {
                    pending
                        .items
                        .push(attribute(event, "value")?.unwrap_or_default());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8], config: &mut NodeConfiguration) -> Result<Handoff, XmlError> {
        match name {
            b"NODE" => {
                self.path.pop();
            }
            b"ITEMLIST" => {
                if let Some(PendingList { mut param, items }) = self.pending_list.take() {
                    param.fill_from_strings(&items)?;
                    debug!(key = %param.key(), items = items.len(), "read list parameter");
                    config.parameters_mut().insert(param);
                }
            }
            b"PARAMETERS" => return Ok(Handoff::Return),
            _ => {}
        }
        Ok(Handoff::Stay)
    }
}

/// Translate an `ITEM`/`ITEMLIST` start tag into a typed parameter.
fn build_item(event: &BytesStart<'_>, path: &str, list: bool) -> Result<Parameter, XmlError> {
    let element = if list { "ITEMLIST" } else { "ITEM" };
    let name = required_attribute(event, element, "name")?;
    let key = join_key(path, &name);
    let type_name = attribute(event, "type")?.unwrap_or_else(|| "string".to_string());
    let restrictions = attribute(event, "restrictions")?.filter(|r| !r.trim().is_empty());
    let formats = split_list(&attribute(event, "supported_formats")?.unwrap_or_default());
    let tags = attribute(event, "tags")?.unwrap_or_default();
    let tags = split_list(&tags);
    let has_tag = |tag: &str| tags.iter().any(|t| t == tag);
    let advanced = has_tag("advanced") || flag_attribute(event, "advanced")?;
    let required = has_tag("required") || flag_attribute(event, "required")?;

    let mut param = create_parameter(&key, &type_name, restrictions.as_deref(), formats, list)?
        .with_description(attribute(event, "description")?.unwrap_or_default())
        .with_advanced(advanced)
        .with_optional(!required);

    if !list {
        if let Some(value) = attribute(event, "value")? {
            param.fill_from_str(&value)?;
        }
    }
    Ok(param)
}

fn create_parameter(
    key: &str,
    type_name: &str,
    restrictions: Option<&str>,
    formats: Vec<String>,
    list: bool,
) -> Result<Parameter, XmlError> {
    if let Some(direction) = FileDirection::from_xml_type(type_name) {
        return Ok(if list {
            let mut param = FileListParameter::new(key, direction);
            param.formats = formats;
            Parameter::FileList(param)
        } else {
            let mut param = FileParameter::new(key, direction);
            param.formats = formats;
            Parameter::File(param)
        });
    }
    let param = match (type_name, list) {
        ("int", false) => {
            Parameter::Int(IntParameter::new(key).with_bounds(parse_bounds(key, restrictions)?))
        }
        ("int", true) => Parameter::IntList(
            IntListParameter::new(key).with_bounds(parse_bounds(key, restrictions)?),
        ),
        ("double", false) => Parameter::Double(
            DoubleParameter::new(key).with_bounds(parse_bounds(key, restrictions)?),
        ),
        ("double", true) => Parameter::DoubleList(
            DoubleListParameter::new(key).with_bounds(parse_bounds(key, restrictions)?),
        ),
        ("string", false) => match restrictions {
            None => Parameter::String(StringParameter::new(key)),
            Some(r) if is_bool_restriction(r) => Parameter::Bool(BoolParameter::new(key)),
            Some(r) => Parameter::StringChoice(StringChoiceParameter::new(key, split_list(r))),
        },
        ("string", true) => {
            let allowed = restrictions.map(split_list).unwrap_or_default();
            Parameter::StringList(StringListParameter::new(key).with_allowed(allowed))
        }
        (other, _) => {
            return Err(ModelError::InvalidValue {
                key: key.to_string(),
                reason: format!("unknown parameter type '{other}'"),
            }
            .into())
        }
    };
    Ok(param)
}

fn parse_bounds<T: Numeric>(key: &str, restrictions: Option<&str>) -> Result<Bounds<T>, XmlError> {
    match restrictions {
        None => Ok(Bounds::unbounded()),
        Some(text) => Bounds::parse(text).ok_or_else(|| {
            ModelError::InvalidValue {
                key: key.to_string(),
                reason: format!("invalid {} restrictions '{text}'", T::LABEL),
            }
            .into()
        }),
    }
}

fn is_bool_restriction(restrictions: &str) -> bool {
    let mut values: Vec<String> = split_list(restrictions)
        .into_iter()
        .map(|v| v.to_ascii_lowercase())
        .collect();
    values.sort();
    values == ["false", "true"]
}

/// Comma-separated list with blanks dropped.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `cli` subtree: `clielement` entries with nested `mapping` references.
#[derive(Debug, Default)]
struct CliHandler {
    current: Option<CliElement>,
}

impl SubtreeHandler for CliHandler {
    fn start(
        &mut self,
        event: &BytesStart<'_>,
        _config: &mut NodeConfiguration,
    ) -> Result<(), XmlError> {
        match event.name().as_ref() {
            b"clielement" => {
                let mut element = CliElement::new(
                    attribute(event, "optionIdentifier")?.unwrap_or_default(),
                    flag_attribute(event, "isList")?,
                );
                element.is_required = flag_attribute(event, "isRequired")?;
                self.current = Some(element);
            }
            b"mapping" => {
                let reference = required_attribute(event, "mapping", "referenceName")?;
                match self.current.as_mut() {
                    Some(element) => element.references.push(CliReference::new(reference)),
                    None => {
                        return Err(XmlError::Malformed(
                            "<mapping> outside of <clielement>".into(),
                        ))
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8], config: &mut NodeConfiguration) -> Result<Handoff, XmlError> {
        match name {
            b"clielement" => {
                if let Some(element) = self.current.take() {
                    debug!(option = %element.option_identifier, refs = element.references.len(), "read cli element");
                    config.cli_mapping_mut().push(element);
                }
            }
            b"cli" => return Ok(Handoff::Return),
            _ => {}
        }
        Ok(Handoff::Stay)
    }
}

/// `relocators` subtree.
#[derive(Debug)]
struct RelocatorsHandler;

impl SubtreeHandler for RelocatorsHandler {
    fn start(
        &mut self,
        event: &BytesStart<'_>,
        config: &mut NodeConfiguration,
    ) -> Result<(), XmlError> {
        if event.name().as_ref() == b"relocator" {
            let reference = required_attribute(event, "relocator", "reference")?;
            let locations = required_attribute(event, "relocator", "locations")?;
            debug!(reference = %reference, pattern = %locations, "read relocator");
            config.add_relocator(Relocator::new(reference, locations));
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8], _config: &mut NodeConfiguration) -> Result<Handoff, XmlError> {
        Ok(if name == b"relocators" {
            Handoff::Return
        } else {
            Handoff::Stay
        })
    }
}

/// `citations` subtree. URLs are parsed leniently.
#[derive(Debug)]
struct CitationsHandler;

impl SubtreeHandler for CitationsHandler {
    fn start(
        &mut self,
        event: &BytesStart<'_>,
        config: &mut NodeConfiguration,
    ) -> Result<(), XmlError> {
        if event.name().as_ref() == b"citation" {
            let doi = attribute(event, "doi")?.unwrap_or_default();
            let url = attribute(event, "url")?;
            config.add_citation(Citation::new(doi, url.as_deref()));
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8], _config: &mut NodeConfiguration) -> Result<Handoff, XmlError> {
        Ok(if name == b"citations" {
            Handoff::Return
        } else {
            Handoff::Stay
        })
    }
}

fn attribute(event: &BytesStart<'_>, name: &str) -> Result<Option<String>, XmlError> {
    for attr in event.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value()?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(
    event: &BytesStart<'_>,
    element: &str,
    name: &str,
) -> Result<String, XmlError> {
    attribute(event, name)?
        .ok_or_else(|| XmlError::Malformed(format!("<{element}> without '{name}' attribute")))
}

fn flag_attribute(event: &BytesStart<'_>, name: &str) -> Result<bool, XmlError> {
    Ok(attribute(event, name)?.is_some_and(|v| v.trim().eq_ignore_ascii_case("true")))
}
