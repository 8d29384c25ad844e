//! Canonical CTD writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ctd_model::tree::{leaf_name, section_path, segments};
use ctd_model::{NodeConfiguration, Numeric, Parameter, ParameterTree, KEY_SEPARATOR};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::{WriterOptions, XmlError, XSI_NAMESPACE};

/// One step of the `NODE` markup derived from the ordered key list.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionStep<'a> {
    /// Open a `NODE`; `path` is the full section path, `name` its last segment.
    Open { path: String, name: &'a str },
    Close,
    Item { key: &'a str, param: &'a Parameter },
}

/// Derive minimal, correctly nested `NODE` markup from the tree's key order.
///
/// For each key the section path is compared with the previously open path:
/// segments past their longest common prefix are closed, the new trailing
/// segments opened, then the item itself is emitted. Sections holding no
/// parameter are opened at their recorded position so they survive a round
/// trip. Sections still open after the last key are closed.
pub fn plan_sections(tree: &ParameterTree) -> Vec<SectionStep<'_>> {
    let mut steps = Vec::with_capacity(tree.len());
    let mut open: Vec<&str> = Vec::new();
    let mut empty = tree.empty_sections().into_iter().peekable();
    for (index, (key, param)) in tree.entries().enumerate() {
        while let Some(section) = empty.next_if(|s| s.position <= index) {
            reconcile(&mut open, segments(&section.path), &mut steps);
        }
        reconcile(&mut open, segments(section_path(key)), &mut steps);
        steps.push(SectionStep::Item { key, param });
    }
    for section in empty {
        reconcile(&mut open, segments(&section.path), &mut steps);
    }
    steps.extend(open.iter().map(|_| SectionStep::Close));
    steps
}

fn reconcile<'a>(open: &mut Vec<&'a str>, target: Vec<&'a str>, steps: &mut Vec<SectionStep<'a>>) {
    let common = open
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    while open.len() > common {
        open.pop();
        steps.push(SectionStep::Close);
    }
    let separator = KEY_SEPARATOR.to_string();
    for (depth, name) in target.iter().enumerate().skip(common) {
        let path = target[..=depth].join(separator.as_str());
        steps.push(SectionStep::Open { path, name: *name });
        open.push(*name);
    }
}

pub fn write_config<W: Write>(config: &NodeConfiguration, output: W) -> Result<(), XmlError> {
    write_config_with_options(config, output, &WriterOptions::default())
}

/// Render to an in-memory string.
pub fn write_config_string(config: &NodeConfiguration) -> Result<String, XmlError> {
    let mut out = Vec::new();
    write_config(config, &mut out)?;
    String::from_utf8(out).map_err(|err| XmlError::Malformed(format!("invalid UTF-8: {err}")))
}

/// Create `path` and write the document. The file handle is released on
/// every return path.
pub fn write_config_file(
    config: &NodeConfiguration,
    path: impl AsRef<Path>,
) -> Result<(), XmlError> {
    let file = File::create(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "writing CTD file");
    write_config(config, BufWriter::new(file))
}

/// Write the document and flush `output`. The stream is consumed and dropped
/// whether or not writing succeeds.
pub fn write_config_with_options<W: Write>(
    config: &NodeConfiguration,
    output: W,
    options: &WriterOptions,
) -> Result<(), XmlError> {
    let mut xml = Writer::new_with_indent(output, options.indent_char, options.indent_size);
    if options.declaration {
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let mut tool = BytesStart::new("tool");
    tool.push_attribute(("name", config.name.as_str()));
    tool.push_attribute(("version", config.version.as_str()));
    tool.push_attribute(("docurl", config.doc_url.as_str()));
    tool.push_attribute(("category", config.category.as_str()));
    xml.write_event(Event::Start(tool))?;

    write_text_element(&mut xml, "description", &config.description)?;
    write_text_element(&mut xml, "manual", &config.manual)?;
    if let Some(name) = &config.executable_name {
        write_text_element(&mut xml, "executableName", name)?;
    }
    if let Some(path) = &config.executable_path {
        write_text_element(&mut xml, "executablePath", path)?;
    }
    write_cli(&mut xml, config)?;
    write_relocators(&mut xml, config)?;
    write_citations(&mut xml, config)?;
    write_parameters(&mut xml, config.parameters(), options)?;

    xml.write_event(Event::End(BytesEnd::new("tool")))?;
    let mut output = xml.into_inner();
    output.write_all(b"\n")?;
    output.flush()?;
    debug!(
        tool = %config.name,
        parameters = config.parameters().len(),
        cli = config.cli_mapping().len(),
        "wrote CTD document"
    );
    Ok(())
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<(), XmlError> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_cli<W: Write>(xml: &mut Writer<W>, config: &NodeConfiguration) -> Result<(), XmlError> {
    let cli = config.cli_mapping();
    if cli.is_empty() {
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new("cli")))?;
    for element in cli {
        let mut start = BytesStart::new("clielement");
        start.push_attribute(("optionIdentifier", element.option_identifier.as_str()));
        start.push_attribute(("isList", bool_text(element.is_list)));
        if element.is_required {
            start.push_attribute(("isRequired", "true"));
        }
        xml.write_event(Event::Start(start))?;
        for reference in &element.references {
            let mut mapping = BytesStart::new("mapping");
            mapping.push_attribute(("referenceName", reference.reference_name.as_str()));
            xml.write_event(Event::Empty(mapping))?;
        }
        xml.write_event(Event::End(BytesEnd::new("clielement")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("cli")))?;
    Ok(())
}

fn write_relocators<W: Write>(
    xml: &mut Writer<W>,
    config: &NodeConfiguration,
) -> Result<(), XmlError> {
    if config.relocators().is_empty() {
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new("relocators")))?;
    for relocator in config.relocators() {
        let mut start = BytesStart::new("relocator");
        start.push_attribute(("reference", relocator.reference.as_str()));
        start.push_attribute(("locations", relocator.location_pattern.as_str()));
        xml.write_event(Event::Empty(start))?;
    }
    xml.write_event(Event::End(BytesEnd::new("relocators")))?;
    Ok(())
}

fn write_citations<W: Write>(
    xml: &mut Writer<W>,
    config: &NodeConfiguration,
) -> Result<(), XmlError> {
    if config.citations().is_empty() {
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new("citations")))?;
    for citation in config.citations() {
        let mut start = BytesStart::new("citation");
        start.push_attribute(("doi", citation.doi.as_str()));
        if let Some(url) = citation.url_text() {
            start.push_attribute(("url", url));
        }
        xml.write_event(Event::Empty(start))?;
    }
    xml.write_event(Event::End(BytesEnd::new("citations")))?;
    Ok(())
}

fn write_parameters<W: Write>(
    xml: &mut Writer<W>,
    tree: &ParameterTree,
    options: &WriterOptions,
) -> Result<(), XmlError> {
    let mut start = BytesStart::new("PARAMETERS");
    start.push_attribute(("version", options.parameters_version.as_str()));
    start.push_attribute((
        "xsi:noNamespaceSchemaLocation",
        options.schema_location.as_str(),
    ));
    start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    xml.write_event(Event::Start(start))?;

    let mut steps = plan_sections(tree).into_iter().peekable();
    while let Some(step) = steps.next() {
        match step {
            SectionStep::Open { path, name } => {
                let mut node = BytesStart::new("NODE");
                node.push_attribute(("name", name));
                node.push_attribute((
                    "descriptions",
                    tree.section_description(&path).unwrap_or_default(),
                ));
                if steps.next_if_eq(&SectionStep::Close).is_some() {
                    xml.write_event(Event::Empty(node))?;
                } else {
                    xml.write_event(Event::Start(node))?;
                }
            }
            SectionStep::Close => {
                xml.write_event(Event::End(BytesEnd::new("NODE")))?;
            }
            SectionStep::Item { key, param } => write_item(xml, key, param)?,
        }
    }

    xml.write_event(Event::End(BytesEnd::new("PARAMETERS")))?;
    Ok(())
}

fn write_item<W: Write>(
    xml: &mut Writer<W>,
    key: &str,
    param: &Parameter,
) -> Result<(), XmlError> {
    let tag = if param.is_list() { "ITEMLIST" } else { "ITEM" };
    let mut start = BytesStart::new(tag);
    start.push_attribute(("name", leaf_name(key)));
    if !param.is_list() {
        start.push_attribute(("value", param.string_representation().as_str()));
    }
    start.push_attribute(("type", xml_type(param)));
    start.push_attribute(("description", param.description()));
    let tags = tags(param);
    if !tags.is_empty() {
        start.push_attribute(("tags", tags.as_str()));
    }
    if let Some(restrictions) = restrictions(param) {
        start.push_attribute(("restrictions", restrictions.as_str()));
    }
    if let Some(formats) = supported_formats(param) {
        start.push_attribute(("supported_formats", formats.as_str()));
    }

    let values = param.list_representation();
    if !param.is_list() || values.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }
    xml.write_event(Event::Start(start))?;
    for value in values {
        let mut item = BytesStart::new("LISTITEM");
        item.push_attribute(("value", value.as_str()));
        xml.write_event(Event::Empty(item))?;
    }
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn xml_type(param: &Parameter) -> &'static str {
    match param {
        Parameter::Bool(_)
        | Parameter::String(_)
        | Parameter::StringChoice(_)
        | Parameter::StringList(_) => "string",
        Parameter::Int(_) | Parameter::IntList(_) => i64::XML_TYPE,
        Parameter::Double(_) | Parameter::DoubleList(_) => f64::XML_TYPE,
        Parameter::File(p) => p.direction.xml_type(),
        Parameter::FileList(p) => p.direction.xml_type(),
    }
}

fn restrictions(param: &Parameter) -> Option<String> {
    match param {
        Parameter::Bool(_) => Some("true,false".to_string()),
        Parameter::Int(p) => (!p.bounds().is_unbounded()).then(|| p.bounds().render()),
        Parameter::Double(p) => (!p.bounds().is_unbounded()).then(|| p.bounds().render()),
        Parameter::IntList(p) => (!p.bounds().is_unbounded()).then(|| p.bounds().render()),
        Parameter::DoubleList(p) => (!p.bounds().is_unbounded()).then(|| p.bounds().render()),
        Parameter::StringChoice(p) => (!p.choices().is_empty()).then(|| p.choices().join(",")),
        Parameter::StringList(p) => (!p.allowed().is_empty()).then(|| p.allowed().join(",")),
        Parameter::String(_) | Parameter::File(_) | Parameter::FileList(_) => None,
    }
}

fn tags(param: &Parameter) -> String {
    let mut tags = Vec::new();
    if param.is_advanced() {
        tags.push("advanced");
    }
    if !param.is_optional() {
        tags.push("required");
    }
    tags.join(",")
}

fn supported_formats(param: &Parameter) -> Option<String> {
    let formats = match param {
        Parameter::File(p) => &p.formats,
        Parameter::FileList(p) => &p.formats,
        _ => return None,
    };
    (!formats.is_empty()).then(|| formats.join(","))
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
