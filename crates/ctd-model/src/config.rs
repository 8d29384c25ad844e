//! Aggregate tool configuration as described by one CTD document.

use url::Url;

use crate::{CliMapping, ModelError, Parameter, ParameterTree, RelocationContext, Relocator};

/// Literature reference attached to a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub doi: String,
    /// Parsed URL paired with the text it was parsed from.
    url: Option<(Url, String)>,
}

impl Citation {
    /// Build a citation; an unparsable URL is dropped rather than rejected.
    pub fn new(doi: impl Into<String>, url: Option<&str>) -> Self {
        let url = url.map(str::trim).and_then(|text| {
            Url::parse(text)
                .ok()
                .map(|parsed| (parsed, text.to_string()))
        });
        Citation {
            doi: doi.into(),
            url,
        }
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref().map(|(parsed, _)| parsed)
    }

    /// The URL as written in the source document, before normalisation.
    pub fn url_text(&self) -> Option<&str> {
        self.url.as_ref().map(|(_, text)| text.as_str())
    }
}

/// Everything known about one tool: metadata, parameters, CLI mapping,
/// relocators and citations.
#[derive(Debug, Clone, Default)]
pub struct NodeConfiguration {
    pub name: String,
    pub version: String,
    pub description: String,
    pub manual: String,
    pub doc_url: String,
    pub category: String,
    pub executable_name: Option<String>,
    pub executable_path: Option<String>,
    parameters: ParameterTree,
    cli: CliMapping,
    relocators: Vec<Relocator>,
    citations: Vec<Citation>,
}

impl NodeConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        NodeConfiguration {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn parameter_keys(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys()
    }

    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.get(key)
    }

    pub fn parameter_mut(&mut self, key: &str) -> Option<&mut Parameter> {
        self.parameters.get_mut(key)
    }

    pub fn section_description(&self, path: &str) -> Option<&str> {
        self.parameters.section_description(path)
    }

    pub fn parameters(&self) -> &ParameterTree {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterTree {
        &mut self.parameters
    }

    pub fn cli_mapping(&self) -> &CliMapping {
        &self.cli
    }

    pub fn cli_mapping_mut(&mut self) -> &mut CliMapping {
        &mut self.cli
    }

    pub fn relocators(&self) -> &[Relocator] {
        &self.relocators
    }

    pub fn add_relocator(&mut self, relocator: Relocator) {
        self.relocators.push(relocator);
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn add_citation(&mut self, citation: Citation) {
        self.citations.push(citation);
    }

    /// Check every CLI and relocator reference against the parameter tree.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.cli.validate(&self.parameters)?;
        for relocator in &self.relocators {
            relocator.validate(&self.parameters)?;
        }
        Ok(())
    }

    /// Argument vector for the configured tool, in CLI element order.
    pub fn build_arguments(&self) -> Result<Vec<String>, ModelError> {
        self.cli.build_arguments(&self.parameters)
    }

    /// Apply every relocator in order, returning the final output paths.
    pub fn relocate_outputs(
        &self,
        ctx: &RelocationContext,
    ) -> Result<Vec<std::path::PathBuf>, ModelError> {
        self.relocators
            .iter()
            .map(|relocator| relocator.relocate(&self.parameters, ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CliElement, FileDirection, FileParameter, StringParameter};

    #[test]
    fn citation_url_is_lenient() {
        let good = Citation::new("10.1000/xyz", Some("https://doi.org/10.1000/xyz"));
        assert_eq!(
            good.url().map(Url::as_str),
            Some("https://doi.org/10.1000/xyz")
        );
        let bad = Citation::new("10.1000/abc", Some("not a url"));
        assert_eq!(bad.doi, "10.1000/abc");
        assert!(bad.url().is_none());
        assert!(bad.url_text().is_none());
        assert!(Citation::new("d", None).url().is_none());
    }

    #[test]
    fn citation_keeps_source_spelling() {
        let citation = Citation::new("d", Some(" HTTP://Example.org "));
        assert_eq!(citation.url().map(Url::as_str), Some("http://example.org/"));
        assert_eq!(citation.url_text(), Some("HTTP://Example.org"));
    }

    #[test]
    fn validate_checks_cli_and_relocators() {
        let mut config = NodeConfiguration::new("Tool");
        config
            .parameters_mut()
            .insert(Parameter::String(StringParameter::new("Tool.1.in")));
        config
            .parameters_mut()
            .insert(Parameter::File(FileParameter::new("Tool.1.out", FileDirection::Output)));
        config
            .cli_mapping_mut()
            .push(CliElement::new("-in", false).with_reference("Tool.1.in"));
        config.add_relocator(Relocator::new("Tool.1.out", "%PWD%/x"));
        config.validate().expect("valid");
        assert_eq!(config.parameter_keys().count(), 2);

        config.add_relocator(Relocator::new("Tool.1.in", "%PWD%/y"));
        assert!(matches!(
            config.validate().unwrap_err(),
            ModelError::InvalidValue { .. }
        ));
    }
}
