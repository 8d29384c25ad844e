//! Command-line option mapping onto parameters.

use tracing::debug;

use crate::{ModelError, Parameter, ParameterTree};

/// Reference from a CLI element to a parameter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliReference {
    pub reference_name: String,
}

impl CliReference {
    pub fn new(reference_name: impl Into<String>) -> Self {
        CliReference {
            reference_name: reference_name.into(),
        }
    }
}

/// One command-line option and the parameters feeding it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliElement {
    /// Option text such as `-in`; empty for positional values.
    pub option_identifier: String,
    /// Emit the option once followed by every list element.
    pub is_list: bool,
    pub is_required: bool,
    pub references: Vec<CliReference>,
}

impl CliElement {
    pub fn new(option_identifier: impl Into<String>, is_list: bool) -> Self {
        CliElement {
            option_identifier: option_identifier.into(),
            is_list,
            ..Default::default()
        }
    }

    pub fn with_reference(mut self, reference_name: impl Into<String>) -> Self {
        self.references.push(CliReference::new(reference_name));
        self
    }

    /// Resolve all references against the tree.
    pub fn resolve<'a>(&self, tree: &'a ParameterTree) -> Result<Vec<&'a Parameter>, ModelError> {
        self.references
            .iter()
            .map(|r| tree.resolve(&r.reference_name))
            .collect()
    }

    fn append_arguments(&self, param: &Parameter, args: &mut Vec<String>) {
        let option = (!self.option_identifier.is_empty()).then_some(&self.option_identifier);
        if let Parameter::Bool(flag) = param {
            if flag.value() == Some(true) {
                args.extend(option.cloned());
            }
            return;
        }
        let values = param.list_representation();
        if values.is_empty() {
            return;
        }
        if self.is_list || !param.is_list() {
            args.extend(option.cloned());
            args.extend(values);
        } else {
            for value in values {
                args.extend(option.cloned());
                args.push(value);
            }
        }
    }
}

/// Ordered list of CLI elements. Order determines argument emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliMapping {
    elements: Vec<CliElement>,
}

impl CliMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: CliElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[CliElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Check that every reference names a key present in the tree.
    pub fn validate(&self, tree: &ParameterTree) -> Result<(), ModelError> {
        for element in &self.elements {
            element.resolve(tree)?;
        }
        Ok(())
    }

    /// Build the argument vector for the tool invocation.
    ///
    /// Unset optional parameters are skipped; a required element or a
    /// non-optional parameter without a value is an error.
    pub fn build_arguments(&self, tree: &ParameterTree) -> Result<Vec<String>, ModelError> {
        let mut args = Vec::new();
        for element in &self.elements {
            for param in element.resolve(tree)? {
                if !param.has_value() {
                    if element.is_required {
                        return Err(ModelError::InvalidValue {
                            key: param.key().to_string(),
                            reason: format!(
                                "option {} is required but has no value",
                                element.option_identifier
                            ),
                        });
                    }
                    param.validate()?;
                    continue;
                }
                element.append_arguments(param, &mut args);
            }
        }
        debug!(count = args.len(), "built command-line arguments");
        Ok(args)
    }
}

impl<'a> IntoIterator for &'a CliMapping {
    type Item = &'a CliElement;
    type IntoIter = std::slice::Iter<'a, CliElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
