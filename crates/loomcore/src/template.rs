use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad grouping of step types as shown in the palette. Trigger steps are
/// the only category allowed to originate a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Trigger,
    Action,
    Condition,
    Ai,
}

/// Named input or output port on a step type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl PortSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Select,
    Json,
}

/// One entry in a template's configuration schema. Required fields are
/// enforced by the validation engine, not at edit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ConfigField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            default: None,
            options: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub fn json(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Json)
    }

    pub fn select<S: Into<String>>(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut field = Self::new(name, label, FieldKind::Select);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Immutable description of a step type: its ports and config schema.
/// Owned by the registry; the editor only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub node_type: String,
    pub label: String,
    pub description: String,
    pub category: NodeCategory,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
    pub config_schema: Vec<ConfigField>,
}

impl NodeTemplate {
    pub fn new(
        node_type: impl Into<String>,
        label: impl Into<String>,
        category: NodeCategory,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            description: String::new(),
            category,
            inputs: Vec::new(),
            outputs: Vec::new(),
            config_schema: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_input(mut self, port: PortSpec) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn with_output(mut self, port: PortSpec) -> Self {
        self.outputs.push(port);
        self
    }

    pub fn with_field(mut self, field: ConfigField) -> Self {
        self.config_schema.push(field);
        self
    }

    /// Seed config for a freshly dropped node: schema defaults only.
    pub fn default_config(&self) -> serde_json::Map<String, serde_json::Value> {
        self.config_schema
            .iter()
            .filter_map(|f| f.default.clone().map(|v| (f.name.clone(), v)))
            .collect()
    }
}

/// Registry of available step types, keyed by type identifier.
pub struct NodeTemplateRegistry {
    templates: HashMap<String, NodeTemplate>,
}

impl NodeTemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Register a template. A later registration with the same type
    /// identifier replaces the earlier one.
    pub fn register(&mut self, template: NodeTemplate) {
        tracing::info!("Registering step type: {}", template.node_type);
        self.templates.insert(template.node_type.clone(), template);
    }

    pub fn get(&self, node_type: &str) -> Option<&NodeTemplate> {
        self.templates.get(node_type)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.templates.contains_key(node_type)
    }

    /// Get all registered step types
    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.templates.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn by_category(&self, category: NodeCategory) -> Vec<&NodeTemplate> {
        let mut matched: Vec<&NodeTemplate> = self
            .templates
            .values()
            .filter(|t| t.category == category)
            .collect();
        matched.sort_by(|a, b| a.node_type.cmp(&b.node_type));
        matched
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for NodeTemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
