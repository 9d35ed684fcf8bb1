use loomcore::{ConfigField, NodeCategory, NodeTemplate, PortSpec};

pub fn templates() -> Vec<NodeTemplate> {
    vec![
        NodeTemplate::new("condition.branch", "Branch", NodeCategory::Condition)
            .with_description("Routes the run down one of two paths")
            .with_input(PortSpec::new("value", "Value the expression is evaluated against").required())
            .with_output(PortSpec::new("true", "Taken when the expression holds"))
            .with_output(PortSpec::new("false", "Taken otherwise"))
            .with_field(ConfigField::text("expression", "Expression").required()),
        NodeTemplate::new("condition.filter", "Filter", NodeCategory::Condition)
            .with_description("Stops the run unless the expression holds")
            .with_input(PortSpec::new("value", "Value the expression is evaluated against").required())
            .with_output(PortSpec::new("value", "The input, when it passes"))
            .with_field(ConfigField::text("expression", "Expression").required()),
    ]
}
