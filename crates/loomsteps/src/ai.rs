use loomcore::{ConfigField, NodeCategory, NodeTemplate, PortSpec};
use serde_json::json;

pub fn templates() -> Vec<NodeTemplate> {
    vec![
        NodeTemplate::new("ai.generate_text", "Generate text", NodeCategory::Ai)
            .with_description("Produces text from a prompt template")
            .with_input(PortSpec::new("context", "Values available to the prompt"))
            .with_output(PortSpec::new("text", "Generated text"))
            .with_field(ConfigField::text("prompt", "Prompt").required())
            .with_field(
                ConfigField::number("max_tokens", "Max tokens").with_default(json!(512)),
            ),
        NodeTemplate::new("ai.classify", "Classify", NodeCategory::Ai)
            .with_description("Assigns the input to one of the configured labels")
            .with_input(PortSpec::new("value", "Value to classify").required())
            .with_output(PortSpec::new("label", "Winning label"))
            .with_field(ConfigField::json("labels", "Labels").required()),
    ]
}
