use loomcore::{ConfigField, NodeCategory, NodeTemplate, PortSpec};
use serde_json::json;

pub fn templates() -> Vec<NodeTemplate> {
    vec![
        NodeTemplate::new("action.http_request", "HTTP request", NodeCategory::Action)
            .with_description("Calls an external HTTP endpoint")
            .with_input(PortSpec::new("body", "Request body").required())
            .with_output(PortSpec::new("response", "Response body"))
            .with_output(PortSpec::new("status", "HTTP status code"))
            .with_field(ConfigField::text("url", "URL").required())
            .with_field(
                ConfigField::select("method", "Method", ["GET", "POST", "PUT", "DELETE"])
                    .with_default(json!("GET")),
            )
            .with_field(ConfigField::json("headers", "Headers")),
        NodeTemplate::new("action.send_email", "Send email", NodeCategory::Action)
            .with_description("Sends an email through the configured provider")
            .with_input(PortSpec::new("context", "Values available to the body template"))
            .with_output(PortSpec::new("sent", "Delivery receipt"))
            .with_field(ConfigField::text("to", "Recipient").required())
            .with_field(ConfigField::text("subject", "Subject").required())
            .with_field(ConfigField::text("body", "Body template")),
        NodeTemplate::new("action.update_record", "Update record", NodeCategory::Action)
            .with_description("Writes fields back to a record in the connected system")
            .with_input(PortSpec::new("record", "Record to update").required())
            .with_output(PortSpec::new("updated", "The record after the write"))
            .with_field(
                ConfigField::select("target", "Target", ["crm", "dms", "billing"]).required(),
            )
            .with_field(ConfigField::json("fields", "Fields to set").required()),
        NodeTemplate::new("action.delay", "Delay", NodeCategory::Action)
            .with_description("Waits before handing control to the next step")
            .with_input(PortSpec::new("value", "Passed through unchanged"))
            .with_output(PortSpec::new("value", "The input, after the wait"))
            .with_field(
                ConfigField::number("delay_ms", "Delay (ms)").with_default(json!(1000)),
            ),
    ]
}
