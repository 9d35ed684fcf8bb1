use loomcore::{ConfigField, NodeCategory, NodeTemplate, PortSpec};
use serde_json::json;

pub fn templates() -> Vec<NodeTemplate> {
    vec![
        NodeTemplate::new("trigger.manual", "Manual trigger", NodeCategory::Trigger)
            .with_description("Starts the workflow when run by hand")
            .with_output(PortSpec::new("started", "Fires once when the run begins")),
        NodeTemplate::new("trigger.webhook", "Webhook", NodeCategory::Trigger)
            .with_description("Starts the workflow on an incoming HTTP call")
            .with_output(PortSpec::new("payload", "Body of the incoming request"))
            .with_field(ConfigField::text("path", "Path").required())
            .with_field(
                ConfigField::select("method", "Method", ["POST", "GET", "PUT"])
                    .with_default(json!("POST")),
            ),
        NodeTemplate::new("trigger.schedule", "Schedule", NodeCategory::Trigger)
            .with_description("Starts the workflow on a cron expression")
            .with_output(PortSpec::new("tick", "Fires on every matching instant"))
            .with_field(ConfigField::text("expression", "Cron expression").required()),
        NodeTemplate::new(
            "trigger.record_created",
            "Record created",
            NodeCategory::Trigger,
        )
        .with_description("Starts the workflow when a record appears in the connected system")
        .with_output(PortSpec::new("record", "The newly created record"))
        .with_field(
            ConfigField::select("source", "Source", ["crm", "dms", "billing"]).required(),
        )
        .with_field(ConfigField::text("record_type", "Record type").required()),
    ]
}
