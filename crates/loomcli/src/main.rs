mod sim;

use anyhow::Result;
use clap::{Parser, Subcommand};
use loomcore::{
    from_workflow_draft, to_workflow_draft, DraftMetadata, GraphModel, NodeCategory, Position,
    WorkflowDraft,
};
use loomeditor::{CanvasController, PropertyEditor};
use loommonitor::{ExecutionMonitor, ExecutionStatus};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "loom")]
#[command(about = "Loom workflow editor CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workflow file
    Validate {
        /// Path to workflow JSON file
        file: PathBuf,
    },

    /// Show a workflow file's structure
    Inspect {
        /// Path to workflow JSON file
        file: PathBuf,
    },

    /// List available step templates
    Templates,

    /// Create a new example workflow
    Init {
        /// Output file path
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },

    /// Test-run a workflow file against the simulated runner
    Test {
        /// Path to workflow JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Input data as JSON string
        #[arg(short, long)]
        input: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => {
            validate_workflow(file)?;
        }

        Commands::Inspect { file } => {
            inspect_workflow(file)?;
        }

        Commands::Templates => {
            list_templates();
        }

        Commands::Init { output } => {
            create_example_workflow(output)?;
        }

        Commands::Test { file, input, verbose } => {
            if verbose {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::DEBUG)
                    .init();
            } else {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::WARN)
                    .init();
            }

            test_workflow(file, input).await?;
        }
    }

    Ok(())
}

fn load_draft(file: &PathBuf) -> Result<WorkflowDraft> {
    let draft_json = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&draft_json)?)
}

fn validate_workflow(file: PathBuf) -> Result<()> {
    println!("🔍 Validating workflow: {}", file.display());

    let draft = load_draft(&file)?;
    let registry = loomsteps::default_registry();
    let (model, _, hydrate_warnings) = from_workflow_draft(&draft, &registry);
    let report = loomcore::validate(&model, &registry);

    for warning in &hydrate_warnings {
        println!("  ⚠️  {}", warning);
    }
    for warning in &report.warnings {
        println!("  ⚠️  {}", warning);
    }
    for error in &report.errors {
        println!("  ❌ {}", error);
    }

    if report.is_executable() {
        println!("✅ Workflow is ready to run:");
        println!("   Name: {}", draft.name);
        println!("   Steps: {}", model.node_count());
        println!("   Connections: {}", model.edge_count());
        Ok(())
    } else {
        anyhow::bail!("workflow is not executable ({} errors)", report.errors.len());
    }
}

fn inspect_workflow(file: PathBuf) -> Result<()> {
    let draft = load_draft(&file)?;

    println!("📋 Workflow: {}", draft.name);
    if !draft.description.is_empty() {
        println!("   {}", draft.description);
    }
    println!("   Category: {}", draft.category);
    println!("   Status: {:?}, version {}", draft.status, draft.version);
    println!();
    println!("   Steps:");
    for step in &draft.steps {
        println!(
            "     • {} ({}) at ({:.0}, {:.0})",
            step.name, step.step_type, step.position.x, step.position.y
        );
    }
    println!("   Connections:");
    for conn in &draft.connections {
        match &conn.label {
            Some(label) => println!("     • {} → {} [{}]", conn.source, conn.target, label),
            None => println!("     • {} → {}", conn.source, conn.target),
        }
    }
    if !draft.variables.is_empty() {
        println!("   Variables:");
        for variable in &draft.variables {
            println!(
                "     • {} ({}) = {}",
                variable.name, variable.var_type, variable.default_value
            );
        }
    }

    Ok(())
}

fn list_templates() {
    println!("📦 Available Step Templates:");
    println!();

    let registry = loomsteps::default_registry();
    for category in [
        NodeCategory::Trigger,
        NodeCategory::Action,
        NodeCategory::Condition,
        NodeCategory::Ai,
    ] {
        for template in registry.by_category(category) {
            println!("  • {} ({:?})", template.node_type, template.category);
            println!("    {}", template.description);
        }
    }
}

/// Build the example the way the canvas would: palette drops, a connect
/// gesture, and property edits, then serialize the result.
fn create_example_workflow(output: PathBuf) -> Result<()> {
    let registry = loomsteps::default_registry();
    let mut canvas = CanvasController::new(GraphModel::new());
    let mut properties = PropertyEditor::new();

    canvas.begin_palette_drag(registry.get("trigger.webhook").expect("builtin template").clone());
    let hook = canvas
        .drop_on_canvas(Position::new(80.0, 120.0))
        .expect("drop lands on the canvas");
    properties.open(canvas.model().node(hook).expect("node just dropped"))?;
    properties.set_field("path", json!("/new-lead"));
    properties.save(canvas.model_mut())?;

    canvas.begin_palette_drag(registry.get("action.send_email").expect("builtin template").clone());
    let email = canvas
        .drop_on_canvas(Position::new(360.0, 120.0))
        .expect("drop lands on the canvas");
    properties.discard_and_open(canvas.model().node(email).expect("node just dropped"));
    properties.set_field("to", json!("sales@example.com"));
    properties.set_field("subject", json!("New lead received"));
    properties.save(canvas.model_mut())?;

    canvas.begin_connection(hook, "payload");
    canvas
        .complete_connection(email)
        .expect("edge between fresh nodes is valid");

    let mut meta = DraftMetadata::new("Example lead intake");
    meta.description = "Emails the sales team whenever a lead webhook fires".to_string();
    meta.category = "sales".to_string();
    let draft = to_workflow_draft(canvas.model(), &meta);

    let draft_json = serde_json::to_string_pretty(&draft)?;
    std::fs::write(&output, draft_json)?;

    println!("✨ Created example workflow: {}", output.display());
    println!();
    println!("Test it with:");
    println!(
        "  loom test --file {} --input '{{\"customer_name\": \"Jane\"}}'",
        output.display()
    );

    Ok(())
}

async fn test_workflow(file: PathBuf, input: Option<String>) -> Result<()> {
    println!("🚀 Loading workflow from: {}", file.display());

    let draft = load_draft(&file)?;
    let registry = loomsteps::default_registry();
    let (model, meta, hydrate_warnings) = from_workflow_draft(&draft, &registry);
    for warning in &hydrate_warnings {
        println!("  ⚠️  {}", warning);
    }

    let report = loomcore::validate(&model, &registry);
    if !report.is_executable() {
        for error in &report.errors {
            println!("  ❌ {}", error);
        }
        anyhow::bail!("workflow is not executable; fix the errors above first");
    }

    let input_data = match input {
        Some(input_str) => {
            let parsed: serde_json::Value = serde_json::from_str(&input_str)?;
            if !parsed.is_object() {
                return Err(anyhow::anyhow!("Input must be a JSON object"));
            }
            parsed
        }
        None => serde_json::Value::Null,
    };

    // Re-serializing yields the canonical draft, with trigger specs
    // derived for trigger nodes when the file carried none.
    let draft = to_workflow_draft(&model, &meta);

    println!("📋 Workflow: {}", draft.name);
    println!("   Steps: {}", draft.steps.len());
    println!("   Connections: {}", draft.connections.len());
    println!();

    let monitor = ExecutionMonitor::new(Arc::new(sim::SimulatedRunner::new()));
    let handle = monitor.start_test(&draft, input_data).await?;
    println!("▶️  Execution {} started", handle.execution_id());

    let mut rx = handle.view();
    let mut printed_logs = 0;
    let mut printed_progress = -1.0;
    loop {
        {
            let view = rx.borrow_and_update();
            for entry in &view.logs[printed_logs..] {
                println!("   ℹ️  {}", entry.message);
            }
            printed_logs = view.logs.len();
            if view.progress != printed_progress {
                println!("  📊 {:.0}%", view.progress);
                printed_progress = view.progress;
            }
            if view.is_terminal() || view.connection_lost {
                break;
            }
        }
        if rx.changed().await.is_err() {
            break;
        }
    }

    let view = handle.settled().await;
    println!();
    match view.status {
        ExecutionStatus::Completed => {
            println!("✨ Execution completed");
            if let Some(output) = &view.output_data {
                println!("📤 Output:");
                println!("{}", serde_json::to_string_pretty(output)?);
            }
        }
        ExecutionStatus::Failed => {
            println!(
                "💥 Execution failed: {}",
                view.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        _ if view.connection_lost => {
            println!("⚠️  Lost the status channel; the run may still be in progress");
        }
        _ => {
            println!("⚠️  Stopped watching before the run settled");
        }
    }

    Ok(())
}
