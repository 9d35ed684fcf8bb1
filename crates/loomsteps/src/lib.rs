//! Standard step template library
//!
//! Built-in triggers, actions, conditions and AI steps for the palette.

mod action;
mod ai;
mod condition;
mod trigger;

use loomcore::NodeTemplateRegistry;

/// Register all built-in step templates with a registry
pub fn register_all(registry: &mut NodeTemplateRegistry) {
    for template in trigger::templates() {
        registry.register(template);
    }
    for template in action::templates() {
        registry.register(template);
    }
    for template in condition::templates() {
        registry.register(template);
    }
    for template in ai::templates() {
        registry.register(template);
    }
}

/// Registry preloaded with the built-in catalog.
pub fn default_registry() -> NodeTemplateRegistry {
    let mut registry = NodeTemplateRegistry::new();
    register_all(&mut registry);
    registry
}
