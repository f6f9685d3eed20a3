//! [`ToolRegistry`] – statically declared tool registry and catalog builder.
//!
//! Each tool carries its own parameter table ([`ParamSpec`]), so the
//! catalog the model sees is derived from explicit declarations rather
//! than runtime reflection.  Catalog generation is a pure transformation:
//! building it twice from the same registry yields identical output, in
//! registration order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use voxarm_types::Outcome;

/// Fallback description for a tool that declares none.
const NO_DESCRIPTION: &str = "No description.";

// ─────────────────────────────────────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────────────────────────────────────

/// Wire-level kind of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    /// The JSON-schema type name sent to the inference backend.
    pub fn as_schema_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// Declaration of one tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// `true` when the parameter has no default and must be supplied.
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// A named, independently invocable operation exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name.  Names beginning with `_` are treated as internal
    /// and excluded from the catalog.
    fn name(&self) -> &str;

    /// Human-readable description.  The first line is the summary shown in
    /// the catalog.
    fn description(&self) -> &str;

    /// The declared parameter table.
    fn params(&self) -> &[ParamSpec];

    /// Execute the tool with the decoded arguments.
    ///
    /// Payloads must be plain serializable values (scalar, mapping, or
    /// list) because they are re-encoded into conversation text.
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value>;
}

// ─────────────────────────────────────────────────────────────────────────────
// ToolRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered registry of [`Tool`] handlers.
///
/// Registration order is preserved so the generated catalog is stable
/// across calls for a fixed tool set.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.  A previously registered tool with the same name
    /// is replaced in place, keeping its original catalog position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Resolve a tool by exact name match.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Number of registered tools, internal ones included.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Build the OpenAI-style `tools` array advertised to the model.
    ///
    /// Internal tools (name starting with `_`) are excluded.  A tool with
    /// an empty description gets a literal fallback rather than an error;
    /// catalog generation has no failure mode.
    pub fn catalog(&self) -> Vec<Value> {
        self.tools
            .iter()
            .filter(|t| !t.name().starts_with('_'))
            .map(|t| tool_definition(t.as_ref()))
            .collect()
    }
}

/// Render one tool into its catalog entry.
fn tool_definition(tool: &dyn Tool) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();
    for p in tool.params() {
        properties.insert(
            p.name.to_string(),
            json!({
                "type": p.kind.as_schema_type(),
                "description": p.description,
            }),
        );
        if p.required {
            required.push(p.name);
        }
    }

    let description = tool.description().lines().next().unwrap_or("").trim();
    let description = if description.is_empty() {
        NO_DESCRIPTION
    } else {
        description
    };

    json!({
        "type": "function",
        "function": {
            "name": tool.name(),
            "description": description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxarm_types::ToolError;

    struct EchoTool {
        name: &'static str,
        description: &'static str,
        params: Vec<ParamSpec>,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            self.description
        }
        fn params(&self) -> &[ParamSpec] {
            &self.params
        }
        async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
            Ok(Value::Object(args.clone()))
        }
    }

    fn echo(name: &'static str) -> Arc<dyn Tool> {
        Arc::new(EchoTool {
            name,
            description: "Echoes its arguments.\nSecond line is dropped from the catalog.",
            params: vec![
                ParamSpec::required("text", ParamKind::String, "Text to echo."),
                ParamSpec::optional("loud", ParamKind::Boolean, ""),
            ],
        })
    }

    #[test]
    fn catalog_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("bravo"));
        registry.register(echo("alpha"));
        registry.register(echo("charlie"));

        let names: Vec<String> = registry
            .catalog()
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["bravo", "alpha", "charlie"]);
    }

    #[test]
    fn catalog_is_idempotent() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("alpha"));
        registry.register(echo("bravo"));
        assert_eq!(registry.catalog(), registry.catalog());
    }

    #[test]
    fn catalog_excludes_internal_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("visible"));
        registry.register(echo("_internal"));
        let catalog = registry.catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0]["function"]["name"], "visible");
        // Still resolvable for dispatch.
        assert!(registry.get("_internal").is_some());
    }

    #[test]
    fn catalog_uses_summary_line_only() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("alpha"));
        let catalog = registry.catalog();
        assert_eq!(
            catalog[0]["function"]["description"],
            "Echoes its arguments."
        );
    }

    #[test]
    fn empty_description_falls_back_to_literal() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool {
            name: "undocumented",
            description: "",
            params: vec![],
        }));
        let catalog = registry.catalog();
        assert_eq!(catalog[0]["function"]["description"], "No description.");
    }

    #[test]
    fn catalog_marks_required_and_optional_params() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("alpha"));
        let catalog = registry.catalog();
        let f = &catalog[0]["function"];
        assert_eq!(f["parameters"]["required"], json!(["text"]));
        assert_eq!(f["parameters"]["properties"]["text"]["type"], "string");
        assert_eq!(f["parameters"]["properties"]["loud"]["type"], "boolean");
    }

    #[test]
    fn re_registering_keeps_catalog_position() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("alpha"));
        registry.register(echo("bravo"));
        registry.register(echo("alpha")); // replace
        let names: Vec<String> = registry
            .catalog()
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "bravo"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn get_unknown_tool_returns_none() {
        let registry = ToolRegistry::new();
        assert!(registry.get("missing").is_none());
    }

    #[tokio::test]
    async fn registered_tool_is_callable() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("alpha"));
        let tool = registry.get("alpha").unwrap();
        let mut args = Map::new();
        args.insert("text".to_string(), json!("hi"));
        let out = tool.call(&args).await.unwrap();
        assert_eq!(out["text"], "hi");
    }

    #[test]
    fn tool_error_codes_are_stable() {
        // The dispatcher relies on these codes when rendering failures.
        assert_eq!(ToolError::not_found("x").code, "tool_not_found");
        assert_eq!(ToolError::invalid_params("x", "y").code, "invalid_params");
        assert_eq!(ToolError::execution_failed("y").code, "execution_failed");
    }
}
