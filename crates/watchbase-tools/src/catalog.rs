//! Static catalog of the WatchBase tools.
//!
//! The catalog is the single source for tool discovery (`tools/list`) and name resolution in the
//! dispatcher. It is built once and never changes afterwards.

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// Every tool this server exposes, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Search,
    SearchRefnr,
    ListBrands,
    ListFamilies,
    ListWatches,
    GetWatchDetails,
}

impl ToolName {
    pub const ALL: [Self; 6] = [
        Self::Search,
        Self::SearchRefnr,
        Self::ListBrands,
        Self::ListFamilies,
        Self::ListWatches,
        Self::GetWatchDetails,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::SearchRefnr => "search_refnr",
            Self::ListBrands => "list_brands",
            Self::ListFamilies => "list_families",
            Self::ListWatches => "list_watches",
            Self::GetWatchDetails => "get_watch_details",
        }
    }

    /// Exact-match lookup; tool names are case-sensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    /// Identifiers the API accepts either as a string or a number.
    StringOrNumber,
    /// `YYYY-MM-DD`, checked lexically only.
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolDefinition {
    /// JSON Schema advertised for the tool's arguments.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = json!({});
        let mut required: Vec<&str> = Vec::new();

        for param in self.params {
            let mut prop = match param.kind {
                ParamKind::String => json!({ "type": "string" }),
                ParamKind::StringOrNumber => {
                    json!({ "oneOf": [{ "type": "string" }, { "type": "number" }] })
                }
                ParamKind::Date => json!({ "type": "string", "format": "date" }),
            };
            prop["description"] = json!(param.description);
            properties[param.name] = prop;

            if param.required {
                required.push(param.name);
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// MCP `Tool` for discovery.
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let schema_obj = self
            .input_schema()
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        let mut tool = Tool::new(self.name.as_str(), self.description, Arc::new(schema_obj));
        tool.annotations = Some(read_only_annotations());
        tool
    }
}

/// Every tool is a plain HTTP GET against an external API.
fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: None,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

const NO_PARAMS: &[ParamSpec] = &[];

const SEARCH_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "q",
    kind: ParamKind::String,
    required: true,
    description: "Search keywords",
}];

const SEARCH_REFNR_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "q",
    kind: ParamKind::String,
    required: true,
    description: "Search keywords (reference number)",
}];

const LIST_FAMILIES_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "brand_id",
    kind: ParamKind::StringOrNumber,
    required: true,
    description: "BrandID of the brand",
}];

const LIST_WATCHES_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "brand_id",
        kind: ParamKind::StringOrNumber,
        required: true,
        description: "BrandID of the brand",
    },
    ParamSpec {
        name: "family_id",
        kind: ParamKind::StringOrNumber,
        required: false,
        description: "Optional: FamilyID of the family",
    },
    ParamSpec {
        name: "updated_since",
        kind: ParamKind::Date,
        required: false,
        description: "Optional: Limit results to watches updated after this date (YYYY-MM-DD)",
    },
];

const GET_WATCH_DETAILS_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "id",
    kind: ParamKind::StringOrNumber,
    required: true,
    description: "ID of the watch",
}];

/// Read-only, ordered tool registry.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<ToolDefinition>,
}

impl Catalog {
    /// The six WatchBase tools.
    #[must_use]
    pub fn watchbase() -> Self {
        let tools = ToolName::ALL
            .into_iter()
            .map(|name| {
                let (description, params) = match name {
                    ToolName::Search => (
                        "Search the database by brand name, family name, watch name and reference number (whole words).",
                        SEARCH_PARAMS,
                    ),
                    ToolName::SearchRefnr => (
                        "Search the database by reference number (allows partial matches).",
                        SEARCH_REFNR_PARAMS,
                    ),
                    ToolName::ListBrands => {
                        ("Retrieve a list of all brands in the database.", NO_PARAMS)
                    }
                    ToolName::ListFamilies => (
                        "Retrieve a list of all families for a given brand.",
                        LIST_FAMILIES_PARAMS,
                    ),
                    ToolName::ListWatches => (
                        "Retrieve a list of watches for a particular Brand and/or Family, optionally filtered by update date.",
                        LIST_WATCHES_PARAMS,
                    ),
                    ToolName::GetWatchDetails => (
                        "Retrieve the full details for a particular watch by its ID.",
                        GET_WATCH_DETAILS_PARAMS,
                    ),
                };
                ToolDefinition {
                    name,
                    description,
                    params,
                }
            })
            .collect();

        Self { tools }
    }

    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Find a tool by its exposed name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        let name = ToolName::parse(name)?;
        self.tools.iter().find(|t| t.name == name)
    }

    /// MCP `Tool`s for discovery, in catalog order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::to_tool).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::watchbase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_each_tool_once_in_fixed_order() {
        let tools = Catalog::watchbase().list_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(
            names,
            vec![
                "search",
                "search_refnr",
                "list_brands",
                "list_families",
                "list_watches",
                "get_watch_details",
            ]
        );
        for tool in &tools {
            let description = tool.description.as_deref().unwrap_or_default();
            assert!(!description.is_empty(), "{} has no description", tool.name);
        }
    }

    #[test]
    fn list_watches_schema_marks_only_brand_required() {
        let catalog = Catalog::watchbase();
        let schema = catalog
            .resolve("list_watches")
            .expect("list_watches")
            .input_schema();

        assert_eq!(schema["required"], json!(["brand_id"]));
        assert_eq!(schema["properties"]["updated_since"]["format"], "date");
        assert_eq!(
            schema["properties"]["family_id"]["oneOf"],
            json!([{ "type": "string" }, { "type": "number" }])
        );
    }

    #[test]
    fn list_brands_schema_has_no_required_params() {
        let catalog = Catalog::watchbase();
        let schema = catalog.resolve("list_brands").expect("list_brands").input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"], json!({}));
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn resolve_rejects_unknown_and_differently_cased_names() {
        let catalog = Catalog::watchbase();
        assert!(catalog.resolve("does_not_exist").is_none());
        assert!(catalog.resolve("Search").is_none());
        assert!(catalog.resolve("search").is_some());
    }

    #[test]
    fn tools_are_annotated_read_only() {
        for tool in Catalog::watchbase().list_tools() {
            let annotations = tool.annotations.expect("annotations");
            assert_eq!(annotations.read_only_hint, Some(true));
            assert_eq!(annotations.open_world_hint, Some(true));
        }
    }
}
