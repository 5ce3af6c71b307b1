//! Adding a required header parameter to every operation of a spec.

use std::path::Path;

use serde::Serialize;
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use super::HttpMethod;
use crate::document::Document;
use crate::error::DocumentError;

/// A required header parameter with a single allowed string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParameter {
    pub name: String,
    pub value: String,
    pub description: String,
}

impl HeaderParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("Required {name} header"),
            name,
            value: value.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The OpenAPI parameter object for this header.
    pub fn to_parameter(&self) -> Value {
        json!({
            "name": self.name,
            "in": "header",
            "required": true,
            "schema": {
                "type": "string",
                "enum": [self.value],
            },
            "description": self.description,
        })
    }

    fn matches(&self, parameter: &Value) -> bool {
        parameter.get("name").and_then(Value::as_str) == Some(self.name.as_str())
            && parameter.get("in").and_then(Value::as_str) == Some("header")
    }
}

impl Default for HeaderParameter {
    /// The `Metadata: true` header required by metadata endpoints.
    fn default() -> Self {
        Self::new("Metadata", "true")
            .with_description("Required header to indicate metadata request")
    }
}

/// An operation the header was added to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedOperation {
    pub method: String,
    pub path: String,
}

/// Outcome of a header pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    pub operations_visited: usize,
    pub added: Vec<ChangedOperation>,
}

impl HeaderReport {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Adds `header` to the front of `operation`'s parameters unless a header
/// parameter with the same name is already there. Returns `true` when the
/// operation changed. An operation whose `parameters` is not a list is left
/// alone.
pub fn add_header_to_operation(operation: &mut Value, header: &HeaderParameter) -> bool {
    let Some(operation) = operation.as_object_mut() else {
        return false;
    };

    let parameters = operation
        .entry("parameters")
        .or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(parameters) = parameters else {
        warn!("`parameters` is not a list, skipping operation");
        return false;
    };

    if parameters.iter().any(|parameter| header.matches(parameter)) {
        return false;
    }

    parameters.insert(0, header.to_parameter());
    true
}

/// Ensures every operation under every path carries `header` exactly once.
pub fn add_header_to_spec(spec: &mut Value, header: &HeaderParameter) -> HeaderReport {
    let mut report = HeaderReport::default();

    let Some(paths) = spec.get_mut("paths").and_then(Value::as_object_mut) else {
        info!("no `paths` section found in spec");
        return report;
    };

    for (path, item) in paths.iter_mut() {
        debug!("processing path {path}");
        for method in HttpMethod::iter() {
            let Some(operation) = item.get_mut(method.as_ref()) else {
                continue;
            };
            report.operations_visited += 1;

            let verb = method.as_ref().to_uppercase();
            if add_header_to_operation(operation, header) {
                info!("added {} header to {verb} {path}", header.name);
                report.added.push(ChangedOperation {
                    method: method.to_string(),
                    path: path.clone(),
                });
            } else {
                debug!("{} header already on {verb} {path}", header.name);
            }
        }
    }

    report
}

/// Runs the header pass over the spec at `input`. The result is written to
/// `output` (or back to `input`) unless nothing changed or `dry_run` is set.
#[instrument(skip(header), fields(header = %header.name))]
pub fn add_header_to_file(
    input: &Path,
    output: Option<&Path>,
    header: &HeaderParameter,
    dry_run: bool,
) -> Result<HeaderReport, DocumentError> {
    info!("reading spec {}", input.display());
    let mut document = Document::load(input)?;
    let report = add_header_to_spec(&mut document.root, header);

    if !report.changed() {
        info!("no changes needed, every operation already has the header");
        return Ok(report);
    }
    if dry_run {
        info!("dry run, {} operation(s) would change", report.added.len());
        return Ok(report);
    }

    let target = output.unwrap_or(input);
    document.save_as(target)?;
    info!("wrote {}", target.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> Value {
        json!({
            "paths": {
                "/metadata": {
                    "get": {"responses": {}},
                    "put": {"parameters": [{"name": "id", "in": "query"}]},
                    "summary": "not an operation"
                },
                "/health": {
                    "get": {
                        "parameters": [{
                            "name": "Metadata",
                            "in": "header",
                            "required": true,
                            "schema": {"type": "string", "enum": ["true"]}
                        }]
                    }
                }
            }
        })
    }

    #[test]
    fn adds_header_to_front_of_parameters() {
        let mut spec = spec();
        let report = add_header_to_spec(&mut spec, &HeaderParameter::default());

        assert_eq!(report.operations_visited, 3);
        assert_eq!(report.added.len(), 2);
        assert_eq!(spec["paths"]["/metadata"]["put"]["parameters"][0]["name"], "Metadata");
        assert_eq!(spec["paths"]["/metadata"]["put"]["parameters"][1]["name"], "id");
        assert_eq!(
            spec["paths"]["/metadata"]["get"]["parameters"],
            json!([HeaderParameter::default().to_parameter()])
        );
        assert_eq!(
            spec["paths"]["/health"]["get"]["parameters"]
                .as_array()
                .expect("array")
                .len(),
            1
        );
    }

    #[test]
    fn second_pass_changes_nothing() {
        let mut spec = spec();
        let header = HeaderParameter::default();
        add_header_to_spec(&mut spec, &header);
        let after_first = spec.clone();

        let report = add_header_to_spec(&mut spec, &header);
        assert!(!report.changed());
        assert_eq!(spec, after_first);
    }

    #[test]
    fn query_parameter_with_same_name_does_not_count() {
        let mut operation = json!({"parameters": [{"name": "Metadata", "in": "query"}]});
        assert!(add_header_to_operation(&mut operation, &HeaderParameter::default()));
        assert_eq!(operation["parameters"].as_array().expect("array").len(), 2);
    }

    #[test]
    #[tracing_test::traced_test]
    fn non_list_parameters_are_kept() {
        let mut spec = json!({"paths": {"/v1/status": {"get": {"parameters": {"odd": true}}}}});
        let report = add_header_to_spec(&mut spec, &HeaderParameter::default());

        assert!(!report.changed());
        assert_eq!(report.operations_visited, 1);
        assert_eq!(spec["paths"]["/v1/status"]["get"]["parameters"], json!({"odd": true}));
        assert!(logs_contain("`parameters` is not a list"));
    }

    #[test]
    fn spec_without_paths_reports_no_change() {
        let mut spec = json!({"openapi": "3.0.0"});
        let report = add_header_to_spec(&mut spec, &HeaderParameter::default());
        assert_eq!(report, HeaderReport::default());
    }

    #[test]
    fn custom_header_uses_given_value() {
        let header = HeaderParameter::new("X-Api-Version", "2");
        assert_eq!(header.to_parameter()["schema"]["enum"], json!(["2"]));
        assert_eq!(header.description, "Required X-Api-Version header");
    }
}
