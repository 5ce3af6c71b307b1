//! Cloning the generic inference endpoint job resource for one endpoint.
//!
//! The base spec documents a generic job resource keyed by a path variable
//! (`{inference_endpoint_name}`). Each concrete endpoint gets its own copy of
//! that resource: the template schemas, request body, responses and paths are
//! deep-copied, renamed after the endpoint's schema name, wired to the
//! endpoint's input/output schemas, and mounted under a literal path segment.
//!
//! Two variants exist:
//!
//! - [`add_endpoint_to_spec`] splices the copies into the base spec and writes
//!   it back in place.
//! - [`create_endpoint_spec`] writes a standalone `<endpointId>.json` spec
//!   next to the base spec, holding only the endpoint's paths and a pruned
//!   set of request bodies and responses.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value, json};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use super::HttpMethod;
use super::names::{EndpointNames, component_ref};
use super::refs::{collect_refs, rewrite_refs};
use crate::document::{Document, DocumentFormat, ensure_object};
use crate::endpoint::{EndpointConfig, EndpointIdentity};
use crate::error::SpliceError;

const SCHEMAS: &str = "schemas";
const REQUEST_BODIES: &str = "requestBodies";
const RESPONSES: &str = "responses";
const PARAMETERS: &str = "parameters";
const PATHS: &str = "paths";

const JOB_SCHEMA: &str = "InferenceEndpointJob";
const CREATE_JOB_SCHEMA: &str = "CreateInferenceEndpointJob";
const JOB_LIST_SCHEMA: &str = "InferenceEndpointJobList";
const CREATE_JOB_BODY: &str = "CreateInferenceEndpointJob";
const LIST_JOBS_RESPONSE: &str = "ListInferenceEndpointJobs";
const GET_JOB_RESPONSE: &str = "GetInferenceEndpointJob";
const CREATE_JOB_RESPONSE: &str = "CreateInferenceEndpointJob";

const ENDPOINTS_ROOT: &str = "/organizations/{organization_name}/inference-endpoints";
const ENDPOINT_NAME_PARAMETER: &str = "inference_endpoint_name";
const TEMPLATE_JOB_ID_PARAMETER: &str = "inference_endpoint_job_id";
const JOB_ID_PARAMETER: &str = "job_id";
const JOBS_SEGMENT: &str = "/jobs";
const TEMPLATE_JOB_SEGMENT: &str = "/jobs/{inference_endpoint_job_id}";
const JOB_SEGMENT: &str = "/jobs/{job_id}";

const JSON_CONTENT: &str = "application/json";

/// Keys written by a splice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpliceReport {
    /// Components written, as `section/name`.
    pub components: Vec<String>,
    /// Paths written.
    pub paths: Vec<String>,
    /// Components or paths that already existed and were replaced.
    pub overwritten: Vec<String>,
    /// Request bodies and responses removed by the standalone prune, as
    /// `section/name`.
    pub pruned: Vec<String>,
}

/// Template path of the generic endpoint resource.
fn template_resource_path() -> String {
    format!("{ENDPOINTS_ROOT}/{{{ENDPOINT_NAME_PARAMETER}}}")
}

/// Path of the resource for a concrete endpoint.
pub fn endpoint_resource_path(endpoint_id: &str) -> String {
    format!("{ENDPOINTS_ROOT}/{endpoint_id}")
}

/// Splices `identity`'s job resource into `target`, reading the templates
/// from `templates`. `target` is left untouched when a template is missing.
///
/// `templates` and `target` may hold the same content; the templates are
/// only ever read and every copy is deep.
///
/// ## Errors
///
/// Returns [`SpliceError::MissingTemplate`] when a template entity is absent
/// and [`SpliceError::MalformedTemplate`] when a template lacks a field the
/// splice writes into.
pub fn splice_endpoint(
    target: &mut Value,
    templates: &Value,
    identity: &EndpointIdentity,
    input: Value,
    output: Value,
) -> Result<SpliceReport, SpliceError> {
    let names = EndpointNames::new(&identity.schema_name);
    let display = identity.endpoint_name.as_str();
    let mapping = template_ref_mapping(&names);
    let schema_ref = |name: &str| json!({ "$ref": component_ref(SCHEMAS, name) });

    // Schemas
    let mut job = component_template(templates, SCHEMAS, JOB_SCHEMA)?;
    rewrite_refs(&mut job, &mapping);
    set_at(
        &mut job,
        &["description"],
        json!(format!("Job input schema for {display}")),
        SCHEMAS,
        JOB_SCHEMA,
    )?;
    set_at(&mut job, &["properties", "input"], schema_ref(&names.input), SCHEMAS, JOB_SCHEMA)?;
    set_at(&mut job, &["properties", "output"], schema_ref(&names.output), SCHEMAS, JOB_SCHEMA)?;

    let mut create_job = component_template(templates, SCHEMAS, CREATE_JOB_SCHEMA)?;
    rewrite_refs(&mut create_job, &mapping);
    set_at(
        &mut create_job,
        &["description"],
        json!(format!("Create a job for {display}")),
        SCHEMAS,
        CREATE_JOB_SCHEMA,
    )?;
    set_at(
        &mut create_job,
        &["properties", "input"],
        schema_ref(&names.input),
        SCHEMAS,
        CREATE_JOB_SCHEMA,
    )?;

    let mut job_list = component_template(templates, SCHEMAS, JOB_LIST_SCHEMA)?;
    rewrite_refs(&mut job_list, &mapping);
    set_at(
        &mut job_list,
        &["description"],
        json!(format!("List of jobs for {display}")),
        SCHEMAS,
        JOB_LIST_SCHEMA,
    )?;
    let job_ref = component_ref(SCHEMAS, &names.job);
    let items_reference_job = job_list
        .pointer("/properties/items")
        .is_some_and(|items| collect_refs(items).contains(&job_ref));
    if !items_reference_job {
        set_at(
            &mut job_list,
            &["properties", "items"],
            json!({ "type": "array", "items": { "$ref": job_ref } }),
            SCHEMAS,
            JOB_LIST_SCHEMA,
        )?;
    }

    // Request body and responses
    let mut create_body = component_template(templates, REQUEST_BODIES, CREATE_JOB_BODY)?;
    set_content_schema(
        &mut create_body,
        schema_ref(&names.create_job),
        REQUEST_BODIES,
        CREATE_JOB_BODY,
    )?;

    let mut list_response = component_template(templates, RESPONSES, LIST_JOBS_RESPONSE)?;
    set_content_schema(
        &mut list_response,
        schema_ref(&names.job_list),
        RESPONSES,
        LIST_JOBS_RESPONSE,
    )?;

    let mut get_response = component_template(templates, RESPONSES, GET_JOB_RESPONSE)?;
    set_content_schema(&mut get_response, schema_ref(&names.job), RESPONSES, GET_JOB_RESPONSE)?;

    let mut create_response = component_template(templates, RESPONSES, CREATE_JOB_RESPONSE)?;
    set_content_schema(
        &mut create_response,
        schema_ref(&names.job),
        RESPONSES,
        CREATE_JOB_RESPONSE,
    )?;

    // Paths
    let template_root = template_resource_path();
    let endpoint_root = endpoint_resource_path(&identity.endpoint_id);

    let resource = path_template(templates, &template_root, &mapping)?;

    let jobs_template = format!("{template_root}{JOBS_SEGMENT}");
    let mut jobs = path_template(templates, &jobs_template, &mapping)?;
    set_at(&mut jobs, &["summary"], json!(format!("Jobs for {display}")), PATHS, &jobs_template)?;
    set_at(
        &mut jobs,
        &["description"],
        json!(format!("Operations for {display} jobs")),
        PATHS,
        &jobs_template,
    )?;
    {
        let list = operation_mut(&mut jobs, HttpMethod::Get, &jobs_template)?;
        list.insert("summary".into(), json!(format!("List jobs for {display}")));
        list.insert("description".into(), json!(format!("Retrieves a list of jobs for {display}")));
        set_response(list, "200", component_ref(RESPONSES, &names.list_response), &jobs_template)?;
    }
    {
        let create = operation_mut(&mut jobs, HttpMethod::Post, &jobs_template)?;
        create.insert("summary".into(), json!(format!("Create a job for {display}")));
        create.insert("description".into(), json!(format!("Creates a job for {display}")));
        create.insert(
            "requestBody".into(),
            json!({ "$ref": component_ref(REQUEST_BODIES, &names.create_job) }),
        );
        set_response(create, "201", component_ref(RESPONSES, &names.create_job), &jobs_template)?;
    }

    let job_template = format!("{template_root}{TEMPLATE_JOB_SEGMENT}");
    let mut single_job = path_template(templates, &job_template, &mapping)?;
    let renamed = rename_job_id_parameter(&mut single_job, templates);
    debug!("renamed {renamed} job id parameter(s) in copy of {job_template}");
    set_at(
        &mut single_job,
        &["summary"],
        json!(format!("Job for {display}")),
        PATHS,
        &job_template,
    )?;
    set_at(
        &mut single_job,
        &["description"],
        json!(format!("Operations for a {display} job")),
        PATHS,
        &job_template,
    )?;
    {
        let get = operation_mut(&mut single_job, HttpMethod::Get, &job_template)?;
        get.insert("summary".into(), json!(format!("Get job for {display}")));
        get.insert("description".into(), json!(format!("Retrieves a job for {display}")));
        set_response(get, "200", component_ref(RESPONSES, &names.get_response), &job_template)?;
    }
    operation_mut(&mut single_job, HttpMethod::Delete, &job_template)?
        .insert("summary".into(), json!(format!("Delete job for {display}")));

    // Every template resolved; write into the target.
    let mut report = SpliceReport::default();
    let mut put_component = |section: &str, name: &str, value: Value| {
        let key = format!("{section}/{name}");
        let map = ensure_object(target, &["components", section]);
        if map.insert(name.to_string(), value).is_some() {
            warn!("overwriting existing component {key}");
            report.overwritten.push(key.clone());
        }
        report.components.push(key);
    };

    put_component(SCHEMAS, &names.input, input);
    put_component(SCHEMAS, &names.output, output);
    put_component(SCHEMAS, &names.job, job);
    put_component(SCHEMAS, &names.create_job, create_job);
    put_component(SCHEMAS, &names.job_list, job_list);
    put_component(REQUEST_BODIES, &names.create_job, create_body);
    put_component(RESPONSES, &names.list_response, list_response);
    put_component(RESPONSES, &names.get_response, get_response);
    put_component(RESPONSES, &names.create_job, create_response);

    let paths = ensure_object(target, &[PATHS]);
    for (path, item) in [
        (endpoint_root.clone(), resource),
        (format!("{endpoint_root}{JOBS_SEGMENT}"), jobs),
        (format!("{endpoint_root}{JOB_SEGMENT}"), single_job),
    ] {
        if paths.insert(path.clone(), item).is_some() {
            warn!("overwriting existing path {path}");
            report.overwritten.push(path.clone());
        }
        report.paths.push(path);
    }

    debug!(
        components = report.components.len(),
        paths = report.paths.len(),
        "spliced endpoint {}",
        identity.endpoint_id
    );
    Ok(report)
}

/// Builds a standalone spec for one endpoint from the base spec.
///
/// The result is a copy of `base` retitled after the endpoint, holding only
/// the endpoint's three paths, with request bodies and responses pruned to
/// the ones the endpoint needs (see [`prune_components`]).
pub fn build_standalone_spec(
    base: &Value,
    identity: &EndpointIdentity,
    input: Value,
    output: Value,
) -> Result<(Value, SpliceReport), SpliceError> {
    let mut spec = base.clone();

    let info = ensure_object(&mut spec, &["info"]);
    info.insert("title".into(), json!(identity.endpoint_name));
    info.insert(
        "description".into(),
        json!(format!("API for {}", identity.endpoint_name)),
    );
    ensure_object(&mut spec, &[]).insert(PATHS.into(), Value::Object(Map::new()));

    let mut report = splice_endpoint(&mut spec, base, identity, input, output)?;
    report.pruned = prune_components(&mut spec, &EndpointNames::new(&identity.schema_name));

    Ok((spec, report))
}

/// Removes every request body and response that is not one of the
/// endpoint's own, `UnknownError`, a numeric status code, or named after the
/// generic inference endpoint resource. Returns the removed keys as
/// `section/name`.
pub fn prune_components(document: &mut Value, names: &EndpointNames) -> Vec<String> {
    let own: HashSet<&str> = names.bodies_and_responses().into_iter().collect();
    let mut pruned = Vec::new();

    for section in [REQUEST_BODIES, RESPONSES] {
        let Some(Value::Object(map)) = document.pointer_mut(&format!("/components/{section}"))
        else {
            continue;
        };
        map.retain(|key, _| {
            let keep = own.contains(key.as_str()) || is_always_kept(key);
            if !keep {
                pruned.push(format!("{section}/{key}"));
            }
            keep
        });
    }

    pruned
}

fn is_always_kept(key: &str) -> bool {
    key == "UnknownError"
        || (!key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()))
        || key.contains("InferenceEndpoint")
}

/// Splices the endpoint described by `config` into its base spec and writes
/// the base spec back in its own format.
#[instrument(skip(config), fields(endpoint = %config.identity.endpoint_id))]
pub fn add_endpoint_to_spec(config: &EndpointConfig) -> Result<SpliceReport, SpliceError> {
    info!("reading base spec {}", config.base_schema.display());
    let mut document = Document::load_object(&config.base_schema)?;
    let (input, output) = config.load_fragments()?;

    let templates = document.root.clone();
    let report = splice_endpoint(&mut document.root, &templates, &config.identity, input, output)?;

    document.save(&config.base_schema)?;
    info!("updated {}", config.base_schema.display());
    Ok(report)
}

/// Writes a standalone spec for the endpoint described by `config` to
/// `<dir of base spec>/<endpointId>.json` and returns the written path.
#[instrument(skip(config), fields(endpoint = %config.identity.endpoint_id))]
pub fn create_endpoint_spec(
    config: &EndpointConfig,
) -> Result<(PathBuf, SpliceReport), SpliceError> {
    info!("reading base spec {}", config.base_schema.display());
    let base = Document::load_object(&config.base_schema)?;
    let (input, output) = config.load_fragments()?;

    let (spec, report) = build_standalone_spec(&base.root, &config.identity, input, output)?;

    let output_path = config.standalone_spec_path();
    Document::new(DocumentFormat::Json, spec).save(&output_path)?;
    info!("wrote {}", output_path.display());
    Ok((output_path, report))
}

/// `$ref` targets of the templates, mapped to the endpoint's components.
fn template_ref_mapping(names: &EndpointNames) -> HashMap<String, String> {
    [
        (SCHEMAS, JOB_SCHEMA, SCHEMAS, &names.job),
        (SCHEMAS, CREATE_JOB_SCHEMA, SCHEMAS, &names.create_job),
        (SCHEMAS, JOB_LIST_SCHEMA, SCHEMAS, &names.job_list),
        (REQUEST_BODIES, CREATE_JOB_BODY, REQUEST_BODIES, &names.create_job),
        (RESPONSES, LIST_JOBS_RESPONSE, RESPONSES, &names.list_response),
        (RESPONSES, GET_JOB_RESPONSE, RESPONSES, &names.get_response),
        (RESPONSES, CREATE_JOB_RESPONSE, RESPONSES, &names.create_job),
    ]
    .into_iter()
    .map(|(from_section, from, to_section, to)| {
        (component_ref(from_section, from), component_ref(to_section, to))
    })
    .collect()
}

fn component_template(templates: &Value, section: &str, name: &str) -> Result<Value, SpliceError> {
    templates
        .get("components")
        .and_then(|components| components.get(section))
        .and_then(|entries| entries.get(name))
        .cloned()
        .ok_or_else(|| SpliceError::MissingTemplate {
            section: format!("components.{section}"),
            name: name.to_string(),
        })
}

/// Clones a template path item with the endpoint name parameter stripped
/// and its references rewritten.
fn path_template(
    templates: &Value,
    path: &str,
    mapping: &HashMap<String, String>,
) -> Result<Value, SpliceError> {
    let mut item = templates
        .get(PATHS)
        .and_then(|paths| paths.get(path))
        .cloned()
        .ok_or_else(|| SpliceError::MissingTemplate {
            section: PATHS.to_string(),
            name: path.to_string(),
        })?;

    let removed = strip_endpoint_name_parameter(&mut item);
    debug!("removed {removed} endpoint name parameter(s) from copy of {path}");
    rewrite_refs(&mut item, mapping);
    Ok(item)
}

/// Removes the `inference_endpoint_name` path parameter from the path item
/// and each of its operations. The parameter may be a `$ref` or inline.
fn strip_endpoint_name_parameter(item: &mut Value) -> usize {
    let mut removed = retain_parameters(item);
    for method in HttpMethod::iter() {
        if let Some(operation) = item.get_mut(method.as_ref()) {
            removed += retain_parameters(operation);
        }
    }
    removed
}

fn retain_parameters(holder: &mut Value) -> usize {
    let Some(Value::Array(parameters)) = holder.get_mut(PARAMETERS) else {
        return 0;
    };
    let before = parameters.len();
    parameters.retain(|parameter| !is_path_parameter(parameter, ENDPOINT_NAME_PARAMETER));
    before - parameters.len()
}

/// Whether `parameter` is the path parameter `name`, by `$ref` or inline.
fn is_path_parameter(parameter: &Value, name: &str) -> bool {
    let by_ref = parameter
        .get("$ref")
        .and_then(Value::as_str)
        .is_some_and(|target| target == component_ref(PARAMETERS, name));
    let inline = parameter.get("name").and_then(Value::as_str) == Some(name)
        && parameter.get("in").and_then(Value::as_str) == Some("path");
    by_ref || inline
}

/// Replaces the template job id path parameter with an inline `job_id`
/// parameter matching the endpoint's `/jobs/{job_id}` path. The definition is
/// copied from the template's parameter component when it resolves.
fn rename_job_id_parameter(item: &mut Value, templates: &Value) -> usize {
    let definition = templates
        .pointer(&format!("/components/{PARAMETERS}/{TEMPLATE_JOB_ID_PARAMETER}"))
        .and_then(Value::as_object)
        .cloned();
    let job_id = |parameter: &Value| {
        let mut inline = parameter
            .as_object()
            .filter(|p| !p.contains_key("$ref"))
            .or(definition.as_ref())
            .cloned()
            .unwrap_or_else(|| {
                let mut fallback = Map::new();
                fallback.insert("schema".into(), json!({ "type": "string" }));
                fallback
            });
        inline.insert("name".into(), json!(JOB_ID_PARAMETER));
        inline.insert("in".into(), json!("path"));
        inline.insert("required".into(), json!(true));
        Value::Object(inline)
    };

    let mut renamed = 0;
    let mut rename_in = |holder: &mut Value| {
        if let Some(Value::Array(parameters)) = holder.get_mut(PARAMETERS) {
            for parameter in parameters.iter_mut() {
                if is_path_parameter(parameter, TEMPLATE_JOB_ID_PARAMETER) {
                    *parameter = job_id(parameter);
                    renamed += 1;
                }
            }
        }
    };
    rename_in(&mut *item);
    for method in HttpMethod::iter() {
        if let Some(operation) = item.get_mut(method.as_ref()) {
            rename_in(operation);
        }
    }
    renamed
}

/// Sets `keys` inside `value`. Every key but the last must already lead to
/// an object.
fn set_at(
    value: &mut Value,
    keys: &[&str],
    new: Value,
    section: &str,
    name: &str,
) -> Result<(), SpliceError> {
    let malformed = || SpliceError::MalformedTemplate {
        section: section.to_string(),
        name: name.to_string(),
        field: keys.join("."),
    };

    let (last, parents) = keys.split_last().ok_or_else(malformed)?;
    let mut current = value;
    for key in parents {
        current = current.get_mut(*key).ok_or_else(malformed)?;
    }
    current
        .as_object_mut()
        .ok_or_else(malformed)?
        .insert((*last).to_string(), new);
    Ok(())
}

fn set_content_schema(
    value: &mut Value,
    schema: Value,
    section: &str,
    name: &str,
) -> Result<(), SpliceError> {
    set_at(value, &["content", JSON_CONTENT, "schema"], schema, section, name)
}

fn operation_mut<'v>(
    item: &'v mut Value,
    method: HttpMethod,
    template_path: &str,
) -> Result<&'v mut Map<String, Value>, SpliceError> {
    item.get_mut(method.as_ref())
        .and_then(Value::as_object_mut)
        .ok_or_else(|| SpliceError::MalformedTemplate {
            section: PATHS.to_string(),
            name: template_path.to_string(),
            field: method.to_string(),
        })
}

fn set_response(
    operation: &mut Map<String, Value>,
    status: &str,
    target: String,
    template_path: &str,
) -> Result<(), SpliceError> {
    operation
        .entry("responses")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| SpliceError::MalformedTemplate {
            section: PATHS.to_string(),
            name: template_path.to_string(),
            field: "responses".to_string(),
        })?
        .insert(status.to_string(), json!({ "$ref": target }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_kept_keys() {
        assert!(is_always_kept("UnknownError"));
        assert!(is_always_kept("404"));
        assert!(is_always_kept("ListInferenceEndpoints"));
        assert!(!is_always_kept(""));
        assert!(!is_always_kept("ListContainerGroups"));
        assert!(!is_always_kept("4xx"));
    }

    #[test]
    fn endpoint_name_parameter_matches_ref_and_inline_forms() {
        let name = ENDPOINT_NAME_PARAMETER;
        assert!(is_path_parameter(
            &json!({"$ref": "#/components/parameters/inference_endpoint_name"}),
            name
        ));
        assert!(is_path_parameter(
            &json!({"name": "inference_endpoint_name", "in": "path", "required": true}),
            name
        ));
        assert!(!is_path_parameter(
            &json!({"$ref": "#/components/parameters/organization_name"}),
            name
        ));
        assert!(!is_path_parameter(
            &json!({"name": "inference_endpoint_name", "in": "query"}),
            name
        ));
    }

    #[test]
    fn job_id_parameter_is_inlined_under_its_new_name() {
        let templates = json!({"components": {"parameters": {
            "inference_endpoint_job_id": {
                "name": "inference_endpoint_job_id",
                "in": "path",
                "required": true,
                "schema": {"type": "string", "format": "uuid"}
            }
        }}});
        let mut item = json!({
            "parameters": [
                {"$ref": "#/components/parameters/organization_name"},
                {"$ref": "#/components/parameters/inference_endpoint_job_id"}
            ],
            "delete": {
                "parameters": [{
                    "name": "inference_endpoint_job_id",
                    "in": "path",
                    "description": "Job to delete"
                }]
            }
        });

        assert_eq!(rename_job_id_parameter(&mut item, &templates), 2);
        assert_eq!(
            item["parameters"][1],
            json!({
                "name": "job_id",
                "in": "path",
                "required": true,
                "schema": {"type": "string", "format": "uuid"}
            })
        );
        assert_eq!(item["delete"]["parameters"][0]["name"], "job_id");
        assert_eq!(item["delete"]["parameters"][0]["description"], "Job to delete");
    }

    #[test]
    fn job_id_parameter_without_component_gets_a_string_schema() {
        let mut item = json!({
            "parameters": [{"$ref": "#/components/parameters/inference_endpoint_job_id"}]
        });

        assert_eq!(rename_job_id_parameter(&mut item, &json!({})), 1);
        assert_eq!(
            item["parameters"][0],
            json!({"schema": {"type": "string"}, "name": "job_id", "in": "path", "required": true})
        );
    }

    #[test]
    fn strip_removes_path_and_operation_level_parameters() {
        let mut item = json!({
            "parameters": [
                {"$ref": "#/components/parameters/organization_name"},
                {"$ref": "#/components/parameters/inference_endpoint_name"}
            ],
            "get": {
                "parameters": [{"name": "inference_endpoint_name", "in": "path"}]
            }
        });

        assert_eq!(strip_endpoint_name_parameter(&mut item), 2);
        assert_eq!(
            item["parameters"],
            json!([{"$ref": "#/components/parameters/organization_name"}])
        );
        assert_eq!(item["get"]["parameters"], json!([]));
    }

    #[test]
    fn set_at_requires_existing_parents() {
        let mut value = json!({"content": {}});
        let err = set_at(
            &mut value,
            &["content", "application/json", "schema"],
            json!({}),
            RESPONSES,
            "GetInferenceEndpointJob",
        )
        .expect_err("missing media type");
        assert!(matches!(err, SpliceError::MalformedTemplate { .. }));
    }

    #[test]
    #[tracing_test::traced_test]
    fn second_splice_overwrites_and_warns() {
        let base: Value =
            serde_json::from_str(include_str!("../../tests/fixtures/salad-cloud.json")).unwrap();
        let identity = EndpointIdentity {
            endpoint_id: "foo".into(),
            endpoint_name: "Foo".into(),
            schema_name: "Foo".into(),
        };
        let mut target = base.clone();

        let first = splice_endpoint(&mut target, &base, &identity, json!({}), json!({})).unwrap();
        assert!(first.overwritten.is_empty());

        let second =
            splice_endpoint(&mut target, &base, &identity, json!({}), json!({})).unwrap();
        assert_eq!(second.overwritten.len(), first.components.len() + first.paths.len());
        assert!(logs_contain("overwriting existing component schemas/FooJob"));
    }

    #[test]
    fn job_list_without_job_reference_gets_an_array_of_jobs() {
        let mut base: Value =
            serde_json::from_str(include_str!("../../tests/fixtures/salad-cloud.json")).unwrap();
        base["components"]["schemas"]["InferenceEndpointJobList"]["properties"]["items"] =
            json!({"type": "array", "items": {"type": "object"}});
        let identity = EndpointIdentity {
            endpoint_id: "foo".into(),
            endpoint_name: "Foo".into(),
            schema_name: "Foo".into(),
        };
        let mut target = base.clone();

        splice_endpoint(&mut target, &base, &identity, json!({}), json!({})).unwrap();

        assert_eq!(
            target["components"]["schemas"]["FooJobList"]["properties"]["items"],
            json!({"type": "array", "items": {"$ref": "#/components/schemas/FooJob"}})
        );
        assert_eq!(
            target["paths"]["/organizations/{organization_name}/inference-endpoints/foo/jobs/{job_id}"]
                ["get"]["summary"],
            "Get job for Foo"
        );
    }

    #[test]
    fn resource_path_uses_literal_endpoint_id() {
        assert_eq!(
            endpoint_resource_path("foo"),
            "/organizations/{organization_name}/inference-endpoints/foo"
        );
        assert_eq!(
            template_resource_path(),
            "/organizations/{organization_name}/inference-endpoints/{inference_endpoint_name}"
        );
    }
}
