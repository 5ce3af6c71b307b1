//! Integration tests for the OpenAPI spec tools.
//!
//! Each test copies the SaladCloud fixture spec into a temp directory and
//! runs the file-level entry points against it.

use std::fs;
use std::path::{Path, PathBuf};

use docsmith_lib::openapi::refs::dangling_refs;
use docsmith_lib::{
    EndpointConfig, HeaderParameter, SpliceError, add_endpoint_to_spec, add_header_to_file,
    add_security_to_file, create_endpoint_spec,
};
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

const FIXTURE: &str = include_str!("fixtures/salad-cloud.json");

const FOO_ROOT: &str = "/organizations/{organization_name}/inference-endpoints/foo";
const TEMPLATE_ROOT: &str =
    "/organizations/{organization_name}/inference-endpoints/{inference_endpoint_name}";

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Writes the base spec, input/output fragments and an endpoint config for
/// the `foo` endpoint.
fn endpoint_workspace(base: &str) -> (TempDir, EndpointConfig) {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("api-specs")).unwrap();
    fs::write(dir.path().join("api-specs/salad-cloud.json"), base).unwrap();
    fs::write(
        dir.path().join("input.json"),
        r#"{"type": "object", "properties": {"url": {"type": "string"}}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("output.yaml"),
        "type: object\nproperties:\n  text:\n    type: string\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("foo.json"),
        r#"{
            "baseSchema": "api-specs/salad-cloud.json",
            "inputSchema": "input.json",
            "outputSchema": "output.yaml",
            "endpointId": "foo",
            "endpointName": "Foo Transcription",
            "schemaName": "Foo"
        }"#,
    )
    .unwrap();

    let config = EndpointConfig::load(Path::new("foo.json"), dir.path()).unwrap();
    (dir, config)
}

#[test]
fn add_endpoint_names_every_component_after_schema_name() {
    let (_dir, config) = endpoint_workspace(FIXTURE);
    let report = add_endpoint_to_spec(&config).unwrap();
    let spec = read_json(&config.base_schema);

    for name in ["FooInput", "FooOutput", "FooJob", "CreateFooJob", "FooJobList"] {
        assert!(spec["components"]["schemas"].get(name).is_some(), "missing schema {name}");
    }
    for name in ["ListFooJob", "GetFooJob", "CreateFooJob"] {
        assert!(spec["components"]["responses"].get(name).is_some(), "missing response {name}");
    }
    assert!(spec["components"]["requestBodies"].get("CreateFooJob").is_some());
    assert_eq!(
        spec["components"]["schemas"]["FooOutput"],
        json!({"type": "object", "properties": {"text": {"type": "string"}}})
    );
    assert_eq!(report.paths.len(), 3);
    assert!(report.overwritten.is_empty());
}

#[test]
fn add_endpoint_wires_references_to_the_new_components() {
    let (_dir, config) = endpoint_workspace(FIXTURE);
    add_endpoint_to_spec(&config).unwrap();
    let spec = read_json(&config.base_schema);
    let schemas = &spec["components"]["schemas"];
    let paths = &spec["paths"];

    assert_eq!(schemas["FooJob"]["properties"]["input"]["$ref"], "#/components/schemas/FooInput");
    assert_eq!(schemas["FooJob"]["properties"]["output"]["$ref"], "#/components/schemas/FooOutput");
    assert_eq!(
        schemas["CreateFooJob"]["properties"]["input"]["$ref"],
        "#/components/schemas/FooInput"
    );
    assert_eq!(
        schemas["FooJobList"]["properties"]["items"]["items"]["$ref"],
        "#/components/schemas/FooJob"
    );
    assert_eq!(
        spec["components"]["requestBodies"]["CreateFooJob"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/CreateFooJob"
    );

    let jobs = &paths[format!("{FOO_ROOT}/jobs")];
    assert_eq!(jobs["get"]["responses"]["200"]["$ref"], "#/components/responses/ListFooJob");
    assert_eq!(jobs["post"]["requestBody"]["$ref"], "#/components/requestBodies/CreateFooJob");
    assert_eq!(jobs["post"]["responses"]["201"]["$ref"], "#/components/responses/CreateFooJob");
    assert_eq!(jobs["get"]["summary"], "List jobs for Foo Transcription");

    let job = &paths[format!("{FOO_ROOT}/jobs/{{job_id}}")];
    assert_eq!(job["get"]["responses"]["200"]["$ref"], "#/components/responses/GetFooJob");
    assert_eq!(
        job["parameters"],
        json!([
            {"$ref": "#/components/parameters/organization_name"},
            {
                "name": "job_id",
                "in": "path",
                "required": true,
                "schema": {"type": "string", "format": "uuid"}
            }
        ])
    );

    assert!(dangling_refs(&spec).is_empty(), "{:?}", dangling_refs(&spec));
}

#[test]
fn add_endpoint_leaves_templates_untouched() {
    let (_dir, config) = endpoint_workspace(FIXTURE);
    let before: Value = serde_json::from_str(FIXTURE).unwrap();
    add_endpoint_to_spec(&config).unwrap();
    let after = read_json(&config.base_schema);

    for name in ["InferenceEndpointJob", "CreateInferenceEndpointJob", "InferenceEndpointJobList"] {
        assert_eq!(after["components"]["schemas"][name], before["components"]["schemas"][name]);
    }
    for suffix in ["", "/jobs", "/jobs/{inference_endpoint_job_id}"] {
        let path = format!("{TEMPLATE_ROOT}{suffix}");
        assert_eq!(after["paths"][&path], before["paths"][&path], "{path}");
    }
}

#[test]
fn missing_template_leaves_base_spec_unchanged() {
    let mut base: Value = serde_json::from_str(FIXTURE).unwrap();
    base["components"]["schemas"]
        .as_object_mut()
        .unwrap()
        .remove("InferenceEndpointJobList");
    let content = serde_json::to_string_pretty(&base).unwrap();
    let (_dir, config) = endpoint_workspace(&content);

    let err = add_endpoint_to_spec(&config).unwrap_err();

    assert!(matches!(
        err,
        SpliceError::MissingTemplate { ref name, .. } if name == "InferenceEndpointJobList"
    ));
    assert_eq!(fs::read_to_string(&config.base_schema).unwrap(), content);
}

#[test]
fn standalone_spec_holds_only_the_endpoint() {
    let (dir, config) = endpoint_workspace(FIXTURE);
    let (path, report) = create_endpoint_spec(&config).unwrap();

    assert_eq!(path, dir.path().join("api-specs/foo.json"));
    assert_eq!(
        fs::read_to_string(dir.path().join("api-specs/salad-cloud.json")).unwrap(),
        FIXTURE
    );

    let spec = read_json(&path);
    assert_eq!(spec["info"]["title"], "Foo Transcription");
    assert_eq!(spec["info"]["description"], "API for Foo Transcription");

    let mut paths: Vec<&String> = spec["paths"].as_object().unwrap().keys().collect();
    paths.sort();
    assert_eq!(
        paths,
        [
            FOO_ROOT.to_string(),
            format!("{FOO_ROOT}/jobs"),
            format!("{FOO_ROOT}/jobs/{{job_id}}"),
        ]
        .iter()
        .collect::<Vec<_>>()
    );

    assert_eq!(
        report.pruned,
        ["requestBodies/CreateContainerGroup", "responses/ListContainerGroups"]
    );
    let responses = spec["components"]["responses"].as_object().unwrap();
    for kept in ["404", "UnknownError", "GetInferenceEndpoint", "ListFooJob", "GetFooJob"] {
        assert!(responses.contains_key(kept), "{kept} should survive the prune");
    }
    assert!(dangling_refs(&spec).is_empty(), "{:?}", dangling_refs(&spec));
}

#[test]
fn header_pass_on_yaml_spec_is_idempotent() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("imds.yaml");
    fs::write(
        &input,
        "openapi: 3.0.0\npaths:\n  /v1/status:\n    get:\n      responses:\n        200:\n          description: OK\n",
    )
    .unwrap();

    let report = add_header_to_file(&input, None, &HeaderParameter::default(), false).unwrap();
    assert_eq!(report.added.len(), 1);
    let written = fs::read_to_string(&input).unwrap();
    assert!(written.contains("name: Metadata"), "{written}");

    let again = add_header_to_file(&input, None, &HeaderParameter::default(), false).unwrap();
    assert!(!again.changed());
    assert_eq!(fs::read_to_string(&input).unwrap(), written);
}

#[test]
fn header_dry_run_and_separate_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("imds.json");
    let original = r#"{"paths": {"/v1/token": {"post": {}}}}"#;
    fs::write(&input, original).unwrap();
    let output: PathBuf = dir.path().join("out/imds.json");

    add_header_to_file(&input, Some(&output), &HeaderParameter::default(), true).unwrap();
    assert!(!output.exists());

    add_header_to_file(&input, Some(&output), &HeaderParameter::default(), false).unwrap();
    assert_eq!(fs::read_to_string(&input).unwrap(), original);
    let spec = read_json(&output);
    assert_eq!(spec["paths"]["/v1/token"]["post"]["parameters"][0]["in"], "header");
}

#[test]
fn security_injection_rewrites_target_in_its_own_format() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("salad-cloud.json");
    fs::write(&base, FIXTURE).unwrap();
    let target = dir.path().join("transcription.yaml");
    fs::write(&target, "openapi: 3.0.0\ninfo:\n  title: Transcription\npaths: {}\n").unwrap();

    let scheme = add_security_to_file(&target, &base).unwrap();
    assert_eq!(scheme, "ApiKeyAuth");

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("securitySchemes:"), "{written}");
    assert!(written.contains("Salad-Api-Key"), "{written}");
    assert!(written.starts_with("openapi:"), "{written}");
}
