//! Component names derived from an endpoint's schema name.

use serde::Serialize;

/// Names of every component generated for one endpoint.
///
/// With a schema name of `Foo`:
///
/// | field             | name           | section                      |
/// |-------------------|----------------|------------------------------|
/// | `input`           | `FooInput`     | schemas                      |
/// | `output`          | `FooOutput`    | schemas                      |
/// | `job`             | `FooJob`       | schemas                      |
/// | `create_job`      | `CreateFooJob` | schemas, requestBodies, responses |
/// | `job_list`        | `FooJobList`   | schemas                      |
/// | `list_response`   | `ListFooJob`   | responses                    |
/// | `get_response`    | `GetFooJob`    | responses                    |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointNames {
    pub input: String,
    pub output: String,
    pub job: String,
    pub create_job: String,
    pub job_list: String,
    pub list_response: String,
    pub get_response: String,
}

impl EndpointNames {
    pub fn new(schema_name: &str) -> Self {
        let job = format!("{schema_name}Job");
        Self {
            input: format!("{schema_name}Input"),
            output: format!("{schema_name}Output"),
            create_job: format!("Create{job}"),
            job_list: format!("{job}List"),
            list_response: format!("List{job}"),
            get_response: format!("Get{job}"),
            job,
        }
    }

    /// Names of the request bodies and responses created for the endpoint.
    pub fn bodies_and_responses(&self) -> [&str; 3] {
        [
            self.create_job.as_str(),
            self.list_response.as_str(),
            self.get_response.as_str(),
        ]
    }
}

/// A `$ref` string pointing into `components`.
pub fn component_ref(section: &str, name: &str) -> String {
    format!("#/components/{section}/{name}")
}
