//! Counter service example for gateway-binding-planner
//!
//! This example shows how to:
//! - Describe a service and its messages with the schema builder
//! - Generate the binding plan document with the JSON emitter
//! - Render concrete HTTP requests from the plans
//!
//! Run with `LOG_LEVEL=debug` to see every planned binding.

use gateway_binding_planner::prelude::*;

fn main() -> Result<(), GeneratorError> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Messages are declared first, fields may then reference any of them
    let mut builder = Schema::builder();
    let post_request = builder.message(MessageType::new("PostRequest", "service.proto").with_package("main"));
    let http_post_request = builder.message(MessageType::new("HttpPostRequest", "service.proto").with_package("main"));
    let zero_value_msg = builder.message(MessageType::new("ZeroValueMsg", "service.proto").with_package("main"));
    let query_request = builder.message(
        MessageType::new("HTTPGetWithZeroValueURLSearchParamsRequest", "service.proto").with_package("main"),
    );

    builder
        .field(post_request, FieldDefinition::scalar("b", ScalarKind::Number))
        .fields(
            http_post_request,
            [
                FieldDefinition::scalar("a", ScalarKind::Number),
                FieldDefinition::message("req", post_request),
                FieldDefinition::scalar("c", ScalarKind::Number),
            ],
        )
        .fields(
            zero_value_msg,
            [
                FieldDefinition::scalar("c", ScalarKind::Number),
                FieldDefinition::repeated("d", Element::Scalar(ScalarKind::Number)),
                FieldDefinition::scalar("e", ScalarKind::Boolean),
            ],
        )
        .fields(
            query_request,
            [
                FieldDefinition::scalar("a", ScalarKind::String),
                FieldDefinition::scalar("b", ScalarKind::String),
                FieldDefinition::message("zero_value_msg", zero_value_msg),
            ],
        );

    builder.service(
        ServiceDefinition::new("CounterService")
            .with_package("main")
            .with_methods([
                MethodDefinition::new("HTTPPostWithNestedBodyPath", http_post_request, post_request)
                    .with_http(HttpRule::post("/post/{a}").with_body("req")),
                MethodDefinition::new("HTTPPostWithStarBodyPath", http_post_request, post_request)
                    .with_http(HttpRule::post("/post/{a}/{c}").with_body("*")),
                MethodDefinition::new("HTTPGetWithZeroValueURLSearchParams", query_request, query_request)
                    .with_http(HttpRule::get("/path/query")),
            ]),
    );
    let schema = builder.build()?;

    // The language-neutral document an emission backend would consume
    let document = GenerationBuilder::new()
        .schema(&schema)
        .emitter(Json::new())
        .execute()?;
    let pretty = serde_json::to_string_pretty(&document.output)
        .map_err(|e| GeneratorError::EmitError(e.to_string()))?;
    println!("{}\n", pretty);

    // The same plans applied to request values
    let report = GenerationBuilder::new()
        .schema(&schema)
        .emitter(DefaultEmitter)
        .execute()?;
    let requests = [
        json!({"a": 10, "req": {"b": 15}}),
        json!({"a": 10, "req": {"b": 15}, "c": 23}),
        json!({"a": "A", "b": "", "zeroValueMsg": {"c": 1, "d": [1, 0, 2], "e": false}}),
    ];
    for (plan, request) in report.output.iter().zip(requests.iter()) {
        let rendered = render(plan, request)?;
        println!("{} {} {}", plan.method, rendered.verb, rendered.path_and_query());
        if let Some(body) = &rendered.body {
            println!("    body: {}", body);
        }
    }

    Ok(())
}
