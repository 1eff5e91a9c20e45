use tracing::{debug, warn};

use super::compile_template::compile;
use super::resolve_field::FieldResolver;
use crate::entities::{
    BindingPlan, BodySource, Element, FieldChain, FieldDefinition, FieldKind, FieldPath,
    GeneratorOptions, MethodDefinition, OneofGroup, PlannedSegment, QueryParameter, QueryShape,
    ResponseShape, Schema, Segment, TypeId, Verb,
};
use crate::error::PlanError;

/// Computes the [`BindingPlan`] of methods of one schema
///
/// A planner owns a [`FieldResolver`] whose cache is shared by every method
/// it plans, so it can be used from several threads at once.
pub struct Planner<'s> {
    resolver: FieldResolver<'s>,
    options: GeneratorOptions,
}

impl<'s> Planner<'s> {
    pub fn new(schema: &'s Schema, options: GeneratorOptions) -> Self {
        Self {
            resolver: FieldResolver::new(schema),
            options,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Plan how `method` maps onto HTTP
    ///
    /// Path variables must resolve to scalars. A named body selector must be
    /// a singular message field that shares nothing with the path. Every
    /// other field reachable through singular messages becomes a query
    /// parameter unless the body is the whole request.
    pub fn plan(&self, method: &MethodDefinition) -> Result<BindingPlan, PlanError> {
        let rule = method.effective_rule();
        let template = compile(&rule.path)?;

        let mut path = Vec::with_capacity(template.segments().len());
        for segment in template.segments() {
            path.push(match segment {
                Segment::Literal(text) => PlannedSegment::Literal(text.clone()),
                Segment::Variable(field) => PlannedSegment::Field {
                    chain: self.resolver.resolve_scalar(method.request, field)?,
                    wildcard: false,
                },
                Segment::Wildcard { path: field, .. } => PlannedSegment::Field {
                    chain: self.resolver.resolve_scalar(method.request, field)?,
                    wildcard: true,
                },
            });
        }
        let path_fields: Vec<FieldPath> = path
            .iter()
            .filter_map(|segment| match segment {
                PlannedSegment::Field { chain, .. } => Some(chain.path().clone()),
                PlannedSegment::Literal(_) => None,
            })
            .collect();
        for (index, field) in path_fields.iter().enumerate() {
            if path_fields[..index].contains(field) {
                return Err(PlanError::MalformedTemplate {
                    template: rule.path.clone(),
                    reason: format!("variable `{}` bound twice", field),
                });
            }
        }

        let body = self.plan_body(method, rule.verb, &rule.body, &path_fields)?;

        let query = match &body {
            BodySource::WholeRequest => Vec::new(),
            BodySource::None | BodySource::Field(_) => {
                let mut excluded = path_fields;
                if let BodySource::Field(chain) = &body {
                    excluded.push(chain.path().clone());
                }
                let mut query = Vec::new();
                let mut stack = vec![method.request];
                self.collect_query(
                    method.request,
                    method.request,
                    &[],
                    &excluded,
                    &mut stack,
                    &mut query,
                );
                query
            }
        };

        let mut oneofs = Vec::new();
        let mut stack = vec![method.request];
        self.collect_oneofs(method.request, method.request, &[], &mut stack, &mut oneofs);

        let response = if method.server_streaming {
            ResponseShape::Stream(method.response)
        } else {
            ResponseShape::Unary(method.response)
        };

        debug!(
            service = %method.service,
            method = %method.name,
            verb = %rule.verb,
            path = %rule.path,
            query_parameters = query.len(),
            oneofs = oneofs.len(),
            "planned binding"
        );

        Ok(BindingPlan {
            service: method.service.clone(),
            method: method.name.clone(),
            verb: rule.verb,
            request: method.request,
            path,
            body,
            query,
            oneofs,
            response,
            naming: self.options.naming,
        })
    }

    fn plan_body(
        &self,
        method: &MethodDefinition,
        verb: Verb,
        selector: &str,
        path_fields: &[FieldPath],
    ) -> Result<BodySource, PlanError> {
        if verb == Verb::Get {
            if !selector.is_empty() {
                warn!(
                    service = %method.service,
                    method = %method.name,
                    body = selector,
                    "GET bindings carry no body, ignoring body selector"
                );
            }
            return Ok(BodySource::None);
        }

        match selector {
            "" => Ok(BodySource::None),
            "*" => Ok(BodySource::WholeRequest),
            selector => {
                let chain = self.resolver.resolve_dotted(method.request, selector)?;
                if chain.leaf().kind.message_type().is_none() {
                    return Err(PlanError::ConflictingBinding(format!(
                        "body selector `{}` of {}/{} does not name a message field",
                        selector, method.service, method.name
                    )));
                }
                if let Some(field) = path_fields.iter().find(|f| f.overlaps(chain.path())) {
                    return Err(PlanError::ConflictingBinding(format!(
                        "`{}` of {}/{} is bound both in the path and by body selector `{}`",
                        field, method.service, method.name, selector
                    )));
                }
                Ok(BodySource::Field(chain))
            }
        }
    }

    fn collect_query(
        &self,
        root: TypeId,
        current: TypeId,
        trail: &[FieldDefinition],
        excluded: &[FieldPath],
        stack: &mut Vec<TypeId>,
        out: &mut Vec<QueryParameter>,
    ) {
        let Some(message) = self.resolver.schema().message(current) else {
            return;
        };

        for field in &message.fields {
            let mut fields = trail.to_vec();
            fields.push(field.clone());
            let path = field_path(&fields);
            if excluded.contains(&path) {
                continue;
            }

            let shape = match field.kind {
                FieldKind::Scalar(_) => QueryShape::Scalar,
                FieldKind::Repeated(Element::Scalar(_)) => QueryShape::Repeated,
                FieldKind::Map => QueryShape::Map,
                FieldKind::Repeated(Element::Message(_)) => continue,
                FieldKind::Message(nested) => {
                    if stack.contains(&nested) {
                        continue;
                    }
                    stack.push(nested);
                    self.collect_query(root, nested, &fields, excluded, stack, out);
                    stack.pop();
                    continue;
                }
            };

            let chain = FieldChain::new(root, path, fields);
            out.push(QueryParameter {
                key: chain.key(self.options.naming),
                chain,
                shape,
                omit_zero: self.options.omit_zero,
            });
        }
    }

    fn collect_oneofs(
        &self,
        root: TypeId,
        current: TypeId,
        trail: &[FieldDefinition],
        stack: &mut Vec<TypeId>,
        out: &mut Vec<OneofGroup>,
    ) {
        let Some(message) = self.resolver.schema().message(current) else {
            return;
        };

        for (name, members) in message.oneof_groups() {
            if members.is_empty() {
                continue;
            }
            let members = members
                .into_iter()
                .map(|member| {
                    let mut fields = trail.to_vec();
                    fields.push(member.clone());
                    FieldChain::new(root, field_path(&fields), fields)
                })
                .collect();
            let name = trail
                .iter()
                .map(|field| field.name.as_str())
                .chain([name])
                .collect::<Vec<_>>()
                .join(".");
            out.push(OneofGroup { name, members });
        }

        for field in &message.fields {
            let Some(nested) = field.kind.message_type() else {
                continue;
            };
            if stack.contains(&nested) {
                continue;
            }
            let mut fields = trail.to_vec();
            fields.push(field.clone());
            stack.push(nested);
            self.collect_oneofs(root, nested, &fields, stack, out);
            stack.pop();
        }
    }
}

fn field_path(fields: &[FieldDefinition]) -> FieldPath {
    let mut names = fields.iter().map(|field| field.name.as_str());
    let first = FieldPath::root(names.next().unwrap_or_default());
    names.fold(first, |path, name| path.child(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        FieldDefinition, HttpRule, MessageType, NamingPolicy, ScalarKind, ServiceDefinition,
    };

    struct Fixture {
        schema: Schema,
        post: TypeId,
        nested: TypeId,
        node: TypeId,
        a: TypeId,
    }

    fn fixture() -> Fixture {
        let mut builder = Schema::builder();
        let nested = builder.message(MessageType::new("PostRequest.Nested", "service.proto").with_package("main"));
        let post = builder.message(MessageType::new("PostRequest", "service.proto").with_package("main"));
        let node = builder.message(MessageType::new("TreeNode", "service.proto").with_package("main"));
        let a = builder.message(MessageType::new("A", "service.proto").with_package("main"));
        let b = builder.message(MessageType::new("B", "service.proto").with_package("main"));
        builder
            .fields(
                nested,
                [
                    FieldDefinition::scalar("b", ScalarKind::Number),
                    FieldDefinition::scalar("name_camel", ScalarKind::String),
                ],
            )
            .fields(
                post,
                [
                    FieldDefinition::scalar("a", ScalarKind::Number),
                    FieldDefinition::message("req", nested),
                    FieldDefinition::scalar("c", ScalarKind::Number),
                    FieldDefinition::repeated("children", Element::Message(node)),
                ],
            )
            .fields(
                node,
                [
                    FieldDefinition::scalar("value", ScalarKind::String),
                    FieldDefinition::message("child", node),
                ],
            )
            .fields(
                a,
                [
                    FieldDefinition::scalar("id", ScalarKind::String),
                    FieldDefinition::message("b", b),
                ],
            )
            .fields(
                b,
                [
                    FieldDefinition::scalar("label", ScalarKind::String),
                    FieldDefinition::message("a", a),
                ],
            );
        Fixture {
            schema: builder.build().unwrap(),
            post,
            nested,
            node,
            a,
        }
    }

    fn method(request: TypeId, response: TypeId, rule: HttpRule) -> MethodDefinition {
        ServiceDefinition::new("CounterService")
            .with_package("main")
            .with_method(MethodDefinition::new("Call", request, response).with_http(rule))
            .methods
            .remove(0)
    }

    fn query_keys(plan: &BindingPlan) -> Vec<&str> {
        plan.query.iter().map(|q| q.key.as_str()).collect()
    }

    #[test]
    fn test_plan_named_body_excludes_body_and_path_from_query() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let plan = planner
            .plan(&method(fixture.post, fixture.nested, HttpRule::post("/post/{a}").with_body("req")))
            .unwrap();

        assert_eq!(plan.path_template(), "/post/{a}");
        assert_eq!(plan.body_field().map(ToString::to_string), Some("req".to_string()));
        assert_eq!(query_keys(&plan), vec!["c"]);
    }

    #[test]
    fn test_plan_whole_request_body_has_no_query() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let plan = planner
            .plan(&method(fixture.post, fixture.nested, HttpRule::post("/post/{a}/{c}").with_body("*")))
            .unwrap();

        assert_eq!(plan.body, BodySource::WholeRequest);
        assert!(plan.query.is_empty());
        assert_eq!(plan.path_fields().count(), 2);
    }

    #[test]
    fn test_plan_nested_path_variable_keeps_siblings_in_query() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let plan = planner
            .plan(&method(fixture.post, fixture.nested, HttpRule::get("/api/{req.name_camel}:hello")))
            .unwrap();

        assert_eq!(plan.path_template(), "/api/{req.nameCamel}:hello");
        assert_eq!(query_keys(&plan), vec!["a", "req.b", "c"]);
        assert_eq!(plan.body, BodySource::None);
    }

    #[test]
    fn test_plan_get_ignores_body_selector() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let plan = planner
            .plan(&method(fixture.post, fixture.nested, HttpRule::get("/api/{a}").with_body("*")))
            .unwrap();

        assert_eq!(plan.body, BodySource::None);
        assert_eq!(query_keys(&plan), vec!["req.b", "req.nameCamel", "c"]);
    }

    #[test]
    fn test_plan_repeated_message_not_query_eligible() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let plan = planner
            .plan(&method(fixture.post, fixture.nested, HttpRule::delete("/post/{a}")))
            .unwrap();

        assert!(!query_keys(&plan).iter().any(|key| key.starts_with("children")));
    }

    #[test]
    fn test_plan_proto_names() {
        let fixture = fixture();
        let options = GeneratorOptions::default().with_naming(NamingPolicy::ProtoName);
        let planner = Planner::new(&fixture.schema, options);
        let plan = planner
            .plan(&method(fixture.post, fixture.nested, HttpRule::get("/api/{req.name_camel}")))
            .unwrap();

        assert_eq!(plan.path_template(), "/api/{req.name_camel}");
        assert_eq!(plan.naming, NamingPolicy::ProtoName);
    }

    #[test]
    fn test_plan_conflicting_path_and_body() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let result = planner.plan(&method(
            fixture.post,
            fixture.nested,
            HttpRule::post("/post/{req.b}").with_body("req"),
        ));
        assert!(matches!(result, Err(PlanError::ConflictingBinding(_))));
    }

    #[test]
    fn test_plan_scalar_body_selector_is_rejected() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let result = planner.plan(&method(
            fixture.post,
            fixture.nested,
            HttpRule::post("/post").with_body("c"),
        ));
        assert!(matches!(result, Err(PlanError::ConflictingBinding(_))));
    }

    #[test]
    fn test_plan_errors_propagate() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());

        assert!(matches!(
            planner.plan(&method(fixture.post, fixture.nested, HttpRule::get("/post/{a"))),
            Err(PlanError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            planner.plan(&method(fixture.post, fixture.nested, HttpRule::get("/post/{missing}"))),
            Err(PlanError::UnknownField { .. })
        ));
        assert!(matches!(
            planner.plan(&method(fixture.post, fixture.nested, HttpRule::get("/post/{req}"))),
            Err(PlanError::ResolutionNotScalar { .. })
        ));
        assert!(matches!(
            planner.plan(&method(fixture.post, fixture.nested, HttpRule::post("/post").with_body("nope"))),
            Err(PlanError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_plan_rejects_field_bound_twice_under_both_names() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let result = planner.plan(&method(
            fixture.post,
            fixture.nested,
            HttpRule::get("/{req.name_camel}/{req.nameCamel}"),
        ));
        match result {
            Err(PlanError::MalformedTemplate { reason, .. }) => {
                assert_eq!(reason, "variable `req.name_camel` bound twice");
            }
            other => panic!("expected a malformed template, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_collects_oneof_groups_through_nested_messages() {
        let mut builder = Schema::builder();
        let entry = builder.message(MessageType::new("LogEntry", "log.proto").with_oneof("payload"));
        let request = builder.message(MessageType::new("PushLogRequest", "log.proto").with_oneof("source_detail"));
        builder
            .fields(
                entry,
                [
                    FieldDefinition::scalar("text", ScalarKind::String).in_oneof(0),
                    FieldDefinition::scalar("code", ScalarKind::Number).in_oneof(0),
                    FieldDefinition::message("parent", entry),
                ],
            )
            .fields(
                request,
                [
                    FieldDefinition::scalar("service", ScalarKind::String).in_oneof(0),
                    FieldDefinition::scalar("application", ScalarKind::String).in_oneof(0),
                    FieldDefinition::message("entry", entry),
                    FieldDefinition::repeated("history", Element::Message(entry)),
                ],
            );
        let schema = builder.build().unwrap();
        let planner = Planner::new(&schema, GeneratorOptions::default());
        let plan = planner
            .plan(&method(request, request, HttpRule::post("/log").with_body("entry")))
            .unwrap();

        let groups: Vec<(&str, Vec<String>)> = plan
            .oneofs
            .iter()
            .map(|group| {
                (
                    group.name.as_str(),
                    group.members.iter().map(|m| m.path().to_string()).collect(),
                )
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                ("source_detail", vec!["service".to_string(), "application".to_string()]),
                ("entry.payload", vec!["entry.text".to_string(), "entry.code".to_string()]),
            ]
        );
        assert_eq!(query_keys(&plan), vec!["service", "application"]);
    }

    #[test]
    fn test_plan_terminates_on_cycles() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());

        let plan = planner
            .plan(&method(fixture.node, fixture.node, HttpRule::get("/tree")))
            .unwrap();
        assert_eq!(query_keys(&plan), vec!["value"]);

        let plan = planner
            .plan(&method(fixture.a, fixture.a, HttpRule::get("/a/{b.label}")))
            .unwrap();
        assert_eq!(query_keys(&plan), vec!["id"]);
    }

    #[test]
    fn test_plan_default_binding_and_streaming() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let method = ServiceDefinition::new("CounterService")
            .with_package("main")
            .with_method(MethodDefinition::new("StreamingIncrements", fixture.post, fixture.nested).server_streaming())
            .methods
            .remove(0);
        let plan = planner.plan(&method).unwrap();

        assert_eq!(plan.verb, Verb::Post);
        assert_eq!(plan.path_template(), "/main.CounterService/StreamingIncrements");
        assert_eq!(plan.body, BodySource::WholeRequest);
        assert_eq!(plan.response, ResponseShape::Stream(fixture.nested));
        assert!(plan.is_streaming());
    }

    #[test]
    fn test_plan_is_idempotent() {
        let fixture = fixture();
        let planner = Planner::new(&fixture.schema, GeneratorOptions::default());
        let method = method(fixture.post, fixture.nested, HttpRule::patch("/post/{a}").with_body("req"));
        assert_eq!(planner.plan(&method).unwrap(), planner.plan(&method).unwrap());
    }
}
