//! Controller introspection.
//!
//! Turns a [`ControllerDeclaration`] into binding and operation descriptors.
//! Problems are collected rather than returned early so one registration
//! attempt reports everything wrong with a controller.

use heron_core::BindingLocation;
use heron_router::{PathVariables, RouteTemplate};
use http::Method;
use tracing::debug;

use crate::declaration::{
    Bind, ControllerDeclaration, FieldDeclaration, MethodDeclaration, ParamDeclaration, ParamKind,
    PathSpec,
};
use crate::descriptor::{
    BindingDescriptor, Decoder, InstanceBinding, OperationDescriptor, OperationKey,
};
use crate::error::RegistrationProblem;
use crate::types::{DeclaredType, Strategy};

/// Descriptors produced from one declaration.
pub(crate) struct Introspection<C> {
    pub(crate) controller: String,
    pub(crate) instance_bindings: Vec<InstanceBinding<C>>,
    pub(crate) operations: Vec<OperationDescriptor<C>>,
}

/// Builds descriptors for every bound field and every operation method.
///
/// Fields without a binding and methods without an operation annotation are
/// skipped.
pub(crate) fn introspect<C: Send + 'static>(
    declaration: ControllerDeclaration<C>,
    problems: &mut Vec<RegistrationProblem>,
) -> Introspection<C> {
    let ControllerDeclaration {
        name: controller,
        fields,
        methods,
    } = declaration;

    let instance_bindings = fields
        .into_iter()
        .filter_map(|field| instance_binding(field, problems))
        .collect();

    let operations: Vec<_> = methods
        .into_iter()
        .filter_map(|method| operation(method, problems))
        .collect();

    for op in &operations {
        debug!(
            controller = %controller,
            http_method = %op.key.method(),
            path_variables = %op.key.path_variables(),
            handler = %op.method_name,
            positional = op.positional.len(),
            named = op.named.len(),
            "Introspected operation"
        );
    }

    Introspection {
        controller,
        instance_bindings,
        operations,
    }
}

fn instance_binding<C>(
    field: FieldDeclaration<C>,
    problems: &mut Vec<RegistrationProblem>,
) -> Option<InstanceBinding<C>> {
    let bind = field.bind?;

    let type_matches = field.setter_type == field.ty.value_type();
    if !type_matches {
        problems.push(RegistrationProblem::SlotTypeMismatch {
            field: field.name.clone(),
            expected: field.ty.name().to_string(),
            actual: field.setter_type_name.to_string(),
        });
    }

    let decoder = decoder_for(&field.name, &bind, &field.ty, problems)?;
    if !type_matches {
        return None;
    }

    let required = field.required;
    Some(InstanceBinding {
        binding: descriptor(&field.name, bind, field.ty, required, decoder),
        setter: field.setter,
    })
}

fn operation<C>(
    method: MethodDeclaration<C>,
    problems: &mut Vec<RegistrationProblem>,
) -> Option<OperationDescriptor<C>> {
    let MethodDeclaration {
        name,
        operation,
        scopes,
        params,
        handler,
    } = method;
    let operation = operation?;
    let before = problems.len();

    let http_method = Method::from_bytes(operation.http_method().as_bytes())
        .map_err(|_| {
            problems.push(RegistrationProblem::InvalidHttpMethod {
                method: name.clone(),
                verb: operation.http_method().to_string(),
            });
        })
        .ok();

    let path_variables = match operation.path() {
        PathSpec::Variables(names) => Some(names.iter().cloned().collect::<PathVariables>()),
        PathSpec::Route(template) => match RouteTemplate::parse(template) {
            Ok(template) => Some(template.variables().clone()),
            Err(e) => {
                problems.push(RegistrationProblem::InvalidRoute {
                    method: name.clone(),
                    reason: e.to_string(),
                });
                None
            }
        },
    };

    let mut positional = Vec::new();
    let mut named = Vec::new();
    for param in params {
        let kind = param.kind;
        let Some(binding) = parameter_binding(&name, param, problems) else {
            continue;
        };
        match kind {
            ParamKind::Positional => positional.push(binding),
            ParamKind::Named => named.push(binding),
        }
    }

    if handler.is_none() {
        problems.push(RegistrationProblem::MissingHandler {
            method: name.clone(),
        });
    }

    if problems.len() > before {
        return None;
    }

    let mut scopes = scopes;
    scopes.sort();
    scopes.dedup();

    Some(OperationDescriptor {
        key: OperationKey::from_parts(http_method?, path_variables?),
        method_name: name,
        positional,
        named,
        scopes,
        invoke: handler?,
    })
}

fn parameter_binding(
    method: &str,
    param: ParamDeclaration,
    problems: &mut Vec<RegistrationProblem>,
) -> Option<BindingDescriptor> {
    let ParamDeclaration {
        name,
        ty,
        bind,
        kind,
        required,
    } = param;
    let Some(bind) = bind else {
        problems.push(RegistrationProblem::MissingBindingAnnotation {
            method: method.to_string(),
            parameter: name,
        });
        return None;
    };

    let member = format!("{method}({name})");
    let decoder = decoder_for(&member, &bind, &ty, problems)?;
    let required = is_required(bind.location(), kind, &ty, required);
    Some(descriptor(&name, bind, ty, required, decoder))
}

// Path parameters are always required. Otherwise an explicit marker wins, named
// parameters default to optional, and positional ones are required unless they
// bind the body or a list.
fn is_required(
    location: BindingLocation,
    kind: ParamKind,
    ty: &DeclaredType,
    marker: Option<bool>,
) -> bool {
    if location == BindingLocation::Path {
        return true;
    }
    if let Some(required) = marker {
        return required;
    }
    match kind {
        ParamKind::Named => false,
        ParamKind::Positional => !(location == BindingLocation::Body || ty.is_list()),
    }
}

fn descriptor(
    parameter: &str,
    bind: Bind,
    ty: DeclaredType,
    required: bool,
    decoder: Decoder,
) -> BindingDescriptor {
    BindingDescriptor::new(
        parameter,
        bind.name(),
        bind.location(),
        ty,
        required,
        bind.filters().clone(),
        decoder,
    )
}

/// Picks the decoder for a location and type, or records why there is none.
fn decoder_for(
    member: &str,
    bind: &Bind,
    ty: &DeclaredType,
    problems: &mut Vec<RegistrationProblem>,
) -> Option<Decoder> {
    let location = bind.location();
    let filters = bind.filters();
    let mut filters_ok = true;

    if !filters.is_empty() {
        let mut misuse = |reason: String| {
            filters_ok = false;
            problems.push(RegistrationProblem::FilterMisuse {
                member: member.to_string(),
                reason,
            });
        };
        if location != BindingLocation::Body {
            misuse(format!("field filters apply only to body bindings, not {location}"));
        } else if !ty.supports_filters() {
            misuse(format!("type {} does not support field filters", ty.name()));
        }
        let conflicts = filters.conflicts();
        if !conflicts.is_empty() {
            misuse(format!(
                "keys both rejected and required: {}",
                conflicts.join(", ")
            ));
        }
    }

    let decoder = match (location, ty.strategy()) {
        (BindingLocation::Path, Strategy::Param { parse, .. }) => {
            Some(Decoder::Scalar { parse, present: None })
        }
        (BindingLocation::Query | BindingLocation::Header, Strategy::Param { parse, present }) => {
            Some(Decoder::Scalar { parse, present })
        }
        (
            BindingLocation::Query | BindingLocation::Header,
            Strategy::ParamList { parse, present },
        ) => Some(Decoder::List { parse, present }),
        (BindingLocation::Body, Strategy::Read(read)) => Some(Decoder::Read(read)),
        (BindingLocation::Body, Strategy::ReadList(read)) => Some(Decoder::ReadList(read)),
        (BindingLocation::Body, Strategy::Cast(cast)) => Some(Decoder::Cast(cast)),
        _ => {
            problems.push(RegistrationProblem::UnparsableType {
                member: member.to_string(),
                type_name: ty.name().to_string(),
                location,
            });
            None
        }
    };

    decoder.filter(|_| filters_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Operation;
    use heron_core::{HeronResult, Response};

    struct Probe {
        tenant: String,
    }

    #[derive(serde::Deserialize)]
    struct Payload {}

    async fn ok(_probe: Probe, _args: crate::ArgumentSet) -> HeronResult<Response> {
        Ok(Response::default())
    }

    fn method(name: &str, op: Operation) -> MethodDeclaration<Probe> {
        MethodDeclaration::new(name).operation(op).handler(ok)
    }

    fn run(decl: ControllerDeclaration<Probe>) -> (Introspection<Probe>, Vec<RegistrationProblem>) {
        let mut problems = Vec::new();
        let result = introspect(decl, &mut problems);
        (result, problems)
    }

    #[test]
    fn test_non_operation_methods_are_skipped() {
        let decl = ControllerDeclaration::new("Probe")
            .method(MethodDeclaration::new("helper"))
            .method(method("list", Operation::get(Vec::<String>::new())));
        let (result, problems) = run(decl);
        assert!(problems.is_empty());
        assert_eq!(result.operations.len(), 1);
        assert_eq!(result.operations[0].method_name(), "list");
        assert_eq!(result.controller, "Probe");
    }

    #[test]
    fn test_missing_binding_annotation() {
        let decl = ControllerDeclaration::new("Probe").method(
            method("get", Operation::get(["id"]))
                .param(ParamDeclaration::positional("id", DeclaredType::scalar::<i64>())),
        );
        let (result, problems) = run(decl);
        assert!(result.operations.is_empty());
        assert_eq!(
            problems,
            vec![RegistrationProblem::MissingBindingAnnotation {
                method: "get".into(),
                parameter: "id".into(),
            }]
        );
    }

    #[test]
    fn test_unparsable_types() {
        let decl = ControllerDeclaration::new("Probe").method(
            method("get", Operation::get(["id"]))
                .param(
                    ParamDeclaration::positional("id", DeclaredType::opaque::<Probe>())
                        .bind(Bind::path("id")),
                )
                .param(
                    ParamDeclaration::positional("ids", DeclaredType::list::<i64>())
                        .bind(Bind::path("id")),
                )
                .param(
                    ParamDeclaration::named("filter", DeclaredType::structured::<Payload>())
                        .bind(Bind::query("filter")),
                ),
        );
        let (_, problems) = run(decl);
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().all(|p| p.kind() == "unparsable_type"));
        assert_eq!(problems[0].methods(), vec!["get"]);
    }

    #[test]
    fn test_required_defaults() {
        let decl = ControllerDeclaration::new("Probe").method(
            method("put", Operation::put(["id"]))
                .param(
                    ParamDeclaration::positional("id", DeclaredType::scalar::<i64>())
                        .optional()
                        .bind(Bind::path("id")),
                )
                .param(
                    ParamDeclaration::positional("limit", DeclaredType::scalar::<u32>())
                        .bind(Bind::query("limit")),
                )
                .param(
                    ParamDeclaration::positional("tags", DeclaredType::list::<String>())
                        .bind(Bind::query("tag")),
                )
                .param(
                    ParamDeclaration::positional("payload", DeclaredType::structured::<Payload>())
                        .bind(Bind::body()),
                )
                .param(
                    ParamDeclaration::named("trace", DeclaredType::scalar::<String>())
                        .bind(Bind::header("X-Trace")),
                )
                .param(
                    ParamDeclaration::named("mode", DeclaredType::scalar::<String>())
                        .required()
                        .bind(Bind::query("mode")),
                ),
        );
        let (result, problems) = run(decl);
        assert!(problems.is_empty(), "{problems:?}");
        let op = &result.operations[0];
        let required: Vec<bool> = op.positional().iter().map(BindingDescriptor::required).collect();
        assert_eq!(required, vec![true, true, false, false]);
        let named: Vec<bool> = op.named().iter().map(BindingDescriptor::required).collect();
        assert_eq!(named, vec![false, true]);
        assert_eq!(op.named()[0].name(), "x-trace");
    }

    #[test]
    fn test_filter_misuse() {
        let decl = ControllerDeclaration::new("Probe").method(
            method("post", Operation::post(Vec::<String>::new()))
                .param(
                    ParamDeclaration::positional("q", DeclaredType::scalar::<String>())
                        .bind(Bind::query("q").ignore(["a"])),
                )
                .param(
                    ParamDeclaration::positional("payload", DeclaredType::structured::<Payload>())
                        .bind(Bind::body().reject(["id"])),
                ),
        );
        let (result, problems) = run(decl);
        assert!(result.operations.is_empty());
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().all(|p| p.kind() == "filter_misuse"));
    }

    #[test]
    fn test_invalid_verb_and_route() {
        let decl = ControllerDeclaration::new("Probe")
            .method(method("bad_verb", Operation::new("GE T", Vec::<String>::new())))
            .method(method("bad_route", Operation::route("GET", "/things/{}")))
            .method(MethodDeclaration::new("no_handler").operation(Operation::get(["x"])));
        let (result, problems) = run(decl);
        assert!(result.operations.is_empty());
        let kinds: Vec<_> = problems.iter().map(RegistrationProblem::kind).collect();
        assert_eq!(kinds, vec!["invalid_http_method", "invalid_route", "missing_handler"]);
    }

    #[test]
    fn test_route_template_variables() {
        let decl = ControllerDeclaration::new("Probe")
            .method(method("get", Operation::route("get", "/things/:id/parts/{part}")));
        let (result, problems) = run(decl);
        assert!(problems.is_empty());
        let key = result.operations[0].key();
        assert_eq!(key, &OperationKey::new(Method::GET, ["part", "id"]));
    }

    #[test]
    fn test_field_bindings() {
        let decl = ControllerDeclaration::new("Probe")
            .field(
                FieldDeclaration::new("tenant", DeclaredType::scalar::<String>(), |p: &mut Probe, v: String| {
                    p.tenant = v;
                })
                .bind(Bind::header("x-tenant"))
                .required(),
            )
            .field(FieldDeclaration::new(
                "unbound",
                DeclaredType::scalar::<String>(),
                |_: &mut Probe, _: String| {},
            ))
            .field(
                FieldDeclaration::new("wrong", DeclaredType::scalar::<u32>(), |_: &mut Probe, _: String| {})
                    .bind(Bind::query("wrong")),
            );
        let (result, problems) = run(decl);
        assert_eq!(result.instance_bindings.len(), 1);
        assert!(result.instance_bindings[0].binding().required());
        assert_eq!(
            problems,
            vec![RegistrationProblem::SlotTypeMismatch {
                field: "wrong".into(),
                expected: "u32".into(),
                actual: "alloc::string::String".into(),
            }]
        );
    }

    #[test]
    fn test_scopes_sorted_and_deduplicated() {
        let decl = ControllerDeclaration::new("Probe").method(
            method("list", Operation::get(Vec::<String>::new())).scopes(["b", "a", "b"]),
        );
        let (result, _) = run(decl);
        let scopes: Vec<_> = result.operations[0].scopes().iter().map(|s| s.as_str()).collect();
        assert_eq!(scopes, vec!["a", "b"]);
    }
}
