//! Controller declarations.
//!
//! A controller describes itself to the engine through a
//! [`ControllerDeclaration`]: an explicit table of its bound fields and its
//! methods, each method with its [`Operation`] annotation, parameters and
//! handler closure. The introspector reads nothing but this table.
//!
//! ```rust
//! use heron_controller::{
//!     ArgumentSet, Bind, ControllerDeclaration, DeclaredType, FieldDeclaration,
//!     MethodDeclaration, Operation, ParamDeclaration,
//! };
//! use heron_core::{HeronResult, Response};
//!
//! #[derive(Default)]
//! struct Things {
//!     tenant: Option<String>,
//! }
//!
//! async fn get_thing(things: Things, mut args: ArgumentSet) -> HeronResult<Response> {
//!     let id: i64 = args.take(0)?;
//!     Ok(Response::new(format!("{id} for {:?}", things.tenant).into()))
//! }
//!
//! let declaration = ControllerDeclaration::<Things>::new("Things")
//!     .field(
//!         FieldDeclaration::new("tenant", DeclaredType::scalar::<String>(), |c: &mut Things, v: String| {
//!             c.tenant = Some(v);
//!         })
//!         .bind(Bind::header("x-tenant")),
//!     )
//!     .method(
//!         MethodDeclaration::new("get_thing")
//!             .operation(Operation::get(["id"]))
//!             .param(ParamDeclaration::positional("id", DeclaredType::scalar::<i64>()).bind(Bind::path("id")))
//!             .handler(get_thing),
//!     );
//!
//! assert_eq!(declaration.methods().len(), 1);
//! ```

use std::any::{type_name, TypeId};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use heron_core::{BindingLocation, HeronError, HeronResult, Response, Scope};
use heron_extract::FieldFilters;

use crate::binder::ArgumentSet;
use crate::types::{Decoded, DeclaredType};

/// Wire name of the body binding.
pub const BODY_BINDING_NAME: &str = "body";

/// Future returned by an operation handler.
pub type HandlerFuture = BoxFuture<'static, HeronResult<Response>>;

/// Type-erased operation handler.
pub type Handler<C> = Arc<dyn Fn(C, ArgumentSet) -> HandlerFuture + Send + Sync>;

pub(crate) type SlotSetter<C> = Arc<dyn Fn(&mut C, Decoded) -> HeronResult<()> + Send + Sync>;

/// Types that declare themselves as controllers.
pub trait Controller: Send + Sized + 'static {
    /// Returns the controller's declaration table.
    fn declare() -> ControllerDeclaration<Self>;
}

/// Where a parameter or field takes its value from.
///
/// # Example
///
/// ```rust
/// use heron_controller::Bind;
/// use heron_core::BindingLocation;
///
/// let bind = Bind::body().ignore(["id"]).require(["name"]);
/// assert_eq!(bind.location(), BindingLocation::Body);
/// assert_eq!(bind.filters().required(), ["name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bind {
    location: BindingLocation,
    name: String,
    filters: FieldFilters,
}

impl Bind {
    fn new(location: BindingLocation, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            filters: FieldFilters::new(),
        }
    }

    /// Binds a path variable.
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(BindingLocation::Path, name)
    }

    /// Binds a query parameter. Keys are case-sensitive.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(BindingLocation::Query, name)
    }

    /// Binds a header. Names are case-insensitive.
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(BindingLocation::Header, name.into().to_ascii_lowercase())
    }

    /// Binds the request body.
    #[must_use]
    pub fn body() -> Self {
        Self::new(BindingLocation::Body, BODY_BINDING_NAME)
    }

    /// Drops body keys before reading.
    #[must_use]
    pub fn ignore<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = self.filters.ignore(keys);
        self
    }

    /// Fails the bind when any of these body keys is present.
    #[must_use]
    pub fn reject<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = self.filters.reject(keys);
        self
    }

    /// Fails the bind when any of these body keys is absent.
    #[must_use]
    pub fn require<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = self.filters.require(keys);
        self
    }

    /// Returns the location.
    #[must_use]
    pub fn location(&self) -> BindingLocation {
        self.location
    }

    /// Returns the wire name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the body field filters.
    #[must_use]
    pub fn filters(&self) -> &FieldFilters {
        &self.filters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSpec {
    Variables(Vec<String>),
    Route(String),
}

/// Marks a method as an operation: an HTTP method plus the path variables
/// it handles.
///
/// # Example
///
/// ```rust
/// use heron_controller::Operation;
///
/// let list = Operation::get(Vec::<String>::new());
/// let one = Operation::route("GET", "/things/{id}");
/// assert_eq!(list.http_method(), "GET");
/// assert_eq!(one.http_method(), "GET");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    http_method: String,
    path: PathSpec,
}

impl Operation {
    /// Declares an operation for `method` and a set of path variables.
    ///
    /// The method is upper-cased; validity is checked at registration.
    #[must_use]
    pub fn new<I, S>(method: &str, path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            http_method: method.to_ascii_uppercase(),
            path: PathSpec::Variables(path_variables.into_iter().map(Into::into).collect()),
        }
    }

    /// Declares an operation whose path variables come from a route template
    /// such as `/things/{id}` or `/things/:id`.
    #[must_use]
    pub fn route(method: &str, template: impl Into<String>) -> Self {
        Self {
            http_method: method.to_ascii_uppercase(),
            path: PathSpec::Route(template.into()),
        }
    }

    /// `GET` with the given path variables.
    #[must_use]
    pub fn get<I, S>(path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("GET", path_variables)
    }

    /// `POST` with the given path variables.
    #[must_use]
    pub fn post<I, S>(path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("POST", path_variables)
    }

    /// `PUT` with the given path variables.
    #[must_use]
    pub fn put<I, S>(path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("PUT", path_variables)
    }

    /// `PATCH` with the given path variables.
    #[must_use]
    pub fn patch<I, S>(path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("PATCH", path_variables)
    }

    /// `DELETE` with the given path variables.
    #[must_use]
    pub fn delete<I, S>(path_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("DELETE", path_variables)
    }

    /// Returns the upper-cased HTTP method.
    #[must_use]
    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    pub(crate) fn path(&self) -> &PathSpec {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKind {
    Positional,
    Named,
}

/// One parameter of an operation method.
#[derive(Debug, Clone)]
pub struct ParamDeclaration {
    pub(crate) name: String,
    pub(crate) ty: DeclaredType,
    pub(crate) bind: Option<Bind>,
    pub(crate) kind: ParamKind,
    pub(crate) required: Option<bool>,
}

impl ParamDeclaration {
    fn new(name: impl Into<String>, ty: DeclaredType, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            ty,
            bind: None,
            kind,
            required: None,
        }
    }

    /// A positional parameter, delivered by index.
    #[must_use]
    pub fn positional(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self::new(name, ty, ParamKind::Positional)
    }

    /// A named parameter, delivered by name and omitted when absent.
    #[must_use]
    pub fn named(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self::new(name, ty, ParamKind::Named)
    }

    /// Sets the binding source.
    #[must_use]
    pub fn bind(mut self, bind: Bind) -> Self {
        self.bind = Some(bind);
        self
    }

    /// Marks the parameter as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Marks the parameter as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A controller-level field bound on every request.
pub struct FieldDeclaration<C> {
    pub(crate) name: String,
    pub(crate) ty: DeclaredType,
    pub(crate) bind: Option<Bind>,
    pub(crate) required: bool,
    pub(crate) setter: SlotSetter<C>,
    pub(crate) setter_type: TypeId,
    pub(crate) setter_type_name: &'static str,
}

impl<C: 'static> FieldDeclaration<C> {
    /// Declares a field with the setter that writes its decoded value.
    ///
    /// The setter's value type must match `ty`; a mismatch is reported at
    /// registration.
    #[must_use]
    pub fn new<T, F>(name: impl Into<String>, ty: DeclaredType, setter: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let name = name.into();
        let field = name.clone();
        let setter: SlotSetter<C> = Arc::new(move |instance: &mut C, value: Decoded| {
            let value = value.downcast::<T>().map_err(|_| {
                HeronError::internal(format!(
                    "field '{field}' received a value that is not {}",
                    type_name::<T>()
                ))
            })?;
            setter(instance, *value);
            Ok(())
        });
        Self {
            name,
            ty,
            bind: None,
            required: false,
            setter,
            setter_type: TypeId::of::<T>(),
            setter_type_name: type_name::<T>(),
        }
    }

    /// Sets the binding source.
    #[must_use]
    pub fn bind(mut self, bind: Bind) -> Self {
        self.bind = Some(bind);
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C> fmt::Debug for FieldDeclaration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDeclaration")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("bind", &self.bind)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// One method of a controller.
///
/// Only methods with an [`Operation`] become operations.
pub struct MethodDeclaration<C> {
    pub(crate) name: String,
    pub(crate) operation: Option<Operation>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) params: Vec<ParamDeclaration>,
    pub(crate) handler: Option<Handler<C>>,
}

impl<C: Send + 'static> MethodDeclaration<C> {
    /// Declares a method.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: None,
            scopes: Vec::new(),
            params: Vec::new(),
            handler: None,
        }
    }

    /// Marks the method as an operation.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Adds access scopes required to invoke the operation.
    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scope>,
    {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Appends a parameter. Positional parameters keep declaration order.
    #[must_use]
    pub fn param(mut self, param: ParamDeclaration) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the handler called with a fresh instance and the bound arguments.
    #[must_use]
    pub fn handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(C, ArgumentSet) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeronResult<Response>> + Send + 'static,
    {
        let handler: Handler<C> =
            Arc::new(move |instance: C, args: ArgumentSet| -> HandlerFuture {
                Box::pin(handler(instance, args))
            });
        self.handler = Some(handler);
        self
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C> fmt::Debug for MethodDeclaration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDeclaration")
            .field("name", &self.name)
            .field("operation", &self.operation)
            .field("scopes", &self.scopes)
            .field("params", &self.params)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// The declaration table of one controller type.
pub struct ControllerDeclaration<C> {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldDeclaration<C>>,
    pub(crate) methods: Vec<MethodDeclaration<C>>,
}

impl<C: Send + 'static> ControllerDeclaration<C> {
    /// Starts a declaration for a controller called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDeclaration<C>) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a method.
    #[must_use]
    pub fn method(mut self, method: MethodDeclaration<C>) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns the controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldDeclaration<C>] {
        &self.fields
    }

    /// Returns the declared methods.
    #[must_use]
    pub fn methods(&self) -> &[MethodDeclaration<C>] {
        &self.methods
    }
}

impl<C> fmt::Debug for ControllerDeclaration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerDeclaration")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}
