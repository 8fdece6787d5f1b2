//! # Heron Controller
//!
//! Operation resolution and argument binding for Heron controllers.
//!
//! A controller declares its bound fields and its operation methods in a
//! [`ControllerDeclaration`]. Registration turns that table into an immutable
//! [`ControllerRuntime`]:
//!
//! 1. **Introspection** builds a [`BindingDescriptor`] for every bound field
//!    and parameter, picking each one's decoder from its location and
//!    [`DeclaredType`], and an [`OperationDescriptor`] for every operation.
//! 2. **Validation** rejects operations that bind undeclared path variables
//!    and groups of operations that share an HTTP method and path-variable
//!    set.
//!
//! Every problem is collected into one [`RegistrationError`].
//!
//! Per request, [`ControllerRuntime::resolve`] selects the operation,
//! [`bind`] decodes its arguments into an [`ArgumentSet`], and [`invoke()`]
//! applies instance bindings and calls the handler.
//!
//! ## Example
//!
//! ```rust
//! use heron_controller::{
//!     register_controller, ArgumentSet, Bind, ControllerDeclaration, DeclaredType,
//!     MethodDeclaration, Operation, ParamDeclaration,
//! };
//! use heron_core::{HeronResult, Response};
//! use heron_extract::RequestPartsBuilder;
//! use http::Uri;
//!
//! struct Things;
//!
//! async fn search(_things: Things, mut args: ArgumentSet) -> HeronResult<Response> {
//!     let tags: Option<Vec<String>> = args.take_optional(0)?;
//!     Ok(Response::new(tags.unwrap_or_default().join(",").into()))
//! }
//!
//! let runtime = register_controller(
//!     ControllerDeclaration::new("Things").method(
//!         MethodDeclaration::new("search")
//!             .operation(Operation::get(Vec::<String>::new()))
//!             .param(ParamDeclaration::positional("tags", DeclaredType::list::<String>()).bind(Bind::query("tag")))
//!             .handler(search),
//!     ),
//! )
//! .unwrap();
//!
//! let parts = RequestPartsBuilder::new()
//!     .uri(Uri::from_static("/things?tag=a&tag=b"))
//!     .build();
//! let response = futures_util::FutureExt::now_or_never(runtime.handle(Things, &parts))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(response.body().as_ref(), b"a,b");
//! ```

#![doc(html_root_url = "https://docs.rs/heron-controller/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod declaration;
mod descriptor;
mod error;
mod introspect;
mod invoke;
mod runtime;
mod summary;
mod types;
mod validate;

pub use binder::{bind, ArgumentSet};
pub use declaration::{
    Bind, Controller, ControllerDeclaration, FieldDeclaration, Handler, HandlerFuture,
    MethodDeclaration, Operation, ParamDeclaration, BODY_BINDING_NAME,
};
pub use descriptor::{BindingDescriptor, InstanceBinding, OperationDescriptor, OperationKey};
pub use error::{RegistrationError, RegistrationProblem};
pub use invoke::invoke;
pub use runtime::{register, register_controller, register_controller_with, ControllerRuntime};
pub use summary::{BindingSummary, OperationSummary, RuntimeSummary};
pub use types::{Decoded, DeclaredType};
