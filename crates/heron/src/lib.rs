//! # Heron
//!
//! **Operation resolution and argument binding for HTTP controllers**
//!
//! A controller declares its operations (HTTP method plus path variables)
//! and how each parameter binds to the request: a path variable, a query
//! parameter, a header, or the JSON body. Heron validates the declaration
//! once at registration, then per request selects the operation, decodes
//! its arguments and calls the handler.
//!
//! ## Quick Start
//!
//! ```rust
//! use heron::prelude::*;
//!
//! struct Users;
//!
//! async fn get_user(_users: Users, mut args: ArgumentSet) -> HeronResult<Response> {
//!     let id: u64 = args.take(0)?;
//!     Ok(Response::new(format!("user {id}").into()))
//! }
//!
//! let runtime = register_controller(
//!     ControllerDeclaration::new("Users").method(
//!         MethodDeclaration::new("get")
//!             .operation(Operation::route("GET", "/users/{id}"))
//!             .param(ParamDeclaration::positional("id", DeclaredType::scalar::<u64>()).bind(Bind::path("id")))
//!             .handler(get_user),
//!     ),
//! )
//! .unwrap();
//!
//! let parts = RequestPartsBuilder::new().path_param("id", "7").build();
//! let response = futures_util::FutureExt::now_or_never(runtime.handle(Users, &parts))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(response.body().as_ref(), b"user 7");
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`core`] | `heron-core` | Locations, scopes, `HeronError` |
//! | [`router`] | `heron-router` | Path variables and route templates |
//! | [`extract`] | `heron-extract` | Request parts, parse and read contracts, `BindingError` |
//! | [`controller`] | `heron-controller` | Declarations, registration, binding, invocation |
//! | [`config`] | `heron-config` | Layered configuration |
//! | [`telemetry`] | `heron-telemetry` | Logging and metrics |

#![doc(html_root_url = "https://docs.rs/heron/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use heron_config as config;
pub use heron_controller as controller;
pub use heron_core as core;
pub use heron_extract as extract;
pub use heron_router as router;
pub use heron_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust
/// use heron::prelude::*;
/// ```
pub mod prelude {
    pub use heron_core::{BindingLocation, HeronError, HeronResult, Response, Scope};

    pub use heron_extract::{
        BindingError, FieldFilters, FromParam, ParamError, ReadError, ReadFrom, RequestParts,
        RequestPartsBuilder,
    };

    pub use heron_controller::{
        register, register_controller, register_controller_with, ArgumentSet, Bind, Controller,
        ControllerDeclaration, ControllerRuntime, DeclaredType, FieldDeclaration,
        MethodDeclaration, Operation, OperationKey, ParamDeclaration, RegistrationError,
        RegistrationProblem,
    };

    pub use heron_config::{BindingConfig, ConfigLoader, HeronConfig};
}
