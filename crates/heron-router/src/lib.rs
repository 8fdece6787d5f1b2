//! Path-variable primitives for Heron.
//!
//! Routing a URL to the right controller happens before Heron sees a request.
//! What reaches the binding engine is the set of path variables the router
//! populated, and this crate provides the types that describe them:
//!
//! - [`Params`]: populated path variables for one request (name → value)
//! - [`PathVariables`]: an order-free, duplicate-free set of variable names,
//!   used both for what an operation declares and what a request populated
//! - [`RouteTemplate`]: a parsed route such as `/things/{id}` that yields the
//!   variables it declares
//!
//! # Example
//!
//! ```rust
//! use heron_router::{Params, PathVariables, RouteTemplate};
//!
//! let template = RouteTemplate::parse("/orgs/{org}/things/{id}").unwrap();
//! assert_eq!(template.variables(), &PathVariables::from_iter(["id", "org"]));
//!
//! let mut params = Params::new();
//! params.push("org", "acme");
//! params.push("id", "42");
//! assert_eq!(&params.variables(), template.variables());
//! ```

mod params;
mod template;
mod variables;

pub use params::Params;
pub use template::{RouteTemplate, Segment, TemplateError};
pub use variables::PathVariables;
