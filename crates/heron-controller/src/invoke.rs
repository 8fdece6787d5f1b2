//! Operation invocation.

use futures_util::future::{self, FutureExt};
use heron_core::{HeronError, HeronResult};
use heron_extract::BindingError;

use crate::binder::ArgumentSet;
use crate::declaration::HandlerFuture;
use crate::descriptor::OperationKey;
use crate::runtime::ControllerRuntime;

/// Applies bound instance values to `instance` and calls the handler of the
/// operation registered under `key`.
///
/// The returned future owns everything it needs; it does not borrow the
/// runtime.
pub fn invoke<C: Send + 'static>(
    runtime: &ControllerRuntime<C>,
    instance: C,
    key: &OperationKey,
    args: ArgumentSet,
) -> HandlerFuture {
    match prepare(runtime, instance, key, args) {
        Ok(call) => call,
        Err(e) => future::ready(Err(e)).boxed(),
    }
}

fn prepare<C: Send + 'static>(
    runtime: &ControllerRuntime<C>,
    mut instance: C,
    key: &OperationKey,
    mut args: ArgumentSet,
) -> HeronResult<HandlerFuture> {
    let operation = runtime.operation(key).ok_or_else(|| {
        HeronError::from(BindingError::NoMatchingOperation {
            method: key.method().to_string(),
            path_variables: key.path_variables().clone(),
        })
    })?;

    for (index, value) in args.take_instance() {
        let slot = runtime.instance_bindings().get(index).ok_or_else(|| {
            HeronError::internal(format!("no instance binding at index {index}"))
        })?;
        (slot.setter)(&mut instance, value)?;
    }

    Ok((operation.invoke)(instance, args))
}
