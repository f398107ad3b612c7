//! Containment at the JNI boundary
//!
//! Unwinding out of an `extern "system"` function aborts the process, and a
//! failed JNI call must surface in Java as an exception rather than a bogus
//! value. Every exported function runs its body through [`guard`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use jni::sys::jstring;
use jni::JNIEnv;
use tracing::error;

use crate::errors::{BridgeError, BridgeResult};

const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

/// Run `f`, turning errors and panics into a pending `RuntimeException` and a
/// null return value.
pub fn guard<'local, F>(env: &mut JNIEnv<'local>, op: &'static str, f: F) -> jstring
where
    F: FnOnce(&mut JNIEnv<'local>) -> BridgeResult<jstring>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(env)))
        .unwrap_or_else(|payload| Err(BridgeError::Panic(panic_message(payload.as_ref()))));

    match outcome {
        Ok(value) => value,
        Err(err) => {
            error!(op, error = %err, "native call failed");
            raise(env, &err);
            ptr::null_mut()
        }
    }
}

fn raise(env: &mut JNIEnv, err: &BridgeError) {
    // Never replace an exception the VM already has pending
    if err.is_pending_exception() || env.exception_check().unwrap_or(false) {
        return;
    }

    if let Err(throw_err) = env.throw_new(RUNTIME_EXCEPTION, err.to_string()) {
        error!(error = %throw_err, "failed to raise {}", RUNTIME_EXCEPTION);
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
