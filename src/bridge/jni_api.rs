//! JNI entry points
//!
//! Symbols resolved by the VM for `com.d2xcp0.sfm_vc_ocv.MainActivity`:
//!
//! ```kotlin
//! companion object {
//!     init { System.loadLibrary("sfm_native") }
//! }
//! external fun nativeTest(): String
//! ```

use std::ffi::c_void;
use std::panic;

use jni::objects::JObject;
use jni::sys::{jint, jstring, JNI_VERSION_1_6};
use jni::JNIEnv;
use once_cell::sync::OnceCell;
use tracing::{info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

use super::confirmation;
use super::guard::guard;
use crate::config::{BridgeConfig, LoggingConfig};
use crate::infrastructure::{init_logging, LogConfig};

static LOG_GUARD: OnceCell<Option<WorkerGuard>> = OnceCell::new();

/// `MainActivity.nativeTest(): String`
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn Java_com_d2xcp0_sfm_1vc_1ocv_MainActivity_nativeTest<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    guard(&mut env, "nativeTest", |env| {
        let text = env.new_string(confirmation())?;
        trace!("nativeTest returning confirmation");
        Ok(text.into_raw())
    })
}

/// Called by the VM once, when `System.loadLibrary` loads this library.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn JNI_OnLoad(_vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    // Setup problems must never fail the load
    let _ = panic::catch_unwind(on_load);
    JNI_VERSION_1_6
}

/// Install logging from the load-time configuration. Idempotent.
pub fn on_load() {
    let mut fresh = false;

    LOG_GUARD.get_or_init(|| {
        fresh = true;

        let (config, config_err) = match BridgeConfig::from_env() {
            Ok(config) => (config, None),
            Err(err) => (BridgeConfig::default(), Some(err)),
        };

        let guard = match LogConfig::from_settings(&config.logging).and_then(init_logging) {
            Ok(guard) => guard,
            Err(err) => {
                // Nothing is installed when setup fails, so the defaults can still take over
                let fallback = LogConfig::from_settings(&LoggingConfig::default())
                    .and_then(init_logging);
                warn!(error = %err, "logging setup failed, using default logging settings");

                fallback.unwrap_or_else(|err| {
                    warn!(error = %err, "logging setup failed, continuing without it");
                    None
                })
            }
        };

        if let Some(err) = config_err {
            warn!(error = %err, "falling back to default configuration");
        }

        guard
    });

    if fresh {
        info!(version = env!("CARGO_PKG_VERSION"), "sfm_native loaded");
    }
}

/// Whether [`on_load`] has already run in this process.
pub fn is_loaded() -> bool {
    LOG_GUARD.get().is_some()
}
