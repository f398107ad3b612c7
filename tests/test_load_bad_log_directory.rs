//! `JNI_OnLoad` with a log directory that cannot be created.
//!
//! Own test binary: the logger and the load guard are process-global.

use sfm_native::bridge::jni_api::{self, JNI_OnLoad};
use sfm_native::config::CONFIG_PATH_ENV;
use sfm_native::{confirmation, init_logging, BridgeError, LogConfig};
use std::fs;
use std::ptr;

#[test]
fn test_unusable_log_directory_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "plain file").unwrap();

    let config_path = dir.path().join("sfm_native.toml");
    fs::write(
        &config_path,
        format!("[logging]\ndirectory = {:?}\n", blocker.join("logs").to_string_lossy()),
    )
    .unwrap();
    std::env::set_var(CONFIG_PATH_ENV, &config_path);

    assert_eq!(JNI_OnLoad(ptr::null_mut(), ptr::null_mut()), jni::sys::JNI_VERSION_1_6);
    assert!(jni_api::is_loaded());

    // The default stderr logger took over
    let again = init_logging(LogConfig::new());
    assert!(matches!(again, Err(BridgeError::Logging(_))));

    // Loading again stays a no-op
    jni_api::on_load();
    assert!(jni_api::is_loaded());
    assert_eq!(confirmation(), "Native C++ is working!");
}
