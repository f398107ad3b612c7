//! sfm-native - JNI native library for the sfm_vc_ocv Android app
//!
//! The library is loaded by `System.loadLibrary` from `MainActivity` and exposes
//! `nativeTest`, which reports back that native code is reachable.

// Core modules
pub mod bridge;
pub mod config;
pub mod errors;
pub mod infrastructure;

// Re-export commonly used items
pub use bridge::{confirmation, CONFIRMATION};
pub use config::{BridgeConfig, LoggingConfig};
pub use errors::{BridgeError, BridgeResult};
pub use infrastructure::{init_logging, LogConfig, LogFormat, LogOutput};
