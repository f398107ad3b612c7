//! Native bridge
//!
//! Host-independent core of the library plus the JNI surface built on top of it.

pub mod guard;
pub mod jni_api;

/// Text returned to `MainActivity.nativeTest()`
pub const CONFIRMATION: &str = "Native C++ is working!";

/// Confirmation text handed back across the JNI boundary.
///
/// Constant, allocation-free and independent of call order.
pub fn confirmation() -> &'static str {
    CONFIRMATION
}
