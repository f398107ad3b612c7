use std::fmt;

/// Failures of the ambient layers around the bridge call.
#[derive(Debug)]
pub enum BridgeError {
    /// A JNI call failed
    Jni(jni::errors::Error),
    /// A panic was caught before it could unwind into the VM
    Panic(String),
    /// Configuration could not be read or parsed
    Config(String),
    /// Logger setup failed or a global logger already exists
    Logging(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// True when the failing JNI call already left a Java exception pending.
    pub fn is_pending_exception(&self) -> bool {
        matches!(self, Self::Jni(jni::errors::Error::JavaException))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jni(err) => write!(f, "JNI call failed: {}", err),
            Self::Panic(msg) => write!(f, "native panic: {}", msg),
            Self::Config(msg) => write!(f, "invalid configuration: {}", msg),
            Self::Logging(msg) => write!(f, "logging setup failed: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Jni(err) => Some(err),
            _ => None,
        }
    }
}

impl From<jni::errors::Error> for BridgeError {
    fn from(err: jni::errors::Error) -> Self {
        Self::Jni(err)
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
