//! Sandboxed plugin bridge
//!
//! A plugin exports two functions taking and returning UTF-8 bytes:
//!
//! - `process_command`: whole buffer in, replacement buffer out
//! - `predict_code`: current line in, suggested continuation out (empty means
//!   no suggestion)
//!
//! Calls are synchronous and expected to be fast. The host behind the bridge
//! is a trait so the reducer can be tested without a wasm runtime.

#[cfg(feature = "plugins")]
mod wasm;

use std::fmt;
use std::path::Path;

use thiserror::Error;

#[cfg(feature = "plugins")]
pub use wasm::WasmPlugin;

/// Export transforming the whole buffer
pub const TRANSFORM_FN: &str = "process_command";
/// Export predicting the rest of a line
pub const PREDICT_FN: &str = "predict_code";

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin not loaded")]
    NotLoaded,
    #[error("failed to load plugin: {0}")]
    Load(String),
    #[error("plugin call `{function}` failed: {message}")]
    Call { function: String, message: String },
    #[error("plugin `{function}` exited with code {code}")]
    ExitCode { function: String, code: i32 },
    #[error("plugin returned invalid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Raw result of a guest call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutput {
    pub code: i32,
    pub output: Vec<u8>,
}

/// Something that can run a named guest function
pub trait PluginHost: Send + fmt::Debug {
    fn call(&mut self, function: &str, input: &[u8]) -> Result<CallOutput, PluginError>;
}

/// Load a plugin module. A missing file means "no plugin" and is not an error.
pub fn load(path: &Path) -> Result<Option<Box<dyn PluginHost>>, PluginError> {
    if !path.exists() {
        tracing::debug!("No plugin at {}", path.display());
        return Ok(None);
    }
    load_module(path).map(Some)
}

#[cfg(feature = "plugins")]
fn load_module(path: &Path) -> Result<Box<dyn PluginHost>, PluginError> {
    Ok(Box::new(WasmPlugin::load(path)?))
}

#[cfg(not(feature = "plugins"))]
fn load_module(path: &Path) -> Result<Box<dyn PluginHost>, PluginError> {
    Err(PluginError::Load(format!(
        "{} found but plugin support is not compiled in",
        path.display()
    )))
}

/// The editor's view of the plugin: an optional host plus a sticky load error
#[derive(Default)]
pub struct PluginBridge {
    host: Option<Box<dyn PluginHost>>,
    load_error: Option<String>,
}

impl fmt::Debug for PluginBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginBridge")
            .field("loaded", &self.host.is_some())
            .field("load_error", &self.load_error)
            .finish()
    }
}

impl PluginBridge {
    pub fn with_host(host: Box<dyn PluginHost>) -> Self {
        Self {
            host: Some(host),
            load_error: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.host.is_some()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Record the outcome of a load; an error sticks for the session
    pub fn install(&mut self, result: Result<Option<Box<dyn PluginHost>>, String>) {
        match result {
            Ok(host) => self.host = host,
            Err(e) => {
                self.host = None;
                self.load_error = Some(e);
            }
        }
    }

    fn call_text(&mut self, function: &str, input: &str) -> Result<String, PluginError> {
        if let Some(e) = &self.load_error {
            return Err(PluginError::Load(e.clone()));
        }
        let host = self.host.as_mut().ok_or(PluginError::NotLoaded)?;
        let out = host.call(function, input.as_bytes())?;
        if out.code != 0 {
            return Err(PluginError::ExitCode {
                function: function.to_string(),
                code: out.code,
            });
        }
        Ok(String::from_utf8(out.output)?)
    }

    /// Whole-buffer transform
    pub fn transform(&mut self, text: &str) -> Result<String, PluginError> {
        self.call_text(TRANSFORM_FN, text)
    }

    /// Continuation for `line`; `None` when the plugin has no suggestion
    pub fn predict(&mut self, line: &str) -> Result<Option<String>, PluginError> {
        let text = self.call_text(PREDICT_FN, line)?;
        Ok((!text.is_empty()).then_some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Upper {
        code: i32,
    }

    impl PluginHost for Upper {
        fn call(&mut self, function: &str, input: &[u8]) -> Result<CallOutput, PluginError> {
            let text = String::from_utf8_lossy(input);
            let output = match function {
                TRANSFORM_FN => text.to_uppercase(),
                PREDICT_FN if text.ends_with("func") => " main() {".to_string(),
                PREDICT_FN => String::new(),
                other => {
                    return Err(PluginError::Call {
                        function: other.to_string(),
                        message: "unknown export".into(),
                    })
                }
            };
            Ok(CallOutput {
                code: self.code,
                output: output.into_bytes(),
            })
        }
    }

    #[test]
    fn test_transform_and_predict() {
        let mut bridge = PluginBridge::with_host(Box::new(Upper { code: 0 }));
        assert_eq!(bridge.transform("abc").unwrap(), "ABC");
        assert_eq!(bridge.predict("func").unwrap().as_deref(), Some(" main() {"));
        assert_eq!(bridge.predict("x").unwrap(), None);
    }

    #[test]
    fn test_non_zero_exit_is_error() {
        let mut bridge = PluginBridge::with_host(Box::new(Upper { code: 3 }));
        assert!(matches!(
            bridge.transform("abc"),
            Err(PluginError::ExitCode { code: 3, .. })
        ));
    }

    #[test]
    fn test_missing_plugin_is_not_loaded() {
        let mut bridge = PluginBridge::default();
        assert!(matches!(bridge.transform("x"), Err(PluginError::NotLoaded)));
        assert!(load(Path::new("/definitely/not/here.wasm")).unwrap().is_none());
    }

    #[test]
    fn test_load_error_is_sticky() {
        let mut bridge = PluginBridge::default();
        bridge.install(Err("bad magic".into()));
        assert_eq!(bridge.load_error(), Some("bad magic"));
        assert!(matches!(bridge.predict("x"), Err(PluginError::Load(_))));
    }
}
