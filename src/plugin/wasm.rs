//! Extism-backed plugin host

use std::fmt;
use std::path::{Path, PathBuf};

use super::{CallOutput, PluginError, PluginHost};

pub struct WasmPlugin {
    plugin: extism::Plugin,
    path: PathBuf,
}

impl fmt::Debug for WasmPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WasmPlugin").field("path", &self.path).finish()
    }
}

impl WasmPlugin {
    /// Instantiate the module with WASI enabled and no host functions
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        let manifest = extism::Manifest::new([extism::Wasm::file(path)]);
        let plugin = extism::Plugin::new(&manifest, [], true)
            .map_err(|e| PluginError::Load(e.to_string()))?;
        tracing::info!("Loaded plugin {}", path.display());
        Ok(Self {
            plugin,
            path: path.to_path_buf(),
        })
    }
}

impl PluginHost for WasmPlugin {
    fn call(&mut self, function: &str, input: &[u8]) -> Result<CallOutput, PluginError> {
        match self
            .plugin
            .call_get_error_code::<&[u8], Vec<u8>>(function, input)
        {
            Ok(output) => Ok(CallOutput { code: 0, output }),
            Err((e, code)) if code != 0 => {
                tracing::warn!(function, code, error = %e, "Plugin returned an error code");
                Ok(CallOutput {
                    code,
                    output: e.to_string().into_bytes(),
                })
            }
            Err((e, _)) => Err(PluginError::Call {
                function: function.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
