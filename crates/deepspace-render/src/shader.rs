//! Shader module compilation and caching.
//!
//! Shader sources are embedded WGSL strings. Entity shaders share the
//! frame uniform block and the noise functions, so their source is assembled
//! with [`compose`] before it reaches [`ShaderLibrary::load_from_source`].

use log::{debug, info};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Error types for shader loading operations.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },

    #[error("shader '{name}' not found in library")]
    NotLoaded { name: String },
}

/// Concatenate shared WGSL snippets and an entity shader into one module source.
pub fn compose(parts: &[&str]) -> String {
    parts.join("\n")
}

/// Registry of compiled shader modules keyed by name.
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Compile `source` and cache it under `name`, replacing any earlier module.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        debug!("Compiling shader '{}' ({} bytes)", name, source.len());

        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });

        let compilation = pollster::block_on(module.get_compilation_info());
        let errors: Vec<String> = compilation
            .messages
            .iter()
            .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
            .map(|m| m.message.clone())
            .collect();
        if !errors.is_empty() {
            return Err(ShaderError::CompilationFailed {
                name: name.to_string(),
                message: errors.join("; "),
            });
        }

        let module = Arc::new(module);
        if self
            .modules
            .insert(name.to_string(), module.clone())
            .is_some()
        {
            info!("Replaced shader '{}'", name);
        } else {
            info!("Loaded shader '{}'", name);
        }

        Ok(module)
    }

    pub fn get(&self, name: &str) -> Option<Arc<wgpu::ShaderModule>> {
        self.modules.get(name).cloned()
    }

    /// Like [`get`](Self::get), but a missing module is an error.
    pub fn require(&self, name: &str) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        self.get(name).ok_or_else(|| ShaderError::NotLoaded {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::request_headless_device;

    const VALID_SHADER: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(0.0, 0.0, 0.0, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    #[test]
    fn test_compose_keeps_part_order() {
        let source = compose(&["fn a() {}", "fn b() {}"]);
        assert_eq!(source, "fn a() {}\nfn b() {}");
    }

    #[test]
    fn test_library_starts_empty() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert!(library.get("stars").is_none());
        assert!(matches!(
            library.require("stars"),
            Err(ShaderError::NotLoaded { .. })
        ));
    }

    #[test]
    fn test_load_valid_shader_is_cached() {
        let Some((device, _queue)) = request_headless_device() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        library
            .load_from_source(&device, "solid", VALID_SHADER)
            .unwrap();

        let a = library.get("solid").unwrap();
        let b = library.require("solid").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_reload_replaces_cached_module() {
        let Some((device, _queue)) = request_headless_device() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        let first = library
            .load_from_source(&device, "solid", VALID_SHADER)
            .unwrap();
        let second = library
            .load_from_source(&device, "solid", VALID_SHADER)
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(library.len(), 1);
    }
}
