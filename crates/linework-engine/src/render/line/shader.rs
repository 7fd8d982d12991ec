use std::fmt;

use wgpu::naga;

/// Pipeline stage an entry point belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn from_naga(stage: naga::ShaderStage) -> Option<Self> {
        match stage {
            naga::ShaderStage::Vertex => Some(ShaderStage::Vertex),
            naga::ShaderStage::Fragment => Some(ShaderStage::Fragment),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// One WGSL module and the entry points it declares.
///
/// The source is parsed once, at construction. A module that fails to parse
/// declares no entry points and reports its parse error on lookup.
#[derive(Debug, Clone)]
pub struct ShaderModuleSource {
    pub label: &'static str,
    pub wgsl: &'static str,
    entries: Result<Vec<(ShaderStage, String)>, String>,
}

impl ShaderModuleSource {
    pub fn new(label: &'static str, wgsl: &'static str) -> Self {
        let entries = naga::front::wgsl::parse_str(wgsl)
            .map(|module| {
                module
                    .entry_points
                    .iter()
                    .filter_map(|ep| ShaderStage::from_naga(ep.stage).map(|s| (s, ep.name.clone())))
                    .collect()
            })
            .map_err(|e| e.emit_to_string(wgsl));

        if let Err(message) = &entries {
            log::error!("shader module '{label}' failed to parse:\n{message}");
        }

        Self {
            label,
            wgsl,
            entries,
        }
    }

    pub fn has_entry(&self, stage: ShaderStage, name: &str) -> bool {
        self.entries
            .as_ref()
            .is_ok_and(|entries| entries.iter().any(|(s, n)| *s == stage && n == name))
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.entries.as_ref().err().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderLookupError {
    /// No parsed module declares this entry point.
    MissingEntry { stage: ShaderStage, name: String },
    /// A module in the library is not valid WGSL.
    Parse { module: &'static str, message: String },
}

impl fmt::Display for ShaderLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderLookupError::MissingEntry { stage, name } => {
                write!(f, "no {stage} entry point named `{name}` in shader library")
            }
            ShaderLookupError::Parse { module, message } => {
                write!(f, "shader module '{module}' is not valid WGSL: {message}")
            }
        }
    }
}

impl std::error::Error for ShaderLookupError {}

/// Entry points resolved from one module, ready for pipeline creation.
#[derive(Debug, Clone, Copy)]
pub struct ShaderPair<'a> {
    pub module: &'a ShaderModuleSource,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
}

/// Named shader modules, searched by entry-point name.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    modules: Vec<ShaderModuleSource>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The library compiled into the engine: both line pipelines.
    pub fn default_library() -> Self {
        Self::new().with_module(ShaderModuleSource::new(
            "linework line shader",
            include_str!("shaders/line.wgsl"),
        ))
    }

    pub fn with_module(mut self, module: ShaderModuleSource) -> Self {
        self.modules.push(module);
        self
    }

    /// Finds the module declaring `name` for `stage`.
    ///
    /// When nothing matches and some module failed to parse, the parse error
    /// is returned instead, since the entry point may live in that module.
    pub fn find(&self, stage: ShaderStage, name: &str) -> Result<&ShaderModuleSource, ShaderLookupError> {
        if let Some(module) = self.modules.iter().find(|m| m.has_entry(stage, name)) {
            return Ok(module);
        }

        let unparsed = self
            .modules
            .iter()
            .find_map(|m| m.parse_error().map(|message| (m.label, message)));

        Err(match unparsed {
            Some((module, message)) => ShaderLookupError::Parse {
                module,
                message: message.to_string(),
            },
            None => ShaderLookupError::MissingEntry {
                stage,
                name: name.to_string(),
            },
        })
    }

    /// Resolves a vertex + fragment pair. Both must live in the same module.
    pub fn resolve<'a>(
        &'a self,
        vertex_entry: &'a str,
        fragment_entry: &'a str,
    ) -> Result<ShaderPair<'a>, ShaderLookupError> {
        let module = self.find(ShaderStage::Vertex, vertex_entry)?;
        if !module.has_entry(ShaderStage::Fragment, fragment_entry) {
            return Err(ShaderLookupError::MissingEntry {
                stage: ShaderStage::Fragment,
                name: fragment_entry.to_string(),
            });
        }
        Ok(ShaderPair {
            module,
            vertex_entry,
            fragment_entry,
        })
    }
}
