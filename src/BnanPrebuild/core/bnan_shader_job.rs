use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::fs::staleness::output_file_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
    Geometry,
    TessControl,
    TessEvaluation,
}

impl ShaderStage {
    /// Value of glslc's `-fshader-stage=` flag.
    pub fn flag(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
            ShaderStage::Geometry => "geometry",
            ShaderStage::TessControl => "tesscontrol",
            ShaderStage::TessEvaluation => "tesseval",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// One compilation unit: a source file, the stage it is compiled for and an
/// optional define/suffix pair used to produce variants of the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderJob {
    stage: ShaderStage,
    source_path: PathBuf,
    macro_define: String,
    output_suffix: String,
}

impl ShaderJob {
    pub fn new<P: Into<PathBuf>>(stage: ShaderStage, source_path: P) -> Self {
        Self {
            stage,
            source_path: source_path.into(),
            macro_define: String::new(),
            output_suffix: String::new(),
        }
    }

    pub fn with_macro(mut self, macro_define: &str) -> Self {
        self.macro_define = macro_define.to_owned();
        self
    }

    pub fn with_suffix(mut self, output_suffix: &str) -> Self {
        self.output_suffix = output_suffix.to_owned();
        self
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Path relative to the shader source directory.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Empty when the job has no define.
    pub fn macro_define(&self) -> &str {
        &self.macro_define
    }

    pub fn output_suffix(&self) -> &str {
        &self.output_suffix
    }
}

/// Immutable, validated set of jobs. Construction fails if two jobs would
/// write the same output file.
#[derive(Debug, Clone, Default)]
pub struct ShaderJobList {
    jobs: Vec<ShaderJob>,
}

impl ShaderJobList {
    pub fn new(jobs: Vec<ShaderJob>) -> Result<Self> {
        let mut outputs = HashSet::new();

        for job in &jobs {
            let output = output_file_name(job);
            if !outputs.insert(output.clone()) {
                bail!(
                    "Shader jobs collide: {:?} (suffix {:?}) writes {:?} which another job already produces",
                    job.source_path, job.output_suffix, output
                );
            }
        }

        Ok(Self { jobs })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShaderJob> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ShaderJobList {
    type Item = &'a ShaderJob;
    type IntoIter = std::slice::Iter<'a, ShaderJob>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
