pub mod core;
pub mod fs;

pub use crate::core::bnan_compiler::{CompileCommand, CompileStatus, CompilerFailed, GlslcCompiler, ShaderCompiler};
pub use crate::core::bnan_prebuild::{run, BnanShaderPrebuild, PrebuildConfig, PrebuildReport};
pub use crate::core::bnan_shader_job::{ShaderJob, ShaderJobList, ShaderStage};
