use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Result, Context};

use crate::core::bnan_shader_job::ShaderJob;

/// Fully resolved compiler invocation for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CompileCommand {
    /// `<compiler> -fshader-stage=<stage> <source> -o <output> [<define>]`
    pub fn for_job(compiler: &Path, job: &ShaderJob, source: &Path, output: &Path) -> Self {
        let mut args: Vec<OsString> = vec![
            format!("-fshader-stage={}", job.stage().flag()).into(),
            source.as_os_str().to_owned(),
            "-o".into(),
            output.as_os_str().to_owned(),
        ];

        if !job.macro_define().is_empty() {
            args.push(job.macro_define().into());
        }

        Self { program: compiler.to_owned(), args }
    }
}

impl fmt::Display for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    Exited(i32),
    Signalled,
    /// The executable could not be started at all.
    NotLaunched(io::ErrorKind),
}

impl CompileStatus {
    pub fn success(&self) -> bool {
        *self == CompileStatus::Exited(0)
    }
}

impl fmt::Display for CompileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileStatus::Exited(code) => write!(f, "exit code {}", code),
            CompileStatus::Signalled => f.write_str("terminated by signal"),
            CompileStatus::NotLaunched(kind) => write!(f, "launch failure ({})", kind),
        }
    }
}

/// Runs a compiler invocation to completion. Implementations stream the
/// compiler's own output straight through to the user.
pub trait ShaderCompiler {
    fn compile(&mut self, command: &CompileCommand) -> Result<CompileStatus>;
}

/// Spawns the real compiler executable with inherited stdio.
#[derive(Debug, Default)]
pub struct GlslcCompiler;

impl ShaderCompiler for GlslcCompiler {
    fn compile(&mut self, command: &CompileCommand) -> Result<CompileStatus> {
        let status = match Command::new(&command.program).args(&command.args).status() {
            Ok(status) => status,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied) => {
                log::error!("Failed to launch shader compiler {:?}: {}", command.program, e);
                return Ok(CompileStatus::NotLaunched(e.kind()));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to launch shader compiler {:?}", command.program));
            }
        };

        Ok(match status.code() {
            Some(code) => CompileStatus::Exited(code),
            None => CompileStatus::Signalled,
        })
    }
}

/// A compiler invocation finished unsuccessfully. Aborts the whole prebuild.
#[derive(Debug, Clone)]
pub struct CompilerFailed {
    pub shader: PathBuf,
    pub status: CompileStatus,
}

impl fmt::Display for CompilerFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shader compilation of {:?} failed with {}", self.shader, self.status)
    }
}

impl std::error::Error for CompilerFailed {}

#[cfg(test)]
mod compiler_tests {
    use super::*;
    use crate::core::bnan_shader_job::ShaderStage;

    #[test]
    fn test_command_shape() {
        let job = ShaderJob::new(ShaderStage::Vertex, "A.glsl");
        let command = CompileCommand::for_job(Path::new("glslc"), &job, Path::new("A.glsl"), Path::new("A.spv"));

        assert_eq!(command.to_string(), "glslc -fshader-stage=vertex A.glsl -o A.spv");
        assert_eq!(command.args.len(), 4);
    }

    #[test]
    fn test_command_appends_macro() {
        let job = ShaderJob::new(ShaderStage::Fragment, "Mesh.glsl")
            .with_macro("-D=SHADOW")
            .with_suffix("_Shadow");
        let command = CompileCommand::for_job(Path::new("glslc"), &job, Path::new("Mesh.glsl"), Path::new("Mesh_Shadow.spv"));

        assert_eq!(command.to_string(), "glslc -fshader-stage=fragment Mesh.glsl -o Mesh_Shadow.spv -D=SHADOW");
        assert_eq!(command.args.last().unwrap(), "-D=SHADOW");
    }

    #[test]
    fn test_status() {
        assert!(CompileStatus::Exited(0).success());
        assert!(!CompileStatus::Exited(1).success());
        assert!(!CompileStatus::Signalled.success());
        assert!(!CompileStatus::NotLaunched(io::ErrorKind::NotFound).success());
    }

    #[test]
    fn test_missing_compiler_is_not_launched() {
        let command = CompileCommand {
            program: PathBuf::from("bnan-prebuild-no-such-compiler"),
            args: Vec::new(),
        };
        let status = GlslcCompiler.compile(&command).unwrap();
        assert_eq!(status, CompileStatus::NotLaunched(io::ErrorKind::NotFound));
    }
}
