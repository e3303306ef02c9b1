use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, Context};

use crate::core::bnan_compiler::{CompileCommand, CompilerFailed, GlslcCompiler, ShaderCompiler};
use crate::core::bnan_shader_job::ShaderJobList;
use crate::fs::staleness;

#[derive(Debug, Clone)]
pub struct PrebuildConfig {
    pub compiler: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Compile every job regardless of timestamps.
    pub force: bool,
    /// Report stale jobs without invoking the compiler.
    pub dry_run: bool,
}

impl PrebuildConfig {
    pub fn new<C: Into<PathBuf>, S: Into<PathBuf>, O: Into<PathBuf>>(compiler: C, source_dir: S, output_dir: O) -> Self {
        Self {
            compiler: compiler.into(),
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            force: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrebuildReport {
    pub compiled: Vec<PathBuf>,
    pub up_to_date: Vec<PathBuf>,
}

pub struct BnanShaderPrebuild {
    config: PrebuildConfig,
}

impl BnanShaderPrebuild {
    pub fn new(config: PrebuildConfig) -> Self {
        Self { config }
    }

    /// Processes the jobs in order. The first failing compiler invocation
    /// returns a `CompilerFailed` error and the remaining jobs are skipped.
    pub fn run<C: ShaderCompiler>(&self, jobs: &ShaderJobList, compiler: &mut C) -> Result<PrebuildReport> {
        let config = &self.config;

        if staleness::ensure_output_dir(&config.output_dir)? {
            log::info!("Created output directory {:?}", config.output_dir);
        }

        let mut report = PrebuildReport::default();

        for job in jobs {
            let source = staleness::source_path(&config.source_dir, job);
            let output = staleness::output_path(&config.output_dir, job);

            let stale = staleness::needs_compile(&source, &output)?;
            if !stale && !config.force {
                log::debug!("Up to date: {:?}", output);
                report.up_to_date.push(output);
                continue;
            }

            println!("Compile Shader -> {}", output.display());

            let command = CompileCommand::for_job(&config.compiler, job, &source, &output);
            log::debug!("{}", command);

            if config.dry_run {
                report.compiled.push(output);
                continue;
            }

            std::io::stdout().flush().context("Failed to flush stdout")?;

            let status = compiler.compile(&command)?;
            if !status.success() {
                log::error!("{} returned {}", command, status);
                return Err(CompilerFailed { shader: source, status }.into());
            }

            report.compiled.push(output);
        }

        log::info!("{} shader(s) compiled, {} up to date", report.compiled.len(), report.up_to_date.len());

        Ok(report)
    }
}

/// Compiles every stale job with the compiler executable at `compiler_path`.
pub fn run<S: AsRef<Path>, O: AsRef<Path>, C: AsRef<Path>>(
    jobs: &ShaderJobList,
    source_dir: S,
    output_dir: O,
    compiler_path: C,
) -> Result<PrebuildReport> {
    let config = PrebuildConfig::new(compiler_path.as_ref(), source_dir.as_ref(), output_dir.as_ref());
    BnanShaderPrebuild::new(config).run(jobs, &mut GlslcCompiler)
}
