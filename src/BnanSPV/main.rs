mod shader_jobs;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::*;

use BnanPrebuild::{BnanShaderPrebuild, CompilerFailed, GlslcCompiler, PrebuildConfig};

const PROJECT_NAME: &str = "RealTimeGI";
const SHADER_DIR: &str = "Resources/Shaders";
const SPV_SUBDIR: &str = "SPV";
const COMPILER_FAILED_EXIT_CODE: i32 = 2;
const ERROR_EXIT_CODE: i32 = 1;

#[cfg(windows)]
const GLSLC: &str = "glslc.exe";
#[cfg(not(windows))]
const GLSLC: &str = "glslc";

#[derive(Parser)]
#[command(name = "BnanSPV")]
#[command(about = "Compiles the application's GLSL shaders to SPIR-V, skipping up to date outputs", long_about = None)]
struct Cli {
    #[arg(long, default_value = ".", help = "Project root the shader directory is relative to")]
    root: PathBuf,

    #[arg(long, default_value = SHADER_DIR, help = "Shader source directory, relative to the root")]
    shader_dir: PathBuf,

    #[arg(long, default_value = SPV_SUBDIR, help = "Output directory, relative to the shader directory")]
    output_subdir: PathBuf,

    #[arg(long, env = "BNAN_GLSLC", help = "Shader compiler executable (default: glslc from $VULKAN_SDK or PATH)")]
    compiler: Option<PathBuf>,

    #[arg(long, help = "Recompile every shader regardless of timestamps")]
    force: bool,

    #[arg(long, help = "Only print which shaders would be compiled")]
    dry_run: bool,
}

/// glslc from the Vulkan SDK when one is installed, otherwise whatever is on PATH.
fn default_compiler(vulkan_sdk: Option<OsString>) -> PathBuf {
    match vulkan_sdk {
        Some(sdk) if !sdk.is_empty() => {
            let bin = if cfg!(windows) { "Bin" } else { "bin" };
            PathBuf::from(sdk).join(bin).join(GLSLC)
        }
        _ => PathBuf::from(GLSLC),
    }
}

/// Compiler failures exit with 2, anything else unrecovered with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<CompilerFailed>().is_some() {
        COMPILER_FAILED_EXIT_CODE
    } else {
        ERROR_EXIT_CODE
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("{} - Prebuild...", PROJECT_NAME);

    let source_dir = cli.root.join(&cli.shader_dir);
    let output_dir = source_dir.join(&cli.output_subdir);
    let compiler = cli.compiler.unwrap_or_else(|| default_compiler(std::env::var_os("VULKAN_SDK")));

    let mut config = PrebuildConfig::new(compiler, source_dir, output_dir);
    config.force = cli.force;
    config.dry_run = cli.dry_run;

    log::debug!("Prebuild configuration: {:?}", config);

    let jobs = shader_jobs::application_shaders()?;
    let prebuild = BnanShaderPrebuild::new(config);

    if let Err(e) = prebuild.run(&jobs, &mut GlslcCompiler) {
        let code = exit_code(&e);
        if code != ERROR_EXIT_CODE {
            eprintln!("{}", e);
            std::process::exit(code);
        }
        return Err(e);
    }

    Ok(())
}
