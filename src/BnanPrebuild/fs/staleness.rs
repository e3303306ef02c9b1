use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Result, Context};

use crate::core::bnan_shader_job::ShaderJob;

pub const SPV_EXTENSION: &str = ".spv";

/// `Mesh.glsl` + `_Shadow` -> `Mesh_Shadow.spv`. Stage and define play no part.
pub fn output_file_name(job: &ShaderJob) -> PathBuf {
    let mut name = job.source_path().with_extension("").into_os_string();
    name.push(job.output_suffix());
    name.push(SPV_EXTENSION);
    PathBuf::from(name)
}

pub fn source_path(source_dir: &Path, job: &ShaderJob) -> PathBuf {
    source_dir.join(job.source_path())
}

pub fn output_path(output_dir: &Path, job: &ShaderJob) -> PathBuf {
    output_dir.join(output_file_name(job))
}

pub fn modified_time(path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path).with_context(|| format!("Failed to stat {:?}", path))?;
    metadata.modified().with_context(|| format!("Failed to read modification time of {:?}", path))
}

/// A missing output counts as having the source's own timestamp, and ties
/// recompile, so an output is only fresh when strictly newer than its source.
pub fn is_stale(source_time: SystemTime, output_time: Option<SystemTime>) -> bool {
    let output_time = output_time.unwrap_or(source_time);
    source_time >= output_time
}

/// Fails when the source is missing; a missing output is simply stale.
pub fn needs_compile(source: &Path, output: &Path) -> Result<bool> {
    let source_time = modified_time(source)?;

    let output_time = if output.exists() {
        Some(modified_time(output)?)
    } else {
        None
    };

    Ok(is_stale(source_time, output_time))
}

/// Single-level create; the parent has to exist already. Returns whether the
/// directory was created.
pub fn ensure_output_dir(dir: &Path) -> Result<bool> {
    if dir.exists() {
        return Ok(false);
    }

    fs::create_dir(dir).with_context(|| format!("Failed to create output directory {:?}", dir))?;
    Ok(true)
}

#[cfg(test)]
mod staleness_tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    use crate::core::bnan_shader_job::ShaderStage;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bnan_prebuild_staleness_{}_{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path, time: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[test]
    fn test_output_file_name() {
        let job = ShaderJob::new(ShaderStage::Vertex, "A.glsl");
        assert_eq!(output_file_name(&job), PathBuf::from("A.spv"));

        let job = ShaderJob::new(ShaderStage::Vertex, "Mesh.glsl")
            .with_macro("-D=SHADOW")
            .with_suffix("_Shadow");
        assert_eq!(output_file_name(&job), PathBuf::from("Mesh_Shadow.spv"));

        let job = ShaderJob::new(ShaderStage::Fragment, "post/Blur.frag.glsl").with_suffix("_H");
        assert_eq!(output_file_name(&job), PathBuf::from("post/Blur.frag_H.spv"));
    }

    #[test]
    fn test_output_name_ignores_stage_and_macro() {
        let a = ShaderJob::new(ShaderStage::Vertex, "Mesh.glsl").with_suffix("_X");
        let b = ShaderJob::new(ShaderStage::Compute, "Mesh.glsl")
            .with_macro("-D=FOO")
            .with_suffix("_X");
        assert_eq!(output_file_name(&a), output_file_name(&b));
    }

    #[test]
    fn test_paths_join_configured_dirs() {
        let job = ShaderJob::new(ShaderStage::Vertex, "A.glsl");
        assert_eq!(source_path(Path::new("shaders"), &job), Path::new("shaders").join("A.glsl"));
        assert_eq!(output_path(Path::new("shaders/SPV"), &job), Path::new("shaders/SPV").join("A.spv"));
    }

    #[test]
    fn test_staleness_rule() {
        let now = SystemTime::now();
        let earlier = now - Duration::from_secs(10);

        assert!(is_stale(now, None));
        assert!(is_stale(now, Some(now)));
        assert!(is_stale(now, Some(earlier)));
        assert!(!is_stale(earlier, Some(now)));
    }

    #[test]
    fn test_needs_compile_on_disk() {
        let dir = scratch_dir("needs_compile");
        let source = dir.join("A.glsl");
        let output = dir.join("A.spv");
        let now = SystemTime::now();

        touch(&source, now - Duration::from_secs(60));
        assert!(needs_compile(&source, &output).unwrap());

        touch(&output, now);
        assert!(!needs_compile(&source, &output).unwrap());

        touch(&source, now + Duration::from_secs(60));
        assert!(needs_compile(&source, &output).unwrap());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = scratch_dir("missing_source");
        let result = needs_compile(&dir.join("Nope.glsl"), &dir.join("Nope.spv"));
        assert!(result.is_err());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_ensure_output_dir() {
        let dir = scratch_dir("ensure_output");
        let output = dir.join("SPV");

        assert!(ensure_output_dir(&output).unwrap());
        assert!(output.is_dir());
        assert!(!ensure_output_dir(&output).unwrap());

        // not recursive
        assert!(ensure_output_dir(&dir.join("a").join("b")).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
