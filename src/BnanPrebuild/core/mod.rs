pub mod bnan_shader_job;
pub mod bnan_compiler;
pub mod bnan_prebuild;
