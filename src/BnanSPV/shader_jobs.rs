use anyhow::Result;

use BnanPrebuild::{ShaderJob, ShaderJobList, ShaderStage};

const DIR_SHADOW: &str = "-D=PIPELINE_STAGE_DIR_SHADOW";
const OMNI_SHADOW: &str = "-D=PIPELINE_STAGE_OMNI_SHADOW";

pub fn application_shaders() -> Result<ShaderJobList> {
    ShaderJobList::new(vec![
        ShaderJob::new(ShaderStage::Vertex, "ScreenVert.glsl"),
        ShaderJob::new(ShaderStage::Fragment, "PostProcess.glsl"),
        ShaderJob::new(ShaderStage::Fragment, "LightingPass.glsl"),
        ShaderJob::new(ShaderStage::Fragment, "FinalBlit.glsl"),

        // Mesh
        ShaderJob::new(ShaderStage::Vertex, "MeshVert.glsl"),
        ShaderJob::new(ShaderStage::Fragment, "MeshFrag.glsl"),

        ShaderJob::new(ShaderStage::Vertex, "MeshVert.glsl").with_macro(DIR_SHADOW).with_suffix("_DirShadow"),
        ShaderJob::new(ShaderStage::Fragment, "MeshFrag.glsl").with_macro(DIR_SHADOW).with_suffix("_DirShadow"),

        ShaderJob::new(ShaderStage::Vertex, "MeshVert.glsl").with_macro(OMNI_SHADOW).with_suffix("_OmniShadow"),
        ShaderJob::new(ShaderStage::Fragment, "MeshFrag.glsl").with_macro(OMNI_SHADOW).with_suffix("_OmniShadow"),
    ])
}
