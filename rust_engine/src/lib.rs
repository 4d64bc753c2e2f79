//! Rig Engine - 骨骼动画与蒙皮运行时
//!
//! 提供：
//! - 从导入场景构建骨骼层级
//! - 动画库构建与关键帧采样
//! - 线性混合蒙皮
//! - 模型全局变换

pub mod animation;
pub mod config;
pub mod import;
pub mod model;
pub mod skeleton;
pub mod skinning;

pub use animation::{AnimAction, AnimKey, AnimKeyFrame, AnimationState};
pub use config::EngineConfig;
pub use import::ImportScene;
pub use model::{update_models, Mesh, SkinnedModel, VertexWeight};
pub use skeleton::{Bone, BoneManager};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    #[error("Import scene is incomplete or has no root node")]
    IncompleteScene,

    #[error("Import scene contains no mesh data")]
    NoMeshData,

    #[error("No skeleton root node found for skinned meshes")]
    MissingSkeletonRoot,

    #[error("Malformed animation '{action}': {reason}")]
    MalformedAnimation { action: String, reason: String },

    #[error("Malformed mesh '{mesh}': {reason}")]
    MalformedMesh { mesh: String, reason: String },

    #[error("Bone '{bone}' has invalid parent index {parent}")]
    InvalidBoneParent { bone: String, parent: usize },

    #[error("Animation action not found: {0}")]
    UnknownAction(String),

    #[error("No animation action selected")]
    NoActionSelected,

    #[error("Time {time} precedes every keyframe of action '{action}'")]
    TimeOutOfRange { action: String, time: f32 },
}

impl RigError {
    /// 是否为加载阶段错误（模型不可用）
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            RigError::IncompleteScene
                | RigError::NoMeshData
                | RigError::MissingSkeletonRoot
                | RigError::MalformedAnimation { .. }
                | RigError::MalformedMesh { .. }
                | RigError::InvalidBoneParent { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RigError>;
