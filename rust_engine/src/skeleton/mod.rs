//! 骨骼系统

mod bone;
mod builder;
mod manager;

pub use bone::Bone;
pub use builder::{build_skeleton, find_skeleton_root};
pub use manager::BoneManager;

/// 根哨兵骨骼的下标，真实骨骼从 1 开始
pub const ROOT_BONE_INDEX: usize = 0;
