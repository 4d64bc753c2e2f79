//! 顶点蒙皮计算

mod skinning;
mod transform;

pub use skinning::compute_skinning;
pub use transform::apply_world_transform;

use glam::{Mat4, Vec3};
use crate::model::VertexWeight;

/// 蒙皮输入数据
pub struct SkinningInput<'a> {
    /// 原始顶点位置（绑定姿态）
    pub positions: &'a [Vec3],
    /// 顶点权重，为空表示无蒙皮
    pub weights: &'a [VertexWeight],
    /// 骨骼蒙皮矩阵（已乘以逆绑定矩阵）
    pub bone_matrices: &'a [Mat4],
}
