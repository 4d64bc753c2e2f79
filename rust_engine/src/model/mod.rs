//! 动画模型运行时管理

mod loader;
mod mesh;
mod runtime;

pub use loader::{assign_vertex_weights, load_scene};
pub use mesh::Mesh;
pub use runtime::{update_models, SkinnedModel};

/// 每个顶点最多受影响的骨骼数
pub const MAX_BONE_INFLUENCES: usize = 4;

/// 顶点骨骼权重：4 个 (骨骼下标, 权重) 槽位，权重为 0 的槽位空闲
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexWeight {
    pub bone_indices: [usize; MAX_BONE_INFLUENCES],
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl VertexWeight {
    /// 放入第一个空闲槽位，已满时丢弃并返回 false
    pub fn add(&mut self, bone_index: usize, weight: f32) -> bool {
        match self.weights.iter().position(|&w| w == 0.0) {
            Some(slot) => {
                self.bone_indices[slot] = bone_index;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    /// 已占用的槽位数
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}
