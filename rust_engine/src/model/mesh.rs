//! 网格与逐帧缓冲区

use glam::{Mat4, Vec3};

use crate::skinning::{apply_world_transform, compute_skinning, SkinningInput};

use super::VertexWeight;

/// 网格
///
/// 绑定姿态位置从不改写；蒙皮结果与渲染缓冲区在加载时分配，逐帧复用。
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    base_positions: Vec<Vec3>,
    weights: Vec<VertexWeight>,
    indices: Vec<u32>,

    // 运行时数据
    animated_positions: Vec<Vec3>,
    /// 渲染用平铺缓冲区
    display_positions: Vec<f32>,
}

impl Mesh {
    /// `weights` 为空表示无蒙皮，否则长度须与顶点数一致
    pub fn new(
        name: String,
        base_positions: Vec<Vec3>,
        weights: Vec<VertexWeight>,
        indices: Vec<u32>,
    ) -> Self {
        debug_assert!(weights.is_empty() || weights.len() == base_positions.len());
        let animated_positions = base_positions.clone();
        let display_positions = base_positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect();
        Self {
            name,
            base_positions,
            weights,
            indices,
            animated_positions,
            display_positions,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.base_positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_skinned(&self) -> bool {
        !self.weights.is_empty()
    }

    pub fn base_positions(&self) -> &[Vec3] {
        &self.base_positions
    }

    pub fn weights(&self) -> &[VertexWeight] {
        &self.weights
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn animated_positions(&self) -> &[Vec3] {
        &self.animated_positions
    }

    /// 最终渲染位置（每个顶点 3 个 f32）
    pub fn display_positions(&self) -> &[f32] {
        &self.display_positions
    }

    /// 用蒙皮矩阵重新计算动画位置
    pub fn skin(&mut self, bone_matrices: &[Mat4], parallel: bool) {
        let input = SkinningInput {
            positions: &self.base_positions,
            weights: &self.weights,
            bone_matrices,
        };
        compute_skinning(&input, &mut self.animated_positions, parallel);
    }

    /// 对动画位置应用模型矩阵，写入渲染缓冲区
    pub fn apply_transform(&mut self, world: Mat4, parallel: bool) {
        apply_world_transform(
            world,
            &self.animated_positions,
            &mut self.display_positions,
            parallel,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_start_at_base_pose() {
        let mesh = Mesh::new(
            "quad".to_string(),
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)],
            Vec::new(),
            vec![0, 1, 1],
        );
        assert!(!mesh.is_skinned());
        assert_eq!(mesh.animated_positions(), mesh.base_positions());
        assert_eq!(mesh.display_positions(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_skin_then_transform_keeps_base() {
        let mut weight = VertexWeight::default();
        weight.add(1, 1.0);
        let mut mesh = Mesh::new(
            "tri".to_string(),
            vec![Vec3::X],
            vec![weight],
            vec![0, 0, 0],
        );
        let matrices = [Mat4::IDENTITY, Mat4::from_translation(Vec3::Z)];
        mesh.skin(&matrices, false);
        mesh.apply_transform(Mat4::from_translation(Vec3::Y), false);

        assert_eq!(mesh.base_positions(), &[Vec3::X]);
        assert_eq!(mesh.animated_positions(), &[Vec3::new(1.0, 0.0, 1.0)]);
        assert_eq!(mesh.display_positions(), &[1.0, 1.0, 1.0]);
    }
}
