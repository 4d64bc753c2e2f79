//! 线性混合蒙皮

use glam::{Mat4, Vec3};
use rayon::prelude::*;

use super::SkinningInput;
use crate::model::VertexWeight;

/// 计算蒙皮，结果写入 `output`（长度与顶点数一致，逐帧复用）
///
/// 没有权重数据的网格原样拷贝绑定姿态。
pub fn compute_skinning(input: &SkinningInput, output: &mut [Vec3], parallel: bool) {
    debug_assert_eq!(input.positions.len(), output.len());

    if input.weights.is_empty() {
        output.copy_from_slice(input.positions);
        return;
    }

    let matrices = input.bone_matrices;
    if parallel {
        output
            .par_iter_mut()
            .zip(input.positions.par_iter())
            .zip(input.weights.par_iter())
            .for_each(|((out, &position), weight)| {
                *out = compute_single_vertex(position, weight, matrices);
            });
    } else {
        for ((out, &position), weight) in output
            .iter_mut()
            .zip(input.positions.iter())
            .zip(input.weights.iter())
        {
            *out = compute_single_vertex(position, weight, matrices);
        }
    }
}

/// 计算单个顶点：各影响骨骼变换结果按权重求和（不做归一化）
///
/// 没有任何骨骼影响的顶点保持绑定姿态。
fn compute_single_vertex(position: Vec3, weight: &VertexWeight, matrices: &[Mat4]) -> Vec3 {
    if weight.influence_count() == 0 {
        return position;
    }
    let mut pos = Vec3::ZERO;
    for (&bone, &w) in weight.bone_indices.iter().zip(weight.weights.iter()) {
        if w == 0.0 {
            continue;
        }
        pos += get_matrix(matrices, bone).transform_point3(position) * w;
    }
    pos
}

fn get_matrix(matrices: &[Mat4], index: usize) -> Mat4 {
    matrices.get(index).copied().unwrap_or(Mat4::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn matrices() -> Vec<Mat4> {
        vec![
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(0.0, 0.0, 2.5)),
            Mat4::from_rotation_translation(Quat::from_rotation_y(0.7), Vec3::new(1.0, -2.0, 3.0)),
        ]
    }

    #[test]
    fn test_unskinned_is_bit_identical() {
        let positions = vec![Vec3::new(0.1, -0.2, 0.3), Vec3::new(1e-7, 3.5, -8.25)];
        let mut output = vec![Vec3::ZERO; 2];
        let matrices = matrices();
        let input = SkinningInput {
            positions: &positions,
            weights: &[],
            bone_matrices: &matrices,
        };
        compute_skinning(&input, &mut output, false);
        assert_eq!(output, positions);
    }

    #[test]
    fn test_single_bone_matches_matrix_exactly() {
        let positions = vec![Vec3::new(0.3, 1.7, -2.2)];
        let mut weight = VertexWeight::default();
        weight.add(2, 1.0);
        let matrices = matrices();
        let input = SkinningInput {
            positions: &positions,
            weights: &[weight],
            bone_matrices: &matrices,
        };
        let mut output = vec![Vec3::ZERO];
        compute_skinning(&input, &mut output, false);
        assert_eq!(output[0], matrices[2].transform_point3(positions[0]));
    }

    #[test]
    fn test_vertex_without_influence_keeps_base() {
        let positions = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 5.0)];
        let mut bound = VertexWeight::default();
        bound.add(1, 1.0);
        let weights = [bound, VertexWeight::default()];
        let matrices = matrices();
        let input = SkinningInput {
            positions: &positions,
            weights: &weights,
            bone_matrices: &matrices,
        };
        let mut output = vec![Vec3::ZERO; 2];
        compute_skinning(&input, &mut output, false);
        assert_eq!(output[0], Vec3::new(1.0, 0.0, 2.5));
        assert_eq!(output[1], positions[1]);
    }

    #[test]
    fn test_weighted_sum() {
        let positions = vec![Vec3::new(1.0, 0.0, 0.0)];
        let mut weight = VertexWeight::default();
        weight.add(0, 0.5);
        weight.add(1, 0.5);
        let matrices = matrices();
        let input = SkinningInput {
            positions: &positions,
            weights: &[weight],
            bone_matrices: &matrices,
        };
        let mut output = vec![Vec3::ZERO];
        compute_skinning(&input, &mut output, false);
        assert!(output[0].abs_diff_eq(Vec3::new(1.0, 0.0, 1.25), 1e-6));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let positions: Vec<Vec3> = (0..257)
            .map(|i| Vec3::new(i as f32 * 0.1, (i % 7) as f32, -(i as f32)))
            .collect();
        let weights: Vec<VertexWeight> = (0..257)
            .map(|i| {
                let mut w = VertexWeight::default();
                w.add(1 + i % 2, 0.75);
                w.add(0, 0.25);
                w
            })
            .collect();
        let matrices = matrices();
        let input = SkinningInput {
            positions: &positions,
            weights: &weights,
            bone_matrices: &matrices,
        };

        let mut serial = vec![Vec3::ZERO; positions.len()];
        let mut parallel = vec![Vec3::ZERO; positions.len()];
        compute_skinning(&input, &mut serial, false);
        compute_skinning(&input, &mut parallel, true);
        assert_eq!(serial, parallel);
    }
}
