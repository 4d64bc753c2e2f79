//! 模型全局变换

use glam::{Mat4, Vec3};
use rayon::prelude::*;

/// 用模型矩阵变换顶点，写入平铺的 f32 缓冲区（每个顶点 3 个分量）
pub fn apply_world_transform(world: Mat4, positions: &[Vec3], raw_out: &mut [f32], parallel: bool) {
    debug_assert_eq!(positions.len() * 3, raw_out.len());

    if parallel {
        raw_out
            .par_chunks_mut(3)
            .zip(positions.par_iter())
            .for_each(|(chunk, &p)| write_point(chunk, world.transform_point3(p)));
    } else {
        for (chunk, &p) in raw_out.chunks_mut(3).zip(positions.iter()) {
            write_point(chunk, world.transform_point3(p));
        }
    }
}

fn write_point(chunk: &mut [f32], p: Vec3) {
    chunk[0] = p.x;
    chunk[1] = p.y;
    chunk[2] = p.z;
}
