//! 动画关键帧

use glam::{Mat4, Quat, Vec3};

/// 单个骨骼在某一时刻的姿态
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimKey {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for AnimKey {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl AnimKey {
    /// 本地变换：先缩放、旋转（绕自身轴），再平移
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// 平移与缩放线性插值，旋转球面插值
    pub fn interpolate(&self, next: &AnimKey, t: f32) -> AnimKey {
        // t 为 0 时精确返回起始姿态（slerp 的三角函数路径会引入舍入误差）
        if t <= 0.0 {
            return *self;
        }
        AnimKey {
            translation: self.translation.lerp(next.translation, t),
            rotation: self.rotation.slerp(next.rotation, t),
            scale: self.scale.lerp(next.scale, t),
        }
    }
}

/// 关键帧：所有骨骼在同一时刻的姿态，按骨骼下标存放
#[derive(Clone, Debug)]
pub struct AnimKeyFrame {
    pub key_per_bone: Vec<AnimKey>,
    /// 时间戳（秒）
    pub time_stamp: f32,
}

impl AnimKeyFrame {
    /// 所有骨骼为单位姿态的关键帧
    pub fn new(bone_count: usize, time_stamp: f32) -> Self {
        Self {
            key_per_bone: vec![AnimKey::default(); bone_count],
            time_stamp,
        }
    }
}
