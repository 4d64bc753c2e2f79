//! 骨骼节点

use glam::Mat4;

/// 骨骼节点
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    /// 父骨骼下标，0 表示父节点为根哨兵。构建后不变，且总小于自身下标
    pub parent_index: usize,
    /// 逆绑定矩阵（构建后不变）
    pub offset_matrix: Mat4,

    // 变换结果（每次采样更新）
    pub local_transform: Mat4,
    pub global_transform: Mat4,
}

impl Bone {
    pub fn new(name: String, parent_index: usize, offset_matrix: Mat4) -> Self {
        Self {
            name,
            parent_index,
            offset_matrix,
            local_transform: Mat4::IDENTITY,
            global_transform: Mat4::IDENTITY,
        }
    }

    /// 根哨兵：单位变换，无父节点
    pub fn root_sentinel() -> Self {
        Self::new(String::new(), 0, Mat4::IDENTITY)
    }

    /// 获取蒙皮矩阵 = 当前全局变换 * 逆绑定矩阵
    pub fn get_skinning_matrix(&self) -> Mat4 {
        self.global_transform * self.offset_matrix
    }
}

impl Default for Bone {
    fn default() -> Self {
        Self::root_sentinel()
    }
}
