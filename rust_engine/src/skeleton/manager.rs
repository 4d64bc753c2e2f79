//! 骨骼管理器

use glam::Mat4;
use std::collections::HashMap;

use super::{Bone, ROOT_BONE_INDEX};
use crate::{Result, RigError};

/// 骨骼管理器
///
/// 骨骼按下标平铺存放，下标 0 为根哨兵。父骨骼总在子骨骼之前，
/// 全局变换只需按下标升序遍历一次。
#[derive(Clone, Debug)]
pub struct BoneManager {
    bones: Vec<Bone>,
    name_to_index: HashMap<String, usize>,
    skinning_matrices: Vec<Mat4>,
}

impl BoneManager {
    /// 只含根哨兵的骨骼表
    pub fn new() -> Self {
        Self {
            bones: vec![Bone::root_sentinel()],
            name_to_index: HashMap::new(),
            skinning_matrices: vec![Mat4::IDENTITY],
        }
    }

    /// 添加骨骼，返回分配的下标
    ///
    /// 父骨骼必须已经存在（`parent_index < index`），否则返回错误且骨骼表不变。
    pub fn add_bone(
        &mut self,
        name: &str,
        parent_index: usize,
        offset_matrix: Mat4,
    ) -> Result<usize> {
        let index = self.bones.len();
        if parent_index >= index {
            return Err(RigError::InvalidBoneParent {
                bone: name.to_string(),
                parent: parent_index,
            });
        }
        self.name_to_index.insert(name.to_string(), index);
        self.bones
            .push(Bone::new(name.to_string(), parent_index, offset_matrix));
        self.skinning_matrices.push(Mat4::IDENTITY);
        Ok(index)
    }

    /// 通过名称查找骨骼
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// 名称 -> 下标映射
    pub fn bone_index_map(&self) -> &HashMap<String, usize> {
        &self.name_to_index
    }

    /// 骨骼数量（含根哨兵）
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn get_bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// 设置骨骼本地变换，根哨兵不可修改
    pub fn set_local_transform(&mut self, index: usize, transform: Mat4) {
        if index == ROOT_BONE_INDEX {
            return;
        }
        if let Some(bone) = self.bones.get_mut(index) {
            bone.local_transform = transform;
        }
    }

    /// 按下标升序更新全局变换与蒙皮矩阵
    pub fn update_global_transforms(&mut self) {
        for i in 1..self.bones.len() {
            let parent_global = self.bones[self.bones[i].parent_index].global_transform;
            let bone = &mut self.bones[i];
            bone.global_transform = parent_global * bone.local_transform;
            self.skinning_matrices[i] = bone.get_skinning_matrix();
        }
    }

    /// 获取全局变换
    pub fn get_global_transform(&self, index: usize) -> Mat4 {
        self.bones
            .get(index)
            .map(|b| b.global_transform)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// 获取蒙皮矩阵数组（下标与骨骼一致，0 为单位矩阵）
    pub fn get_skinning_matrices(&self) -> &[Mat4] {
        &self.skinning_matrices
    }
}

impl Default for BoneManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_has_only_sentinel() {
        let manager = BoneManager::new();
        assert_eq!(manager.bone_count(), 1);
        assert_eq!(manager.get_skinning_matrices(), &[Mat4::IDENTITY]);
        assert!(manager.find_bone_by_name("").is_none());
    }

    #[test]
    fn test_global_transform_chain() {
        let mut manager = BoneManager::new();
        let a = manager.add_bone("a", 0, Mat4::IDENTITY).unwrap();
        let offset_b = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
        let b = manager.add_bone("b", a, offset_b).unwrap();

        manager.set_local_transform(a, Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        manager.set_local_transform(b, Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)));
        manager.update_global_transforms();

        let global_b = manager.get_global_transform(b);
        assert!(global_b
            .w_axis
            .truncate()
            .abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));

        // 蒙皮矩阵 = 全局 * 逆绑定
        let skin_b = manager.get_skinning_matrices()[b];
        assert!(skin_b
            .w_axis
            .truncate()
            .abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert_eq!(manager.get_skinning_matrices()[0], Mat4::IDENTITY);
    }

    #[test]
    fn test_sentinel_is_immutable() {
        let mut manager = BoneManager::new();
        manager.set_local_transform(0, Mat4::from_scale(Vec3::splat(2.0)));
        manager.update_global_transforms();
        assert_eq!(manager.get_global_transform(0), Mat4::IDENTITY);
    }

    #[test]
    fn test_add_bone_rejects_missing_parent() {
        let mut manager = BoneManager::new();
        let a = manager.add_bone("a", 0, Mat4::IDENTITY).unwrap();

        // 父骨骼不能是自己或尚未添加的骨骼
        assert_eq!(
            manager.add_bone("b", 2, Mat4::IDENTITY),
            Err(RigError::InvalidBoneParent {
                bone: "b".to_string(),
                parent: 2,
            })
        );
        assert!(manager.add_bone("c", 5, Mat4::IDENTITY).unwrap_err().is_load_error());

        assert_eq!(manager.bone_count(), 2);
        assert_eq!(manager.get_skinning_matrices().len(), 2);
        assert!(manager.find_bone_by_name("b").is_none());
        assert_eq!(manager.add_bone("b", a, Mat4::IDENTITY), Ok(2));
    }
}
