//! 骨骼层级构建
//!
//! 从导入场景节点树和网格声明的骨骼构建平铺骨骼表：
//! 1. 在节点树中找到名称匹配任一骨骼的最浅节点作为骨架根
//! 2. 从骨架根广度优先遍历，骨骼节点依次分配下标，非骨骼节点透传

use glam::Mat4;
use std::collections::{HashMap, VecDeque};

use crate::import::{ImportMesh, ImportNode};
use crate::{Result, RigError};

use super::{BoneManager, ROOT_BONE_INDEX};

/// 查找骨架根：名称匹配骨骼的最浅节点，同深度取先序遍历中的第一个
pub fn find_skeleton_root<'a, F>(root: &'a ImportNode, is_bone: F) -> Option<&'a ImportNode>
where
    F: Fn(&str) -> bool,
{
    let mut best: Option<(usize, &'a ImportNode)> = None;
    search_shallowest(root, 0, &is_bone, &mut best);
    best.map(|(_, node)| node)
}

fn search_shallowest<'a, F>(
    node: &'a ImportNode,
    depth: usize,
    is_bone: &F,
    best: &mut Option<(usize, &'a ImportNode)>,
) where
    F: Fn(&str) -> bool,
{
    // 不可能比已找到的更浅
    if matches!(best, Some((found, _)) if depth >= *found) {
        return;
    }
    if is_bone(&node.name) {
        *best = Some((depth, node));
        return;
    }
    for child in &node.children {
        search_shallowest(child, depth + 1, is_bone, best);
    }
}

/// 构建骨骼表
///
/// 骨骼的逆绑定矩阵取第一个声明它的网格。没有网格声明骨骼时只返回根哨兵。
pub fn build_skeleton(root: &ImportNode, meshes: &[&ImportMesh]) -> Result<BoneManager> {
    let mut offsets: HashMap<&str, Mat4> = HashMap::new();
    let mut declared: Vec<&str> = Vec::new();
    for mesh in meshes {
        for bone in &mesh.bones {
            if !offsets.contains_key(bone.name.as_str()) {
                offsets.insert(bone.name.as_str(), bone.offset_matrix);
                declared.push(bone.name.as_str());
            }
        }
    }

    let mut manager = BoneManager::new();
    if declared.is_empty() {
        return Ok(manager);
    }

    let skeleton_root = find_skeleton_root(root, |name| offsets.contains_key(name))
        .ok_or(RigError::MissingSkeletonRoot)?;

    let mut queue: VecDeque<(&ImportNode, usize)> = VecDeque::new();
    queue.push_back((skeleton_root, ROOT_BONE_INDEX));

    while let Some((node, parent_index)) = queue.pop_front() {
        let child_parent = match offsets.get(node.name.as_str()) {
            Some(&offset) if manager.find_bone_by_name(&node.name).is_none() => {
                manager.add_bone(&node.name, parent_index, offset)?
            }
            Some(_) => {
                log::warn!("骨骼节点名称重复，忽略后出现的节点: {}", node.name);
                parent_index
            }
            None => parent_index,
        };
        for child in &node.children {
            queue.push_back((child, child_parent));
        }
    }

    for name in declared {
        if manager.find_bone_by_name(name).is_none() {
            log::warn!("骨骼 '{}' 不在骨架子树中，其顶点权重将被忽略", name);
        }
    }

    Ok(manager)
}
