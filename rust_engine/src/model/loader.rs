//! 从导入场景加载模型

use crate::animation::{build_actions, AnimationState};
use crate::config::EngineConfig;
use crate::import::{ImportMesh, ImportScene};
use crate::skeleton::{build_skeleton, BoneManager};
use crate::{Result, RigError};

use super::{Mesh, SkinnedModel, VertexWeight};

/// 从导入场景构建模型
///
/// 任何加载错误都使模型不可用，不存在部分成功。
pub fn load_scene(scene: &ImportScene, config: EngineConfig) -> Result<SkinnedModel> {
    if scene.incomplete {
        return Err(RigError::IncompleteScene);
    }
    let root = scene.root.as_ref().ok_or(RigError::IncompleteScene)?;

    let import_meshes = scene.collect_meshes();
    if import_meshes.is_empty() {
        return Err(RigError::NoMeshData);
    }

    // 骨骼
    let bone_manager = build_skeleton(root, &import_meshes)?;

    // 网格
    let mut meshes = Vec::with_capacity(import_meshes.len());
    for import_mesh in &import_meshes {
        let indices = import_mesh.flat_indices();
        let vertex_count = import_mesh.positions.len();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(RigError::MalformedMesh {
                mesh: import_mesh.name.clone(),
                reason: format!("index {} out of range ({} vertices)", bad, vertex_count),
            });
        }

        let weights = assign_vertex_weights(import_mesh, &bone_manager)?;
        meshes.push(Mesh::new(
            import_mesh.name.clone(),
            import_mesh.positions.clone(),
            weights,
            indices,
        ));
    }

    // 动画
    let actions = build_actions(
        &scene.animations,
        bone_manager.bone_index_map(),
        bone_manager.bone_count(),
        &config,
    )?;

    log::info!(
        "模型加载完成: {} 个网格, {} 个顶点, {} 根骨骼, {} 个动作",
        meshes.len(),
        meshes.iter().map(Mesh::vertex_count).sum::<usize>(),
        bone_manager.bone_count() - 1,
        actions.len()
    );

    Ok(SkinnedModel::new(
        bone_manager,
        AnimationState::new(actions),
        meshes,
        config,
    ))
}

/// 为网格的每个顶点分配骨骼权重
///
/// 按骨骼声明顺序放入第一个空闲槽位，超过 4 个的影响直接丢弃（先到先得）。
/// 网格没有骨骼时返回空数组。
pub fn assign_vertex_weights(
    mesh: &ImportMesh,
    bones: &BoneManager,
) -> Result<Vec<VertexWeight>> {
    if !mesh.has_bones() {
        return Ok(Vec::new());
    }

    let vertex_count = mesh.positions.len();
    let mut weights = vec![VertexWeight::default(); vertex_count];
    let mut dropped = 0usize;

    for bone in &mesh.bones {
        // 不在骨架中的骨骼已在构建时告警
        let Some(bone_index) = bones.find_bone_by_name(&bone.name) else {
            continue;
        };
        for vw in &bone.weights {
            if vw.weight <= 0.0 {
                continue;
            }
            let slot = weights
                .get_mut(vw.vertex_id as usize)
                .ok_or_else(|| RigError::MalformedMesh {
                    mesh: mesh.name.clone(),
                    reason: format!(
                        "bone '{}' weights vertex {} ({} vertices)",
                        bone.name, vw.vertex_id, vertex_count
                    ),
                })?;
            if !slot.add(bone_index, vw.weight) {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        log::debug!(
            "网格 '{}' 有 {} 个骨骼影响超过每顶点 4 个的上限，已丢弃",
            mesh.name,
            dropped
        );
    }

    Ok(weights)
}
