//! 导入场景数据
//!
//! 外部导入器解析模型文件后交给运行时的原始数据。运行时只消费这些数据，
//! 不负责文件解析。

use glam::{Mat4, Quat, Vec3};

/// 导入场景
#[derive(Clone, Debug, Default)]
pub struct ImportScene {
    pub root: Option<ImportNode>,
    pub meshes: Vec<ImportMesh>,
    pub animations: Vec<ImportAnimation>,
    /// 导入器标记场景不完整
    pub incomplete: bool,
}

/// 场景节点
#[derive(Clone, Debug, Default)]
pub struct ImportNode {
    pub name: String,
    /// 引用 `ImportScene::meshes` 的下标
    pub mesh_indices: Vec<usize>,
    pub children: Vec<ImportNode>,
}

impl ImportNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh_indices: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ImportNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_mesh(mut self, mesh_index: usize) -> Self {
        self.mesh_indices.push(mesh_index);
        self
    }
}

/// 网格
#[derive(Clone, Debug, Default)]
pub struct ImportMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub faces: Vec<ImportFace>,
    pub bones: Vec<ImportBone>,
}

#[derive(Clone, Debug, Default)]
pub struct ImportFace {
    pub indices: Vec<u32>,
}

/// 网格引用的骨骼
#[derive(Clone, Debug)]
pub struct ImportBone {
    pub name: String,
    /// 逆绑定矩阵（网格空间 -> 骨骼空间）
    pub offset_matrix: Mat4,
    pub weights: Vec<ImportVertexWeight>,
}

#[derive(Clone, Copy, Debug)]
pub struct ImportVertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// 动画轨道
#[derive(Clone, Debug, Default)]
pub struct ImportAnimation {
    pub name: String,
    /// 时长（tick）
    pub duration: f64,
    /// 为 0 表示未指定
    pub ticks_per_second: f64,
    pub channels: Vec<ImportChannel>,
}

/// 单个节点的动画通道
#[derive(Clone, Debug, Default)]
pub struct ImportChannel {
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
}

#[derive(Clone, Copy, Debug)]
pub struct VectorKey {
    /// 时间（tick）
    pub time: f64,
    pub value: Vec3,
}

#[derive(Clone, Copy, Debug)]
pub struct QuatKey {
    pub time: f64,
    pub value: Quat,
}

impl ImportScene {
    /// 按节点树深度优先顺序收集被引用的网格
    pub fn collect_meshes(&self) -> Vec<&ImportMesh> {
        let mut out = Vec::new();
        if let Some(ref root) = self.root {
            self.collect_node_meshes(root, &mut out);
        }
        out
    }

    fn collect_node_meshes<'a>(&'a self, node: &ImportNode, out: &mut Vec<&'a ImportMesh>) {
        for &idx in &node.mesh_indices {
            match self.meshes.get(idx) {
                Some(mesh) => out.push(mesh),
                None => log::warn!("节点 '{}' 引用了不存在的网格 {}", node.name, idx),
            }
        }
        for child in &node.children {
            self.collect_node_meshes(child, out);
        }
    }
}

impl ImportMesh {
    /// 三角形索引（面索引按顺序展开）
    pub fn flat_indices(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|f| f.indices.iter().copied())
            .collect()
    }

    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }
}

/// 测试用场景构造
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn bone(name: &str, weights: &[(u32, f32)]) -> ImportBone {
        ImportBone {
            name: name.to_string(),
            offset_matrix: Mat4::IDENTITY,
            weights: weights
                .iter()
                .map(|&(vertex_id, weight)| ImportVertexWeight { vertex_id, weight })
                .collect(),
        }
    }

    pub fn mesh(name: &str, positions: &[Vec3], bones: Vec<ImportBone>) -> ImportMesh {
        ImportMesh {
            name: name.to_string(),
            positions: positions.to_vec(),
            faces: vec![ImportFace {
                indices: vec![0, 0, 0],
            }],
            bones,
        }
    }

    /// 位置/旋转/缩放锁步的通道，平移由 `translations` 给出
    pub fn channel(node: &str, translations: &[(f64, Vec3)]) -> ImportChannel {
        ImportChannel {
            node_name: node.to_string(),
            position_keys: translations
                .iter()
                .map(|&(time, value)| VectorKey { time, value })
                .collect(),
            rotation_keys: translations
                .iter()
                .map(|&(time, _)| QuatKey {
                    time,
                    value: Quat::IDENTITY,
                })
                .collect(),
            scaling_keys: translations
                .iter()
                .map(|&(time, _)| VectorKey {
                    time,
                    value: Vec3::ONE,
                })
                .collect(),
        }
    }

    /// 两骨骼链：`Armature` -> `Root` -> `Child`，网格挂在 `Armature` 上。
    /// 顶点 0 (1,0,0) 完全绑定到 `Child`，顶点 1 (0,1,0) 完全绑定到 `Root`。
    /// 动作 `move`：Child 平移 (0,0,0)@0s -> (0,0,5)@1s，时长 1s。
    pub fn two_bone_scene() -> ImportScene {
        let body = mesh(
            "body",
            &[Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![bone("Root", &[(1, 1.0)]), bone("Child", &[(0, 1.0)])],
        );

        let root = ImportNode::new("Armature")
            .with_mesh(0)
            .with_child(ImportNode::new("Root").with_child(ImportNode::new("Child")));

        let animation = ImportAnimation {
            name: "move".to_string(),
            duration: 24.0,
            ticks_per_second: 24.0,
            channels: vec![
                channel("Root", &[(0.0, Vec3::ZERO), (24.0, Vec3::ZERO)]),
                channel("Child", &[(0.0, Vec3::ZERO), (24.0, Vec3::new(0.0, 0.0, 5.0))]),
            ],
        };

        ImportScene {
            root: Some(root),
            meshes: vec![body],
            animations: vec![animation],
            incomplete: false,
        }
    }
}
