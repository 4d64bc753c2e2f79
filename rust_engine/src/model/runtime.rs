//! 动画模型运行时

use glam::Mat4;
use rayon::prelude::*;

use crate::animation::{AnimAction, AnimationState};
use crate::config::EngineConfig;
use crate::import::ImportScene;
use crate::skeleton::BoneManager;
use crate::Result;

use super::{load_scene, Mesh};

/// 动画模型实例
///
/// 独占骨骼表、动画状态与全部网格缓冲区，多个实例之间没有共享可变状态。
#[derive(Clone, Debug)]
pub struct SkinnedModel {
    bone_manager: BoneManager,
    animation: AnimationState,
    meshes: Vec<Mesh>,

    // 模型全局变换
    model_transform: Mat4,

    config: EngineConfig,
    debug_logged: bool,
}

impl SkinnedModel {
    pub(crate) fn new(
        bone_manager: BoneManager,
        animation: AnimationState,
        meshes: Vec<Mesh>,
        config: EngineConfig,
    ) -> Self {
        Self {
            bone_manager,
            animation,
            meshes,
            model_transform: Mat4::IDENTITY,
            config,
            debug_logged: false,
        }
    }

    /// 从导入场景加载
    pub fn from_scene(scene: &ImportScene, config: EngineConfig) -> Result<Self> {
        load_scene(scene, config)
    }

    // ========== 动画 ==========

    /// 选择当前动作，计时归零
    pub fn set_current_action(&mut self, name: &str) -> Result<()> {
        self.animation.set_current_action(name)
    }

    pub fn current_action_name(&self) -> Option<&str> {
        self.animation.current_action_name()
    }

    pub fn current_action(&self) -> Option<&AnimAction> {
        self.animation.current_action()
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.animation.action_names()
    }

    pub fn elapsed_time(&self) -> f32 {
        self.animation.elapsed_time()
    }

    /// 每帧更新：采样骨骼 -> 蒙皮 -> 模型变换
    ///
    /// 骨骼表必须完整更新后才能开始蒙皮，失败时本帧缓冲区保持上一帧结果。
    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.animation.update(dt, &mut self.bone_manager)?;
        self.skin_meshes();
        self.refresh_display_positions();

        // 调试日志（只在首次执行）
        if self.config.debug_log && !self.debug_logged {
            self.debug_logged = true;
            log::debug!(
                "首帧更新: action={:?}, elapsed={}, bones={}, meshes={}",
                self.animation.current_action_name(),
                self.animation.elapsed_time(),
                self.bone_manager.bone_count(),
                self.meshes.len(),
            );
        }
        Ok(())
    }

    /// 用当前蒙皮矩阵重新计算所有网格的动画位置
    fn skin_meshes(&mut self) {
        let matrices = self.bone_manager.get_skinning_matrices();
        for mesh in &mut self.meshes {
            let parallel = self.config.use_parallel_skinning(mesh.vertex_count());
            mesh.skin(matrices, parallel);
        }
    }

    /// 只执行模型变换（静态网格可跳过采样与蒙皮）
    pub fn refresh_display_positions(&mut self) {
        let world = self.model_transform;
        for mesh in &mut self.meshes {
            let parallel = self.config.use_parallel_skinning(mesh.vertex_count());
            mesh.apply_transform(world, parallel);
        }
    }

    // ========== 模型变换 ==========

    /// 设置模型全局变换，下一次更新生效
    pub fn set_model_transform(&mut self, transform: Mat4) {
        self.model_transform = transform;
    }

    pub fn model_transform(&self) -> Mat4 {
        self.model_transform
    }

    // ========== 数据访问 ==========

    pub fn bones(&self) -> &BoneManager {
        &self.bone_manager
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// 并行更新多个相互独立的模型实例
pub fn update_models(models: &mut [SkinnedModel], dt: f32) -> Vec<Result<()>> {
    models.par_iter_mut().map(|model| model.update(dt)).collect()
}
