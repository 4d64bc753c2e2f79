//! 动画采样状态
//!
//! 每个模型实例独占一份：未选择动作时不能采样，
//! `set_current_action` 之后进入播放状态并从 0 开始计时。

use std::collections::HashMap;

use crate::skeleton::BoneManager;
use crate::{Result, RigError};

use super::AnimAction;

/// 动画状态
#[derive(Clone, Debug, Default)]
pub struct AnimationState {
    actions: HashMap<String, AnimAction>,
    current_action: Option<String>,
    elapsed_time: f32,
}

impl AnimationState {
    pub fn new(actions: HashMap<String, AnimAction>) -> Self {
        Self {
            actions,
            current_action: None,
            elapsed_time: 0.0,
        }
    }

    /// 选择当前动作，计时归零
    pub fn set_current_action(&mut self, name: &str) -> Result<()> {
        if !self.actions.contains_key(name) {
            return Err(RigError::UnknownAction(name.to_string()));
        }
        self.current_action = Some(name.to_string());
        self.elapsed_time = 0.0;
        Ok(())
    }

    pub fn current_action_name(&self) -> Option<&str> {
        self.current_action.as_deref()
    }

    pub fn current_action(&self) -> Option<&AnimAction> {
        self.current_action
            .as_ref()
            .and_then(|name| self.actions.get(name))
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn get_action(&self, name: &str) -> Option<&AnimAction> {
        self.actions.get(name)
    }

    /// 动作名称列表（已排序）
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// 推进时间并把当前动作的姿态写入骨骼表
    ///
    /// 每次调用最多回绕一次时长；帧间隔大于动作时长时结果不再循环一致。
    pub fn update(&mut self, dt: f32, bones: &mut BoneManager) -> Result<()> {
        let action = self
            .current_action
            .as_ref()
            .and_then(|name| self.actions.get(name))
            .ok_or(RigError::NoActionSelected)?;

        self.elapsed_time += dt;
        if self.elapsed_time > action.duration {
            self.elapsed_time -= action.duration;
        }

        sample_action(action, self.elapsed_time, bones)
    }
}

/// 在指定时间采样动作：插值本地变换并按层级合成全局与蒙皮矩阵
pub fn sample_action(action: &AnimAction, time: f32, bones: &mut BoneManager) -> Result<()> {
    let span = action
        .locate(time)
        .ok_or_else(|| RigError::TimeOutOfRange {
            action: action.name.clone(),
            time,
        })?;

    let last = &action.keyframes[span.last];
    let next = &action.keyframes[span.next];

    // 跳过根哨兵
    for i in 1..bones.bone_count() {
        let (Some(a), Some(b)) = (last.key_per_bone.get(i), next.key_per_bone.get(i)) else {
            continue;
        };
        bones.set_local_transform(i, a.interpolate(b, span.t).to_matrix());
    }

    bones.update_global_transforms();
    Ok(())
}
