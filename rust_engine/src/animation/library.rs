//! 动画库构建
//!
//! 将导入的动画轨道转换为按骨骼下标对齐的关键帧序列。
//! 同一动作内各通道的关键帧按下标共享（要求各通道锁步）。

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::import::{ImportAnimation, ImportChannel};
use crate::{Result, RigError};

use super::{AnimAction, AnimKey, AnimKeyFrame};

/// 构建动作表（动作名称 -> 动作）
pub fn build_actions(
    animations: &[ImportAnimation],
    bone_index_map: &HashMap<String, usize>,
    bone_count: usize,
    config: &EngineConfig,
) -> Result<HashMap<String, AnimAction>> {
    let mut actions = HashMap::new();

    for animation in animations {
        let action = build_action(animation, bone_index_map, bone_count, config)?;
        if actions.contains_key(&action.name) {
            log::warn!("动作名称重复，后者覆盖前者: {}", action.name);
        }
        actions.insert(action.name.clone(), action);
    }

    Ok(actions)
}

fn build_action(
    animation: &ImportAnimation,
    bone_index_map: &HashMap<String, usize>,
    bone_count: usize,
    config: &EngineConfig,
) -> Result<AnimAction> {
    let tps = animation.ticks_per_second;
    let mut action = AnimAction::new(
        animation.name.clone(),
        config.ticks_to_seconds(animation.duration, tps),
    );

    for channel in &animation.channels {
        let Some(&bone_index) = bone_index_map.get(&channel.node_name) else {
            continue;
        };
        check_lock_step(&animation.name, channel)?;

        for (k, position) in channel.position_keys.iter().enumerate() {
            let time_stamp = config.ticks_to_seconds(position.time, tps);
            if k == action.keyframes.len() {
                action.keyframes.push(AnimKeyFrame::new(bone_count, time_stamp));
            } else if action.keyframes[k].time_stamp != time_stamp {
                // 关键帧按下标共享，保留先出现的时间
                log::warn!(
                    "动作 '{}' 通道 '{}' 第 {} 个关键帧时间 {} 与已有时间 {} 不一致",
                    animation.name,
                    channel.node_name,
                    k,
                    time_stamp,
                    action.keyframes[k].time_stamp
                );
            }
            action.keyframes[k].key_per_bone[bone_index] = AnimKey {
                translation: position.value,
                rotation: channel.rotation_keys[k].value,
                scale: channel.scaling_keys[k].value,
            };
        }
    }

    validate_action(&mut action)?;
    Ok(action)
}

/// 位置/旋转/缩放关键帧数量必须一致
fn check_lock_step(action: &str, channel: &ImportChannel) -> Result<()> {
    let positions = channel.position_keys.len();
    let rotations = channel.rotation_keys.len();
    let scalings = channel.scaling_keys.len();
    if positions != rotations || positions != scalings {
        return Err(RigError::MalformedAnimation {
            action: action.to_string(),
            reason: format!(
                "channel '{}' has {} position, {} rotation, {} scaling keys",
                channel.node_name, positions, rotations, scalings
            ),
        });
    }
    Ok(())
}

fn validate_action(action: &mut AnimAction) -> Result<()> {
    for pair in action.keyframes.windows(2) {
        if pair[1].time_stamp <= pair[0].time_stamp {
            return Err(RigError::MalformedAnimation {
                action: action.name.clone(),
                reason: format!(
                    "keyframe timestamps not strictly increasing ({} -> {})",
                    pair[0].time_stamp, pair[1].time_stamp
                ),
            });
        }
    }

    if let Some(last) = action.keyframes.last() {
        if action.duration < last.time_stamp {
            log::warn!(
                "动作 '{}' 时长 {} 小于最后关键帧时间 {}，已修正",
                action.name,
                action.duration,
                last.time_stamp
            );
            action.duration = last.time_stamp;
        }
    }

    Ok(())
}
