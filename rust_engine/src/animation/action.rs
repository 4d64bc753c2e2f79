//! 动画动作

use super::AnimKeyFrame;

/// 采样所需的前后关键帧与插值系数
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSpan {
    pub last: usize,
    pub next: usize,
    pub t: f32,
}

/// 动画动作：按时间排序的关键帧序列
#[derive(Clone, Debug)]
pub struct AnimAction {
    pub name: String,
    pub keyframes: Vec<AnimKeyFrame>,
    /// 时长（秒），不小于最后一个关键帧的时间戳
    pub duration: f32,
}

impl AnimAction {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
            duration,
        }
    }

    /// 查找包围 `time` 的关键帧对
    ///
    /// `last` 为时间戳不大于 `time` 的最后一个关键帧，`next` 为其后一帧，
    /// `last` 是最后一帧时循环到第一帧。`time` 早于所有关键帧时返回 None。
    pub fn locate(&self, time: f32) -> Option<FrameSpan> {
        let last = self
            .keyframes
            .iter()
            .rposition(|kf| kf.time_stamp <= time)?;

        let wrapped = last + 1 == self.keyframes.len();
        let next = if wrapped { 0 } else { last + 1 };

        let last_ts = self.keyframes[last].time_stamp;
        let next_ts = self.keyframes[next].time_stamp;
        // 跨越循环点：先走到时长末尾，再从头走到第一帧
        let span = if wrapped {
            (self.duration - last_ts) + next_ts
        } else {
            next_ts - last_ts
        };

        let t = if span > 0.0 { (time - last_ts) / span } else { 0.0 };
        Some(FrameSpan { last, next, t })
    }

    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }
}
