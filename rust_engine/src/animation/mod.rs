//! 动画系统
//!
//! 提供动画库构建、关键帧查找与插值、按动作播放的采样状态。

mod action;
mod keyframe;
mod library;
mod state;

pub use action::{AnimAction, FrameSpan};
pub use keyframe::{AnimKey, AnimKeyFrame};
pub use library::build_actions;
pub use state::{sample_action, AnimationState};
