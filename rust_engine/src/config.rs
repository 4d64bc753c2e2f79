//! 引擎配置
//!
//! 所有参数扁平化，每个模型实例持有一份，不使用全局状态。

/// 引擎配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // ========== 动画 ==========
    /// 导入动画未给出 ticks_per_second（为 0）时使用的默认值，默认 25.0
    pub default_ticks_per_second: f64,

    // ========== 蒙皮 ==========
    /// 是否使用 rayon 并行蒙皮，默认 true
    pub parallel_skinning: bool,
    /// 顶点数达到此值才走并行路径，默认 4096
    /// 顶点太少时线程调度开销大于收益
    pub parallel_min_vertices: usize,

    // ========== 调试 ==========
    /// 是否输出首帧调试日志，默认 false
    pub debug_log: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // 与常见导入器约定一致：缺省 25 tick/秒
            default_ticks_per_second: 25.0,

            parallel_skinning: true,
            parallel_min_vertices: 4096,

            debug_log: false,
        }
    }
}

impl EngineConfig {
    /// 将导入的 tick 换算为秒
    pub fn ticks_to_seconds(&self, ticks: f64, ticks_per_second: f64) -> f32 {
        let tps = if ticks_per_second > 0.0 {
            ticks_per_second
        } else {
            self.default_ticks_per_second
        };
        (ticks / tps) as f32
    }

    /// 给定顶点数时是否使用并行蒙皮
    pub fn use_parallel_skinning(&self, vertex_count: usize) -> bool {
        self.parallel_skinning && vertex_count >= self.parallel_min_vertices
    }
}
