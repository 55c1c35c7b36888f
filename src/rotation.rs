//! 轮换驱动
//!
//! 一个固定周期的后台任务：每次 tick 推进侧边栏索引并重绘，
//! 以配置的概率同时推进底部索引。索引始终对目录长度取模。
//! tick 逻辑独立成同步方法，测试可以不启动定时器直接驱动。

use std::sync::{Arc, Mutex};

use tokio::time::{Duration, sleep};
use tracing::{debug, trace, warn};

use crate::catalog::CatalogSet;
use crate::render::{Placement, Renderer, render_entry};
use crate::session::SessionStore;

/// 随机源抽象，轮换的概率门依赖它
///
/// 注入式设计：生产用线程随机数，测试用固定序列。
pub trait RandomSource: Send + Sync {
    /// 返回 [0, 1) 区间的一个样本
    fn sample(&self) -> f64;
}

/// 线程本地随机数
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// 固定序列随机源（测试用）
///
/// 依次返回给定样本，耗尽后回绕。
pub struct FixedRandom {
    samples: Vec<f64>,
    cursor: Mutex<usize>,
}

impl FixedRandom {
    pub fn new(samples: Vec<f64>) -> Self {
        assert!(!samples.is_empty(), "FixedRandom needs at least one sample");
        Self {
            samples,
            cursor: Mutex::new(0),
        }
    }

    /// 永远通过 / 永远不通过概率门
    pub fn always(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedRandom {
    fn sample(&self) -> f64 {
        let mut cursor = self.cursor.lock().unwrap();
        let value = self.samples[*cursor % self.samples.len()];
        *cursor += 1;
        value
    }
}

/// 当前轮换索引
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationState {
    pub sidebar_index: usize,
    pub footer_index: usize,
}

/// 轮换驱动内部共享状态
struct Inner {
    catalogs: Arc<CatalogSet>,
    renderer: Arc<dyn Renderer>,
    session: Arc<SessionStore>,
    random: Arc<dyn RandomSource>,
    footer_probability: f64,
    state: Mutex<RotationState>,
}

impl Inner {
    /// 执行一次 tick：推进侧边栏，按概率推进底部，重绘可见的投放位
    fn tick(&self) {
        let (sidebar_index, footer_advanced, footer_index) = {
            let mut state = self.state.lock().unwrap();
            state.sidebar_index = (state.sidebar_index + 1) % self.catalogs.sidebar.len();

            let advance_footer = self.random.sample() < self.footer_probability;
            if advance_footer {
                state.footer_index = (state.footer_index + 1) % self.catalogs.footer.len();
            }
            (state.sidebar_index, advance_footer, state.footer_index)
        };

        trace!(
            "Rotation tick: sidebar={}, footer={}{}",
            sidebar_index,
            footer_index,
            if footer_advanced { " (advanced)" } else { "" }
        );

        if self.session.should_show(Placement::Sidebar) {
            render_entry(
                self.renderer.as_ref(),
                Placement::Sidebar,
                self.catalogs.sidebar.get(sidebar_index),
            );
        }
        if footer_advanced && self.session.should_show(Placement::Footer) {
            render_entry(
                self.renderer.as_ref(),
                Placement::Footer,
                self.catalogs.footer.get(footer_index),
            );
        }
    }
}

/// 轮换驱动
///
/// 两个状态：Idle（无定时任务）和 Running（任务活跃）。
/// `start` 进入 Running，`stop` 回到 Idle；重复调用都是幂等的。
pub struct RotationDriver {
    inner: Arc<Inner>,
    interval: Duration,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl RotationDriver {
    pub fn new(
        catalogs: Arc<CatalogSet>,
        renderer: Arc<dyn Renderer>,
        session: Arc<SessionStore>,
        random: Arc<dyn RandomSource>,
        interval: Duration,
        footer_probability: f64,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                catalogs,
                renderer,
                session,
                random,
                footer_probability,
                state: Mutex::new(RotationState::default()),
            }),
            interval,
            task: Mutex::new(None),
        }
    }

    /// 当前索引快照
    pub fn state(&self) -> RotationState {
        *self.inner.state.lock().unwrap()
    }

    /// 是否处于 Running 状态
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }

    /// 手动驱动一次 tick（测试和 CLI 预览用）
    pub fn tick(&self) {
        self.inner.tick();
    }

    /// Idle → Running：启动后台轮换任务
    ///
    /// 已在 Running 时调用是 no-op。需要 Tokio 运行时：
    /// 没有运行时则保持 Idle，只记一条警告（仍可手动 [`tick`](Self::tick)）。
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.as_ref().map(|t| !t.is_finished()).unwrap_or(false) {
            debug!("Rotation already running, ignoring start");
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("Rotation not started: no Tokio runtime");
            return;
        };

        let inner = Arc::clone(&self.inner);
        let interval = self.interval;
        debug!("Starting rotation with interval {:?}", interval);
        *task = Some(handle.spawn(async move {
            loop {
                sleep(interval).await;
                inner.tick();
            }
        }));
    }

    /// Running → Idle：取消后台任务
    ///
    /// Idle 时调用是 no-op。
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
            debug!("Rotation stopped");
        }
    }
}

impl Drop for RotationDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
