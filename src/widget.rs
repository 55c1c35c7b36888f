//! 广告组件
//!
//! 把目录、轮换、会话、追踪、统计组装成一个显式实例，
//! 配置在构造时注入，生命周期通过 `init` / `stop` 控制。
//! 没有全局注册，多个实例可以共存（测试友好）。

use std::sync::Arc;

use tokio::time::Duration;
use tracing::info;

use crate::analytics::{AnalyticsManager, EventLog, EventSink, HttpSink, PageContext};
use crate::catalog::CatalogSet;
use crate::config::AdsConfig;
use crate::errors::Result;
use crate::render::{Placement, Renderer, render_entry};
use crate::rotation::{RandomSource, RotationDriver, RotationState, ThreadRandom};
use crate::session::SessionStore;
use crate::tracker::{EventTracker, TagHook};

/// 可选的注入点，默认值覆盖生产场景
#[derive(Default)]
pub struct WidgetOptions {
    /// 覆盖内置内容目录
    pub catalogs: Option<CatalogSet>,
    /// 覆盖随机源（测试驱动概率门）
    pub random: Option<Arc<dyn RandomSource>>,
    /// 宿主打点钩子
    pub hook: Option<Arc<dyn TagHook>>,
    /// 覆盖投递 Sink（默认按配置的端点建 HttpSink）
    pub sink: Option<Arc<dyn EventSink>>,
}

/// 广告组件实例
pub struct AdsWidget {
    config: AdsConfig,
    context: PageContext,
    catalogs: Arc<CatalogSet>,
    renderer: Arc<dyn Renderer>,
    session: Arc<SessionStore>,
    tracker: EventTracker,
    analytics: AnalyticsManager,
    rotation: RotationDriver,
}

impl AdsWidget {
    /// 以默认目录和线程随机源构造
    pub fn new(config: AdsConfig, context: PageContext, renderer: Arc<dyn Renderer>) -> Result<Self> {
        Self::with_options(config, context, renderer, WidgetOptions::default())
    }

    /// 构造并注入可选部件
    pub fn with_options(
        config: AdsConfig,
        context: PageContext,
        renderer: Arc<dyn Renderer>,
        options: WidgetOptions,
    ) -> Result<Self> {
        config.validate()?;

        let catalogs = Arc::new(options.catalogs.unwrap_or_default());
        let random = options
            .random
            .unwrap_or_else(|| Arc::new(ThreadRandom) as Arc<dyn RandomSource>);
        let session = Arc::new(SessionStore::new());

        let log = Arc::new(EventLog::open(&config.analytics_file));
        let sink = options.sink.or_else(|| {
            config.analytics_endpoint.as_ref().map(|endpoint| {
                Arc::new(HttpSink::new(
                    endpoint.clone(),
                    Duration::from_millis(config.delivery_timeout_ms),
                    config.delivery_retries,
                )) as Arc<dyn EventSink>
            })
        });
        let analytics = match sink {
            Some(sink) => AnalyticsManager::with_sink(log, context.clone(), sink),
            None => AnalyticsManager::new(log, context.clone()),
        };

        let mut tracker = EventTracker::new(
            analytics.clone(),
            Arc::clone(&session),
            config.enable_analytics,
        );
        if let Some(hook) = options.hook {
            tracker = tracker.with_hook(hook);
        }

        let rotation = RotationDriver::new(
            Arc::clone(&catalogs),
            Arc::clone(&renderer),
            Arc::clone(&session),
            random,
            Duration::from_millis(config.rotation_interval_ms),
            config.footer_rotation_probability,
        );

        Ok(Self {
            config,
            context,
            catalogs,
            renderer,
            session,
            tracker,
            analytics,
            rotation,
        })
    }

    /// 初始化：首绘可见的投放位、记录页面曝光、启动轮换
    pub fn init(&self) {
        info!("Initializing docads widget");

        let state = self.rotation.state();
        for (placement, entry) in [
            (
                Placement::Sidebar,
                self.catalogs.sidebar.get(state.sidebar_index),
            ),
            (
                Placement::Footer,
                self.catalogs.footer.get(state.footer_index),
            ),
        ] {
            if self.session.should_show(placement) {
                render_entry(self.renderer.as_ref(), placement, entry);
                self.renderer.set_visible(placement, true);
            } else {
                self.renderer.set_visible(placement, false);
            }
        }

        self.tracker.track_impression(&self.context.page_url);
        self.rotation.start();

        info!("Widget initialization completed");
    }

    /// 用户关闭一个投放位：本会话内不再展示，立即隐藏
    pub fn dismiss(&self, placement: Placement) {
        self.session.dismiss(placement);
        self.renderer.set_visible(placement, false);
    }

    /// 宿主在 CTA 被激活时调用
    pub fn click(&self, ad_id: &str) {
        self.tracker.track_click(ad_id);
    }

    /// 停止轮换（页面卸载等价操作）
    pub fn stop(&self) {
        self.rotation.stop();
    }

    /// 手动驱动一次轮换 tick
    pub fn tick(&self) {
        self.rotation.tick();
    }

    /// 当前轮换索引
    pub fn rotation_state(&self) -> RotationState {
        self.rotation.state()
    }

    /// 本会话标识
    pub fn session_id(&self) -> String {
        self.session.session_id()
    }

    pub fn should_show(&self, placement: Placement) -> bool {
        self.session.should_show(placement)
    }

    /// 统计汇总
    pub fn report(&self) -> crate::analytics::AnalyticsReport {
        self.analytics.report()
    }

    /// 导出事件日志，返回写入路径
    pub fn export(&self) -> Result<std::path::PathBuf> {
        self.analytics.export(self.config.export_dir.clone())
    }

    /// 清空本地事件日志，并重新生成会话标识
    ///
    /// 清空之后记录的事件归属于新的会话，关闭标记不受影响。
    pub fn clear_analytics(&self) -> Result<()> {
        self.analytics.clear()?;
        self.session.reset();
        Ok(())
    }
}
