//! 统计管理器
//!
//! 负责事件的构造、本地落盘与外发投递：
//! - `record` 同步追加本地日志（尽力而为），外发投递 fire-and-forget
//! - 投递失败只记日志，不重排队、不影响调用方
//! - 读侧提供 report / export / clear

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::store::EventLog;
use super::{AdEvent, AnalyticsReport, EventKind, EventSink, PageContext};
use crate::errors::Result;

/// 统计管理器
///
/// 状态封装在结构体内部，便于测试和多实例使用。
#[derive(Clone)]
pub struct AnalyticsManager {
    log: Arc<EventLog>,
    context: Arc<PageContext>,
    /// 外发 Sink（None 表示仅本地记录）
    sink: Option<Arc<dyn EventSink>>,
}

impl AnalyticsManager {
    /// 创建仅本地记录的管理器
    pub fn new(log: Arc<EventLog>, context: PageContext) -> Self {
        Self {
            log,
            context: Arc::new(context),
            sink: None,
        }
    }

    /// 创建带外发投递的管理器
    pub fn with_sink(log: Arc<EventLog>, context: PageContext, sink: Arc<dyn EventSink>) -> Self {
        Self {
            log,
            context: Arc::new(context),
            sink: Some(sink),
        }
    }

    /// 记录一条事件
    ///
    /// 本地追加始终先完成；配置了端点时异步投递同一条记录，
    /// 调用方不等待投递结果。
    pub fn record(&self, kind: EventKind, ad_id: &str, session_id: &str) {
        let event = AdEvent::new(kind, ad_id, &self.context, session_id);
        debug!("Analytics: recording {} for '{}'", kind, ad_id);

        // 1. 本地日志（存储失败在 EventLog 内部消化）
        self.log.append(event.clone());

        // 2. 尽力而为的外发投递（需要 Tokio 运行时；没有就退化为仅本地）
        if let Some(ref sink) = self.sink {
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                warn!(
                    "Analytics delivery skipped for {} '{}': no Tokio runtime",
                    event.event, event.ad_id
                );
                return;
            };
            let sink = Arc::clone(sink);
            handle.spawn(async move {
                if let Err(e) = sink.deliver(&event).await {
                    warn!(
                        "Analytics delivery failed for {} '{}': {}",
                        event.event, event.ad_id, e
                    );
                }
            });
        }
    }

    /// 扫描完整日志生成报表
    pub fn report(&self) -> AnalyticsReport {
        AnalyticsReport::from_events(&self.log.load())
    }

    /// 导出日志为带日期戳的 JSON 文件
    pub fn export<P: Into<PathBuf>>(&self, dir: P) -> Result<PathBuf> {
        self.log.export_to(dir.into())
    }

    /// 清空本地日志
    pub fn clear(&self) -> Result<()> {
        self.log.clear()
    }

    /// 当前日志中的事件数（监控用）
    pub fn log_len(&self) -> usize {
        self.log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct MockSink {
        delivered: Mutex<Vec<AdEvent>>,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl EventSink for MockSink {
        async fn deliver(&self, event: &AdEvent) -> anyhow::Result<()> {
            self.delivered.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct FailingSink {
        attempts: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EventSink for FailingSink {
        async fn deliver(&self, _event: &AdEvent) -> anyhow::Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused")
        }
    }

    fn make_manager(dir: &TempDir, sink: Option<Arc<dyn EventSink>>) -> AnalyticsManager {
        let log = Arc::new(EventLog::open(dir.path().join("events.json")));
        let context = PageContext::new("https://docs.example.com", "Docs");
        match sink {
            Some(sink) => AnalyticsManager::with_sink(log, context, sink),
            None => AnalyticsManager::new(log, context),
        }
    }

    #[tokio::test]
    async fn test_record_appends_and_delivers() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MockSink::new());
        let manager = make_manager(&dir, Some(Arc::clone(&sink) as Arc<dyn EventSink>));

        manager.record(EventKind::Click, "training", "sess_a");
        // 投递是 spawn 出去的，等它跑完
        tokio::task::yield_now().await;
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(manager.log_len(), 1);
        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].ad_id, "training");
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_block_local_append() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(FailingSink {
            attempts: AtomicUsize::new(0),
        });
        let manager = make_manager(&dir, Some(Arc::clone(&sink) as Arc<dyn EventSink>));

        // 不应 panic，也不应阻止本地追加
        manager.record(EventKind::Impression, "page_load", "sess_a");
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(manager.log_len(), 1);
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_record_without_runtime_degrades_to_local_only() {
        // 同步环境下 record 不应 panic：本地追加完成，投递被跳过
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MockSink::new());
        let manager = make_manager(&dir, Some(Arc::clone(&sink) as Arc<dyn EventSink>));

        manager.record(EventKind::Click, "training", "sess_a");

        assert_eq!(manager.log_len(), 1);
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_then_report_is_all_zero() {
        let dir = TempDir::new().unwrap();
        let manager = make_manager(&dir, None);

        manager.record(EventKind::Click, "X", "sess_a");
        manager.record(EventKind::Impression, "X", "sess_a");
        assert_eq!(manager.report().total_events, 2);

        manager.clear().unwrap();
        let report = manager.report();
        assert_eq!(report.total_events, 0);
        assert_eq!(report.clicks, 0);
        assert_eq!(report.impressions, 0);
        assert!(report.ad_performance.is_empty());
    }
}
