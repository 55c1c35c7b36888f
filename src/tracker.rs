//! 事件追踪
//!
//! CTA 激活和页面曝光的入口。事件一路进统计管理器，
//! 另一路镜像到宿主页面的打点钩子（如果有）。
//! 不做去重：重复初始化就记录多次曝光。

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::analytics::{AnalyticsManager, EventKind, PAGE_LOAD_SENTINEL};
use crate::session::SessionStore;

/// 打点事件固定分类名
const EVENT_CATEGORY: &str = "docads";

/// 宿主打点钩子（对应页面里的全局 gtag 函数）
///
/// 事件名固定为 `ad_impression` / `ad_click`，参数名固定。
pub trait TagHook: Send + Sync {
    fn tag(&self, event_name: &str, params: serde_json::Value);
}

/// 事件追踪器
#[derive(Clone)]
pub struct EventTracker {
    analytics: AnalyticsManager,
    session: Arc<SessionStore>,
    hook: Option<Arc<dyn TagHook>>,
    enabled: bool,
}

impl EventTracker {
    pub fn new(analytics: AnalyticsManager, session: Arc<SessionStore>, enabled: bool) -> Self {
        Self {
            analytics,
            session,
            hook: None,
            enabled,
        }
    }

    /// 附加宿主打点钩子
    pub fn with_hook(mut self, hook: Arc<dyn TagHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// CTA 被激活
    pub fn track_click(&self, ad_id: &str) {
        if !self.enabled {
            return;
        }
        debug!("Ad clicked: {}", ad_id);

        if let Some(ref hook) = self.hook {
            hook.tag(
                "ad_click",
                json!({
                    "ad_id": ad_id,
                    "event_category": EVENT_CATEGORY,
                    "event_label": ad_id,
                }),
            );
        }

        self.analytics
            .record(EventKind::Click, ad_id, &self.session.session_id());
    }

    /// 页面曝光（初始化时调用一次，不去重）
    pub fn track_impression(&self, page_url: &str) {
        if !self.enabled {
            return;
        }
        debug!("Ads displayed on page");

        if let Some(ref hook) = self.hook {
            hook.tag(
                "ad_impression",
                json!({
                    "event_category": EVENT_CATEGORY,
                    "page_url": page_url,
                }),
            );
        }

        self.analytics.record(
            EventKind::Impression,
            PAGE_LOAD_SENTINEL,
            &self.session.session_id(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{EventLog, PageContext};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct RecordingHook {
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl TagHook for RecordingHook {
        fn tag(&self, event_name: &str, params: serde_json::Value) {
            self.calls
                .lock()
                .unwrap()
                .push((event_name.to_string(), params));
        }
    }

    fn make_tracker(dir: &TempDir, enabled: bool) -> (EventTracker, Arc<RecordingHook>) {
        let log = Arc::new(EventLog::open(dir.path().join("events.json")));
        let context = PageContext::new("https://docs.example.com", "Docs");
        let analytics = AnalyticsManager::new(log, context);
        let hook = Arc::new(RecordingHook {
            calls: Mutex::new(Vec::new()),
        });
        let tracker = EventTracker::new(analytics, Arc::new(SessionStore::new()), enabled)
            .with_hook(Arc::clone(&hook) as Arc<dyn TagHook>);
        (tracker, hook)
    }

    #[test]
    fn test_click_mirrors_fixed_taxonomy() {
        let dir = TempDir::new().unwrap();
        let (tracker, hook) = make_tracker(&dir, true);

        tracker.track_click("training");

        let calls = hook.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ad_click");
        assert_eq!(calls[0].1["ad_id"], "training");
        assert_eq!(calls[0].1["event_category"], "docads");
        assert_eq!(calls[0].1["event_label"], "training");
    }

    #[test]
    fn test_impression_uses_sentinel_and_no_dedup() {
        let dir = TempDir::new().unwrap();
        let (tracker, hook) = make_tracker(&dir, true);

        tracker.track_impression("https://docs.example.com/guide");
        tracker.track_impression("https://docs.example.com/guide");

        let calls = hook.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "ad_impression");
        assert_eq!(calls[0].1["page_url"], "https://docs.example.com/guide");

        // 两次初始化 = 两条曝光记录
        let report = tracker.analytics.report();
        assert_eq!(report.impressions, 2);
        assert!(report.ad_performance.is_empty());
    }

    #[test]
    fn test_disabled_tracker_is_silent() {
        let dir = TempDir::new().unwrap();
        let (tracker, hook) = make_tracker(&dir, false);

        tracker.track_click("training");
        tracker.track_impression("u");

        assert!(hook.calls.lock().unwrap().is_empty());
        assert_eq!(tracker.analytics.report().total_events, 0);
    }
}
