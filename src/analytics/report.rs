//! 报表聚合
//!
//! 按需全量扫描本地日志生成汇总，没有增量聚合。
//! 数据量上限 100 条，扫描成本可以忽略。

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{AdEvent, EventKind};

/// 单条广告的表现
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdPerformance {
    pub impressions: u64,
    pub clicks: u64,
}

/// 统计汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// 事件总数
    pub total_events: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub unique_sessions: u64,
    /// 按广告 id 的表现，页面级曝光（page_load 哨兵）不计入
    pub ad_performance: BTreeMap<String, AdPerformance>,
}

impl AnalyticsReport {
    /// 从完整日志计算报表
    pub fn from_events(events: &[AdEvent]) -> Self {
        let mut report = Self {
            total_events: events.len() as u64,
            ..Default::default()
        };

        let mut sessions: HashSet<&str> = HashSet::new();
        for event in events {
            sessions.insert(event.session_id.as_str());
            match event.event {
                EventKind::Impression => report.impressions += 1,
                EventKind::Click => report.clicks += 1,
            }

            if event.is_page_level() {
                continue;
            }
            let perf = report.ad_performance.entry(event.ad_id.clone()).or_default();
            match event.event {
                EventKind::Impression => perf.impressions += 1,
                EventKind::Click => perf.clicks += 1,
            }
        }
        report.unique_sessions = sessions.len() as u64;

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{PAGE_LOAD_SENTINEL, PageContext};

    fn event(kind: EventKind, ad_id: &str, session: &str) -> AdEvent {
        let context = PageContext::new("u", "t");
        AdEvent::new(kind, ad_id, &context, session)
    }

    #[test]
    fn test_totals_and_per_ad_performance() {
        let events = vec![
            event(EventKind::Impression, "X", "s1"),
            event(EventKind::Impression, "X", "s1"),
            event(EventKind::Impression, "X", "s2"),
            event(EventKind::Click, "X", "s1"),
            event(EventKind::Click, "X", "s2"),
            event(EventKind::Impression, "Y", "s1"),
        ];

        let report = AnalyticsReport::from_events(&events);
        assert_eq!(report.total_events, 6);
        assert_eq!(report.impressions, 4);
        assert_eq!(report.clicks, 2);
        assert_eq!(report.unique_sessions, 2);

        let x = &report.ad_performance["X"];
        assert_eq!(x.impressions, 3);
        assert_eq!(x.clicks, 2);
        let y = &report.ad_performance["Y"];
        assert_eq!(y.impressions, 1);
        assert_eq!(y.clicks, 0);
    }

    #[test]
    fn test_page_load_counted_in_totals_not_per_ad() {
        let events = vec![
            event(EventKind::Impression, PAGE_LOAD_SENTINEL, "s1"),
            event(EventKind::Click, "X", "s1"),
        ];
        let report = AnalyticsReport::from_events(&events);
        assert_eq!(report.total_events, 2);
        assert_eq!(report.impressions, 1);
        assert!(!report.ad_performance.contains_key(PAGE_LOAD_SENTINEL));
        assert_eq!(report.ad_performance.len(), 1);
    }

    #[test]
    fn test_empty_log_reports_zero() {
        let report = AnalyticsReport::from_events(&[]);
        assert_eq!(report.total_events, 0);
        assert_eq!(report.impressions, 0);
        assert_eq!(report.clicks, 0);
        assert_eq!(report.unique_sessions, 0);
        assert!(report.ad_performance.is_empty());
    }
}
