pub mod manager;
pub mod report;
pub mod sink;
pub mod store;

pub use manager::AnalyticsManager;
pub use report::{AdPerformance, AnalyticsReport};
pub use sink::{EventSink, HttpSink, StdoutSink};
pub use store::EventLog;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 页面级曝光事件使用的哨兵 ad_id
pub const PAGE_LOAD_SENTINEL: &str = "page_load";

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Impression,
    Click,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Impression => write!(f, "impression"),
            EventKind::Click => write!(f, "click"),
        }
    }
}

/// 页面与环境上下文
///
/// 浏览器环境里这些值来自 window/document/navigator，
/// 这里由宿主构造时注入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContext {
    pub page_url: String,
    pub page_title: String,
    pub user_agent: String,
    pub referrer: String,
    /// 形如 "1920x1080"
    pub screen_resolution: String,
}

impl PageContext {
    pub fn new<U: Into<String>, T: Into<String>>(page_url: U, page_title: T) -> Self {
        Self {
            page_url: page_url.into(),
            page_title: page_title.into(),
            user_agent: String::new(),
            referrer: String::new(),
            screen_resolution: String::new(),
        }
    }

    pub fn with_environment<A, R, S>(mut self, user_agent: A, referrer: R, resolution: S) -> Self
    where
        A: Into<String>,
        R: Into<String>,
        S: Into<String>,
    {
        self.user_agent = user_agent.into();
        self.referrer = referrer.into();
        self.screen_resolution = resolution.into();
        self
    }
}

/// 一条统计事件
///
/// 字段名即上报负载的 JSON 键名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdEvent {
    /// 事件类型（impression | click）
    pub event: EventKind,
    /// 关联的广告 id，页面级曝光为 [`PAGE_LOAD_SENTINEL`]
    pub ad_id: String,
    pub page_url: String,
    pub page_title: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub referrer: String,
    pub screen_resolution: String,
    pub session_id: String,
}

impl AdEvent {
    /// 从当前上下文构造事件
    pub fn new(kind: EventKind, ad_id: &str, context: &PageContext, session_id: &str) -> Self {
        Self {
            event: kind,
            ad_id: ad_id.to_string(),
            page_url: context.page_url.clone(),
            page_title: context.page_title.clone(),
            timestamp: Utc::now(),
            user_agent: context.user_agent.clone(),
            referrer: context.referrer.clone(),
            screen_resolution: context.screen_resolution.clone(),
            session_id: session_id.to_string(),
        }
    }

    /// 是否为页面级曝光（不计入单条广告的表现统计）
    pub fn is_page_level(&self) -> bool {
        self.ad_id == PAGE_LOAD_SENTINEL
    }
}
