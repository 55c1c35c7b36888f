//! 渲染层
//!
//! 把一条推广内容渲染成容器的 HTML 片段。渲染目标由宿主实现
//! [`Renderer`] 决定（文档页面、终端预览、测试内存容器）。
//! 容器缺失时渲染退化为 no-op，只记日志不报错。

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::catalog::AdEntry;

/// 投放位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Sidebar,
    Footer,
}

impl Placement {
    /// 会话存储中使用的键名
    pub fn key(&self) -> &'static str {
        match self {
            Placement::Sidebar => "sidebar",
            Placement::Footer => "footer",
        }
    }

    /// 容器元素 id
    pub fn container_id(&self) -> &'static str {
        match self {
            Placement::Sidebar => "docads-sidebar-ad",
            Placement::Footer => "docads-footer-ad",
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 渲染目标抽象
///
/// `render` 返回 false 表示容器不存在，调用方不视为错误。
pub trait Renderer: Send + Sync {
    fn render(&self, placement: Placement, html: &str) -> bool;

    /// 切换容器可见性（关闭广告时隐藏）
    fn set_visible(&self, placement: Placement, visible: bool);
}

/// 侧边栏模板：关闭按钮 + 标题 + 描述 + 单 CTA
pub fn sidebar_markup(entry: &AdEntry) -> String {
    let cta = &entry.ctas[0];
    format!(
        concat!(
            r#"<button class="ad-close" data-placement="sidebar" title="Close">&times;</button>"#,
            r#"<div class="ad-title">{title}</div>"#,
            r#"<div class="ad-description">{description}</div>"#,
            r#"<a href="{url}" class="ad-cta" target="_blank" rel="noopener" data-ad-id="{id}">{label}</a>"#,
        ),
        title = entry.title,
        description = entry.description,
        url = cta.url,
        id = entry.id,
        label = cta.label,
    )
}

/// 底部模板：特性列表 + 主/次 CTA 组
pub fn footer_markup(entry: &AdEntry) -> String {
    let features_html: String = entry
        .features
        .iter()
        .map(|feature| format!(r#"<div class="ad-feature">{}</div>"#, feature))
        .collect();

    let ctas_html: String = entry
        .ctas
        .iter()
        .map(|cta| {
            format!(
                r#"<a href="{url}" class="ad-cta {class}" target="_blank" rel="noopener" data-ad-id="{id}">{label}</a>"#,
                url = cta.url,
                class = if cta.primary { "primary" } else { "secondary" },
                id = entry.id,
                label = cta.label,
            )
        })
        .collect();

    format!(
        concat!(
            r#"<button class="ad-close" data-placement="footer" title="Close">&times;</button>"#,
            r#"<div class="ad-title">{title}</div>"#,
            r#"<div class="ad-description">{description}</div>"#,
            r#"<div class="ad-features">{features}</div>"#,
            r#"<div class="ad-ctas">{ctas}</div>"#,
        ),
        title = entry.title,
        description = entry.description,
        features = features_html,
        ctas = ctas_html,
    )
}

/// 按投放位选择模板
pub fn markup_for(placement: Placement, entry: &AdEntry) -> String {
    match placement {
        Placement::Sidebar => sidebar_markup(entry),
        Placement::Footer => footer_markup(entry),
    }
}

/// 渲染一条内容到指定投放位，容器缺失时记日志返回
pub fn render_entry(renderer: &dyn Renderer, placement: Placement, entry: &AdEntry) {
    let html = markup_for(placement, entry);
    if renderer.render(placement, &html) {
        debug!("Rendered ad '{}' into {} container", entry.id, placement);
    } else {
        warn!(
            "Container for {} placement not found, skipping render of '{}'",
            placement, entry.id
        );
    }
}

/// 内存渲染器
///
/// 保存每个投放位最后一次渲染的 HTML 与可见性，供测试和 CLI 预览使用。
/// 可以模拟容器缺失。
#[derive(Default)]
pub struct MemoryRenderer {
    containers: Mutex<HashMap<Placement, Container>>,
}

#[derive(Debug, Clone, Default)]
struct Container {
    html: String,
    visible: bool,
    render_count: usize,
}

impl MemoryRenderer {
    /// 创建两个容器都存在的渲染器
    pub fn new() -> Self {
        let renderer = Self::default();
        {
            let mut containers = renderer.containers.lock().unwrap();
            containers.insert(Placement::Sidebar, Container::default());
            containers.insert(Placement::Footer, Container::default());
        }
        renderer
    }

    /// 创建缺失某个容器的渲染器
    pub fn without_container(missing: Placement) -> Self {
        let renderer = Self::new();
        renderer.containers.lock().unwrap().remove(&missing);
        renderer
    }

    /// 最后一次渲染的 HTML
    pub fn html(&self, placement: Placement) -> Option<String> {
        self.containers
            .lock()
            .unwrap()
            .get(&placement)
            .map(|c| c.html.clone())
    }

    pub fn is_visible(&self, placement: Placement) -> bool {
        self.containers
            .lock()
            .unwrap()
            .get(&placement)
            .map(|c| c.visible)
            .unwrap_or(false)
    }

    /// 该投放位累计渲染次数
    pub fn render_count(&self, placement: Placement) -> usize {
        self.containers
            .lock()
            .unwrap()
            .get(&placement)
            .map(|c| c.render_count)
            .unwrap_or(0)
    }
}

impl Renderer for MemoryRenderer {
    fn render(&self, placement: Placement, html: &str) -> bool {
        let mut containers = self.containers.lock().unwrap();
        match containers.get_mut(&placement) {
            Some(container) => {
                container.html = html.to_string();
                container.render_count += 1;
                true
            }
            None => false,
        }
    }

    fn set_visible(&self, placement: Placement, visible: bool) {
        let mut containers = self.containers.lock().unwrap();
        if let Some(container) = containers.get_mut(&placement) {
            container.visible = visible;
        }
    }
}
