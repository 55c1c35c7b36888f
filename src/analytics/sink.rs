//! 事件上报 Sink
//!
//! 尽力而为的外发投递：失败只记日志，绝不阻塞 `record` 的调用方。
//! HTTP 投递有全局超时和至多一次的重试。

use std::time::Duration;

use tracing::{debug, warn};
use ureq::Agent;

use super::AdEvent;

/// 事件投递 Sink
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, event: &AdEvent) -> anyhow::Result<()>;
}

/// HTTP 上报 Sink
///
/// POST JSON 到配置的统计端点。投递语义是"至多 1 + retries 次"：
/// 一次初始请求加 `retries` 次重试，全部失败即放弃。
/// ureq 的 Agent 是 Send + Sync，可以安全跨线程复用。
pub struct HttpSink {
    agent: Agent,
    endpoint: String,
    retries: u32,
}

impl HttpSink {
    pub fn new(endpoint: String, timeout: Duration, retries: u32) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            endpoint,
            retries,
        }
    }

    /// 同步发送一次（在 spawn_blocking 中调用）
    fn post_once(agent: &Agent, endpoint: &str, body: &serde_json::Value) -> anyhow::Result<()> {
        agent.post(endpoint).send_json(body)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl EventSink for HttpSink {
    async fn deliver(&self, event: &AdEvent) -> anyhow::Result<()> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let retries = self.retries;
        let body = serde_json::to_value(event)?;

        // 使用 spawn_blocking 在线程池中执行同步 HTTP 请求
        tokio::task::spawn_blocking(move || {
            let mut last_err = None;
            for attempt in 0..=retries {
                match Self::post_once(&agent, &endpoint, &body) {
                    Ok(()) => {
                        debug!(
                            "Analytics event delivered to {} (attempt {})",
                            endpoint,
                            attempt + 1
                        );
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(
                            "Analytics delivery to {} failed (attempt {}): {}",
                            endpoint,
                            attempt + 1,
                            e
                        );
                        last_err = Some(e);
                    }
                }
            }
            Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no delivery attempt made")))
        })
        .await?
    }
}

/// 调试用 Sink，把事件打到日志里
pub struct StdoutSink;

#[async_trait::async_trait]
impl EventSink for StdoutSink {
    async fn deliver(&self, event: &AdEvent) -> anyhow::Result<()> {
        println!(
            "Analytics event: {} ad_id={} session={}",
            event.event, event.ad_id, event.session_id
        );
        Ok(())
    }
}
