//! 本地事件日志
//!
//! 有界的扁平事件列表，JSON 文件持久化（对应浏览器里的 localStorage）。
//! 超过上限时淘汰最旧的记录。写路径吞掉存储错误只记日志，
//! 读路径（报表、导出）把损坏的数据作为错误返回。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use super::AdEvent;
use crate::errors::{DocadsError, Result};

/// 日志保留的最大事件数
pub const MAX_LOG_ENTRIES: usize = 100;

/// 有界事件日志
///
/// 内存缓存 + 文件落盘，内存始终是权威副本。
pub struct EventLog {
    file_path: PathBuf,
    cache: RwLock<Vec<AdEvent>>,
}

impl EventLog {
    /// 打开（或创建）事件日志
    ///
    /// 文件损坏时从空日志开始，不阻塞初始化。
    pub fn open<P: AsRef<Path>>(file_path: P) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let events = match Self::load_from_file(&file_path) {
            Ok(events) => {
                info!(
                    "EventLog loaded {} events from {}",
                    events.len(),
                    file_path.display()
                );
                events
            }
            Err(e) => {
                warn!(
                    "EventLog could not load {}: {}, starting empty",
                    file_path.display(),
                    e
                );
                Vec::new()
            }
        };

        Self {
            file_path,
            cache: RwLock::new(events),
        }
    }

    fn load_from_file(path: &Path) -> Result<Vec<AdEvent>> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let events: Vec<AdEvent> = serde_json::from_str(&content)?;
                Ok(events)
            }
            // 文件还不存在等价于空日志
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DocadsError::file_operation(format!(
                "Failed to read event log {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save_to_file(&self, events: &[AdEvent]) -> Result<()> {
        let json = serde_json::to_string_pretty(events)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }

    /// 追加一条事件，超出上限时淘汰最旧的
    ///
    /// 落盘失败只记 warn，内存中的日志照常更新。
    pub fn append(&self, event: AdEvent) {
        let snapshot = {
            let mut cache = self.cache.write().unwrap();
            cache.push(event);
            if cache.len() > MAX_LOG_ENTRIES {
                let overflow = cache.len() - MAX_LOG_ENTRIES;
                cache.drain(0..overflow);
                debug!("EventLog evicted {} oldest entries", overflow);
            }
            cache.clone()
        };

        if let Err(e) = self.save_to_file(&snapshot) {
            warn!(
                "Could not persist event log to {}: {}",
                self.file_path.display(),
                e
            );
        }
    }

    /// 当前日志快照（最旧在前）
    pub fn load(&self) -> Vec<AdEvent> {
        self.cache.read().unwrap().clone()
    }

    /// 当前事件数
    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().unwrap().is_empty()
    }

    /// 从磁盘重读日志，用于读取其他实例写入的数据
    ///
    /// 与写路径不同，这里的损坏数据要作为错误暴露出去。
    pub fn reload(&self) -> Result<usize> {
        let events = Self::load_from_file(&self.file_path)?;
        let count = events.len();
        *self.cache.write().unwrap() = events;
        Ok(count)
    }

    /// 清空日志（内存与文件）
    pub fn clear(&self) -> Result<()> {
        self.cache.write().unwrap().clear();
        self.save_to_file(&[])?;
        info!("Event log cleared");
        Ok(())
    }

    /// 导出完整日志为带日期戳的 JSON 文件，返回写入路径
    pub fn export_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let filename = format!(
            "docads_analytics_{}.json",
            chrono::Utc::now().format("%Y-%m-%d")
        );
        let path = dir.as_ref().join(filename);

        let events = self.load();
        let json = serde_json::to_string_pretty(&events)?;
        fs::write(&path, json)?;
        info!("Exported {} events to {}", events.len(), path.display());
        Ok(path)
    }
}
