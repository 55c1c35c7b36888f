//! 会话状态
//!
//! 会话标识与关闭标记都以 `SessionStore` 实例的生命周期为界：
//! 实例存活期间标识稳定、关闭不可撤销，新实例等同于新会话。

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use crate::render::Placement;

/// 生成随机字母数字 token
pub fn generate_session_token(length: usize) -> String {
    use std::iter;

    let chars = b"abcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

fn new_session_id() -> String {
    format!(
        "sess_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        generate_session_token(9)
    )
}

/// 会话存储
///
/// 持有本次会话的标识符和各投放位的关闭标记。
/// 标识符在下一次 [`SessionStore::reset`] 之前保持稳定。
pub struct SessionStore {
    session_id: Mutex<String>,
    dismissed: Mutex<HashSet<Placement>>,
}

impl SessionStore {
    /// 开始一个新会话，生成 `sess_<毫秒时间戳>_<9 位随机 token>` 标识
    pub fn new() -> Self {
        let session_id = new_session_id();
        debug!("New session started: {}", session_id);
        Self {
            session_id: Mutex::new(session_id),
            dismissed: Mutex::new(HashSet::new()),
        }
    }

    /// 本会话的稳定标识符
    pub fn session_id(&self) -> String {
        self.session_id.lock().unwrap().clone()
    }

    /// 重新生成会话标识（清空统计数据时调用）
    ///
    /// 关闭标记不受影响：已关闭的投放位在本次浏览里保持关闭。
    pub fn reset(&self) {
        let session_id = new_session_id();
        debug!("Session reset, new id: {}", session_id);
        *self.session_id.lock().unwrap() = session_id;
    }

    /// 该投放位是否应该展示（未被用户关闭）
    pub fn should_show(&self, placement: Placement) -> bool {
        !self.dismissed.lock().unwrap().contains(&placement)
    }

    /// 关闭一个投放位，本会话内不再展示
    pub fn dismiss(&self, placement: Placement) {
        debug!("Placement {} dismissed for this session", placement);
        self.dismissed.lock().unwrap().insert(placement);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
