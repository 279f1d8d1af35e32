/// 后台错误队列
///
/// 进程级有界队列，后台任务将错误投递进来，由主流程统一检查。
/// 内部只使用一把互斥锁和一个条件变量。

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use tracing::debug;

use crate::models::constants::DEFAULT_BG_ERROR_CAPACITY;

/// 后台错误记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundError {
    /// 产生错误的组件
    pub source: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl BackgroundError {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<BackgroundError>,
    /// 已投递但尚未 task_done 的数量
    unfinished: usize,
}

/// 有界阻塞错误队列
#[derive(Debug)]
pub struct BackgroundErrorQueue {
    capacity: usize,
    state: Mutex<QueueState>,
    changed: Condvar,
}

impl BackgroundErrorQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(QueueState::default()),
            changed: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // 持锁期间不会 panic，中毒时直接沿用内部状态
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 投递错误，队列满时阻塞
    pub fn put(&self, error: BackgroundError) {
        let mut state = self.lock();
        while state.items.len() >= self.capacity {
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        state.items.push_back(error);
        state.unfinished += 1;
        self.changed.notify_all();
    }

    /// 非阻塞投递，队列满时把错误退回
    pub fn try_put(&self, error: BackgroundError) -> Result<(), BackgroundError> {
        let mut state = self.lock();
        if state.items.len() >= self.capacity {
            return Err(error);
        }
        state.items.push_back(error);
        state.unfinished += 1;
        self.changed.notify_all();
        Ok(())
    }

    /// 取出错误，队列空时阻塞
    pub fn get(&self) -> BackgroundError {
        let mut state = self.lock();
        loop {
            if let Some(error) = state.items.pop_front() {
                self.changed.notify_all();
                return error;
            }
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    pub fn try_get(&self) -> Option<BackgroundError> {
        let mut state = self.lock();
        let error = state.items.pop_front();
        if error.is_some() {
            self.changed.notify_all();
        }
        error
    }

    /// 标记一个已取出的错误处理完毕
    pub fn task_done(&self) {
        let mut state = self.lock();
        state.unfinished = state.unfinished.saturating_sub(1);
        if state.unfinished == 0 {
            self.changed.notify_all();
        }
    }

    /// 等待所有已投递的错误处理完毕
    pub fn join(&self) {
        let mut state = self.lock();
        while state.unfinished > 0 {
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// 清空队列
    ///
    /// 在一次加锁内清空元素、重置未完成计数，并唤醒所有等待的生产者和消费者
    pub fn clear(&self) {
        let mut state = self.lock();
        state.items.clear();
        state.unfinished = 0;
        self.changed.notify_all();
    }
}

impl Default for BackgroundErrorQueue {
    fn default() -> Self {
        Self::new(DEFAULT_BG_ERROR_CAPACITY)
    }
}

static BACKGROUND_ERRORS: OnceCell<BackgroundErrorQueue> = OnceCell::new();

/// 按指定容量初始化进程级后台错误队列
///
/// 只在第一次访问之前生效，已初始化时返回 false
pub fn init_background_errors(capacity: usize) -> bool {
    let mut created = false;
    BACKGROUND_ERRORS.get_or_init(|| {
        created = true;
        BackgroundErrorQueue::new(capacity)
    });
    created
}

/// 进程级后台错误队列，未初始化时使用默认容量
pub fn background_errors() -> &'static BackgroundErrorQueue {
    BACKGROUND_ERRORS.get_or_init(BackgroundErrorQueue::default)
}

/// 清空进程级后台错误队列
pub fn clear_bg_errors() {
    debug!("Clearing all background errors.");
    background_errors().clear();
}
