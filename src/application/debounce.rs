use std::time::Duration;

use tokio::time::Instant;

/// 入力の間引きポリシー。
/// 入力のたびに期限をリセットし、最後の入力から `delay` 経過した時点で一度だけ発火する。
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// 検索欄の既定の待ち時間
    pub const SEARCH_DELAY: Duration = Duration::from_millis(250);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 入力を記録する。保留中の期限は破棄される。
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// 期限に達していれば保留を解除して true を返す。
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// 保留中なら期限まで待ってから発火する。保留がなければ即座に false。
    pub async fn settle(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        tokio::time::sleep_until(deadline).await;
        self.fire(Instant::now())
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Self::SEARCH_DELAY)
    }
}
