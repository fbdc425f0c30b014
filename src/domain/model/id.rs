use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 在庫レコードのID。サービス側で採番する正の整数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 既存IDの最大値 + 1 を返す。空なら 1。
    pub fn next_after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = BookId>,
    {
        let max = existing.into_iter().map(|id| id.0).max().unwrap_or(0);
        Self(max.saturating_add(1))
    }
}

impl From<u64> for BookId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
