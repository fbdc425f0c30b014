use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 本のライフサイクル状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Available,
    Borrowed,
    Sold,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [Self::Available, Self::Borrowed, Self::Sold];

    /// ワイヤ形式（小文字）の名前
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Borrowed => "borrowed",
            Self::Sold => "sold",
        }
    }

    /// 表示用ラベル（先頭大文字）
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Borrowed => "Borrowed",
            Self::Sold => "Sold",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: '{0}'. Use: available, borrowed, sold")]
pub struct UnknownStatus(pub String);

impl FromStr for BookStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "borrowed" => Ok(Self::Borrowed),
            "sold" => Ok(Self::Sold),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
