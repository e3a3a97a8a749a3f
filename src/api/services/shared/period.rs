//! # 统计时间窗

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// 用户统计支持的时间窗
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyticsPeriod {
    #[serde(rename = "7d")]
    Days7,
    #[default]
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "1y")]
    Year1,
}

impl AnalyticsPeriod {
    /// 时间窗对应的时长
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Days7 => Duration::days(7),
            Self::Days30 => Duration::days(30),
            Self::Days90 => Duration::days(90),
            Self::Year1 => Duration::days(365),
        }
    }

    /// 响应中回显的关键字
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days7 => "7d",
            Self::Days30 => "30d",
            Self::Days90 => "90d",
            Self::Year1 => "1y",
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("\"7d\"", AnalyticsPeriod::Days7, 7)]
    #[case("\"30d\"", AnalyticsPeriod::Days30, 30)]
    #[case("\"90d\"", AnalyticsPeriod::Days90, 90)]
    #[case("\"1y\"", AnalyticsPeriod::Year1, 365)]
    fn keyword_roundtrip(
        #[case] raw: &str,
        #[case] expected: AnalyticsPeriod,
        #[case] days: i64,
    ) {
        let parsed: AnalyticsPeriod = serde_json::from_str(raw).expect("valid keyword");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.duration(), Duration::days(days));
        assert_eq!(format!("\"{}\"", parsed.as_str()), raw);
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        assert!(serde_json::from_str::<AnalyticsPeriod>("\"14d\"").is_err());
    }
}
