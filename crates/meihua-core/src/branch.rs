//! Earthly branches and the calendar numbers used by time-based casting.
//!
//! Solar-to-lunar conversion is not done here. A calendar provider hands over
//! a [`CalendarPoint`] holding the four numbers the casting rule needs.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{CastError, CastResult};

/// One of the twelve earthly branches (地支), numbered 1 (子) to 12 (亥).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EarthlyBranch {
    Zi = 1,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl EarthlyBranch {
    pub const ALL: [EarthlyBranch; 12] = [
        EarthlyBranch::Zi,
        EarthlyBranch::Chou,
        EarthlyBranch::Yin,
        EarthlyBranch::Mao,
        EarthlyBranch::Chen,
        EarthlyBranch::Si,
        EarthlyBranch::Wu,
        EarthlyBranch::Wei,
        EarthlyBranch::Shen,
        EarthlyBranch::You,
        EarthlyBranch::Xu,
        EarthlyBranch::Hai,
    ];

    pub fn from_number(number: u8) -> CastResult<Self> {
        match number {
            1..=12 => Ok(Self::ALL[usize::from(number - 1)]),
            _ => Err(CastError::out_of_range(
                "branch number",
                i64::from(number),
                "must be within 1..=12",
            )),
        }
    }

    /// Branch of the two-hour period containing clock hour `hour` (0..=23).
    ///
    /// 子 spans 23:00 to 00:59, 丑 01:00 to 02:59, and so on.
    pub fn from_hour(hour: u32) -> CastResult<Self> {
        if hour > 23 {
            return Err(CastError::out_of_range(
                "hour",
                i64::from(hour),
                "must be within 0..=23",
            ));
        }
        let index = ((hour + 1) / 2) % 12;
        Ok(Self::ALL[index as usize])
    }

    /// Branch of a lunar year; 1984 was a 子 year.
    pub fn from_lunar_year(year: i32) -> Self {
        let index = (i64::from(year) - 4).rem_euclid(12);
        Self::ALL[index as usize]
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            EarthlyBranch::Zi => "子",
            EarthlyBranch::Chou => "丑",
            EarthlyBranch::Yin => "寅",
            EarthlyBranch::Mao => "卯",
            EarthlyBranch::Chen => "辰",
            EarthlyBranch::Si => "巳",
            EarthlyBranch::Wu => "午",
            EarthlyBranch::Wei => "未",
            EarthlyBranch::Shen => "申",
            EarthlyBranch::You => "酉",
            EarthlyBranch::Xu => "戌",
            EarthlyBranch::Hai => "亥",
        }
    }

    pub fn pinyin(&self) -> &'static str {
        match self {
            EarthlyBranch::Zi => "zi",
            EarthlyBranch::Chou => "chou",
            EarthlyBranch::Yin => "yin",
            EarthlyBranch::Mao => "mao",
            EarthlyBranch::Chen => "chen",
            EarthlyBranch::Si => "si",
            EarthlyBranch::Wu => "wu",
            EarthlyBranch::Wei => "wei",
            EarthlyBranch::Shen => "shen",
            EarthlyBranch::You => "you",
            EarthlyBranch::Xu => "xu",
            EarthlyBranch::Hai => "hai",
        }
    }
}

impl fmt::Display for EarthlyBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accepts the Chinese character, the pinyin (any case) or the number 1..=12.
impl FromStr for EarthlyBranch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<u8>() {
            return Self::from_number(number).map_err(|e| e.to_string());
        }
        Self::ALL
            .iter()
            .copied()
            .find(|branch| branch.name() == s || branch.pinyin().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown earthly branch: {s}"))
    }
}

impl Serialize for EarthlyBranch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The four numbers a calendar provider supplies for time-based casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarPoint {
    pub year_branch: EarthlyBranch,
    /// Lunar month; negative for a leap month.
    pub lunar_month: i32,
    pub lunar_day: u32,
    pub hour_branch: EarthlyBranch,
}

impl CalendarPoint {
    pub fn new(
        year_branch: EarthlyBranch,
        lunar_month: i32,
        lunar_day: u32,
        hour_branch: EarthlyBranch,
    ) -> CastResult<Self> {
        let point = Self {
            year_branch,
            lunar_month,
            lunar_day,
            hour_branch,
        };
        point.validate()?;
        Ok(point)
    }

    /// Check that the month and day are plausible lunar values.
    pub fn validate(&self) -> CastResult<()> {
        if self.lunar_month == 0 {
            return Err(CastError::non_positive("lunar month", 0));
        }
        if self.lunar_month.unsigned_abs() > 12 {
            return Err(CastError::out_of_range(
                "lunar month",
                i64::from(self.lunar_month),
                "must be within 1..=12 (negative for leap months)",
            ));
        }
        if self.lunar_day == 0 {
            return Err(CastError::non_positive("lunar day", 0));
        }
        if self.lunar_day > 30 {
            return Err(CastError::out_of_range(
                "lunar day",
                i64::from(self.lunar_day),
                "must be within 1..=30",
            ));
        }
        Ok(())
    }

    /// Month number with the leap marker dropped.
    pub fn month_number(&self) -> u32 {
        self.lunar_month.unsigned_abs()
    }

    pub fn is_leap_month(&self) -> bool {
        self.lunar_month < 0
    }
}
