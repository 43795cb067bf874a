//! The eight trigrams (八卦) in Later Heaven numbering order.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::element::Element;
use crate::error::{CastError, CastResult};

/// A single line of a trigram or hexagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Yin line, drawn broken.
    Broken,
    /// Yang line, drawn solid.
    Solid,
}

impl Line {
    /// Line value of bit `index` of a packed pattern.
    pub fn from_bit(pattern: u8, index: usize) -> Self {
        if (pattern >> index) & 1 == 1 {
            Line::Solid
        } else {
            Line::Broken
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Line::Solid)
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(self.is_solid()))
    }
}

/// One of the eight trigrams.
///
/// The discriminant is the trigram's casting number (乾1 兑2 离3 震4 巽5 坎6 艮7 坤8).
/// Patterns are packed with bit 0 as the bottom line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Trigram {
    Qian = 1,
    Dui = 2,
    Li = 3,
    Zhen = 4,
    Xun = 5,
    Kan = 6,
    Gen = 7,
    Kun = 8,
}

impl Trigram {
    /// All trigrams ordered by casting number.
    pub const ALL: [Trigram; 8] = [
        Trigram::Qian,
        Trigram::Dui,
        Trigram::Li,
        Trigram::Zhen,
        Trigram::Xun,
        Trigram::Kan,
        Trigram::Gen,
        Trigram::Kun,
    ];

    /// Look a trigram up by its casting number (1..=8).
    pub fn from_id(id: u8) -> CastResult<Self> {
        match id {
            1..=8 => Ok(Self::ALL[usize::from(id - 1)]),
            _ => Err(CastError::out_of_range(
                "trigram id",
                i64::from(id),
                "must be within 1..=8",
            )),
        }
    }

    /// Reverse lookup from a packed 3-line pattern.
    ///
    /// Fails when no trigram carries the pattern, which can only happen for
    /// values with bits above the third line set.
    pub fn from_pattern(pattern: u8) -> CastResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|trigram| trigram.pattern() == pattern)
            .ok_or(CastError::LookupFailure { pattern })
    }

    /// Reverse lookup from three lines ordered bottom to top.
    pub fn from_lines(lines: [Line; 3]) -> CastResult<Self> {
        let pattern = lines
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, line)| acc | (u8::from(line.is_solid()) << i));
        Self::from_pattern(pattern)
    }

    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Packed line pattern, bit 0 = bottom line.
    pub fn pattern(&self) -> u8 {
        match self {
            Trigram::Qian => 0b111,
            Trigram::Dui => 0b011,
            Trigram::Li => 0b101,
            Trigram::Zhen => 0b001,
            Trigram::Xun => 0b110,
            Trigram::Kan => 0b010,
            Trigram::Gen => 0b100,
            Trigram::Kun => 0b000,
        }
    }

    /// Lines ordered bottom to top.
    pub fn lines(&self) -> [Line; 3] {
        let pattern = self.pattern();
        [0, 1, 2].map(|i| Line::from_bit(pattern, i))
    }

    /// Chinese name.
    pub fn name(&self) -> &'static str {
        match self {
            Trigram::Qian => "乾",
            Trigram::Dui => "兑",
            Trigram::Li => "离",
            Trigram::Zhen => "震",
            Trigram::Xun => "巽",
            Trigram::Kan => "坎",
            Trigram::Gen => "艮",
            Trigram::Kun => "坤",
        }
    }

    pub fn pinyin(&self) -> &'static str {
        match self {
            Trigram::Qian => "Qian",
            Trigram::Dui => "Dui",
            Trigram::Li => "Li",
            Trigram::Zhen => "Zhen",
            Trigram::Xun => "Xun",
            Trigram::Kan => "Kan",
            Trigram::Gen => "Gen",
            Trigram::Kun => "Kun",
        }
    }

    /// Natural image (heaven, lake, fire, ...).
    pub fn image(&self) -> &'static str {
        match self {
            Trigram::Qian => "Heaven",
            Trigram::Dui => "Lake",
            Trigram::Li => "Fire",
            Trigram::Zhen => "Thunder",
            Trigram::Xun => "Wind",
            Trigram::Kan => "Water",
            Trigram::Gen => "Mountain",
            Trigram::Kun => "Earth",
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Trigram::Qian | Trigram::Dui => Element::Metal,
            Trigram::Li => Element::Fire,
            Trigram::Zhen | Trigram::Xun => Element::Wood,
            Trigram::Kan => Element::Water,
            Trigram::Gen | Trigram::Kun => Element::Earth,
        }
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.element())
    }
}

impl Serialize for Trigram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Trigram", 6)?;
        state.serialize_field("id", &self.id())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("pinyin", self.pinyin())?;
        state.serialize_field("image", self.image())?;
        state.serialize_field("element", &self.element())?;
        state.serialize_field("lines", &self.lines())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for (i, trigram) in Trigram::ALL.iter().enumerate() {
            assert_eq!(trigram.id() as usize, i + 1);
            assert_eq!(Trigram::from_id(trigram.id()).unwrap(), *trigram);
        }
    }

    #[test]
    fn from_id_rejects_out_of_range() {
        assert!(Trigram::from_id(0).is_err());
        assert!(Trigram::from_id(9).is_err());
    }

    #[test]
    fn patterns_cover_all_three_bit_values() {
        let mut patterns: Vec<u8> = Trigram::ALL.iter().map(|t| t.pattern()).collect();
        patterns.sort_unstable();
        assert_eq!(patterns, (0..8).collect::<Vec<u8>>());
    }

    #[test]
    fn lines_read_bottom_to_top() {
        use Line::{Broken, Solid};
        assert_eq!(Trigram::Dui.lines(), [Solid, Solid, Broken]);
        assert_eq!(Trigram::Zhen.lines(), [Solid, Broken, Broken]);
        assert_eq!(Trigram::Gen.lines(), [Broken, Broken, Solid]);
        assert_eq!(Trigram::Kan.lines(), [Broken, Solid, Broken]);
        assert_eq!(Trigram::from_lines([Broken, Broken, Solid]).unwrap(), Trigram::Gen);
    }

    #[test]
    fn unknown_pattern_fails_instead_of_defaulting() {
        assert_eq!(
            Trigram::from_pattern(0b1000),
            Err(CastError::LookupFailure { pattern: 0b1000 })
        );
    }

    #[test]
    fn elements_match_the_table() {
        assert_eq!(Trigram::Qian.element(), Element::Metal);
        assert_eq!(Trigram::Li.element(), Element::Fire);
        assert_eq!(Trigram::Xun.element(), Element::Wood);
        assert_eq!(Trigram::Kan.element(), Element::Water);
        assert_eq!(Trigram::Kun.element(), Element::Earth);
        assert_eq!(Trigram::Li.to_string(), "离(火)");
    }
}
