//! Derivations from the primary hexagram: changed, mutual, and the
//! subject/object roles fixed by the changing line.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{CastError, CastResult};
use crate::hexagram::{Hexagram, LINE_COUNT};
use crate::trigram::Trigram;

/// The single moving line (动爻), numbered 1 (bottom) to 6 (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangingLine(u8);

impl ChangingLine {
    pub fn new(number: u8) -> CastResult<Self> {
        if (1..=LINE_COUNT as u8).contains(&number) {
            Ok(Self(number))
        } else {
            Err(CastError::out_of_range(
                "changing line",
                i64::from(number),
                "must be within 1..=6",
            ))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// 0-based line index counted from the bottom.
    pub fn index(&self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Whether the line sits in the upper trigram (lines 4 to 6).
    pub fn in_upper(&self) -> bool {
        self.0 > 3
    }
}

impl fmt::Display for ChangingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ChangingLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Flip the changing line of `primary` and re-resolve both trigrams.
pub fn changed_hexagram(primary: &Hexagram, line: ChangingLine) -> CastResult<Hexagram> {
    primary.with_line_flipped(line.index())
}

/// The nuclear hexagram (互卦) built from the four interior lines.
///
/// Lines 2-4 (0-based 1..=3) form the lower trigram and lines 3-5
/// (0-based 2..=4) the upper one.
pub fn mutual_hexagram(primary: &Hexagram) -> CastResult<Hexagram> {
    let bits = primary.bits();
    let lower = Trigram::from_pattern((bits >> 1) & 0b111)?;
    let upper = Trigram::from_pattern((bits >> 2) & 0b111)?;
    Ok(Hexagram::new(lower, upper))
}

/// Subject (体), object (用) and the changed trigram the outcome is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    pub subject: Trigram,
    pub object: Trigram,
    pub changed_result: Trigram,
}

/// The moving trigram is the object; the still one is the subject.
pub fn resolve_roles(primary: &Hexagram, changed: &Hexagram, line: ChangingLine) -> Roles {
    if line.in_upper() {
        Roles {
            subject: primary.lower(),
            object: primary.upper(),
            changed_result: changed.upper(),
        }
    } else {
        Roles {
            subject: primary.upper(),
            object: primary.lower(),
            changed_result: changed.lower(),
        }
    }
}
