//! Six-line figures built from two trigrams, and the bit codec between them.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{CastError, CastResult};
use crate::trigram::{Line, Trigram};

/// Number of lines in a hexagram.
pub const LINE_COUNT: usize = 6;

const TRIGRAM_MASK: u8 = 0b111;

/// Pack two trigrams into a 6-bit pattern: lower lines in bits 0..3, upper in 3..6.
pub fn encode(lower: Trigram, upper: Trigram) -> u8 {
    lower.pattern() | (upper.pattern() << 3)
}

/// Split a 6-bit pattern back into `(lower, upper)` trigrams.
pub fn decode(bits: u8) -> CastResult<(Trigram, Trigram)> {
    let lower = Trigram::from_pattern(bits & TRIGRAM_MASK)?;
    let upper = Trigram::from_pattern(bits >> 3)?;
    Ok((lower, upper))
}

/// A hexagram stacked from a lower and an upper trigram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hexagram {
    lower: Trigram,
    upper: Trigram,
}

impl Hexagram {
    pub fn new(lower: Trigram, upper: Trigram) -> Self {
        Self { lower, upper }
    }

    /// Build a hexagram from a packed 6-bit pattern.
    pub fn from_bits(bits: u8) -> CastResult<Self> {
        let (lower, upper) = decode(bits)?;
        Ok(Self { lower, upper })
    }

    /// Build a hexagram from six lines ordered bottom to top.
    pub fn from_lines(lines: [Line; LINE_COUNT]) -> CastResult<Self> {
        let bits = lines
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, line)| acc | (u8::from(line.is_solid()) << i));
        Self::from_bits(bits)
    }

    pub fn lower(&self) -> Trigram {
        self.lower
    }

    pub fn upper(&self) -> Trigram {
        self.upper
    }

    /// Packed pattern, bit 0 = bottom line.
    pub fn bits(&self) -> u8 {
        encode(self.lower, self.upper)
    }

    /// Lines ordered bottom to top.
    pub fn lines(&self) -> [Line; LINE_COUNT] {
        let bits = self.bits();
        std::array::from_fn(|i| Line::from_bit(bits, i))
    }

    /// Display name: upper trigram name followed by lower trigram name.
    pub fn name(&self) -> String {
        format!("{}{}", self.upper.name(), self.lower.name())
    }

    /// Flip the line at 0-based `index` (0 = bottom).
    pub fn with_line_flipped(&self, index: usize) -> CastResult<Self> {
        if index >= LINE_COUNT {
            return Err(CastError::out_of_range(
                "line index",
                index as i64,
                "must be within 0..6",
            ));
        }
        Self::from_bits(self.bits() ^ (1u8 << index))
    }
}

impl Serialize for Hexagram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Hexagram", 4)?;
        state.serialize_field("name", &self.name())?;
        state.serialize_field("upper", &self.upper)?;
        state.serialize_field("lower", &self.lower)?;
        state.serialize_field("lines", &self.lines())?;
        state.end()
    }
}
