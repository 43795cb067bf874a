//! Turning raw numbers into trigram numbers and a changing line.

use serde::Serialize;
use tracing::debug;

use crate::branch::CalendarPoint;
use crate::error::{CastError, CastResult};
use crate::hexagram::Hexagram;
use crate::reading::{CastMethod, Reading};
use crate::transform::ChangingLine;
use crate::trigram::Trigram;

const TRIGRAM_MODULUS: u8 = 8;
const LINE_MODULUS: u8 = 6;

/// What a casting starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CastInput {
    /// Two positive numbers: the first selects the upper trigram, the second the lower.
    Numbers { upper: u64, lower: u64 },
    /// Calendar numbers of a moment in time.
    Calendar(CalendarPoint),
}

/// Remainder of `n` by `modulus`, with a zero remainder mapped to `modulus`.
///
/// Only defined for positive `n`.
pub fn floor_mod(n: u128, modulus: u8) -> CastResult<u8> {
    if n == 0 {
        return Err(CastError::non_positive("casting number", 0));
    }
    let remainder = (n % u128::from(modulus)) as u8;
    Ok(if remainder == 0 { modulus } else { remainder })
}

/// Cast from either kind of input.
pub fn cast(input: &CastInput) -> CastResult<Reading> {
    match input {
        CastInput::Numbers { upper, lower } => cast_numbers(*upper, *lower),
        CastInput::Calendar(point) => cast_calendar(point),
    }
}

/// Numeric casting (数字起卦).
pub fn cast_numbers(upper: u64, lower: u64) -> CastResult<Reading> {
    if upper == 0 {
        return Err(CastError::non_positive("upper number", 0));
    }
    if lower == 0 {
        return Err(CastError::non_positive("lower number", 0));
    }
    let line_seed = u128::from(upper) + u128::from(lower);
    build(CastMethod::Numbers, upper, lower, line_seed)
}

/// Time-based casting (时间起卦).
///
/// The upper number is year branch + month + day, the lower number adds the
/// hour branch, and the lower number also seeds the changing line.
pub fn cast_calendar(point: &CalendarPoint) -> CastResult<Reading> {
    point.validate()?;
    let upper = u64::from(point.year_branch.number())
        + u64::from(point.month_number())
        + u64::from(point.lunar_day);
    let lower = upper + u64::from(point.hour_branch.number());
    build(
        CastMethod::Calendar { point: *point },
        upper,
        lower,
        u128::from(lower),
    )
}

fn build(method: CastMethod, upper: u64, lower: u64, line_seed: u128) -> CastResult<Reading> {
    let upper_trigram = Trigram::from_id(floor_mod(u128::from(upper), TRIGRAM_MODULUS)?)?;
    let lower_trigram = Trigram::from_id(floor_mod(u128::from(lower), TRIGRAM_MODULUS)?)?;
    let changing_line = ChangingLine::new(floor_mod(line_seed, LINE_MODULUS)?)?;

    debug!(
        upper,
        lower,
        upper_trigram = upper_trigram.name(),
        lower_trigram = lower_trigram.name(),
        changing_line = changing_line.number(),
        "cast_complete"
    );

    Reading::assemble(
        method,
        upper,
        lower,
        Hexagram::new(lower_trigram, upper_trigram),
        changing_line,
    )
}
