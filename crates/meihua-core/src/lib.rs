//! Hexagram derivation engine for Plum Blossom Numerology (梅花易数).
//!
//! A casting turns two positive numbers, or the calendar numbers of a moment,
//! into a primary hexagram and one changing line. Everything else is derived
//! from those two facts:
//!
//! ```text
//! numbers ──► trigram numbers + changing line ──► primary hexagram
//!                                                   │
//!                     ┌─────────────────────────────┼───────────────┐
//!                     ▼                             ▼               ▼
//!              mutual hexagram              changed hexagram   subject / object
//! ```
//!
//! Lines are always ordered bottom to top; line 1 is the bottom line.
//!
//! ```
//! use meihua_core::{cast_numbers, Trigram};
//!
//! let reading = cast_numbers(3, 8).unwrap();
//! assert_eq!(reading.primary().upper(), Trigram::Li);
//! assert_eq!(reading.changing_line().number(), 5);
//! assert_eq!(reading.changed_result(), Trigram::Qian);
//! ```

mod branch;
mod casting;
mod element;
mod error;
mod hexagram;
mod reading;
mod transform;
mod trigram;

pub use branch::{CalendarPoint, EarthlyBranch};
pub use casting::{cast, cast_calendar, cast_numbers, floor_mod, CastInput};
pub use element::{Element, Outlook, Relation};
pub use error::{CastError, CastResult};
pub use hexagram::{decode, encode, Hexagram, LINE_COUNT};
pub use reading::{CastMethod, Reading};
pub use transform::{changed_hexagram, mutual_hexagram, resolve_roles, ChangingLine, Roles};
pub use trigram::{Line, Trigram};
