//! The immutable record produced by one casting.

use serde::Serialize;

use crate::branch::CalendarPoint;
use crate::element::Relation;
use crate::error::CastResult;
use crate::hexagram::Hexagram;
use crate::transform::{changed_hexagram, mutual_hexagram, resolve_roles, ChangingLine, Roles};
use crate::trigram::Trigram;

/// How the two casting numbers were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CastMethod {
    /// Two numbers supplied directly.
    Numbers,
    /// Sums of the calendar numbers of a moment in time.
    Calendar { point: CalendarPoint },
}

/// Everything derived from one casting.
///
/// Presentation and prompt building only read these fields; nothing needs to
/// be re-derived downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    method: CastMethod,
    upper_number: u64,
    lower_number: u64,
    changing_line: ChangingLine,
    primary: Hexagram,
    mutual: Hexagram,
    changed: Hexagram,
    subject: Trigram,
    object: Trigram,
    changed_result: Trigram,
    subject_object: Relation,
    subject_changed: Relation,
}

impl Reading {
    /// Derive the full reading from the primary trigrams and the changing line.
    pub(crate) fn assemble(
        method: CastMethod,
        upper_number: u64,
        lower_number: u64,
        primary: Hexagram,
        changing_line: ChangingLine,
    ) -> CastResult<Self> {
        let changed = changed_hexagram(&primary, changing_line)?;
        let mutual = mutual_hexagram(&primary)?;
        let Roles {
            subject,
            object,
            changed_result,
        } = resolve_roles(&primary, &changed, changing_line);

        Ok(Self {
            method,
            upper_number,
            lower_number,
            changing_line,
            primary,
            mutual,
            changed,
            subject,
            object,
            changed_result,
            subject_object: subject.element().relation_to(object.element()),
            subject_changed: subject.element().relation_to(changed_result.element()),
        })
    }

    pub fn method(&self) -> &CastMethod {
        &self.method
    }

    pub fn upper_number(&self) -> u64 {
        self.upper_number
    }

    pub fn lower_number(&self) -> u64 {
        self.lower_number
    }

    pub fn changing_line(&self) -> ChangingLine {
        self.changing_line
    }

    /// The primary hexagram (本卦).
    pub fn primary(&self) -> &Hexagram {
        &self.primary
    }

    /// The nuclear hexagram (互卦).
    pub fn mutual(&self) -> &Hexagram {
        &self.mutual
    }

    /// The hexagram after the changing line flips (变卦).
    pub fn changed(&self) -> &Hexagram {
        &self.changed
    }

    pub fn subject(&self) -> Trigram {
        self.subject
    }

    pub fn object(&self) -> Trigram {
        self.object
    }

    pub fn changed_result(&self) -> Trigram {
        self.changed_result
    }

    /// Relation of the object's element to the subject's.
    pub fn subject_object(&self) -> Relation {
        self.subject_object
    }

    /// Relation of the changed-result trigram's element to the subject's.
    pub fn subject_changed(&self) -> Relation {
        self.subject_changed
    }

    /// Whether 0-based line `index` is the changing line.
    pub fn is_changing_line(&self, index: usize) -> bool {
        self.changing_line.index() == index
    }
}
