//! The five elements (五行) and the relations between them.

use std::fmt;

use serde::Serialize;

/// One of the five classical elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    /// All five elements in generating order, starting from wood.
    pub const GENERATING_ORDER: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Chinese label (金木水火土).
    pub fn label(&self) -> &'static str {
        match self {
            Element::Metal => "金",
            Element::Wood => "木",
            Element::Water => "水",
            Element::Fire => "火",
            Element::Earth => "土",
        }
    }

    fn cycle_position(&self) -> usize {
        match self {
            Element::Wood => 0,
            Element::Fire => 1,
            Element::Earth => 2,
            Element::Metal => 3,
            Element::Water => 4,
        }
    }

    /// The element this one generates (wood feeds fire, fire makes earth, ...).
    pub fn generates(&self) -> Element {
        Self::GENERATING_ORDER[(self.cycle_position() + 1) % 5]
    }

    /// The element this one controls (wood parts earth, earth dams water, ...).
    pub fn controls(&self) -> Element {
        Self::GENERATING_ORDER[(self.cycle_position() + 2) % 5]
    }

    /// Classify `other` as seen from `self` taken as the subject.
    pub fn relation_to(&self, other: Element) -> Relation {
        if *self == other {
            Relation::Harmony
        } else if other.generates() == *self {
            Relation::SupportsSubject
        } else if self.generates() == other {
            Relation::DrainsSubject
        } else if self.controls() == other {
            Relation::SubjectControls
        } else {
            Relation::ControlsSubject
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Relation between the subject trigram's element and another element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Same element (比和).
    Harmony,
    /// The other element generates the subject (生体).
    SupportsSubject,
    /// The subject generates the other element (体生).
    DrainsSubject,
    /// The subject controls the other element (体克).
    SubjectControls,
    /// The other element controls the subject (克体).
    ControlsSubject,
}

/// Coarse auspiciousness attached to a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Favorable,
    Unfavorable,
}

impl Relation {
    /// Short Chinese label used in summaries and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Relation::Harmony => "比和",
            Relation::SupportsSubject => "用生体",
            Relation::DrainsSubject => "体生用",
            Relation::SubjectControls => "体克用",
            Relation::ControlsSubject => "用克体",
        }
    }

    pub fn outlook(&self) -> Outlook {
        match self {
            Relation::Harmony | Relation::SupportsSubject | Relation::SubjectControls => {
                Outlook::Favorable
            }
            Relation::DrainsSubject | Relation::ControlsSubject => Outlook::Unfavorable,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Outlook {
    pub fn label(&self) -> &'static str {
        match self {
            Outlook::Favorable => "吉",
            Outlook::Unfavorable => "凶",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generating_cycle_closes() {
        let mut element = Element::Wood;
        for _ in 0..5 {
            element = element.generates();
        }
        assert_eq!(element, Element::Wood);
        assert_eq!(Element::Metal.generates(), Element::Water);
        assert_eq!(Element::Water.generates(), Element::Wood);
    }

    #[test]
    fn controlling_cycle_matches_classical_order() {
        assert_eq!(Element::Wood.controls(), Element::Earth);
        assert_eq!(Element::Earth.controls(), Element::Water);
        assert_eq!(Element::Water.controls(), Element::Fire);
        assert_eq!(Element::Fire.controls(), Element::Metal);
        assert_eq!(Element::Metal.controls(), Element::Wood);
    }

    #[test]
    fn relation_is_seen_from_the_subject() {
        // Earth subject, fire object: fire generates earth.
        assert_eq!(
            Element::Earth.relation_to(Element::Fire),
            Relation::SupportsSubject
        );
        // Earth subject, metal result: earth generates metal.
        assert_eq!(
            Element::Earth.relation_to(Element::Metal),
            Relation::DrainsSubject
        );
        assert_eq!(
            Element::Metal.relation_to(Element::Wood),
            Relation::SubjectControls
        );
        assert_eq!(
            Element::Wood.relation_to(Element::Metal),
            Relation::ControlsSubject
        );
        assert_eq!(Element::Water.relation_to(Element::Water), Relation::Harmony);
    }

    #[test]
    fn every_pair_has_exactly_one_relation() {
        for subject in Element::GENERATING_ORDER {
            let mut seen = Vec::new();
            for other in Element::GENERATING_ORDER {
                seen.push(subject.relation_to(other));
            }
            seen.sort_by_key(|r| *r as u8);
            seen.dedup();
            assert_eq!(seen.len(), 5, "relations for {subject:?} are not distinct");
        }
    }

    #[test]
    fn outlook_follows_relation() {
        assert_eq!(Relation::SupportsSubject.outlook(), Outlook::Favorable);
        assert_eq!(Relation::ControlsSubject.outlook(), Outlook::Unfavorable);
        assert_eq!(Relation::DrainsSubject.outlook().label(), "凶");
    }
}
