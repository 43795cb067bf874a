//! Prompt construction from a reading and the user's question.

use askama::Template;
use meihua_core::{CastMethod, Reading, Relation, Trigram};
use serde::Serialize;

use crate::error::OracleResult;

const DEFAULT_QUESTION: &str = "求测运势";
const DEFAULT_SYSTEM_PROMPT: &str = "你是一位精通梅花易数与八字命理的国学大师。";

/// What the user wants to know, plus optional birth-chart context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consultation {
    pub question: Option<String>,
    /// Four pillars (八字), e.g. "甲子年 丙寅月 戊午日 壬申时".
    pub bazi: Option<String>,
}

impl Consultation {
    pub fn new(question: Option<String>, bazi: Option<String>) -> Self {
        Self { question, bazi }
    }

    /// The question, or a general fortune query when left blank.
    pub fn question(&self) -> &str {
        non_blank(self.question.as_deref()).unwrap_or(DEFAULT_QUESTION)
    }

    pub fn bazi(&self) -> Option<&str> {
        non_blank(self.bazi.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A chat message in the OpenAI wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Container for the system prompt so callers can override copy if needed.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system_prompt: String,
}

impl PromptTemplate {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: prompt.into(),
        }
    }

    /// Render the user message for `reading`.
    pub fn user_prompt(&self, reading: &Reading, consultation: &Consultation) -> OracleResult<String> {
        let primary = reading.primary();
        let mutual = reading.mutual();
        let changed = reading.changed();

        let prompt = InterpretationPrompt {
            question: consultation.question(),
            bazi: consultation.bazi(),
            method: describe_method(reading.method()),
            primary_name: primary.name(),
            primary_upper: primary.upper().to_string(),
            primary_lower: primary.lower().to_string(),
            changing_line: reading.changing_line().number(),
            mutual_name: mutual.name(),
            mutual_upper: mutual.upper().to_string(),
            mutual_lower: mutual.lower().to_string(),
            changed_name: changed.name(),
            changed_upper: changed.upper().to_string(),
            changed_lower: changed.lower().to_string(),
            subject: describe_trigram(reading.subject()),
            object: describe_trigram(reading.object()),
            changed_result: describe_trigram(reading.changed_result()),
            subject_object: describe_relation(reading.subject_object()),
            subject_changed: describe_relation(reading.subject_changed()),
        };
        Ok(prompt.render()?)
    }

    /// System and user messages for one interpretation request.
    pub fn messages(
        &self,
        reading: &Reading,
        consultation: &Consultation,
    ) -> OracleResult<Vec<ChatMessage>> {
        Ok(vec![
            ChatMessage {
                role: "system",
                content: self.system_prompt.clone(),
            },
            ChatMessage {
                role: "user",
                content: self.user_prompt(reading, consultation)?,
            },
        ])
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

fn describe_trigram(trigram: Trigram) -> String {
    format!("{}（{}）", trigram.name(), trigram.element())
}

fn describe_relation(relation: Relation) -> String {
    format!("{}（{}）", relation.label(), relation.outlook().label())
}

fn describe_method(method: &CastMethod) -> String {
    match method {
        CastMethod::Numbers => "数字起卦".to_string(),
        CastMethod::Calendar { point } => format!(
            "时间起卦（{}年 {}{}月 {}日 {}时）",
            point.year_branch,
            if point.is_leap_month() { "闰" } else { "" },
            point.month_number(),
            point.lunar_day,
            point.hour_branch
        ),
    }
}

#[derive(Template)]
#[template(path = "interpretation.txt", escape = "none")]
struct InterpretationPrompt<'a> {
    question: &'a str,
    bazi: Option<&'a str>,
    method: String,
    primary_name: String,
    primary_upper: String,
    primary_lower: String,
    changing_line: u8,
    mutual_name: String,
    mutual_upper: String,
    mutual_lower: String,
    changed_name: String,
    changed_upper: String,
    changed_lower: String,
    subject: String,
    object: String,
    changed_result: String,
    subject_object: String,
    subject_changed: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use meihua_core::{cast_calendar, cast_numbers, CalendarPoint, EarthlyBranch};

    #[test]
    fn blank_question_falls_back() {
        let consultation = Consultation::new(Some("   ".into()), Some("".into()));
        assert_eq!(consultation.question(), DEFAULT_QUESTION);
        assert_eq!(consultation.bazi(), None);
    }

    #[test]
    fn user_prompt_lists_the_reading() {
        let reading = cast_numbers(3, 8).unwrap();
        let consultation = Consultation::new(Some("这次面试能顺利通过吗？".into()), None);
        let prompt = PromptTemplate::default()
            .user_prompt(&reading, &consultation)
            .unwrap();

        assert!(prompt.contains("【用户问题】：这次面试能顺利通过吗？"));
        assert!(prompt.contains("本卦：离坤（上离(火) 下坤(土)）"));
        assert!(prompt.contains("动爻：第5爻"));
        assert!(prompt.contains("互卦：坎艮"));
        assert!(prompt.contains("变卦：乾坤"));
        assert!(prompt.contains("体卦：坤（土）"));
        assert!(prompt.contains("用卦：离（火）"));
        assert!(prompt.contains("变卦结果：乾（金）"));
        assert!(prompt.contains("体用关系：用生体（吉）"));
        assert!(!prompt.contains("【用户八字】"));
    }

    #[test]
    fn bazi_section_appears_when_given() {
        let reading = cast_numbers(1, 1).unwrap();
        let consultation = Consultation::new(None, Some("甲子年 丙寅月 戊午日 壬申时".into()));
        let prompt = PromptTemplate::default()
            .user_prompt(&reading, &consultation)
            .unwrap();
        assert!(prompt.contains("【用户问题】：求测运势"));
        assert!(prompt.contains("【用户八字】：甲子年 丙寅月 戊午日 壬申时"));
        assert!(prompt.contains("请结合八字命理与梅花易数综合判断。"));
    }

    #[test]
    fn calendar_method_is_described() {
        let point = CalendarPoint::new(EarthlyBranch::Wu, -6, 9, EarthlyBranch::Zi).unwrap();
        let reading = cast_calendar(&point).unwrap();
        let prompt = PromptTemplate::default()
            .user_prompt(&reading, &Consultation::default())
            .unwrap();
        assert!(prompt.contains("时间起卦（午年 闰6月 9日 子时）"));
    }

    #[test]
    fn messages_pair_system_and_user() {
        let reading = cast_numbers(3, 8).unwrap();
        let template = PromptTemplate::new("custom system");
        let messages = template.messages(&reading, &Consultation::default()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "custom system");
        assert_eq!(messages[1].role, "user");
    }
}
