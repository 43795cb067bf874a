//! Text and JSON presentation of readings.

use std::str::FromStr;

use anyhow::{Context, Result};
use meihua_core::{CastMethod, Hexagram, Line, Reading, LINE_COUNT};

const SOLID: &str = "━━━━━━━";
const BROKEN: &str = "━━━ ━━━";
const COLUMN_WIDTH: usize = 14;

/// Output format for casting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("Unknown format: {}. Use 'text' or 'json'.", other),
        }
    }
}

/// Draw one line; a moving line carries the classical mark (○ old yang, × old yin).
fn line_cell(line: Line, moving: bool) -> String {
    let (figure, mark) = match line {
        Line::Solid => (SOLID, "○"),
        Line::Broken => (BROKEN, "×"),
    };
    if moving {
        format!("{figure} {mark}")
    } else {
        figure.to_string()
    }
}

/// Terminal width, counting CJK ideographs and fullwidth forms as two columns.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x2E80..=0x9FFF | 0xF900..=0xFAFF | 0xFF00..=0xFF60 => 2,
            _ => 1,
        })
        .sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}

/// Render the three figures side by side, top line first.
pub fn render_figures(reading: &Reading) -> String {
    let columns: [(&str, &Hexagram, bool); 3] = [
        ("本卦", reading.primary(), true),
        ("互卦", reading.mutual(), false),
        ("变卦", reading.changed(), true),
    ];

    let mut out = String::new();
    let titles: Vec<String> = columns
        .iter()
        .map(|(label, hexagram, _)| pad(&format!("{label} {}", hexagram.name()), COLUMN_WIDTH))
        .collect();
    out.push_str(titles.concat().trim_end());
    out.push('\n');

    for index in (0..LINE_COUNT).rev() {
        let row: Vec<String> = columns
            .iter()
            .map(|(_, hexagram, marks_moving)| {
                let moving = *marks_moving && reading.is_changing_line(index);
                pad(&line_cell(hexagram.lines()[index], moving), COLUMN_WIDTH)
            })
            .collect();
        out.push_str(row.concat().trim_end());
        out.push('\n');
    }
    out
}

/// Full text report: origin, figures and the subject/object summary.
pub fn render_text(reading: &Reading) -> String {
    let mut out = String::new();

    let origin = match reading.method() {
        CastMethod::Numbers => format!(
            "数字起卦：上卦数 {} · 下卦数 {}",
            reading.upper_number(),
            reading.lower_number()
        ),
        CastMethod::Calendar { point } => format!(
            "时间起卦：{}年 {}{}月 {}日 {}时（上 {} · 下 {}）",
            point.year_branch,
            if point.is_leap_month() { "闰" } else { "" },
            point.month_number(),
            point.lunar_day,
            point.hour_branch,
            reading.upper_number(),
            reading.lower_number()
        ),
    };

    out.push_str("☯️  梅花易数排盘\n");
    out.push_str(&format!("{:─<40}\n", ""));
    out.push_str(&origin);
    out.push_str("\n\n");
    out.push_str(&render_figures(reading));
    out.push('\n');
    out.push_str(&format!("动爻：    第{}爻\n", reading.changing_line()));
    out.push_str(&format!("体卦：    {}\n", reading.subject()));
    out.push_str(&format!("用卦：    {}\n", reading.object()));
    out.push_str(&format!("变卦结果：{}\n", reading.changed_result()));
    out.push_str(&format!(
        "体用：    {}（{}）\n",
        reading.subject_object(),
        reading.subject_object().outlook().label()
    ));
    out.push_str(&format!(
        "体变：    {}（{}）\n",
        reading.subject_changed(),
        reading.subject_changed().outlook().label()
    ));
    out
}

/// The reading as pretty-printed JSON.
pub fn render_json(reading: &Reading) -> Result<String> {
    serde_json::to_string_pretty(reading).with_context(|| "Failed to serialize reading to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use meihua_core::cast_numbers;

    #[test]
    fn format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("md".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn figures_are_drawn_top_down_with_moving_mark() {
        let reading = cast_numbers(3, 8).unwrap();
        let figures = render_figures(&reading);
        let rows: Vec<&str> = figures.lines().collect();

        assert_eq!(rows.len(), 7);
        assert!(rows[0].starts_with("本卦 离坤"));
        assert!(rows[0].contains("互卦 坎艮"));
        assert!(rows[0].contains("变卦 乾坤"));
        // Top line of Li is solid.
        assert!(rows[1].starts_with(SOLID));
        // Line 5 (second row from the top) moves: broken in the primary, solid after.
        assert!(rows[2].starts_with(&format!("{BROKEN} ×")));
        assert!(rows[2].trim_end().ends_with(&format!("{SOLID} ○")));
        // Bottom line of Kun is broken and still.
        assert_eq!(rows[6].matches('×').count(), 0);
    }

    #[test]
    fn text_report_summarizes_roles() {
        let reading = cast_numbers(3, 8).unwrap();
        let text = render_text(&reading);
        assert!(text.contains("数字起卦：上卦数 3 · 下卦数 8"));
        assert!(text.contains("动爻：    第5爻"));
        assert!(text.contains("体卦：    坤(土)"));
        assert!(text.contains("用卦：    离(火)"));
        assert!(text.contains("变卦结果：乾(金)"));
        assert!(text.contains("体用：    用生体（吉）"));
    }

    #[test]
    fn cjk_counts_double() {
        assert_eq!(display_width("本卦 离坤"), 9);
        assert_eq!(display_width(SOLID), 7);
    }
}
