//! Best-effort parser for generated roadmap text
//!
//! The model is asked for WEEKLY BREAKDOWN / LEARNING TIPS / MILESTONES
//! sections but nothing guarantees it complies. The parser walks the text line
//! by line through a three-state machine and never fails: text without any
//! recognizable keyword simply yields an empty roadmap.
//!
//! Line classification, in priority order:
//!
//! 1. a line with the word "week"/"weeks" plus ":" or "title" is a week heading
//! 2. a bullet ("-" or "•") is an item for the current section
//! 3. a line whose text before the first ":" names "milestone"/"tip" is a
//!    heading for that section; the earlier keyword wins when both appear
//! 4. any other line mentioning "milestone"/"tip" is a bare mention that
//!    closes the opposite section
//! 5. anything else is plain text (candidate week description)

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{MAX_MILESTONES, MAX_TIPS, WeekEntry};

/// Minimum length (exclusive) of a line to be taken as a week description
pub const DESCRIPTION_MIN_CHARS: usize = 20;

static WEEK_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bweeks?(?:\s*\d|\b)").expect("week keyword regex is valid"));

static WEEK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bweeks?(?:\s*\d[\d\s\-–]*|\b)\s*:?\s*").expect("week prefix regex is valid"));

static TIP_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btips?\b").expect("tip regex is valid"));

static MILESTONE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmilestones?\b").expect("milestone regex is valid"));

/// Section the parser is currently filling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Weeks,
    Tips,
    Milestones,
}

/// Output of parsing one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoadmap {
    pub weeks: Vec<WeekEntry>,
    pub tips: Vec<String>,
    pub milestones: Vec<String>,
}

/// What a single trimmed line means to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    WeekHeading(String),
    Bullet(&'a str),
    TipsHeading(Option<String>),
    MilestonesHeading(Option<String>),
    TipMention,
    MilestoneMention,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let lower = line.to_lowercase();

    if WEEK_WORD.is_match(line) && (line.contains(':') || lower.contains("title")) {
        return Line::WeekHeading(week_title(line));
    }

    if let Some(item) = strip_bullet(line) {
        return Line::Bullet(item);
    }

    // Only the heading part decides the section; the inline item may mention either keyword
    if let Some((head, rest)) = line.split_once(':') {
        let tip = TIP_WORD.find(head).map(|m| m.start());
        let milestone = MILESTONE_WORD.find(head).map(|m| m.start());
        match (tip, milestone) {
            (Some(t), Some(m)) if t < m => return Line::TipsHeading(inline_item(rest)),
            (_, Some(_)) => return Line::MilestonesHeading(inline_item(rest)),
            (Some(_), None) => return Line::TipsHeading(inline_item(rest)),
            (None, None) => {}
        }
    }

    if MILESTONE_WORD.is_match(line) {
        return Line::MilestoneMention;
    }

    if TIP_WORD.is_match(line) {
        return Line::TipMention;
    }

    Line::Text(line)
}

/// Remove the first "Week N:" prefix and any heading decoration
fn week_title(line: &str) -> String {
    let stripped = WEEK_PREFIX.replacen(line, 1, "");
    clean(&stripped).to_string()
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .map(str::trim_start)
}

/// Text after a heading's colon, None when only decoration follows
fn inline_item(rest: &str) -> Option<String> {
    let item = clean(rest);
    if item.is_empty() { None } else { Some(item.to_string()) }
}

fn clean(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '#' | '-' | '•'))
}

/// Line-oriented roadmap state machine
#[derive(Debug, Default)]
pub struct RoadmapParser {
    section: Section,
    current: Option<WeekEntry>,
    output: ParsedRoadmap,
}

impl RoadmapParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current section
    pub fn section(&self) -> Section {
        self.section
    }

    /// Feed one raw line; blank lines are ignored
    pub fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        match classify(line) {
            Line::WeekHeading(title) => {
                self.close_week();
                let number = self.output.weeks.len() as u32 + 1;
                debug!(number, %title, "feed: week heading");
                self.current = Some(WeekEntry::new(number, title));
                self.section = Section::Weeks;
            }
            Line::Bullet(item) => self.push_item(item),
            Line::TipsHeading(inline) => {
                self.section = Section::Tips;
                if let Some(item) = inline {
                    self.push_item(&item);
                }
            }
            Line::MilestonesHeading(inline) => {
                self.section = Section::Milestones;
                if let Some(item) = inline {
                    self.push_item(&item);
                }
            }
            Line::TipMention => {
                if self.section == Section::Milestones {
                    self.section = Section::Weeks;
                }
            }
            Line::MilestoneMention => {
                if self.section == Section::Tips {
                    self.section = Section::Weeks;
                }
            }
            Line::Text(text) => {
                if self.section == Section::Weeks
                    && let Some(week) = self.current.as_mut()
                    && week.description.is_empty()
                    && text.chars().count() > DESCRIPTION_MIN_CHARS
                {
                    week.description = text.to_string();
                }
            }
        }
    }

    /// Close any open week and return what was collected
    pub fn finish(mut self) -> ParsedRoadmap {
        self.close_week();
        debug!(
            weeks = self.output.weeks.len(),
            tips = self.output.tips.len(),
            milestones = self.output.milestones.len(),
            "finish: parsed roadmap"
        );
        self.output
    }

    fn push_item(&mut self, item: &str) {
        let item = item.trim();
        if item.is_empty() {
            return;
        }
        match self.section {
            Section::Weeks => {
                if let Some(week) = self.current.as_mut() {
                    week.push_topic(item);
                }
            }
            Section::Tips => {
                if self.output.tips.len() < MAX_TIPS {
                    self.output.tips.push(item.to_string());
                }
            }
            Section::Milestones => {
                if self.output.milestones.len() < MAX_MILESTONES {
                    self.output.milestones.push(item.to_string());
                }
            }
        }
    }

    fn close_week(&mut self) {
        if let Some(week) = self.current.take() {
            self.output.weeks.push(week);
        }
    }
}

/// Parse a complete response
pub fn parse_response(text: &str) -> ParsedRoadmap {
    debug!(len = text.len(), "parse_response: called");
    let mut parser = RoadmapParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrays_scenario() {
        let text = "Week 1: Arrays\n- Array basics\n- Sorting\nTips:\n- Practice daily\nMilestone: Build a sorter";
        let parsed = parse_response(text);

        assert_eq!(parsed.weeks.len(), 1);
        assert_eq!(parsed.weeks[0].week, 1);
        assert_eq!(parsed.weeks[0].title, "Arrays");
        assert_eq!(parsed.weeks[0].topics, vec!["Array basics", "Sorting"]);
        assert_eq!(parsed.tips, vec!["Practice daily"]);
        assert_eq!(parsed.milestones, vec!["Build a sorter"]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(parse_response(""), ParsedRoadmap::default());
        assert_eq!(parse_response("   \n\n\t\n"), ParsedRoadmap::default());
        let parsed = parse_response("lorem ipsum dolor sit amet\n- a stray bullet\n12345");
        assert!(parsed.weeks.is_empty());
        assert!(parsed.tips.is_empty());
        assert!(parsed.milestones.is_empty());
    }

    #[test]
    fn test_weekly_breakdown_header_is_not_a_week() {
        let parsed = parse_response("WEEKLY BREAKDOWN:\nWeek 1: Setup\n- Install tools");
        assert_eq!(parsed.weeks.len(), 1);
        assert_eq!(parsed.weeks[0].title, "Setup");
    }

    #[test]
    fn test_weeks_are_numbered_by_appearance() {
        let parsed = parse_response("Week 3: Late start\nWeek 7: Jump\n**Week 9 - Final**: wrap up");
        let numbers: Vec<u32> = parsed.weeks.iter().map(|w| w.week).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(parsed.weeks[0].title, "Late start");
    }

    #[test]
    fn test_title_decoration_is_stripped() {
        let parsed = parse_response("### Week 2: Joins and Indexes\n**Week 3: Transactions**");
        assert_eq!(parsed.weeks[0].title, "Joins and Indexes");
        assert_eq!(parsed.weeks[1].title, "Transactions");
    }

    #[test]
    fn test_title_marker_without_colon() {
        let parsed = parse_response("Week 1 Title Basics of SQL");
        assert_eq!(parsed.weeks.len(), 1);
        assert_eq!(parsed.weeks[0].title, "Title Basics of SQL");
    }

    #[test]
    fn test_topics_capped_at_five() {
        let mut text = String::from("Week 1: Many topics\n");
        for i in 0..9 {
            text.push_str(&format!("- topic {i}\n"));
        }
        let parsed = parse_response(&text);
        assert_eq!(parsed.weeks[0].topics.len(), 5);
        assert_eq!(parsed.weeks[0].topics[4], "topic 4");
    }

    #[test]
    fn test_description_first_match_wins() {
        let text = "Week 1: Basics\nshort line\nThis is the first long enough sentence.\nThis is another long enough sentence.";
        let parsed = parse_response(text);
        assert_eq!(parsed.weeks[0].description, "This is the first long enough sentence.");
    }

    #[test]
    fn test_description_skips_bullets_and_keyword_lines() {
        let text = "Week 1: Basics\n- a bullet that is definitely longer than twenty\nRemember this tip for the whole week\nThe real description of this week.";
        let parsed = parse_response(text);
        assert_eq!(parsed.weeks[0].description, "The real description of this week.");
    }

    #[test]
    fn test_description_requires_more_than_twenty_chars() {
        let parsed = parse_response("Week 1: Basics\n12345678901234567890");
        assert_eq!(parsed.weeks[0].description, "");
        let parsed = parse_response("Week 1: Basics\n123456789012345678901");
        assert_eq!(parsed.weeks[0].description, "123456789012345678901");
    }

    #[test]
    fn test_tips_and_milestones_capped() {
        let mut text = String::from("LEARNING TIPS:\n");
        for i in 0..10 {
            text.push_str(&format!("• tip {i}\n"));
        }
        text.push_str("MILESTONES:\n");
        for i in 0..10 {
            text.push_str(&format!("- milestone {i}\n"));
        }
        let parsed = parse_response(&text);
        assert_eq!(parsed.tips.len(), 7);
        assert_eq!(parsed.milestones.len(), 5);
        assert_eq!(parsed.tips[0], "tip 0");
        assert_eq!(parsed.milestones[0], "milestone 0");
    }

    #[test]
    fn test_tip_bullets_do_not_become_topics() {
        let text = "Week 1: Basics\n- topic\nTips:\n- tip one\n- tip two";
        let parsed = parse_response(text);
        assert_eq!(parsed.weeks[0].topics, vec!["topic"]);
        assert_eq!(parsed.tips, vec!["tip one", "tip two"]);
    }

    #[test]
    fn test_bare_milestone_mention_closes_tips() {
        let mut parser = RoadmapParser::new();
        parser.feed("Week 1: Basics");
        parser.feed("Tips:");
        assert_eq!(parser.section(), Section::Tips);
        parser.feed("- keep notes");
        parser.feed("Aim for a milestone every month");
        assert_eq!(parser.section(), Section::Weeks);
        parser.feed("- back to topics");
        let parsed = parser.finish();
        assert_eq!(parsed.tips, vec!["keep notes"]);
        assert_eq!(parsed.weeks[0].topics, vec!["back to topics"]);
    }

    #[test]
    fn test_tip_heading_switches_out_of_milestones() {
        let parsed = parse_response("Milestones:\n- ship v1\nMore tips:\n- sleep well");
        assert_eq!(parsed.milestones, vec!["ship v1"]);
        assert_eq!(parsed.tips, vec!["sleep well"]);
    }

    #[test]
    fn test_week_heading_closes_tips() {
        let parsed = parse_response("Tips:\n- a tip\nWeek 2: Next\n- a topic");
        assert_eq!(parsed.tips, vec!["a tip"]);
        assert_eq!(parsed.weeks[0].topics, vec!["a topic"]);
    }

    #[test]
    fn test_tips_stay_open_to_end_without_exit() {
        let parsed = parse_response("Week 1: A\nTips:\n- one\n- two\n- three");
        assert_eq!(parsed.tips.len(), 3);
        assert!(parsed.weeks[0].topics.is_empty());
    }

    #[test]
    fn test_empty_bullets_are_ignored() {
        let parsed = parse_response("Week 1: A\n-\n- \n•\n- real");
        assert_eq!(parsed.weeks[0].topics, vec!["real"]);
    }

    #[test]
    fn test_bullets_before_any_week_are_dropped() {
        let parsed = parse_response("- orphan\nWeek 1: A\n- kept");
        assert_eq!(parsed.weeks[0].topics, vec!["kept"]);
    }

    #[test]
    fn test_multiple_is_not_a_tip_keyword() {
        let parsed = parse_response("Week 1: A\nUse multiple sources: books and videos\n- topic");
        assert!(parsed.tips.is_empty());
        assert_eq!(parsed.weeks[0].description, "Use multiple sources: books and videos");
        assert_eq!(parsed.weeks[0].topics, vec!["topic"]);
    }

    #[test]
    fn test_plural_and_range_week_headings() {
        let parsed = parse_response("Weeks 1-2: Foundations\n- Syntax\n- Types\nWeeks 3–4: Projects\n- Build a CLI");
        assert_eq!(parsed.weeks.len(), 2);
        assert_eq!(parsed.weeks[0].week, 1);
        assert_eq!(parsed.weeks[0].title, "Foundations");
        assert_eq!(parsed.weeks[0].topics, vec!["Syntax", "Types"]);
        assert_eq!(parsed.weeks[1].week, 2);
        assert_eq!(parsed.weeks[1].title, "Projects");
        assert_eq!(parsed.weeks[1].topics, vec!["Build a CLI"]);
    }

    #[test]
    fn test_weekly_words_stay_plain_text() {
        let parsed = parse_response("Week 1: Basics\nWeekly reviews: keep them short\n- topic");
        assert_eq!(parsed.weeks.len(), 1);
        assert_eq!(parsed.weeks[0].topics, vec!["topic"]);
    }

    #[test]
    fn test_tip_heading_mentioning_milestone_stays_in_tips() {
        let parsed = parse_response("Tip: celebrate every milestone you reach\n- rest on weekends\n- track progress");
        assert_eq!(
            parsed.tips,
            vec!["celebrate every milestone you reach", "rest on weekends", "track progress"]
        );
        assert!(parsed.milestones.is_empty());
    }

    #[test]
    fn test_milestone_heading_mentioning_tips_stays_in_milestones() {
        let parsed = parse_response("Milestones: apply the tips you collected\n- ship v1");
        assert_eq!(parsed.milestones, vec!["apply the tips you collected", "ship v1"]);
        assert!(parsed.tips.is_empty());
    }

    #[test]
    fn test_keyword_after_colon_is_only_a_mention() {
        let mut parser = RoadmapParser::new();
        parser.feed("Milestones:");
        parser.feed("- ship v1");
        parser.feed("Remember: one small tip a day");
        assert_eq!(parser.section(), Section::Weeks);
        let parsed = parser.finish();
        assert_eq!(parsed.milestones, vec!["ship v1"]);
        assert!(parsed.tips.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "Week 1: Arrays\n- a\n- b\nDescription of arrays week here\nTips:\n- t\nMilestones:\n- m";
        assert_eq!(parse_response(text), parse_response(text));
    }
}
