//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are not found.

/// Roadmap generation prompt (Handlebars)
pub const ROADMAP: &str = r#"Create a comprehensive learning roadmap for the following goal:

GOAL: {{goal}}
DURATION: {{duration}} ({{weeks}} weeks)
DAILY TIME: {{daily_time}}
MODE: {{mode}}
EXPERIENCE LEVEL: {{experience}}
PREFERRED SCHEDULE: {{preferred_days}}

Please create a detailed learning plan with the following structure:

WEEKLY BREAKDOWN:
For each of the {{weeks}} weeks, provide:
- Week number and title
- 3-5 specific topics to cover
- Brief description of what will be accomplished
- Practical exercises or projects

LEARNING TIPS:
Provide 5-7 actionable learning tips specific to this goal

MILESTONES:
Define 3-5 key milestones with specific deliverables

DAILY TASKS:
Create specific daily tasks for the first 2 weeks

Make the plan:
1. Realistic for the given timeframe and daily commitment
2. Progressive in difficulty from beginner to advanced
3. Includes hands-on practice and projects
4. Appropriate for {{mode}} mode
5. Considers {{level_hint}} experience level

Format the response clearly with headers and bullet points."#;

/// Get an embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "roadmap" => Some(ROADMAP),
        _ => None,
    }
}
