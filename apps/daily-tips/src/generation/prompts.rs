// Prompt constants for the daily health-tips record.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Health-tips prompt template.
/// Replace: {date}, {json_only_instruction}
pub const HEALTH_TIPS_PROMPT_TEMPLATE: &str = r#"Today is {date}. Write today's short health tips about sugar, calorie and caffeine intake for a healthy adult.

Return a JSON object with this EXACT schema (no extra fields):
{
  "date": "{date}",
  "healthTips": {
    "sugar": {
      "dailyAmount": "25g",
      "note": "Added sugar should stay under 25g per day; watch out for sweetened drinks."
    },
    "calorie": {
      "range": {
        "lightActivity": "1800-2000 kcal",
        "moderateActivity": "2000-2400 kcal",
        "heavyActivity": "2400-2800 kcal"
      },
      "tip": "Spread calories across three meals and favour vegetables and lean protein."
    },
    "caffeine": {
      "safeAmount": "400mg",
      "warning": "Avoid caffeine within six hours of bedtime."
    }
  }
}

Rules:
- "dailyAmount" is in grams (g), "safeAmount" in milligrams (mg), calorie ranges in kcal.
- Every value is a short human-readable string.
- Vary the "note", "tip" and "warning" text from day to day.

{json_only_instruction}"#;

/// Fills the template for the given canonical date (`YYYY-MM-DD`).
pub fn build_health_tips_prompt(date: &str) -> String {
    HEALTH_TIPS_PROMPT_TEMPLATE
        .replace("{date}", date)
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
}
