//! Instruction templates sent to the model.

use super::ExtractionStrategy;
use crate::models::{ModificationKind, PROMPT_CHAR_LIMIT};

const FIELD_GUIDE: &str = "\
- \"concept\": the main subject and what is happening, in one or two sentences.
- \"composition\": framing, camera angle, placement of the subject and negative space.
- \"color\": the palette, naming three to five specific colours.
- \"background\": what fills the space behind the subject.
- \"mood\": the emotional tone and lighting atmosphere.
- \"style\": the artistic medium or rendering style.
- \"settings\": technical parameters such as aspect ratio, detail level and quality keywords.";

pub fn title_prompt(theme: &str) -> String {
    format!(
        "You write titles for images sold on a stock illustration marketplace.\n\
         Write one title for an image whose main subject is: {theme}\n\n\
         Rules:\n\
         - Use exactly four clauses separated by commas, in this order: the main subject, \
         the scene or setting, the visual style, the intended use.\n\
         - The title must contain the words \"illustration\" and \"background\".\n\
         - Write it on a single line in plain text. No quotation marks, numbering or explanation."
    )
}

pub fn json_prompt(title: &str, strategy: ExtractionStrategy) -> String {
    format!(
        "Create an image-generation prompt for the image titled below.\n\n\
         Title: {title}\n\n\
         Describe the image as a JSON object with exactly these seven string fields:\n\
         {FIELD_GUIDE}\n\n\
         {limit}\n\
         {output}",
        limit = length_rule(),
        output = output_rule(strategy),
    )
}

pub fn modify_prompt(current_json: &str, kind: ModificationKind, strategy: ExtractionStrategy) -> String {
    let (goal, rewrite) = match kind {
        ModificationKind::Color => (
            "Change the colour scheme of this image prompt.",
            "with a clearly different palette",
        ),
        ModificationKind::Style => (
            "Change the artistic style of this image prompt.",
            "so they fit a clearly different style",
        ),
    };

    format!(
        "{goal} Rewrite only the {changed} fields {rewrite}. \
         Keep {preserved} exactly as they are.\n\n\
         Current prompt:\n{current_json}\n\n\
         Return the full object with all seven fields.\n\
         {limit}\n\
         {output}",
        changed = quoted_list(kind.changed_fields()),
        preserved = quoted_list(kind.preserved_fields()),
        limit = length_rule(),
        output = output_rule(strategy),
    )
}

/// `"a", "b" and "c"`
fn quoted_list(fields: &[&str]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f)).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn length_rule() -> String {
    format!(
        "When formatted with two-space indentation the JSON object must not exceed {} characters.",
        PROMPT_CHAR_LIMIT
    )
}

fn output_rule(strategy: ExtractionStrategy) -> &'static str {
    match strategy {
        ExtractionStrategy::SchemaEnforced => "Return only the JSON object.",
        ExtractionStrategy::FencedText => {
            "Return the JSON object inside a markdown code block that starts with ```json and ends with ```."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prompt_interpolates_theme_verbatim() {
        let prompt = title_prompt("a cat wearing a \"tiny\" hat");
        assert!(prompt.contains("main subject is: a cat wearing a \"tiny\" hat\n"));
        assert!(prompt.contains("four clauses"));
    }

    #[test]
    fn json_prompt_names_every_field_and_the_limit() {
        let prompt = json_prompt("Harbor at dawn", ExtractionStrategy::SchemaEnforced);
        for field in crate::models::PROMPT_FIELDS {
            assert!(prompt.contains(&format!("\"{}\"", field)), "missing {}", field);
        }
        assert!(prompt.contains("910 characters"));
        assert!(prompt.contains("Title: Harbor at dawn"));
        assert!(!prompt.contains("```json"));
    }

    #[test]
    fn fenced_strategy_asks_for_a_code_block() {
        let prompt = json_prompt("Harbor at dawn", ExtractionStrategy::FencedText);
        assert!(prompt.contains("```json"));
    }

    #[test]
    fn modify_prompts_embed_current_object_and_differ_by_kind() {
        let current = "{\n  \"concept\": \"x\"\n}";
        let color = modify_prompt(current, ModificationKind::Color, ExtractionStrategy::SchemaEnforced);
        let style = modify_prompt(current, ModificationKind::Style, ExtractionStrategy::SchemaEnforced);
        assert!(color.contains(current));
        assert!(style.contains(current));
        assert!(color.contains("colour scheme"));
        assert!(style.contains("artistic style"));
        assert!(color.contains("910 characters") && style.contains("910 characters"));
    }

    #[test]
    fn modify_prompts_name_changed_and_preserved_fields() {
        let color = modify_prompt("{}", ModificationKind::Color, ExtractionStrategy::SchemaEnforced);
        assert!(color.contains("Rewrite only the \"color\" and \"background\" fields"));
        assert!(color.contains(
            "Keep \"concept\", \"composition\", \"mood\", \"style\" and \"settings\" exactly"
        ));

        let style = modify_prompt("{}", ModificationKind::Style, ExtractionStrategy::FencedText);
        assert!(style.contains(
            "Rewrite only the \"style\", \"color\", \"background\" and \"mood\" fields"
        ));
        assert!(style.contains("Keep \"concept\", \"composition\" and \"settings\" exactly"));
        assert!(style.contains("```json"));
    }

    #[test]
    fn quoted_list_joins_with_and() {
        assert_eq!(quoted_list(&["a"]), "\"a\"");
        assert_eq!(quoted_list(&["a", "b", "c"]), "\"a\", \"b\" and \"c\"");
        assert_eq!(quoted_list(&[]), "");
    }
}
