//! Text prompts sent to the generation backend.

use crate::api::ImageAnalysis;

const SECTION_SEPARATOR: &str = "\n\n================================\n";
pub const DEFAULT_OUTPUT_LANGUAGE: &str = "Vietnamese";

/// Optional customisations of the idea-generation template. A blank field
/// drops its whole section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    /// Extra lines appended under GLOBAL RULES, after the built-in rules.
    pub global_rules: Option<String>,
    /// Body of the THEME REQUIREMENT section.
    pub theme_requirement: Option<String>,
    /// Body of the FOR EACH PRODUCT IDEA section.
    pub for_each_idea: Option<String>,
    /// Body of the ADDITIONAL RULES section.
    pub additional_rules: Option<String>,
    /// Body of the IMPORTANT section.
    pub important: Option<String>,
    /// Language the backend is told to write titles and descriptions in.
    pub output_language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            global_rules: None,
            theme_requirement: None,
            for_each_idea: None,
            additional_rules: None,
            important: None,
            output_language: DEFAULT_OUTPUT_LANGUAGE.to_string(),
        }
    }
}

/// Turn free text into `- ` bullets, one per non-blank line.
pub fn format_bullet_lines(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(title: &str, body: &str) -> String {
    format!("{}:\n{}", title, body)
}

fn optional_section(title: &str, input: Option<&str>) -> Option<String> {
    let bullets = format_bullet_lines(input);
    (!bullets.is_empty()).then(|| section(title, &bullets))
}

/// Compose the image-edit instruction for `count` design variations of the
/// analysed product.
pub fn build_idea_prompt(analysis: &ImageAnalysis, options: &PromptOptions, count: u32) -> String {
    let profile = analysis.to_pretty_json();

    let mut sections = vec![
        format!(
            "Based on the PROVIDED REFERENCE IMAGE and this product profile:\n{}\n\n\
             You are directly editing the USER-UPLOADED IMAGE.\n\
             This is a REAL IMAGE EDIT, not image generation.",
            profile
        ),
        section(
            "CORE RULE",
            "- The uploaded image is the SINGLE SOURCE OF TRUTH\n\
             - Preserve the original composition, framing, and perspective\n\
             - Edit the existing image, do NOT create a new one",
        ),
        section(
            "PRODUCT LOCK",
            "- Keep the same physical product instance\n\
             - Same product type, structure, shape, proportions, and materials\n\
             - Same camera angle and realistic lighting behavior\n\
             - Do NOT recreate, replace, or re-render the product",
        ),
        section(
            "EDIT SCOPE (DESIGN ONLY)",
            "- ONLY change the surface DESIGN / GRAPHIC\n\
             - Design area size, position, alignment, and orientation MUST stay identical\n\
             - Follow original surface curvature and perspective\n\n\
             NOT allowed:\n\
             - changing product form, material, or texture\n\
             - adding text, logos, or watermarks\n\
             - adding elements outside the original design area",
        ),
        section(
            "BACKGROUND (SUBTLE VARIATION ALLOWED)",
            "- Background must stay based on the original image\n\
             - Allowed: slight tone, brightness, or realistic texture variation\n\
             - Background must remain minimal and non-distracting\n\n\
             NOT allowed:\n\
             - background replacement\n\
             - studio or abstract backdrops\n\
             - new background objects",
        ),
        section(
            "DESIGN VARIATIONS",
            &format!(
                "Generate {} variations of the SAME product.\n\
                 Each variation:\n\
                 - Uses the SAME image\n\
                 - Changes ONLY the surface design\n\
                 - Has ONE clear theme",
                count
            ),
        ),
    ];

    sections.extend(
        [
            ("THEME REQUIREMENT", options.theme_requirement.as_deref()),
            ("FOR EACH PRODUCT IDEA", options.for_each_idea.as_deref()),
            ("ADDITIONAL RULES", options.additional_rules.as_deref()),
            ("IMPORTANT", options.important.as_deref()),
        ]
        .into_iter()
        .filter_map(|(title, input)| optional_section(title, input)),
    );

    let mut global_rules = format!(
        "- No copyrighted characters, brands, or logos\n\
         - No watermark, no text\n\
         - Each idea is a NEW SURFACE DESIGN ONLY\n\
         - Write everything in {}",
        options.output_language
    );
    let custom_rules = format_bullet_lines(options.global_rules.as_deref());
    if !custom_rules.is_empty() {
        global_rules.push('\n');
        global_rules.push_str(&custom_rules);
    }
    sections.push(section("GLOBAL RULES", &global_rules));

    sections.push(section(
        "OUTPUT FORMAT",
        "Return JSON array:\n[\n  { \"title\": \"\", \"description\": \"\", \"prompt\": \"\" }\n]",
    ));

    sections.join(SECTION_SEPARATOR)
}

/// Prompts the user actually filled in, in order.
pub fn non_blank_prompts(prompts: &[String]) -> Vec<String> {
    prompts
        .iter()
        .filter(|prompt| !prompt.trim().is_empty())
        .cloned()
        .collect()
}
