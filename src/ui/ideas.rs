use iced::{
    widget::{button, column, container, image, row, text, text_editor, Column, Space},
    Element, Length,
};

use crate::api::models::ProductProfile;
use crate::api::{GeneratedIdea, ImageAnalysis};
use crate::application::{build_idea_prompt, PromptOptions};
use crate::domain::{AppError, ImageUpload};
use crate::utils::parse_count;

use super::gallery::{GalleryAction, GalleryMessage, ResultGallery, ResultItem};
use super::mockup::{count_picker, image_picker, instructions};
use super::notifications::Notification;

const DEFAULT_IDEA_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    GlobalRules,
    ThemeRequirement,
    ForEachIdea,
    AdditionalRules,
    Important,
}

impl PromptField {
    pub const ALL: [PromptField; 5] = [
        PromptField::GlobalRules,
        PromptField::ThemeRequirement,
        PromptField::ForEachIdea,
        PromptField::AdditionalRules,
        PromptField::Important,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            PromptField::GlobalRules => "Global Rules",
            PromptField::ThemeRequirement => "Theme Requirement",
            PromptField::ForEachIdea => "For Each Product Idea",
            PromptField::AdditionalRules => "Additional Rules",
            PromptField::Important => "Important",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            PromptField::GlobalRules => "e.g. Use natural lighting, no logos...",
            PromptField::ThemeRequirement => "e.g. Every theme must suit winter...",
            PromptField::ForEachIdea => "e.g. Show a person wearing the product...",
            PromptField::AdditionalRules => "e.g. Prefer outdoor backgrounds...",
            PromptField::Important => "e.g. Avoid the color red...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Customize,
    Results,
}

/// State of the idea generator page. The prompt template is rebuilt whenever
/// the analysis, the idea count or a customisation field changes, and may be
/// edited by hand before sending.
pub struct IdeaPage {
    image: Option<ImageUpload>,
    preview: Option<image::Handle>,
    analysis: Option<ImageAnalysis>,
    is_analyzing: bool,
    idea_count: u32,
    count_input: String,
    fields: [text_editor::Content; 5],
    expanded: [bool; 5],
    template: text_editor::Content,
    show_template: bool,
    is_generating: bool,
    gallery: ResultGallery,
}

impl Default for IdeaPage {
    fn default() -> Self {
        Self {
            image: None,
            preview: None,
            analysis: None,
            is_analyzing: false,
            idea_count: DEFAULT_IDEA_COUNT,
            count_input: DEFAULT_IDEA_COUNT.to_string(),
            fields: std::array::from_fn(|_| text_editor::Content::new()),
            expanded: [false; 5],
            template: text_editor::Content::new(),
            show_template: false,
            is_generating: false,
            gallery: ResultGallery::new("Generated ideas", "idea"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum IdeaMessage {
    PickImage,
    ImagePicked(Option<Result<ImageUpload, AppError>>),
    ClearImage,
    Analyze,
    Analyzed(Result<ImageAnalysis, AppError>),
    CountSelected(u32),
    CountInputChanged(String),
    ToggleField(PromptField),
    FieldEdited(PromptField, text_editor::Action),
    ViewTemplate,
    CloseTemplate,
    TemplateEdited(text_editor::Action),
    GenerateIdeas,
    IdeasGenerated(Result<Vec<GeneratedIdea>, AppError>),
    Gallery(GalleryMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdeaAction {
    None,
    PickImage,
    Analyze(ImageUpload),
    GenerateIdeas { image: ImageUpload, prompt: String },
    Gallery(GalleryAction),
    Notify(Notification),
    Batch(Vec<IdeaAction>),
}

impl IdeaPage {
    fn reset(&mut self) {
        self.analysis = None;
        self.is_analyzing = false;
        self.idea_count = DEFAULT_IDEA_COUNT;
        self.count_input = DEFAULT_IDEA_COUNT.to_string();
        self.fields = std::array::from_fn(|_| text_editor::Content::new());
        self.expanded = [false; 5];
        self.template = text_editor::Content::new();
        self.show_template = false;
        self.is_generating = false;
        self.gallery.clear();
    }

    pub fn prompt_options(&self) -> PromptOptions {
        let field = |field: PromptField| {
            Some(self.fields[field.index()].text()).filter(|text| !text.trim().is_empty())
        };

        PromptOptions {
            global_rules: field(PromptField::GlobalRules),
            theme_requirement: field(PromptField::ThemeRequirement),
            for_each_idea: field(PromptField::ForEachIdea),
            additional_rules: field(PromptField::AdditionalRules),
            important: field(PromptField::Important),
            ..Default::default()
        }
    }

    fn regenerate_template(&mut self) {
        self.template = match &self.analysis {
            Some(analysis) => text_editor::Content::with_text(&build_idea_prompt(
                analysis,
                &self.prompt_options(),
                self.idea_count,
            )),
            None => text_editor::Content::new(),
        };
    }

    #[cfg(test)]
    pub fn template_text(&self) -> String {
        self.template.text()
    }

    #[cfg(test)]
    pub fn analysis(&self) -> Option<&ImageAnalysis> {
        self.analysis.as_ref()
    }

    #[cfg(test)]
    pub fn gallery(&self) -> &ResultGallery {
        &self.gallery
    }

    pub fn step(&self) -> Step {
        if !self.gallery.is_empty() {
            Step::Results
        } else if self.analysis.is_some() {
            Step::Customize
        } else {
            Step::Upload
        }
    }

    pub fn update(&mut self, message: IdeaMessage) -> IdeaAction {
        match message {
            IdeaMessage::PickImage => IdeaAction::PickImage,
            IdeaMessage::ImagePicked(None) => IdeaAction::None,
            IdeaMessage::ImagePicked(Some(Ok(upload))) => {
                self.reset();
                self.preview = Some(image::Handle::from_bytes(upload.bytes.clone()));
                self.image = Some(upload);
                IdeaAction::None
            }
            IdeaMessage::ImagePicked(Some(Err(e))) => IdeaAction::Notify((&e).into()),
            IdeaMessage::ClearImage => {
                self.reset();
                self.image = None;
                self.preview = None;
                IdeaAction::None
            }
            IdeaMessage::Analyze => {
                let Some(image) = self.image.clone() else {
                    return IdeaAction::Notify((&AppError::MissingImage).into());
                };
                if self.is_analyzing {
                    return IdeaAction::None;
                }
                self.is_analyzing = true;
                IdeaAction::Analyze(image)
            }
            IdeaMessage::Analyzed(result) => {
                self.is_analyzing = false;
                match result {
                    Ok(analysis) => {
                        self.analysis = Some(analysis);
                        self.regenerate_template();
                        IdeaAction::Notify(Notification::success("Image analyzed"))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "product analysis failed");
                        IdeaAction::Notify(Notification::error(
                            "Image analysis failed. Please try again.",
                        ))
                    }
                }
            }
            IdeaMessage::CountSelected(count) => {
                self.idea_count = count;
                self.count_input = count.to_string();
                self.regenerate_template();
                IdeaAction::None
            }
            IdeaMessage::CountInputChanged(input) => {
                if let Some(count) = parse_count(&input) {
                    self.idea_count = count;
                    self.regenerate_template();
                }
                self.count_input = input;
                IdeaAction::None
            }
            IdeaMessage::ToggleField(field) => {
                let expanded = &mut self.expanded[field.index()];
                *expanded = !*expanded;
                IdeaAction::None
            }
            IdeaMessage::FieldEdited(field, action) => {
                let is_edit = action.is_edit();
                self.fields[field.index()].perform(action);
                if is_edit {
                    self.regenerate_template();
                }
                IdeaAction::None
            }
            IdeaMessage::ViewTemplate => {
                self.show_template = true;
                IdeaAction::None
            }
            IdeaMessage::CloseTemplate => {
                self.show_template = false;
                IdeaAction::None
            }
            IdeaMessage::TemplateEdited(action) => {
                self.template.perform(action);
                IdeaAction::None
            }
            IdeaMessage::GenerateIdeas => {
                let (Some(image), Some(_)) = (self.image.clone(), self.analysis.as_ref()) else {
                    return IdeaAction::Notify((&AppError::AnalysisRequired).into());
                };
                if self.is_generating {
                    return IdeaAction::None;
                }
                self.is_generating = true;
                IdeaAction::GenerateIdeas {
                    image,
                    prompt: self.template.text(),
                }
            }
            IdeaMessage::IdeasGenerated(result) => {
                self.is_generating = false;
                match result {
                    Ok(ideas) => {
                        let notify = IdeaAction::Notify(Notification::success(format!(
                            "Generated {} ideas",
                            ideas.len()
                        )));
                        let items = ideas
                            .into_iter()
                            .map(|idea| ResultItem {
                                url: idea.url,
                                prompt: Some(idea.prompt).filter(|p| !p.is_empty()),
                            })
                            .collect();
                        // New ideas are appended to the earlier ones
                        let previews = self.gallery.extend(items);
                        IdeaAction::Batch(vec![notify, IdeaAction::Gallery(previews)])
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "idea generation failed");
                        IdeaAction::Notify(Notification::error(
                            "Idea generation failed. Please try again.",
                        ))
                    }
                }
            }
            IdeaMessage::Gallery(message) => IdeaAction::Gallery(self.gallery.update(message)),
        }
    }

    pub fn view(&self) -> Element<'_, IdeaMessage> {
        let steps = [
            (Step::Upload, "1. Upload & analyze"),
            (Step::Customize, "2. Customize prompt"),
            (Step::Results, "3. Results"),
        ];
        let current = self.step();
        let progress = steps.into_iter().map(|(step, label)| {
            let label = if step == current {
                text(label).size(16).style(text::primary)
            } else {
                text(label).size(14)
            };
            label.width(Length::Fill).into()
        });

        let mut upload = column![image_picker(
            "Product image",
            "Upload the product you want ideas for",
            self.image.as_ref(),
            self.preview.as_ref(),
            IdeaMessage::PickImage,
            IdeaMessage::ClearImage,
        )]
        .spacing(10);

        if self.image.is_some() && self.analysis.is_none() {
            upload = upload.push(
                button(text(if self.is_analyzing {
                    "Analyzing..."
                } else {
                    "Analyze image"
                }))
                .on_press_maybe((!self.is_analyzing).then_some(IdeaMessage::Analyze))
                .width(Length::Fill),
            );
        }

        let mut inputs = column![upload].spacing(16).width(Length::FillPortion(1));

        if let Some(analysis) = &self.analysis {
            inputs = inputs
                .push(analysis_view(&analysis.profile))
                .push(self.customization_view())
                .push(
                    button(text(if self.is_generating {
                        format!("Generating {} ideas...", self.idea_count)
                    } else {
                        format!("Generate {} ideas", self.idea_count)
                    }))
                    .on_press_maybe((!self.is_generating).then_some(IdeaMessage::GenerateIdeas))
                    .padding(12)
                    .width(Length::Fill),
                );
        }

        let mut outputs = column![instructions(&[
            "Upload a product image and press \"Analyze image\"",
            "Review the detailed analysis of the product",
            "Pick how many ideas to generate and customize the prompt (optional)",
            "Press \"Generate ideas\" and download the results",
        ])]
        .spacing(16)
        .width(Length::FillPortion(1));

        if self.show_template {
            outputs = outputs.push(
                container(
                    column![
                        row![
                            text("Prompt template").size(18).width(Length::Fill),
                            button(text("Close")).on_press(IdeaMessage::CloseTemplate),
                        ],
                        text_editor(&self.template)
                            .on_action(IdeaMessage::TemplateEdited)
                            .height(Length::Fixed(360.0)),
                    ]
                    .spacing(8),
                )
                .padding(16)
                .style(container::rounded_box),
            );
        }

        outputs = outputs.push(self.gallery.view().map(IdeaMessage::Gallery));

        column![
            text("Product Idea Generator").size(28),
            text("Upload a product image, analyze it, and generate new design ideas with AI."),
            Column::with_children(progress).spacing(4),
            Space::new().height(Length::Fixed(10.0)),
            row![inputs, outputs].spacing(20),
        ]
        .spacing(10)
        .into()
    }

    fn customization_view(&self) -> Element<'_, IdeaMessage> {
        let sections = PromptField::ALL.into_iter().map(|field| {
            let filled = !self.fields[field.index()].text().trim().is_empty();
            let marker = if filled { " •" } else { "" };
            let mut section = column![button(text(format!("{}{}", field.label(), marker)))
                .on_press_maybe(
                    (!self.is_generating).then_some(IdeaMessage::ToggleField(field))
                )
                .style(button::text)]
            .spacing(4);

            if self.expanded[field.index()] {
                section = section.push(
                    text_editor(&self.fields[field.index()])
                        .placeholder(field.placeholder())
                        .on_action(move |action| IdeaMessage::FieldEdited(field, action))
                        .height(Length::Fixed(100.0)),
                );
            }
            section.into()
        });

        container(
            column![
                text("Prompt customization").size(18),
                text("Number of ideas").size(14),
                count_picker(
                    self.idea_count,
                    &self.count_input,
                    IdeaMessage::CountSelected,
                    IdeaMessage::CountInputChanged,
                ),
                Column::with_children(sections).spacing(6),
                button(text("View prompt template"))
                    .on_press(IdeaMessage::ViewTemplate)
                    .style(button::secondary),
            ]
            .spacing(10),
        )
        .padding(16)
        .style(container::rounded_box)
        .into()
    }
}

fn analysis_view<'a, M: 'a>(profile: &'a ProductProfile) -> Element<'a, M> {
    let list = |values: &[String]| values.join(", ");
    let rows = [
        ("Category", profile.product_category.clone()),
        ("Type", profile.product_type.clone()),
        ("Display", profile.display_mode.clone()),
        ("Colors", list(&profile.primary_colors)),
        ("Pattern", profile.pattern.clone()),
        ("Style", list(&profile.style_keywords)),
        ("Mood", profile.mood.clone()),
        ("Audience", profile.audience.clone()),
        ("Inspired by", profile.inspired_by.source.clone()),
        ("Theme", profile.inspired_by.theme.clone()),
        ("Setting", profile.inspired_by.setting.clone()),
        (
            "Characters",
            if profile.characters.has_characters {
                list(&profile.characters.character_names)
            } else {
                String::new()
            },
        ),
        ("Material", profile.material.main.clone()),
        ("Texture", profile.material.texture.clone()),
        ("Seasons", list(&profile.material.season_suitability)),
    ];

    let lines = rows
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| {
            row![
                text(label).size(13).width(Length::Fixed(110.0)),
                text(value).size(13),
            ]
            .into()
        });

    container(
        column![
            text("Analysis").size(18),
            Column::with_children(lines).spacing(4)
        ]
        .spacing(8),
    )
    .padding(16)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::Arc;

    fn upload() -> ImageUpload {
        ImageUpload {
            file_name: "mug.png".to_string(),
            mime: "image/png",
            bytes: Bytes::from_static(b"png"),
        }
    }

    fn analysis() -> ImageAnalysis {
        ProductProfile {
            product_category: "drinkware".to_string(),
            ..Default::default()
        }
        .into()
    }

    fn analyzed_page() -> IdeaPage {
        let mut page = IdeaPage::default();
        page.update(IdeaMessage::ImagePicked(Some(Ok(upload()))));
        page.update(IdeaMessage::Analyze);
        page.update(IdeaMessage::Analyzed(Ok(analysis())));
        page
    }

    #[test]
    fn test_generate_requires_analysis() {
        let mut page = IdeaPage::default();
        page.update(IdeaMessage::ImagePicked(Some(Ok(upload()))));

        let action = page.update(IdeaMessage::GenerateIdeas);
        assert_eq!(action, IdeaAction::Notify((&AppError::AnalysisRequired).into()));
    }

    #[test]
    fn test_analysis_builds_the_template() {
        let page = analyzed_page();
        assert_eq!(page.step(), Step::Customize);
        assert!(page.template_text().contains("\"productCategory\": \"drinkware\""));
        assert!(page
            .template_text()
            .contains("Generate 3 variations of the SAME product."));
    }

    #[test]
    fn test_count_and_fields_regenerate_the_template() {
        let mut page = analyzed_page();
        page.update(IdeaMessage::CountSelected(5));
        page.update(IdeaMessage::FieldEdited(
            PromptField::Important,
            text_editor::Action::Edit(text_editor::Edit::Paste(Arc::new(
                "Avoid red\nKeep it minimal".to_string(),
            ))),
        ));

        assert_eq!(
            page.prompt_options().important.as_deref().map(str::trim),
            Some("Avoid red\nKeep it minimal")
        );
        let template = page.template_text();
        assert!(template.contains("Generate 5 variations"));
        assert!(template.contains("IMPORTANT:\n- Avoid red\n- Keep it minimal"));
    }

    #[test]
    fn test_generate_sends_the_template() {
        let mut page = analyzed_page();
        let expected = page.template_text();

        let action = page.update(IdeaMessage::GenerateIdeas);
        assert_eq!(
            action,
            IdeaAction::GenerateIdeas {
                image: upload(),
                prompt: expected,
            }
        );
    }

    #[test]
    fn test_ideas_are_appended() {
        let mut page = analyzed_page();
        let idea = |n: u32| GeneratedIdea {
            url: format!("http://cdn/{}.png", n),
            prompt: format!("idea {}", n),
        };

        page.update(IdeaMessage::IdeasGenerated(Ok(vec![idea(1)])));
        page.update(IdeaMessage::IdeasGenerated(Ok(vec![idea(2), idea(3)])));

        assert_eq!(page.gallery().items().len(), 3);
        assert_eq!(page.step(), Step::Results);
    }

    #[test]
    fn test_new_image_resets_analysis_and_ideas() {
        let mut page = analyzed_page();
        page.update(IdeaMessage::IdeasGenerated(Ok(vec![GeneratedIdea {
            url: "http://cdn/1.png".to_string(),
            prompt: String::new(),
        }])));

        page.update(IdeaMessage::ImagePicked(Some(Ok(upload()))));

        assert!(page.analysis().is_none());
        assert!(page.gallery().is_empty());
        assert!(page.template_text().trim().is_empty());
        assert_eq!(page.step(), Step::Upload);
    }
}
