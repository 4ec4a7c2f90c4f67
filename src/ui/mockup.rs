use iced::{
    widget::{
        button, column, container, image, row, text, text_input, toggler, Column, Image, Row,
        Space,
    },
    Element, Length,
};

use crate::api::MockupResult;
use crate::application::non_blank_prompts;
use crate::domain::{AppError, ImageUpload};
use crate::utils::parse_count;

use super::gallery::{GalleryAction, GalleryMessage, ResultGallery, ResultItem};
use super::notifications::Notification;

pub const PRESET_COUNTS: [u32; 4] = [1, 3, 5, 10];
pub const MAX_PROMPTS: usize = 20;
const DEFAULT_COUNT: u32 = 3;

/// State of the mockup generator page
#[derive(Debug)]
pub struct MockupPage {
    image: Option<ImageUpload>,
    preview: Option<image::Handle>,
    prompts: Vec<String>,
    auto_generate: bool,
    count: u32,
    count_input: String,
    is_generating_prompts: bool,
    is_processing: bool,
    gallery: ResultGallery,
}

impl Default for MockupPage {
    fn default() -> Self {
        Self {
            image: None,
            preview: None,
            prompts: vec![String::new()],
            auto_generate: false,
            count: DEFAULT_COUNT,
            count_input: DEFAULT_COUNT.to_string(),
            is_generating_prompts: false,
            is_processing: false,
            gallery: ResultGallery::new("Results", "mockup"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum MockupMessage {
    PickImage,
    ImagePicked(Option<Result<ImageUpload, AppError>>),
    ClearImage,
    AutoGenerateToggled(bool),
    CountSelected(u32),
    CountInputChanged(String),
    PromptChanged(usize, String),
    AddPrompt,
    RemovePrompt(usize),
    GeneratePrompts,
    PromptsGenerated(Result<Vec<String>, AppError>),
    GenerateMockups,
    MockupsGenerated(Result<Vec<MockupResult>, AppError>),
    Gallery(GalleryMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockupAction {
    None,
    PickImage,
    GeneratePrompts {
        image: ImageUpload,
        count: u32,
    },
    GenerateMockups {
        image: ImageUpload,
        prompts: Vec<String>,
    },
    Gallery(GalleryAction),
    Notify(Notification),
    Batch(Vec<MockupAction>),
}

impl MockupPage {
    /// Back to a fresh form, keeping the current image.
    fn reset(&mut self) {
        self.prompts = vec![String::new()];
        self.auto_generate = false;
        self.count = DEFAULT_COUNT;
        self.count_input = DEFAULT_COUNT.to_string();
        self.is_generating_prompts = false;
        self.is_processing = false;
        self.gallery.clear();
    }

    fn set_count(&mut self, count: u32) {
        self.count = count;
        self.count_input = count.to_string();
    }

    pub fn update(&mut self, message: MockupMessage) -> MockupAction {
        match message {
            MockupMessage::PickImage => MockupAction::PickImage,
            MockupMessage::ImagePicked(None) => MockupAction::None,
            MockupMessage::ImagePicked(Some(Ok(upload))) => {
                self.reset();
                self.preview = Some(image::Handle::from_bytes(upload.bytes.clone()));
                self.image = Some(upload);
                MockupAction::None
            }
            MockupMessage::ImagePicked(Some(Err(e))) => MockupAction::Notify((&e).into()),
            MockupMessage::ClearImage => {
                self.reset();
                self.image = None;
                self.preview = None;
                MockupAction::None
            }
            MockupMessage::AutoGenerateToggled(enabled) => {
                self.auto_generate = enabled;
                MockupAction::None
            }
            MockupMessage::CountSelected(count) => {
                self.set_count(count);
                MockupAction::None
            }
            MockupMessage::CountInputChanged(input) => {
                if let Some(count) = parse_count(&input) {
                    self.count = count;
                }
                self.count_input = input;
                MockupAction::None
            }
            MockupMessage::PromptChanged(index, value) => {
                if let Some(prompt) = self.prompts.get_mut(index) {
                    *prompt = value;
                }
                MockupAction::None
            }
            MockupMessage::AddPrompt => {
                if self.prompts.len() < MAX_PROMPTS {
                    self.prompts.push(String::new());
                }
                MockupAction::None
            }
            MockupMessage::RemovePrompt(index) => {
                if index < self.prompts.len() {
                    self.prompts.remove(index);
                }
                if self.prompts.is_empty() {
                    self.prompts.push(String::new());
                }
                MockupAction::None
            }
            MockupMessage::GeneratePrompts => {
                let Some(image) = self.image.clone() else {
                    return MockupAction::Notify((&AppError::MissingImage).into());
                };
                if self.is_generating_prompts {
                    return MockupAction::None;
                }
                self.is_generating_prompts = true;
                MockupAction::GeneratePrompts {
                    image,
                    count: self.count,
                }
            }
            MockupMessage::PromptsGenerated(result) => {
                self.is_generating_prompts = false;
                match result {
                    Ok(prompts) => {
                        let generated = prompts.len();
                        self.prompts = if prompts.is_empty() {
                            vec![String::new()]
                        } else {
                            prompts
                        };
                        MockupAction::Notify(Notification::success(format!(
                            "Generated {} prompts",
                            generated
                        )))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "prompt generation failed");
                        MockupAction::Notify(Notification::error(
                            "Something went wrong while generating prompts",
                        ))
                    }
                }
            }
            MockupMessage::GenerateMockups => {
                let Some(image) = self.image.clone() else {
                    return MockupAction::Notify((&AppError::MissingImage).into());
                };
                let prompts = non_blank_prompts(&self.prompts);
                if prompts.is_empty() {
                    return MockupAction::Notify((&AppError::EmptyPrompts).into());
                }
                if self.is_processing {
                    return MockupAction::None;
                }

                self.is_processing = true;
                self.gallery.clear();
                MockupAction::GenerateMockups { image, prompts }
            }
            MockupMessage::MockupsGenerated(result) => {
                self.is_processing = false;
                match result {
                    Ok(results) => {
                        let notify = MockupAction::Notify(Notification::success(format!(
                            "Generated {} mockups",
                            results.len()
                        )));
                        let items = results
                            .into_iter()
                            .map(|result| ResultItem {
                                url: result.url,
                                prompt: Some(result.prompt).filter(|p| !p.is_empty()),
                            })
                            .collect();
                        let previews = self.gallery.replace(items);
                        MockupAction::Batch(vec![notify, MockupAction::Gallery(previews)])
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "mockup generation failed");
                        MockupAction::Notify(Notification::error(
                            "Something went wrong while generating mockups",
                        ))
                    }
                }
            }
            MockupMessage::Gallery(message) => MockupAction::Gallery(self.gallery.update(message)),
        }
    }

    #[cfg(test)]
    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    #[cfg(test)]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    #[cfg(test)]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[cfg(test)]
    pub fn gallery(&self) -> &ResultGallery {
        &self.gallery
    }

    fn can_generate(&self) -> bool {
        self.image.is_some()
            && self.prompts.iter().any(|p| !p.trim().is_empty())
            && !self.is_processing
    }

    pub fn view(&self) -> Element<'_, MockupMessage> {
        let upload = image_picker(
            "Sample image",
            "Upload your product or design",
            self.image.as_ref(),
            self.preview.as_ref(),
            MockupMessage::PickImage,
            MockupMessage::ClearImage,
        );

        let mut prompts_section = column![row![
            text("Prompts").size(18).width(Length::Fill),
            toggler(self.auto_generate)
                .label("Generate prompts automatically")
                .on_toggle_maybe(self.image.is_some().then_some(MockupMessage::AutoGenerateToggled)),
        ]]
        .spacing(10);

        if self.auto_generate {
            prompts_section = prompts_section
                .push(count_picker(
                    self.count,
                    &self.count_input,
                    MockupMessage::CountSelected,
                    MockupMessage::CountInputChanged,
                ))
                .push(
                    button(text(if self.is_generating_prompts {
                        format!("Generating {} prompts...", self.count)
                    } else {
                        format!("Generate {} prompts", self.count)
                    }))
                    .on_press_maybe(
                        (self.image.is_some() && !self.is_generating_prompts)
                            .then_some(MockupMessage::GeneratePrompts),
                    )
                    .width(Length::Fill),
                );
        }

        let rows = self.prompts.iter().enumerate().map(|(index, prompt)| {
            let mut line = row![text_input(&format!("Prompt #{}", index + 1), prompt)
                .on_input(move |value| MockupMessage::PromptChanged(index, value))
                .padding(8)]
            .spacing(6);
            if self.prompts.len() > 1 {
                line = line.push(
                    button(text("✕"))
                        .on_press(MockupMessage::RemovePrompt(index))
                        .style(button::danger),
                );
            }
            line.into()
        });

        prompts_section = prompts_section
            .push(Column::with_children(rows).spacing(6))
            .push(
                button(text("+ Add prompt")).on_press_maybe(
                    (self.image.is_some() && self.prompts.len() < MAX_PROMPTS)
                        .then_some(MockupMessage::AddPrompt),
                ),
            );

        let valid = self.prompts.iter().filter(|p| !p.trim().is_empty()).count();
        let generate = button(text(if self.is_processing {
            "Processing...".to_string()
        } else {
            format!("Generate {} mockups", valid)
        }))
        .on_press_maybe(self.can_generate().then_some(MockupMessage::GenerateMockups))
        .padding(12)
        .width(Length::Fill);

        let inputs = column![
            upload,
            container(prompts_section)
                .padding(16)
                .style(container::rounded_box),
            generate,
        ]
        .spacing(16)
        .width(Length::FillPortion(1));

        let outputs = column![
            instructions(&[
                "Upload a sample image of your product or design",
                "Type prompts by hand or let the AI generate several",
                "Press \"Generate mockups\"",
                "Download single images or everything as a ZIP",
            ]),
            self.gallery.view().map(MockupMessage::Gallery),
        ]
        .spacing(16)
        .width(Length::FillPortion(1));

        column![
            text("Mockup Generator").size(28),
            text("Generate professional mockups from a single image."),
            Space::new().height(Length::Fixed(10.0)),
            row![inputs, outputs].spacing(20),
        ]
        .spacing(10)
        .into()
    }
}

/// Upload box shared by the pages: a pick button, the preview, and a clear
/// button once an image is loaded.
pub fn image_picker<'a, M: Clone + 'a>(
    title: &'a str,
    description: &'a str,
    upload: Option<&'a ImageUpload>,
    preview: Option<&'a image::Handle>,
    on_pick: M,
    on_clear: M,
) -> Element<'a, M> {
    let mut content = column![text(title).size(18), text(description).size(13)].spacing(8);

    match (upload, preview) {
        (Some(upload), Some(preview)) => {
            content = content
                .push(Image::new(preview.clone()).height(Length::Fixed(240.0)))
                .push(
                    row![
                        text(&upload.file_name).size(12).width(Length::Fill),
                        button(text("Change")).on_press(on_pick),
                        button(text("Remove"))
                            .on_press(on_clear)
                            .style(button::danger),
                    ]
                    .spacing(8),
                );
        }
        _ => {
            content = content.push(
                button(text("Choose image (PNG, JPG, WEBP)"))
                    .on_press(on_pick)
                    .padding(20)
                    .width(Length::Fill),
            );
        }
    }

    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// Preset buttons plus a free-form count field (1..=50).
pub fn count_picker<'a, M: Clone + 'a>(
    current: u32,
    input: &'a str,
    on_select: fn(u32) -> M,
    on_input: fn(String) -> M,
) -> Element<'a, M> {
    let presets = PRESET_COUNTS.iter().map(|&count| {
        let style = if count == current {
            button::primary
        } else {
            button::secondary
        };
        button(text(count.to_string()))
            .on_press(on_select(count))
            .style(style)
            .into()
    });

    Row::with_children(presets)
        .push(
            text_input("Count", input)
                .on_input(on_input)
                .padding(6)
                .width(Length::Fixed(80.0)),
        )
        .spacing(6)
        .into()
}

pub fn instructions<'a, M: 'a>(steps: &[&'a str]) -> Element<'a, M> {
    let lines = steps
        .iter()
        .enumerate()
        .map(|(index, step)| text(format!("{}. {}", index + 1, step)).size(14).into());

    container(
        column![
            text("How to use").size(16),
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

    fn upload() -> ImageUpload {
        ImageUpload {
            file_name: "shirt.png".to_string(),
            mime: "image/png",
            bytes: Bytes::from_static(b"png"),
        }
    }

    fn page_with_image() -> MockupPage {
        let mut page = MockupPage::default();
        page.update(MockupMessage::ImagePicked(Some(Ok(upload()))));
        page
    }

    #[test]
    fn test_generate_without_image_is_rejected() {
        let mut page = MockupPage::default();
        page.update(MockupMessage::PromptChanged(0, "on a beach".to_string()));

        let action = page.update(MockupMessage::GenerateMockups);
        assert_eq!(
            action,
            MockupAction::Notify(Notification::error("Please upload a product image first"))
        );
    }

    #[test]
    fn test_generate_with_blank_prompts_is_rejected() {
        let mut page = page_with_image();
        page.update(MockupMessage::PromptChanged(0, "   ".to_string()));

        let action = page.update(MockupMessage::GenerateMockups);
        assert_eq!(action, MockupAction::Notify((&AppError::EmptyPrompts).into()));
    }

    #[test]
    fn test_generate_submits_only_filled_prompts() {
        let mut page = page_with_image();
        page.update(MockupMessage::PromptChanged(0, "on a beach".to_string()));
        page.update(MockupMessage::AddPrompt);
        page.update(MockupMessage::AddPrompt);
        page.update(MockupMessage::PromptChanged(2, "in a studio".to_string()));

        let action = page.update(MockupMessage::GenerateMockups);
        assert_eq!(
            action,
            MockupAction::GenerateMockups {
                image: upload(),
                prompts: vec!["on a beach".to_string(), "in a studio".to_string()],
            }
        );
        // A second press while processing does nothing
        assert_eq!(page.update(MockupMessage::GenerateMockups), MockupAction::None);
    }

    #[test]
    fn test_prompt_rows_stay_within_bounds() {
        let mut page = page_with_image();
        page.update(MockupMessage::RemovePrompt(0));
        assert_eq!(page.prompts().len(), 1);

        for _ in 0..30 {
            page.update(MockupMessage::AddPrompt);
        }
        assert_eq!(page.prompts().len(), MAX_PROMPTS);
    }

    #[test]
    fn test_count_input_only_accepts_valid_values() {
        let mut page = MockupPage::default();
        page.update(MockupMessage::CountInputChanged("12".to_string()));
        assert_eq!(page.count(), 12);

        page.update(MockupMessage::CountInputChanged("99".to_string()));
        assert_eq!(page.count(), 12);

        page.update(MockupMessage::CountSelected(5));
        assert_eq!(page.count(), 5);
    }

    #[test]
    fn test_generated_prompts_replace_the_list() {
        let mut page = page_with_image();
        let action = page.update(MockupMessage::GeneratePrompts);
        assert_eq!(
            action,
            MockupAction::GeneratePrompts {
                image: upload(),
                count: 3,
            }
        );

        page.update(MockupMessage::PromptsGenerated(Ok(vec![
            "a".to_string(),
            "b".to_string(),
        ])));
        assert_eq!(page.prompts(), ["a", "b"]);
    }

    #[test]
    fn test_results_fill_the_gallery() {
        let mut page = page_with_image();
        page.update(MockupMessage::PromptChanged(0, "p".to_string()));
        page.update(MockupMessage::GenerateMockups);

        let action = page.update(MockupMessage::MockupsGenerated(Ok(vec![MockupResult {
            index: 0,
            prompt: "p".to_string(),
            url: "http://cdn/1.png".to_string(),
        }])));

        assert_eq!(page.gallery().items().len(), 1);
        assert_eq!(
            action,
            MockupAction::Batch(vec![
                MockupAction::Notify(Notification::success("Generated 1 mockups")),
                MockupAction::Gallery(GalleryAction::LoadPreviews(vec![
                    "http://cdn/1.png".to_string()
                ])),
            ])
        );
    }

    #[test]
    fn test_new_image_resets_the_form() {
        let mut page = page_with_image();
        page.update(MockupMessage::PromptChanged(0, "p".to_string()));
        page.update(MockupMessage::ImagePicked(Some(Ok(upload()))));
        assert_eq!(page.prompts(), [""]);
        assert!(page.image().is_some());
    }
}
