use iced::{
    widget::{button, column, container, image, row, text, toggler, Column, Image, Row, Space},
    Element, Length,
};

use crate::domain::{AppError, ImageUpload};

use super::gallery::{GalleryAction, GalleryMessage, ResultGallery, ResultItem};
use super::mockup::{image_picker, instructions};
use super::notifications::Notification;

pub const VARIATION_OPTIONS: [u32; 4] = [1, 3, 5, 10];
const DEFAULT_VARIATIONS: u32 = 3;

/// State of the image editor page: one product image composed with any
/// number of reference images.
#[derive(Debug)]
pub struct ReferencePage {
    product: Option<ImageUpload>,
    product_preview: Option<image::Handle>,
    references: Vec<(ImageUpload, image::Handle)>,
    multiple_output: bool,
    variations: u32,
    is_processing: bool,
    gallery: ResultGallery,
}

impl Default for ReferencePage {
    fn default() -> Self {
        Self {
            product: None,
            product_preview: None,
            references: Vec::new(),
            multiple_output: false,
            variations: DEFAULT_VARIATIONS,
            is_processing: false,
            gallery: ResultGallery::new("Results", "mockup"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ReferenceMessage {
    PickProduct,
    ProductPicked(Option<Result<ImageUpload, AppError>>),
    ClearProduct,
    PickReferences,
    ReferencesPicked(Vec<Result<ImageUpload, AppError>>),
    RemoveReference(usize),
    MultipleOutputToggled(bool),
    VariationsSelected(u32),
    Submit,
    Generated(Result<Vec<String>, AppError>),
    Reset,
    Gallery(GalleryMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceAction {
    None,
    PickProduct,
    PickReferences,
    Generate {
        product: ImageUpload,
        references: Vec<ImageUpload>,
        variations: Option<u32>,
    },
    Gallery(GalleryAction),
    Notify(Notification),
    Batch(Vec<ReferenceAction>),
}

impl ReferencePage {
    pub fn references(&self) -> impl Iterator<Item = &ImageUpload> {
        self.references.iter().map(|(upload, _)| upload)
    }

    #[cfg(test)]
    pub fn gallery(&self) -> &ResultGallery {
        &self.gallery
    }

    pub fn update(&mut self, message: ReferenceMessage) -> ReferenceAction {
        match message {
            ReferenceMessage::PickProduct => ReferenceAction::PickProduct,
            ReferenceMessage::ProductPicked(None) => ReferenceAction::None,
            ReferenceMessage::ProductPicked(Some(Ok(upload))) => {
                self.product_preview = Some(image::Handle::from_bytes(upload.bytes.clone()));
                self.product = Some(upload);
                ReferenceAction::None
            }
            ReferenceMessage::ProductPicked(Some(Err(e))) => ReferenceAction::Notify((&e).into()),
            ReferenceMessage::ClearProduct => {
                self.product = None;
                self.product_preview = None;
                ReferenceAction::None
            }
            ReferenceMessage::PickReferences => ReferenceAction::PickReferences,
            ReferenceMessage::ReferencesPicked(results) => {
                if results.is_empty() {
                    return ReferenceAction::None;
                }

                let mut added = 0;
                for result in results {
                    match result {
                        Ok(upload) => {
                            let preview = image::Handle::from_bytes(upload.bytes.clone());
                            self.references.push((upload, preview));
                            added += 1;
                        }
                        Err(e) => tracing::warn!(error = %e, "skipping reference image"),
                    }
                }

                if added == 0 {
                    ReferenceAction::Notify(Notification::error(
                        "Please choose valid image files",
                    ))
                } else {
                    ReferenceAction::Notify(Notification::success(format!(
                        "Added {} reference images",
                        added
                    )))
                }
            }
            ReferenceMessage::RemoveReference(index) => {
                if index < self.references.len() {
                    self.references.remove(index);
                }
                ReferenceAction::None
            }
            ReferenceMessage::MultipleOutputToggled(enabled) => {
                self.multiple_output = enabled;
                ReferenceAction::None
            }
            ReferenceMessage::VariationsSelected(variations) => {
                self.variations = variations;
                ReferenceAction::None
            }
            ReferenceMessage::Submit => {
                let Some(product) = self.product.clone() else {
                    return ReferenceAction::Notify((&AppError::MissingReferenceImages).into());
                };
                if self.references.is_empty() {
                    return ReferenceAction::Notify((&AppError::MissingReferenceImages).into());
                }
                if self.is_processing {
                    return ReferenceAction::None;
                }

                self.is_processing = true;
                ReferenceAction::Generate {
                    product,
                    references: self.references().cloned().collect(),
                    variations: self.multiple_output.then_some(self.variations),
                }
            }
            ReferenceMessage::Generated(result) => {
                self.is_processing = false;
                match result {
                    Ok(urls) => {
                        let previews = self
                            .gallery
                            .replace(urls.into_iter().map(ResultItem::from_url).collect());
                        ReferenceAction::Batch(vec![
                            ReferenceAction::Notify(Notification::success("Images processed")),
                            ReferenceAction::Gallery(previews),
                        ])
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "reference generation failed");
                        ReferenceAction::Notify(Notification::error(
                            "Something went wrong while processing the images",
                        ))
                    }
                }
            }
            ReferenceMessage::Reset => {
                *self = Self::default();
                ReferenceAction::None
            }
            ReferenceMessage::Gallery(message) => {
                ReferenceAction::Gallery(self.gallery.update(message))
            }
        }
    }

    pub fn view(&self) -> Element<'_, ReferenceMessage> {
        let product = image_picker(
            "Original product image",
            "The product you want to process",
            self.product.as_ref(),
            self.product_preview.as_ref(),
            ReferenceMessage::PickProduct,
            ReferenceMessage::ClearProduct,
        );

        let thumbnails = self.references.iter().enumerate().map(|(index, (_, preview))| {
            column![
                Image::new(preview.clone()).height(Length::Fixed(120.0)),
                row![
                    text(format!("#{}", index + 1)).size(12).width(Length::Fill),
                    button(text("✕").size(12))
                        .on_press(ReferenceMessage::RemoveReference(index))
                        .style(button::danger),
                ],
            ]
            .spacing(4)
            .width(Length::Fixed(140.0))
            .into()
        });

        let references = container(
            column![
                text("Reference / idea images").size(18),
                text(format!(
                    "Reference images or mockup ideas ({} images)",
                    self.references.len()
                ))
                .size(13),
                Row::with_children(thumbnails).spacing(8).wrap(),
                button(text("+ Add reference images"))
                    .on_press(ReferenceMessage::PickReferences)
                    .width(Length::Fill),
            ]
            .spacing(8),
        )
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box);

        let mut options = column![toggler(self.multiple_output)
            .label("Generate multiple variations")
            .on_toggle(ReferenceMessage::MultipleOutputToggled)]
        .spacing(8);

        if self.multiple_output {
            let choices = VARIATION_OPTIONS.iter().map(|&count| {
                let style = if count == self.variations {
                    button::primary
                } else {
                    button::secondary
                };
                button(text(count.to_string()))
                    .on_press(ReferenceMessage::VariationsSelected(count))
                    .style(style)
                    .into()
            });
            options = options
                .push(Row::with_children(choices).spacing(6))
                .push(
                    text(format!(
                        "{} different versions will be generated from the reference images",
                        self.variations
                    ))
                    .size(13),
                );
        }

        let actions = row![
            button(text(if self.is_processing {
                "Processing..."
            } else {
                "Process images"
            }))
            .on_press_maybe((!self.is_processing).then_some(ReferenceMessage::Submit))
            .padding(12)
            .width(Length::Fill),
            button(text("Reset"))
                .on_press(ReferenceMessage::Reset)
                .padding(12)
                .style(button::secondary),
        ]
        .spacing(10);

        column![
            text("Image Editor").size(28),
            text("Combine a product image with reference images to create unique mockups."),
            Space::new().height(Length::Fixed(10.0)),
            row![product, references].spacing(20),
            container(options)
                .padding(16)
                .width(Length::Fill)
                .style(container::rounded_box),
            actions,
            instructions(&[
                "Upload the original product image",
                "Add one or more reference images",
                "Optionally enable multiple variations",
                "Press \"Process images\" and download the results",
            ]),
            Column::new().push(self.gallery.view().map(ReferenceMessage::Gallery)),
        ]
        .spacing(16)
        .into()
    }
}
