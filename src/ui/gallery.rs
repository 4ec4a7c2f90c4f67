use std::collections::HashMap;
use std::path::PathBuf;

use bytes::Bytes;
use iced::{
    widget::{button, column, container, image, row, text, Column, Image},
    Element, Length,
};

use crate::application::SavedArchive;
use crate::domain::AppError;

use super::notifications::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub url: String,
    pub prompt: Option<String>,
}

impl ResultItem {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prompt: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GalleryMessage {
    CopyUrl(usize),
    CopyPrompt(usize),
    Download(usize),
    DownloadAll,
    PreviewLoaded(String, Result<Bytes, AppError>),
    DownloadFinished(usize, Result<Option<PathBuf>, AppError>),
    ArchiveFinished(Result<Option<SavedArchive>, AppError>),
}

/// Side effects the gallery asks its owner to run.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryAction {
    None,
    Copy(String),
    LoadPreviews(Vec<String>),
    DownloadOne {
        url: String,
        index: usize,
        prefix: &'static str,
    },
    DownloadAll {
        urls: Vec<String>,
        prefix: &'static str,
    },
    Notify(Notification),
}

/// Generated images with copy, download and download-all controls.
#[derive(Debug)]
pub struct ResultGallery {
    title: &'static str,
    entry_prefix: &'static str,
    items: Vec<ResultItem>,
    previews: HashMap<String, image::Handle>,
    downloading: bool,
}

impl ResultGallery {
    pub fn new(title: &'static str, entry_prefix: &'static str) -> Self {
        Self {
            title,
            entry_prefix,
            items: Vec::new(),
            previews: HashMap::new(),
            downloading: false,
        }
    }

    #[cfg(test)]
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.previews.clear();
    }

    pub fn replace(&mut self, items: Vec<ResultItem>) -> GalleryAction {
        self.clear();
        self.extend(items)
    }

    /// Append results and ask for previews of the new ones.
    pub fn extend(&mut self, items: Vec<ResultItem>) -> GalleryAction {
        let urls: Vec<String> = items.iter().map(|item| item.url.clone()).collect();
        self.items.extend(items);

        if urls.is_empty() {
            GalleryAction::None
        } else {
            GalleryAction::LoadPreviews(urls)
        }
    }

    pub fn update(&mut self, message: GalleryMessage) -> GalleryAction {
        match message {
            GalleryMessage::CopyUrl(index) => match self.items.get(index) {
                Some(item) => GalleryAction::Copy(item.url.clone()),
                None => GalleryAction::None,
            },
            GalleryMessage::CopyPrompt(index) => {
                match self.items.get(index).and_then(|item| item.prompt.clone()) {
                    Some(prompt) => GalleryAction::Copy(prompt),
                    None => GalleryAction::None,
                }
            }
            GalleryMessage::Download(index) => match self.items.get(index) {
                Some(item) => GalleryAction::DownloadOne {
                    url: item.url.clone(),
                    index,
                    prefix: self.entry_prefix,
                },
                None => GalleryAction::None,
            },
            GalleryMessage::DownloadAll => {
                if self.items.is_empty() || self.downloading {
                    return GalleryAction::None;
                }
                self.downloading = true;
                GalleryAction::DownloadAll {
                    urls: self.items.iter().map(|item| item.url.clone()).collect(),
                    prefix: self.entry_prefix,
                }
            }
            GalleryMessage::PreviewLoaded(url, result) => {
                match result {
                    Ok(bytes) => {
                        // Results may have been replaced while the preview was in flight
                        if self.items.iter().any(|item| item.url == url) {
                            self.previews.insert(url, image::Handle::from_bytes(bytes));
                        }
                    }
                    Err(e) => {
                        tracing::debug!(url = %url, error = %e, "preview unavailable");
                    }
                }
                GalleryAction::None
            }
            GalleryMessage::DownloadFinished(index, result) => match result {
                Ok(Some(_)) => GalleryAction::Notify(Notification::success(format!(
                    "Downloaded {} {}",
                    self.entry_prefix,
                    index + 1
                ))),
                Ok(None) => GalleryAction::Notify(Notification::info("Download cancelled")),
                Err(e) => {
                    tracing::error!(item = index + 1, error = %e, "single download failed");
                    GalleryAction::Notify(Notification::error("Could not download the image"))
                }
            },
            GalleryMessage::ArchiveFinished(result) => {
                self.downloading = false;
                match result {
                    Ok(Some(saved)) => GalleryAction::Notify(archive_notification(&saved)),
                    Ok(None) => GalleryAction::Notify(Notification::info("Download cancelled")),
                    Err(e) => {
                        tracing::error!(error = %e, "bulk download failed");
                        GalleryAction::Notify(Notification::error(
                            "Could not download all images",
                        ))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, GalleryMessage> {
        if self.items.is_empty() {
            return column![].into();
        }

        let mut header = row![text(format!("{} ({})", self.title, self.items.len()))
            .size(18)
            .width(Length::Fill)]
        .spacing(10);

        if self.items.len() > 1 {
            let label = if self.downloading {
                "Downloading..."
            } else {
                "Download all (ZIP)"
            };
            header = header.push(
                button(text(label))
                    .on_press_maybe((!self.downloading).then_some(GalleryMessage::DownloadAll))
                    .style(button::secondary),
            );
        }

        let cards = self.items.iter().enumerate().map(|(index, item)| {
            let preview: Element<'_, GalleryMessage> = match self.previews.get(&item.url) {
                Some(handle) => Image::new(handle.clone()).width(Length::Fill).into(),
                None => text("Loading preview...").size(12).into(),
            };

            let mut card = column![
                text(format!("#{}", index + 1)).size(14),
                preview,
                row![
                    text(&item.url).size(12).width(Length::Fill),
                    button(text("Copy").size(12))
                        .on_press(GalleryMessage::CopyUrl(index))
                        .style(button::secondary),
                ]
                .spacing(8),
            ]
            .spacing(8);

            if let Some(prompt) = &item.prompt {
                card = card.push(
                    row![
                        text(prompt).size(12).width(Length::Fill),
                        button(text("Copy prompt").size(12))
                            .on_press(GalleryMessage::CopyPrompt(index))
                            .style(button::secondary),
                    ]
                    .spacing(8),
                );
            }

            card = card.push(
                button(text("Download"))
                    .on_press(GalleryMessage::Download(index))
                    .width(Length::Fill),
            );

            container(card)
                .padding(12)
                .style(container::rounded_box)
                .into()
        });

        column![header, Column::with_children(cards).spacing(12)]
            .spacing(12)
            .into()
    }
}

fn archive_notification(saved: &SavedArchive) -> Notification {
    if saved.archived == 0 {
        Notification::warning("None of the images could be downloaded; the archive is empty")
    } else if saved.archived < saved.requested {
        Notification::warning(format!(
            "Downloaded {} of {} images",
            saved.archived, saved.requested
        ))
    } else {
        Notification::success(format!("Downloaded {} images", saved.archived))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::notifications::NotificationKind;

    fn gallery_with(urls: &[&str]) -> ResultGallery {
        let mut gallery = ResultGallery::new("Results", "mockup");
        gallery.replace(urls.iter().map(|url| ResultItem::from_url(*url)).collect());
        gallery
    }

    #[test]
    fn test_replace_requests_previews() {
        let mut gallery = ResultGallery::new("Results", "mockup");
        let action = gallery.replace(vec![ResultItem::from_url("u1"), ResultItem::from_url("u2")]);
        assert_eq!(
            action,
            GalleryAction::LoadPreviews(vec!["u1".to_string(), "u2".to_string()])
        );
        assert_eq!(gallery.items().len(), 2);
    }

    #[test]
    fn test_download_all_is_not_reentrant() {
        let mut gallery = gallery_with(&["u1", "u2"]);

        let action = gallery.update(GalleryMessage::DownloadAll);
        assert_eq!(
            action,
            GalleryAction::DownloadAll {
                urls: vec!["u1".to_string(), "u2".to_string()],
                prefix: "mockup",
            }
        );
        assert!(gallery.is_downloading());
        assert_eq!(gallery.update(GalleryMessage::DownloadAll), GalleryAction::None);

        let action = gallery.update(GalleryMessage::ArchiveFinished(Ok(Some(SavedArchive {
            path: PathBuf::from("/tmp/mockups.zip"),
            requested: 2,
            archived: 1,
        }))));
        assert!(!gallery.is_downloading());
        assert_eq!(
            action,
            GalleryAction::Notify(Notification::warning("Downloaded 1 of 2 images"))
        );
    }

    #[test]
    fn test_empty_archive_is_reported_as_warning() {
        let mut gallery = gallery_with(&["u1"]);
        let action = gallery.update(GalleryMessage::ArchiveFinished(Ok(Some(SavedArchive {
            path: PathBuf::from("/tmp/mockups.zip"),
            requested: 1,
            archived: 0,
        }))));
        assert!(matches!(
            action,
            GalleryAction::Notify(Notification {
                kind: NotificationKind::Warning,
                ..
            })
        ));
    }

    #[test]
    fn test_copy_and_single_download() {
        let mut gallery = ResultGallery::new("Ideas", "idea");
        gallery.replace(vec![ResultItem {
            url: "u1".to_string(),
            prompt: Some("forest theme".to_string()),
        }]);

        assert_eq!(
            gallery.update(GalleryMessage::CopyUrl(0)),
            GalleryAction::Copy("u1".to_string())
        );
        assert_eq!(
            gallery.update(GalleryMessage::CopyPrompt(0)),
            GalleryAction::Copy("forest theme".to_string())
        );
        assert_eq!(
            gallery.update(GalleryMessage::Download(0)),
            GalleryAction::DownloadOne {
                url: "u1".to_string(),
                index: 0,
                prefix: "idea",
            }
        );
        assert_eq!(gallery.update(GalleryMessage::Download(5)), GalleryAction::None);
    }

    #[test]
    fn test_cancelled_downloads_are_reported() {
        let mut gallery = gallery_with(&["u1", "u2"]);
        let cancelled = GalleryAction::Notify(Notification::info("Download cancelled"));

        assert_eq!(
            gallery.update(GalleryMessage::DownloadFinished(1, Ok(None))),
            cancelled
        );

        gallery.update(GalleryMessage::DownloadAll);
        assert_eq!(gallery.update(GalleryMessage::ArchiveFinished(Ok(None))), cancelled);
        assert!(!gallery.downloading);
    }
}
