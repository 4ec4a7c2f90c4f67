use crate::api::{ApiClient, ApiConfig};
use crate::application::DownloadCoordinator;
use crate::domain::AppError;
use crate::ui::gallery::{GalleryAction, GalleryMessage};
use crate::ui::ideas::{IdeaAction, IdeaMessage, IdeaPage};
use crate::ui::mockup::{MockupAction, MockupMessage, MockupPage};
use crate::ui::notifications::{Notification, Notifications, NOTIFICATION_TTL};
use crate::ui::references::{ReferenceAction, ReferenceMessage, ReferencePage};
use crate::ui::{self, dashboard, Page};
use iced::{
    widget::{column, container, row, scrollable},
    Element, Length, Task,
};

pub struct StudioApp {
    page: Page,
    mockup: MockupPage,
    ideas: IdeaPage,
    references: ReferencePage,
    notifications: Notifications,
    coordinator: DownloadCoordinator,
}

impl Default for StudioApp {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl StudioApp {
    pub fn new(config: ApiConfig) -> Self {
        tracing::info!(base_url = %config.base_url, "starting mockup studio");
        let api_client = ApiClient::new(config);

        Self {
            page: Page::default(),
            mockup: MockupPage::default(),
            ideas: IdeaPage::default(),
            references: ReferencePage::default(),
            notifications: Notifications::default(),
            coordinator: DownloadCoordinator::new(api_client),
        }
    }

    /// Show a toast and schedule its dismissal.
    fn notify(&mut self, notification: Notification) -> Task<Message> {
        tracing::debug!(kind = ?notification.kind, text = %notification.text, "notification");
        let id = self.notifications.push(notification);

        Task::perform(
            async move { tokio::time::sleep(NOTIFICATION_TTL).await },
            move |_| Message::DismissNotification(id),
        )
    }

    /// Side effects shared by every result gallery. `wrap` routes the
    /// completion back to the page that owns the gallery.
    fn run_gallery(
        &mut self,
        action: GalleryAction,
        wrap: fn(GalleryMessage) -> Message,
    ) -> Task<Message> {
        let coordinator = self.coordinator.clone();

        match action {
            GalleryAction::None => Task::none(),
            GalleryAction::Copy(value) => Task::batch([
                iced::clipboard::write(value),
                self.notify(Notification::success("Copied to clipboard")),
            ]),
            GalleryAction::LoadPreviews(urls) => Task::batch(urls.into_iter().map(|url| {
                let coordinator = coordinator.clone();
                Task::perform(
                    async move {
                        let result = coordinator.fetch_preview(&url).await;
                        (url, result)
                    },
                    move |(url, result)| wrap(GalleryMessage::PreviewLoaded(url, result)),
                )
            })),
            GalleryAction::DownloadOne { url, index, prefix } => {
                tracing::info!(url = %url, item = index + 1, "downloading image");
                Task::perform(
                    async move { coordinator.download_single(url, index, prefix).await },
                    move |result| wrap(GalleryMessage::DownloadFinished(index, result)),
                )
            }
            GalleryAction::DownloadAll { urls, prefix } => {
                tracing::info!(count = urls.len(), "downloading all images as zip");
                Task::perform(
                    async move { coordinator.download_archive(urls, prefix).await },
                    move |result| wrap(GalleryMessage::ArchiveFinished(result)),
                )
            }
            GalleryAction::Notify(notification) => self.notify(notification),
        }
    }

    fn run_mockup(&mut self, action: MockupAction) -> Task<Message> {
        let coordinator = self.coordinator.clone();

        match action {
            MockupAction::None => Task::none(),
            MockupAction::PickImage => Task::perform(
                async move { coordinator.pick_image().await },
                |result| Message::Mockup(MockupMessage::ImagePicked(result)),
            ),
            MockupAction::GeneratePrompts { image, count } => {
                tracing::info!(count, "generating prompts");
                Task::perform(
                    async move {
                        coordinator
                            .api()
                            .generate_prompts(&image, count)
                            .await
                            .map_err(AppError::from)
                    },
                    |result| Message::Mockup(MockupMessage::PromptsGenerated(result)),
                )
            }
            MockupAction::GenerateMockups { image, prompts } => {
                tracing::info!(prompts = prompts.len(), "generating mockups");
                Task::perform(
                    async move {
                        coordinator
                            .api()
                            .generate_mockups(&image, &prompts)
                            .await
                            .map(|response| response.results)
                            .map_err(AppError::from)
                    },
                    |result| Message::Mockup(MockupMessage::MockupsGenerated(result)),
                )
            }
            MockupAction::Gallery(action) => {
                self.run_gallery(action, |m| Message::Mockup(MockupMessage::Gallery(m)))
            }
            MockupAction::Notify(notification) => self.notify(notification),
            MockupAction::Batch(actions) => Task::batch(
                actions
                    .into_iter()
                    .map(|action| self.run_mockup(action))
                    .collect::<Vec<_>>(),
            ),
        }
    }

    fn run_ideas(&mut self, action: IdeaAction) -> Task<Message> {
        let coordinator = self.coordinator.clone();

        match action {
            IdeaAction::None => Task::none(),
            IdeaAction::PickImage => Task::perform(
                async move { coordinator.pick_image().await },
                |result| Message::Ideas(IdeaMessage::ImagePicked(result)),
            ),
            IdeaAction::Analyze(image) => {
                tracing::info!(file = %image.file_name, "analysing product");
                Task::perform(
                    async move {
                        coordinator
                            .api()
                            .analyze_product(&image)
                            .await
                            .map_err(AppError::from)
                    },
                    |result| Message::Ideas(IdeaMessage::Analyzed(result)),
                )
            }
            IdeaAction::GenerateIdeas { image, prompt } => {
                tracing::info!(prompt_len = prompt.len(), "generating ideas");
                Task::perform(
                    async move {
                        coordinator
                            .api()
                            .generate_ideas(&image, &prompt)
                            .await
                            .map_err(AppError::from)
                    },
                    |result| Message::Ideas(IdeaMessage::IdeasGenerated(result)),
                )
            }
            IdeaAction::Gallery(action) => {
                self.run_gallery(action, |m| Message::Ideas(IdeaMessage::Gallery(m)))
            }
            IdeaAction::Notify(notification) => self.notify(notification),
            IdeaAction::Batch(actions) => Task::batch(
                actions
                    .into_iter()
                    .map(|action| self.run_ideas(action))
                    .collect::<Vec<_>>(),
            ),
        }
    }

    fn run_references(&mut self, action: ReferenceAction) -> Task<Message> {
        let coordinator = self.coordinator.clone();

        match action {
            ReferenceAction::None => Task::none(),
            ReferenceAction::PickProduct => Task::perform(
                async move { coordinator.pick_image().await },
                |result| Message::References(ReferenceMessage::ProductPicked(result)),
            ),
            ReferenceAction::PickReferences => Task::perform(
                async move { coordinator.pick_images().await },
                |results| Message::References(ReferenceMessage::ReferencesPicked(results)),
            ),
            ReferenceAction::Generate {
                product,
                references,
                variations,
            } => {
                tracing::info!(
                    references = references.len(),
                    ?variations,
                    "generating from references"
                );
                Task::perform(
                    async move {
                        coordinator
                            .api()
                            .generate_from_references(&product, &references, variations)
                            .await
                            .map_err(AppError::from)
                    },
                    |result| Message::References(ReferenceMessage::Generated(result)),
                )
            }
            ReferenceAction::Gallery(action) => self.run_gallery(action, |m| {
                Message::References(ReferenceMessage::Gallery(m))
            }),
            ReferenceAction::Notify(notification) => self.notify(notification),
            ReferenceAction::Batch(actions) => Task::batch(
                actions
                    .into_iter()
                    .map(|action| self.run_references(action))
                    .collect::<Vec<_>>(),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Page),
    Mockup(MockupMessage),
    Ideas(IdeaMessage),
    References(ReferenceMessage),
    DismissNotification(u64),
}

pub fn update(app: &mut StudioApp, message: Message) -> Task<Message> {
    match message {
        Message::Navigate(page) => {
            app.page = page;
            Task::none()
        }
        Message::Mockup(message) => {
            let action = app.mockup.update(message);
            app.run_mockup(action)
        }
        Message::Ideas(message) => {
            let action = app.ideas.update(message);
            app.run_ideas(action)
        }
        Message::References(message) => {
            let action = app.references.update(message);
            app.run_references(action)
        }
        Message::DismissNotification(id) => {
            app.notifications.dismiss(id);
            Task::none()
        }
    }
}

pub fn view(app: &StudioApp) -> Element<'_, Message> {
    let content = match app.page {
        Page::Dashboard => dashboard::view().map(Message::Navigate),
        Page::MockupGenerator => app.mockup.view().map(Message::Mockup),
        Page::IdeaGenerator => app.ideas.view().map(Message::Ideas),
        Page::ImageEditor => app.references.view().map(Message::References),
    };

    let main = column![
        app.notifications.view().map(Message::DismissNotification),
        scrollable(container(content).padding(24).width(Length::Fill)),
    ]
    .spacing(10)
    .padding(10)
    .width(Length::Fill);

    row![ui::sidebar(app.page).map(Message::Navigate), main].into()
}
