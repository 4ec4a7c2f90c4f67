use std::time::Duration;

use iced::{
    widget::{button, container, row, text, Column},
    Color, Element, Length, Theme,
};

use crate::domain::AppError;

/// How long a toast stays on screen before it is dismissed automatically
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

const WARNING_COLOR: Color = Color::from_rgb(0.85, 0.55, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

impl From<&AppError> for Notification {
    fn from(err: &AppError) -> Self {
        Notification::error(err.to_string())
    }
}

/// Stack of transient toasts, newest last.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    active: Vec<(u64, Notification)>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push((id, notification));
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.active.retain(|(existing, _)| *existing != id);
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.active.iter().map(|(_, notification)| notification)
    }

    pub fn view(&self) -> Element<'_, u64> {
        let toasts = self.active.iter().map(|(id, notification)| {
            let kind = notification.kind;
            let label = text(&notification.text).style(move |theme| toast_style(kind, theme));

            container(
                row![
                    label.width(Length::Fill),
                    button(text("✕").size(12))
                        .on_press(*id)
                        .style(button::text),
                ]
                .spacing(10),
            )
            .padding(10)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
        });

        Column::with_children(toasts).spacing(6).into()
    }
}

fn toast_style(kind: NotificationKind, theme: &Theme) -> text::Style {
    match kind {
        NotificationKind::Success => text::success(theme),
        NotificationKind::Error => text::danger(theme),
        NotificationKind::Warning => text::Style {
            color: Some(WARNING_COLOR),
        },
        NotificationKind::Info => text::default(theme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut notifications = Notifications::default();
        let first = notifications.push(Notification::success("saved"));
        let second = notifications.push(Notification::error("failed"));
        assert_ne!(first, second);

        notifications.dismiss(first);
        let remaining: Vec<_> = notifications.iter().cloned().collect();
        assert_eq!(remaining, vec![Notification::error("failed")]);

        // Dismissing twice is harmless
        notifications.dismiss(first);
        assert_eq!(notifications.iter().count(), 1);
    }

    #[test]
    fn test_from_app_error() {
        let notification = Notification::from(&AppError::MissingImage);
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.text, "Please upload a product image first");
    }

    #[test]
    fn test_each_kind_has_its_own_color() {
        let theme = Theme::Light;
        let colors: Vec<_> = [
            NotificationKind::Success,
            NotificationKind::Info,
            NotificationKind::Warning,
            NotificationKind::Error,
        ]
        .into_iter()
        .map(|kind| toast_style(kind, &theme).color)
        .collect();

        assert_eq!(colors[2], Some(WARNING_COLOR));
        assert_ne!(colors[2], colors[1]);
        assert_ne!(colors[0], colors[3]);
    }
}
