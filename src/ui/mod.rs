pub mod dashboard;
pub mod gallery;
pub mod ideas;
pub mod mockup;
pub mod notifications;
pub mod references;

use iced::{
    widget::{button, column, text, Column, Space},
    Element, Length,
};

/// Top-level pages reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    MockupGenerator,
    IdeaGenerator,
    ImageEditor,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Dashboard,
        Page::MockupGenerator,
        Page::IdeaGenerator,
        Page::ImageEditor,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::MockupGenerator => "Mockup Generator",
            Page::IdeaGenerator => "Idea Generator",
            Page::ImageEditor => "Image Editor",
        }
    }
}

/// Listed in the sidebar but not implemented yet.
pub const DISABLED_PAGES: [&str; 4] = ["Batch Processing", "AI Enhance", "Templates", "Settings"];

pub fn sidebar<'a>(current: Page) -> Element<'a, Page> {
    let pages = Page::ALL.iter().map(|&page| {
        let style = if page == current {
            button::primary
        } else {
            button::text
        };
        button(text(page.title()))
            .on_press(page)
            .style(style)
            .width(Length::Fill)
            .into()
    });

    // No on_press, so iced renders these as disabled
    let disabled = DISABLED_PAGES.iter().map(|&title| {
        button(text(title))
            .style(button::text)
            .width(Length::Fill)
            .into()
    });

    column![
        text("Mockup Studio").size(22),
        Space::new().height(Length::Fixed(16.0)),
        Column::with_children(pages).spacing(4),
        Space::new().height(Length::Fixed(16.0)),
        Column::with_children(disabled).spacing(4),
    ]
    .padding(16)
    .width(Length::Fixed(220.0))
    .into()
}
