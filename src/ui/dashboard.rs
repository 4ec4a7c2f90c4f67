use iced::{
    widget::{button, column, container, row, text, Row},
    Element, Length,
};

use super::Page;

struct Tool {
    page: Page,
    title: &'static str,
    description: &'static str,
}

static TOOLS: [Tool; 3] = [
    Tool {
        page: Page::MockupGenerator,
        title: "Mockup Generator",
        description: "Render product mockups from a sample image and a list of prompts",
    },
    Tool {
        page: Page::IdeaGenerator,
        title: "Idea Generator",
        description: "Analyse a product and generate new design ideas from it",
    },
    Tool {
        page: Page::ImageEditor,
        title: "Image Editor",
        description: "Combine a product image with reference images",
    },
];

/// Landing page. Stateless, it only emits navigation requests.
pub fn view<'a>() -> Element<'a, Page> {
    let cards = TOOLS.iter().map(|tool| {
        container(
            column![
                text(tool.title).size(20),
                text(tool.description).size(14),
                button(text("Open")).on_press(tool.page),
            ]
            .spacing(10),
        )
        .padding(16)
        .width(Length::FillPortion(1))
        .style(container::rounded_box)
        .into()
    });

    column![
        text("Mockup Studio").size(32),
        text("AI tools for product mockups and design ideas."),
        Row::with_children(cards).spacing(16),
        row![text("Pick a tool on the left or open one above to get started.").size(13)],
    ]
    .spacing(20)
    .into()
}
