use iced::{
    Alignment::Center,
    Color, Element, Length,
    widget::{Column, button, column, container, progress_bar, text},
};

use crate::gui::Message;
use crate::models::ModelId;
use crate::report::{APP_TITLE, ClassBar, DISCLAIMER_TEXT};

pub fn header<'a>(busy: bool) -> Element<'a, Message> {
    column![
        text(APP_TITLE).size(24),
        button("Open Image").on_press_maybe((!busy).then_some(Message::OpenImage)),
    ]
    .spacing(5)
    .padding(10)
    .align_x(Center)
    .width(Length::Fill)
    .into()
}

pub fn disclaimer<'a>() -> Element<'a, Message> {
    container(
        text(DISCLAIMER_TEXT)
            .size(12)
            .color(Color::from_rgb(0.85, 0.1, 0.1)),
    )
    .padding(5)
    .center_x(Length::Fill)
    .into()
}

/// Labelled frame with one percentage line and bar per class.
pub fn model_frame<'a>(model: ModelId, bars: &'a [ClassBar]) -> Element<'a, Message> {
    let mut rows = Column::new().spacing(4);
    for bar in bars {
        rows = rows
            .push(text(&bar.text).size(13))
            .push(progress_bar(0.0..=100.0, bar.percent));
    }

    container(column![text(model.name()).size(16), rows].spacing(8))
        .padding(10)
        .width(Length::Fixed(320.0))
        .style(container::bordered_box)
        .into()
}
