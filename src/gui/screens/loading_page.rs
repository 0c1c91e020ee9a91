use iced::{
    Color, Element, Length,
    widget::{container, text},
};

use crate::gui::{Message, screens::Screen};
use crate::report::LOADING_TEXT;

#[derive(Debug, Clone)]
pub struct LoadingPageScreen;

impl Screen for LoadingPageScreen {
    fn view(&self) -> Element<'_, Message> {
        container(
            text(LOADING_TEXT)
                .size(14)
                .color(Color::from_rgb(0.1, 0.3, 0.9)),
        )
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }
}
