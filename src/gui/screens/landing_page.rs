use iced::{
    Element, Length,
    widget::{container, text},
};

use crate::gui::{Message, screens::Screen};
use crate::report::INTRO_TEXT;

#[derive(Debug, Clone)]
pub struct LandingPageScreen;

impl Screen for LandingPageScreen {
    fn view(&self) -> Element<'_, Message> {
        container(text(INTRO_TEXT).size(16).width(Length::Fixed(500.0)))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}
