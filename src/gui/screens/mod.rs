pub mod landing_page;
pub mod loading_page;
pub mod results_page;

use iced::Element;

use crate::gui::Message;

pub trait Screen {
    fn view(&self) -> Element<'_, Message>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    LandingPage(landing_page::LandingPageScreen),
    LoadingPage(loading_page::LoadingPageScreen),
    ResultsPage(Box<results_page::ResultsPageScreen>),
}

impl Screen for ScreenData {
    fn view(&self) -> Element<'_, Message> {
        match self {
            ScreenData::LandingPage(screen) => screen.view(),
            ScreenData::LoadingPage(screen) => screen.view(),
            ScreenData::ResultsPage(screen) => screen.view(),
        }
    }
}
