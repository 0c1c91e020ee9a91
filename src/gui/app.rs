use std::path::PathBuf;
use std::sync::Arc;

use iced::futures::channel::oneshot;
use iced::{
    Element, Length, Size, Task,
    widget::{column, container},
};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};
use tracing::{info, warn};

use super::screens::{
    Screen, ScreenData, landing_page::LandingPageScreen, loading_page::LoadingPageScreen,
    results_page::ResultsPageScreen,
};
use super::widgets::{disclaimer, header};
use super::{AppState, Message};
use crate::models::Classification;
use crate::pipeline::EnsemblePipeline;
use crate::preprocessing::ACCEPTED_EXTENSIONS;
use crate::report::APP_TITLE;

pub struct LungscanApp {
    state: AppState,
    screen: ScreenData,
    /// Screen to restore if the running classification fails.
    previous: Option<ScreenData>,
}

/// Open the main window and block until it is closed.
pub fn run(pipeline: EnsemblePipeline) -> iced::Result {
    let pipeline = Arc::new(pipeline);
    iced::application(
        move || LungscanApp::new(Arc::clone(&pipeline)),
        LungscanApp::update,
        LungscanApp::view,
    )
    .title(LungscanApp::title)
    .window_size(Size::new(1000.0, 800.0))
    .run()
}

impl LungscanApp {
    pub fn new(pipeline: Arc<EnsemblePipeline>) -> Self {
        Self {
            state: AppState::new(pipeline),
            screen: ScreenData::LandingPage(LandingPageScreen),
            previous: None,
        }
    }

    pub fn title(&self) -> String {
        APP_TITLE.to_string()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenImage if self.state.busy => Task::none(),
            Message::OpenImage => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select Image")
                    .add_filter("Image files", ACCEPTED_EXTENSIONS)
                    .pick_file(),
                |handle| Message::ImageSelected(handle.map(|h| h.path().to_path_buf())),
            ),
            Message::ImageSelected(None) => Task::none(),
            Message::ImageSelected(Some(path)) => {
                info!("Classifying {}", path.display());
                self.state.busy = true;
                // The loading screen renders before the worker result arrives.
                self.previous = Some(std::mem::replace(
                    &mut self.screen,
                    ScreenData::LoadingPage(LoadingPageScreen),
                ));
                Task::perform(
                    classify_in_background(Arc::clone(&self.state.pipeline), path),
                    Message::Classified,
                )
            }
            Message::Classified(Ok((path, classification))) => {
                self.state.busy = false;
                self.previous = None;
                self.screen = ScreenData::ResultsPage(Box::new(ResultsPageScreen::new(
                    &path,
                    &classification,
                )));
                Task::none()
            }
            Message::Classified(Err(reason)) => {
                warn!("Classification failed: {}", reason);
                self.state.busy = false;
                if let Some(previous) = self.previous.take() {
                    self.screen = previous;
                }
                Task::perform(
                    AsyncMessageDialog::new()
                        .set_level(MessageLevel::Error)
                        .set_title("Error")
                        .set_description(format!("Failed to predict: {reason}"))
                        .set_buttons(MessageButtons::Ok)
                        .show(),
                    |_| Message::ErrorDismissed,
                )
            }
            Message::ErrorDismissed => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        column![
            header(self.state.busy),
            container(self.screen.view())
                .width(Length::Fill)
                .height(Length::Fill),
            disclaimer(),
        ]
        .into()
    }
}

/// Run the blocking pipeline on its own thread so the window keeps repainting.
async fn classify_in_background(
    pipeline: Arc<EnsemblePipeline>,
    path: PathBuf,
) -> Result<(PathBuf, Classification), String> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let result = pipeline
            .classify_file(&path)
            .map(|classification| (path, classification))
            .map_err(|e| e.to_string());
        let _ = tx.send(result);
    });
    rx.await
        .unwrap_or_else(|_| Err("inference worker stopped unexpectedly".to_string()))
}
