use std::path::Path;

use iced::{
    Alignment::Center,
    Element, Length,
    widget::{column, container, image, row, text},
};

use crate::gui::{Message, screens::Screen, widgets::model_frame};
use crate::models::{Classification, ModelId};
use crate::report::{self, ClassBar};

const THUMBNAIL_SIZE: f32 = 350.0;

/// Everything shown for one classified image, formatted up front.
#[derive(Debug, Clone)]
pub struct ResultsPageScreen {
    thumbnail: image::Handle,
    info_text: String,
    prediction_text: String,
    resnet_bars: Vec<ClassBar>,
    densenet_bars: Vec<ClassBar>,
}

impl ResultsPageScreen {
    pub fn new(path: &Path, classification: &Classification) -> Self {
        let result = &classification.result;
        Self {
            thumbnail: image::Handle::from_path(path),
            info_text: report::image_info_text(&classification.info),
            prediction_text: report::final_prediction_text(result),
            resnet_bars: report::model_bars(result, ModelId::ResNet50),
            densenet_bars: report::model_bars(result, ModelId::DenseNet201),
        }
    }
}

impl Screen for ResultsPageScreen {
    fn view(&self) -> Element<'_, Message> {
        let preview = container(
            image(self.thumbnail.clone())
                .width(Length::Fixed(THUMBNAIL_SIZE))
                .height(Length::Fixed(THUMBNAIL_SIZE)),
        )
        .center_x(Length::Fixed(THUMBNAIL_SIZE + 50.0))
        .center_y(Length::Fixed(THUMBNAIL_SIZE + 50.0))
        .style(container::bordered_box);

        let frames = column![
            model_frame(ModelId::ResNet50, &self.resnet_bars),
            model_frame(ModelId::DenseNet201, &self.densenet_bars),
        ]
        .spacing(10);

        let content = column![
            row![preview, frames].spacing(20).align_y(Center),
            text(&self.info_text).size(12),
            text(&self.prediction_text).size(18),
        ]
        .spacing(10)
        .align_x(Center);

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}
