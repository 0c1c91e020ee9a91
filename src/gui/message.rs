use std::path::PathBuf;

use crate::models::Classification;

#[derive(Debug, Clone)]
pub enum Message {
    OpenImage,
    ImageSelected(Option<PathBuf>),
    Classified(Result<(PathBuf, Classification), String>),
    ErrorDismissed,
}
