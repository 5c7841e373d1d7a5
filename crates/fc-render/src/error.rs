use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create {0}x{1} pixmap")]
    PixmapCreation(u32, u32),

    #[error("image decoding error: {0}")]
    ImageDecode(String),

    #[error("image encoding error: {0}")]
    Encoding(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
