pub type PaintResult<T> = Result<T, PaintError>;

#[derive(thiserror::Error, Debug)]
pub enum PaintError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("geometry error: {0}")]
    Geometry(String),
}

impl PaintError {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }
}
