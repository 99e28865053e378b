/// Row access shared by the borrowed grayscale view and [`super::ImageF32`].
///
/// Rows are exactly `width()` pixels long; `stride()` is the distance between
/// row starts in the backing buffer.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;
    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Whole image as one slice when rows are packed back to back.
    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        None
    }
}

/// Mutable rows, for buffers the pipeline writes into.
pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
