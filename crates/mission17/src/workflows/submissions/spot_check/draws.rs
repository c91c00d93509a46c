use rand::Rng;

/// Source of uniform samples in `[0, 1)` consumed by the spot check.
///
/// Implementations are shared across request handlers, so `draw` takes `&self`.
pub trait DrawSource: Send + Sync {
    fn draw(&self) -> Result<f64, DrawError>;
}

/// Failure to obtain a usable sample.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("random source unavailable: {0}")]
    Unavailable(String),
    #[error("random sample {0} outside [0, 1)")]
    OutOfRange(f64),
}

/// Production source backed by the thread-local generator; no lock is shared between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngDraws;

impl DrawSource for ThreadRngDraws {
    fn draw(&self) -> Result<f64, DrawError> {
        Ok(rand::thread_rng().gen::<f64>())
    }
}

pub(crate) fn checked_draw(draws: &dyn DrawSource) -> Result<f64, DrawError> {
    let sample = draws.draw()?;
    if (0.0..1.0).contains(&sample) {
        Ok(sample)
    } else {
        Err(DrawError::OutOfRange(sample))
    }
}
