/// Receives one call per processed item with `(index, total)`; `index` is zero-based.
pub trait ProgressObserver {
    fn on_item(&mut self, index: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize),
{
    fn on_item(&mut self, index: usize, total: usize) {
        self(index, total)
    }
}

/// Default observer that does nothing.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    #[inline(always)]
    fn on_item(&mut self, _: usize, _: usize) {}
}
