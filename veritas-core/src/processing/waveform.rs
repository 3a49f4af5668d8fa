use super::wav::peak_level;

/// Rolling amplitude window driving the capture-view oscilloscope.
///
/// Holds a fixed number of bins, each the peak amplitude of one incoming
/// buffer, oldest bins dropping off the left. Display-only and
/// non-authoritative: the encoded payload never passes through here.
///
/// Wrap in `Arc<parking_lot::Mutex<_>>` for access from the capture
/// callback and the view.
#[derive(Debug, Clone)]
pub struct WaveformWindow {
    bins: Vec<f32>,
    width: usize,
}

impl WaveformWindow {
    /// Standard bin count matching the capture view's bar strip.
    pub const DEFAULT_WIDTH: usize = 100;

    pub fn new(width: usize) -> Self {
        Self {
            bins: vec![0.0; width.max(1)],
            width: width.max(1),
        }
    }

    /// Fold one capture buffer into the window as a single bin.
    pub fn push_buffer(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        let amplitude = peak_level(samples).clamp(0.0, 1.0);
        self.bins.rotate_left(1);
        self.bins[self.width - 1] = amplitude;
    }

    /// Current window contents, oldest first, each in `[0, 1]`.
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Clear the window back to silence.
    pub fn reset(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0.0);
    }
}

impl Default for WaveformWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let window = WaveformWindow::new(8);
        assert_eq!(window.bins(), &[0.0; 8]);
    }

    #[test]
    fn newest_bin_is_rightmost() {
        let mut window = WaveformWindow::new(4);
        window.push_buffer(&[0.25, -0.1]);
        window.push_buffer(&[0.5]);

        assert_eq!(window.bins(), &[0.0, 0.0, 0.25, 0.5]);
    }

    #[test]
    fn oldest_bins_fall_off() {
        let mut window = WaveformWindow::new(2);
        window.push_buffer(&[0.1]);
        window.push_buffer(&[0.2]);
        window.push_buffer(&[0.3]);

        assert_eq!(window.bins(), &[0.2, 0.3]);
    }

    #[test]
    fn amplitude_clamped_to_unit_range() {
        let mut window = WaveformWindow::new(1);
        window.push_buffer(&[4.0, -8.0]);
        assert_eq!(window.bins(), &[1.0]);
    }

    #[test]
    fn empty_buffer_ignored() {
        let mut window = WaveformWindow::new(2);
        window.push_buffer(&[0.5]);
        window.push_buffer(&[]);
        assert_eq!(window.bins(), &[0.0, 0.5]);
    }

    #[test]
    fn reset_clears_window() {
        let mut window = WaveformWindow::new(3);
        window.push_buffer(&[0.9]);
        window.reset();
        assert_eq!(window.bins(), &[0.0; 3]);
    }
}
