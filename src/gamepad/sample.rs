//! Raw per-frame hardware snapshot of one gamepad.

/// One frame's hardware-reported state for one device.
///
/// `digital` and `analogue` are indexed by button, `axes` by axis. Digital
/// values are pressed flags, analogue values lie in 0..1 and axis values in
/// -1..1.
///
/// The accessors treat an out-of-range index as a defect in the binding plan
/// and panic rather than returning an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSample {
    pub digital: Vec<bool>,
    pub analogue: Vec<f32>,
    pub axes: Vec<f32>,
}

impl RawSample {
    /// Creates a sample with all buttons released and all axes centered.
    #[must_use]
    pub fn neutral(num_buttons: usize, num_axes: usize) -> Self {
        Self {
            digital: vec![false; num_buttons],
            analogue: vec![0.0; num_buttons],
            axes: vec![0.0; num_axes],
        }
    }

    /// Number of buttons this sample reports.
    #[must_use]
    pub fn num_buttons(&self) -> usize {
        self.digital.len().min(self.analogue.len())
    }

    /// Number of axes this sample reports.
    #[must_use]
    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    /// Pressed state of button `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`RawSample::num_buttons`].
    #[must_use]
    pub fn digital(&self, index: usize) -> bool {
        assert!(
            index < self.num_buttons(),
            "button index {} out of bounds for sample with {} buttons",
            index,
            self.num_buttons()
        );
        self.digital[index]
    }

    /// Analog value of button `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`RawSample::num_buttons`].
    #[must_use]
    pub fn analogue(&self, index: usize) -> f32 {
        assert!(
            index < self.num_buttons(),
            "button index {} out of bounds for sample with {} buttons",
            index,
            self.num_buttons()
        );
        self.analogue[index]
    }

    /// Value of axis `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`RawSample::num_axes`].
    #[must_use]
    pub fn axis(&self, index: usize) -> f32 {
        assert!(
            index < self.num_axes(),
            "axis index {} out of bounds for sample with {} axes",
            index,
            self.num_axes()
        );
        self.axes[index]
    }

    /// Sets button `index` as a digital press, mirroring it to the analog value.
    pub fn set_button(&mut self, index: usize, pressed: bool) {
        self.digital[index] = pressed;
        self.analogue[index] = if pressed { 1.0 } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_sample() {
        let sample = RawSample::neutral(17, 4);
        assert_eq!(sample.num_buttons(), 17);
        assert_eq!(sample.num_axes(), 4);
        assert!(sample.digital.iter().all(|&d| !d));
        assert!(sample.analogue.iter().all(|&a| a == 0.0));
        assert!(sample.axes.iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_set_button_mirrors_analogue() {
        let mut sample = RawSample::neutral(4, 0);
        sample.set_button(2, true);
        assert!(sample.digital(2));
        assert_eq!(sample.analogue(2), 1.0);

        sample.set_button(2, false);
        assert!(!sample.digital(2));
        assert_eq!(sample.analogue(2), 0.0);
    }

    #[test]
    fn test_num_buttons_uses_shorter_array() {
        let sample = RawSample {
            digital: vec![false; 8],
            analogue: vec![0.0; 6],
            axes: vec![],
        };
        assert_eq!(sample.num_buttons(), 6);
    }

    #[test]
    #[should_panic(expected = "button index 6 out of bounds")]
    fn test_digital_out_of_bounds_panics() {
        let sample = RawSample::neutral(6, 4);
        let _ = sample.digital(6);
    }

    #[test]
    #[should_panic(expected = "button index 7 out of bounds")]
    fn test_analogue_out_of_bounds_panics() {
        let sample = RawSample::neutral(4, 4);
        let _ = sample.analogue(7);
    }

    #[test]
    #[should_panic(expected = "axis index 2 out of bounds")]
    fn test_axis_out_of_bounds_panics() {
        let sample = RawSample::neutral(17, 2);
        let _ = sample.axis(2);
    }
}
