//! Input capability boundary
//!
//! The gesture tracker is an optional external collaborator. Its capability
//! surface is a trait with an explicit availability flag, checked once at
//! construction; a missing or failing tracker degrades to keyboard control
//! and never aborts the session. Implementations that hold a capture device
//! must release it in `Drop`, so quitting releases the camera
//! deterministically.

/// One sensor reading. A failed or empty camera frame is reported as the
/// neutral reading rather than an error - the simulation must never stall
/// on a sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReading {
    /// Horizontal hand position, normalized to [0, 1]
    pub x: f32,
    /// True while the fist is closed
    pub closed: bool,
    /// False when no hand was seen this frame
    pub detected: bool,
}

impl HandReading {
    /// Centered, open, nothing detected.
    pub fn neutral() -> Self {
        Self {
            x: 0.5,
            closed: false,
            detected: false,
        }
    }
}

impl Default for HandReading {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Capability interface for the hand-gesture tracker.
///
/// Implementations must never panic across this boundary: a read failure
/// degrades to `HandReading::neutral()` for that frame.
pub trait HandTracker {
    /// Probed once at session construction; false means the host falls back
    /// to keyboard/mouse controls for the whole session.
    fn available(&self) -> bool;

    /// Advance the sensor one frame and return the current reading.
    fn poll(&mut self) -> HandReading;
}

/// The always-unavailable tracker, used when no camera integration exists.
#[derive(Debug, Default)]
pub struct NullTracker;

impl HandTracker for NullTracker {
    fn available(&self) -> bool {
        false
    }

    fn poll(&mut self) -> HandReading {
        HandReading::neutral()
    }
}

/// Normalized input snapshot for one frame, handed to the game machine.
/// Gesture and keyboard fields coexist; the session applies whichever the
/// configured control mode selects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Present when the tracker is available, sensitivity already applied
    pub hand: Option<HandReading>,
    pub move_left: bool,
    pub move_right: bool,
    /// Discrete fire request (keyboard space / mouse click)
    pub fire: bool,
}

impl FrameInput {
    /// Poll the tracker and build a gesture-mode snapshot. `sensitivity`
    /// scales the hand's horizontal travel about the screen center
    /// (1.0 = direct mapping).
    pub fn from_tracker(tracker: &mut dyn HandTracker, sensitivity: f32) -> Self {
        if !tracker.available() {
            return Self::default();
        }
        let mut reading = tracker.poll();
        reading.x = (0.5 + (reading.x - 0.5) * sensitivity).clamp(0.0, 1.0);
        Self {
            hand: Some(reading),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTracker(HandReading);

    impl HandTracker for FixedTracker {
        fn available(&self) -> bool {
            true
        }
        fn poll(&mut self) -> HandReading {
            self.0
        }
    }

    #[test]
    fn null_tracker_degrades_to_keyboard() {
        let mut tracker = NullTracker;
        let input = FrameInput::from_tracker(&mut tracker, 1.0);
        assert!(input.hand.is_none());
    }

    #[test]
    fn sensitivity_scales_about_center() {
        let mut tracker = FixedTracker(HandReading {
            x: 0.75,
            closed: false,
            detected: true,
        });
        let input = FrameInput::from_tracker(&mut tracker, 2.0);
        assert_eq!(input.hand.unwrap().x, 1.0);

        let input = FrameInput::from_tracker(&mut tracker, 0.5);
        assert_eq!(input.hand.unwrap().x, 0.625);
    }

    #[test]
    fn sensitivity_clamps_to_unit_range() {
        let mut tracker = FixedTracker(HandReading {
            x: 0.0,
            closed: true,
            detected: true,
        });
        let input = FrameInput::from_tracker(&mut tracker, 2.0);
        let hand = input.hand.unwrap();
        assert_eq!(hand.x, 0.0);
        assert!(hand.closed);
    }
}
