//! Volume level with independent mute
//!
//! The level is linear in `[0.0, 1.0]`, which is what media elements accept.
//! Muting never touches the stored level, so unmuting restores it exactly.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    const DEFAULT_LEVEL: f32 = 0.7;

    /// Create new volume controller
    ///
    /// Out-of-range levels are clamped; a non-finite level falls back to the
    /// default.
    pub fn new(level: f32) -> Self {
        let level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_LEVEL
        };

        Self {
            level,
            muted: false,
        }
    }

    /// Set volume level, clamped to `[0.0, 1.0]`
    ///
    /// Returns `false` (and changes nothing) for NaN or infinite input.
    pub fn set_level(&mut self, level: f32) -> bool {
        if !level.is_finite() {
            return false;
        }
        self.level = level.clamp(0.0, 1.0);
        true
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Set the mute flag
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Audible volume: 0 while muted, otherwise the level
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(0.5);

        assert!(vol.set_level(0.75));
        assert_eq!(vol.level(), 0.75);

        // Clamp to range
        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);
        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn non_finite_levels_are_ignored() {
        let mut vol = Volume::new(0.4);
        assert!(!vol.set_level(f32::NAN));
        assert!(!vol.set_level(f32::INFINITY));
        assert_eq!(vol.level(), 0.4);

        assert_eq!(Volume::new(f32::NAN).level(), 0.7);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.6);

        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.6);
        assert_eq!(vol.effective(), 0.0);

        vol.unmute();
        assert_eq!(vol.effective(), 0.6);
    }

    #[test]
    fn level_changes_while_muted_stay_silent() {
        let mut vol = Volume::new(0.6);
        vol.toggle_mute();

        vol.set_level(0.3);
        assert!(vol.is_muted());
        assert_eq!(vol.effective(), 0.0);

        vol.toggle_mute();
        assert_eq!(vol.effective(), 0.3);
    }
}
