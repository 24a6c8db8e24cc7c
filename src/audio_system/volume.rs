/// Volume model
///
/// Every sound's final volume is the product of four multipliers: global,
/// group, per-asset and per-call.

/// Number of volume groups. Group ids are `0..GROUP_COUNT`.
pub const GROUP_COUNT: usize = 8;

/// Compose the effective volume of a sound.
///
/// A result of exactly 0 means the sound should not be started at all.
pub fn effective_volume(global: f64, group: f64, asset: f64, call: f64) -> f64 {
    global * group * asset * call
}

/// Global scalar plus the group volume table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    global: f64,
    groups: [f64; GROUP_COUNT],
}

impl VolumeState {
    pub fn new() -> Self {
        Self {
            global: 1.0,
            groups: [1.0; GROUP_COUNT],
        }
    }

    pub fn global(&self) -> f64 {
        self.global
    }

    pub fn set_global(&mut self, volume: f64) {
        self.global = volume;
    }

    /// Volume multiplier of a group.
    ///
    /// # Panics
    ///
    /// Panics if `group_id` is 8 or larger.
    pub fn group(&self, group_id: usize) -> f64 {
        assert!(group_id < GROUP_COUNT, "invalid group ID: {group_id}");
        self.groups[group_id]
    }

    /// Set the volume multiplier of a group. 0 mutes the group.
    ///
    /// # Panics
    ///
    /// Panics if `group_id` is 8 or larger.
    pub fn set_group(&mut self, group_id: usize, volume: f64) {
        assert!(group_id < GROUP_COUNT, "invalid group ID: {group_id}");
        self.groups[group_id] = volume;
    }

    /// Effective volume for a sound of the given group and base volume
    pub fn effective(&self, group_id: u8, asset: f64, call: f64) -> f64 {
        effective_volume(self.global, self.group(group_id as usize), asset, call)
    }
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::new()
    }
}
