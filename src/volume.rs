use serde::Deserialize;

/// Volume slider position, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Speech volume in `[0, 1]`.
    pub fn level(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    pub fn icon(self) -> VolumeIcon {
        VolumeIcon::for_value(self.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Volume {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(format!("volume must be 0-100, got {value}"));
        }
        Ok(Self(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeIcon {
    pub fn for_value(value: u8) -> Self {
        match value {
            67..=100 => Self::High,
            34..=66 => Self::Medium,
            1..=33 => Self::Low,
            _ => Self::Muted,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Muted => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn icon_path(self) -> String {
        format!("icons/volume-level-{}.svg", self.level())
    }
}
