use crate::{Markers, ReadError};

pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, ReadError>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub markers: Markers,
}
