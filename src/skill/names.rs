//! Friendly-name resolution

use crate::config::ConfigError;

/// Static mapping from spoken names to device identifiers
///
/// Lookup is exact and case-sensitive. Insertion order is kept so the
/// launch speech lists devices the way they were configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendlyNameMap {
    entries: Vec<(String, String)>,
}

impl FriendlyNameMap {
    /// Build from `(friendly name, device id)` pairs
    pub fn from_pairs<N, D>(pairs: impl IntoIterator<Item = (N, D)>) -> Result<Self, ConfigError>
    where
        N: Into<String>,
        D: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (name, device) in pairs {
            let (name, device) = (name.into(), device.into());
            if name.is_empty() || device.is_empty() {
                return Err(ConfigError::InvalidDeviceEntry(format!("{name}={device}")));
            }
            if entries.iter().any(|(existing, _)| *existing == name) {
                return Err(ConfigError::DuplicateName(name));
            }
            entries.push((name, device));
        }

        if entries.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        Ok(Self { entries })
    }

    /// Parse `name=device, name=device`
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let pairs = spec
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.split_once('=')
                    .map(|(name, device)| (name.trim().to_string(), device.trim().to_string()))
                    .ok_or_else(|| ConfigError::InvalidDeviceEntry(item.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_pairs(pairs)
    }

    /// Device id for a spoken name, `None` when the name is unknown
    pub fn resolve(&self, spoken_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == spoken_name)
            .map(|(_, device)| device.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
