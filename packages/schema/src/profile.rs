use serde::{Deserialize, Serialize};
use std::fmt;

/// Document profile selecting which rule table applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Full cataloguing profile
    #[default]
    Description,

    /// Retro-converted printed catalogue entries
    RetroDescription,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Description => "description",
            Profile::RetroDescription => "retro-description",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_names_match_config_form() {
        for profile in [Profile::Description, Profile::RetroDescription] {
            let json = serde_json::to_string(&profile).unwrap();
            assert_eq!(json, format!("\"{}\"", profile));
        }
        let parsed: Profile = serde_json::from_str("\"retro-description\"").unwrap();
        assert_eq!(parsed, Profile::RetroDescription);
    }
}
