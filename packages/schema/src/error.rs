use crate::profile::Profile;
use msdesc_tree::Kind;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("No rule for `{kind}` in profile {profile}")]
    UnknownRule { profile: Profile, kind: Kind },

    #[error("Profile {0} is not registered")]
    UnknownProfile(Profile),
}

impl SchemaError {
    pub fn unknown_rule(profile: Profile, kind: Kind) -> Self {
        Self::UnknownRule { profile, kind }
    }
}
