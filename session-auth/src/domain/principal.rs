use super::Role;

/// What a principal collection knows about an account, enough to check a login.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalRecord {
    pub subject_id: String,
    pub password_hash: String,
    pub role: Role,
}

impl PrincipalRecord {
    pub fn new(subject_id: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            password_hash: password_hash.into(),
            role,
        }
    }
}
