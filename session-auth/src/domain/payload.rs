use serde::{Deserialize, Serialize};

/// Kind of principal a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Musician,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Musician => "musician",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity claims carried by an access token and stored behind a refresh token.
///
/// Fields are private so a payload can only come out of [`Payload::new`] or
/// deserialization, and both reject an empty subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPayload")]
pub struct Payload {
    subject_id: String,
    role: Role,
}

#[derive(Deserialize)]
struct RawPayload {
    subject_id: String,
    role: Role,
}

impl TryFrom<RawPayload> for Payload {
    type Error = String;

    fn try_from(raw: RawPayload) -> Result<Self, Self::Error> {
        Payload::new(raw.subject_id, raw.role)
    }
}

impl Payload {
    pub fn new(subject_id: impl Into<String>, role: Role) -> Result<Self, String> {
        let subject_id = subject_id.into();
        if subject_id.trim().is_empty() {
            return Err("subject id must not be empty".to_string());
        }
        Ok(Self { subject_id, role })
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Who is behind a request once its access token has been looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Unauthenticated,
    Authenticated(Payload),
}

impl Caller {
    pub fn role(&self) -> Option<Role> {
        match self {
            Caller::Unauthenticated => None,
            Caller::Authenticated(payload) => Some(payload.role()),
        }
    }
}
