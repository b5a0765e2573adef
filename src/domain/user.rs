use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A user as referenced from a ticket or comment.
///
/// The API sends either a bare identifier or a populated user document,
/// depending on whether the server joined the user collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub label: Option<String>,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    #[cfg(test)]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserRef {
    Id(String),
    Document {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default, rename = "firstName")]
        first_name: Option<String>,
        #[serde(default, rename = "lastName")]
        last_name: Option<String>,
    },
}

impl<'de> Deserialize<'de> for UserRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let user = match RawUserRef::deserialize(deserializer)? {
            RawUserRef::Id(id) => UserRef::new(id),
            RawUserRef::Document {
                id,
                username,
                first_name,
                last_name,
            } => {
                let full_name = match (first_name, last_name) {
                    (Some(first), Some(last)) => Some(format!("{first} {last}")),
                    (Some(first), None) => Some(first),
                    (None, Some(last)) => Some(last),
                    (None, None) => None,
                };
                UserRef {
                    id,
                    label: full_name.or(username),
                }
            }
        };
        Ok(user)
    }
}

impl Serialize for UserRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.id)
    }
}

/// The acting user of this client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_author_of(&self, author_id: &str) -> bool {
        self.user_id.as_deref() == Some(author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_identifier() {
        let user: UserRef = serde_json::from_str("\"u-1\"").unwrap();
        assert_eq!(user, UserRef::new("u-1"));
        assert_eq!(user.display_name(), "u-1");
    }

    #[test]
    fn parses_populated_document() {
        let user: UserRef =
            serde_json::from_str(r#"{"_id":"u-2","firstName":"Ada","lastName":"Lovelace"}"#)
                .unwrap();
        assert_eq!(user.id, "u-2");
        assert_eq!(user.display_name(), "Ada Lovelace");

        let user: UserRef = serde_json::from_str(r#"{"_id":"u-3","username":"grace"}"#).unwrap();
        assert_eq!(user.display_name(), "grace");
    }

    #[test]
    fn serializes_as_identifier() {
        let user = UserRef::new("u-4").with_label("Someone");
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"u-4\"");
    }

    #[test]
    fn author_check_requires_a_known_user() {
        let anonymous = Session::default();
        assert!(!anonymous.is_author_of(""));

        let session = Session {
            user_id: Some("u-1".to_string()),
            username: None,
        };
        assert!(session.is_author_of("u-1"));
        assert!(!session.is_author_of("u-2"));
    }
}
