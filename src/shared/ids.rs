use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

const MAX_OBJECT_NAME_LEN: usize = 253;

/// Object names follow DNS subdomain rules: lowercase alphanumerics, `-`
/// and `.`, starting and ending with an alphanumeric.
pub fn validate_object_name(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value.len() > MAX_OBJECT_NAME_LEN {
        return Err(format!(
            "{kind} must be at most {MAX_OBJECT_NAME_LEN} characters"
        ));
    }
    let valid_edge = |ch: char| ch.is_ascii_lowercase() || ch.is_ascii_digit();
    let starts_ok = value.chars().next().is_some_and(valid_edge);
    let ends_ok = value.chars().last().is_some_and(valid_edge);
    if starts_ok
        && ends_ok
        && value
            .chars()
            .all(|ch| valid_edge(ch) || ch == '-' || ch == '.')
    {
        return Ok(());
    }
    Err(format!(
        "{kind} must use only lowercase ASCII letters, digits, '-' or '.', and start and end with a letter or digit"
    ))
}

pub fn validate_uid(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(format!("{kind} must not contain whitespace"));
    }
    Ok(())
}

macro_rules! define_id_type {
    ($name:ident, $kind:literal, $validate:path) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, String> {
                $validate($kind, raw)?;
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(|err| {
                    D::Error::custom(format!("invalid {} `{}`: {}", $kind, raw, err))
                })
            }
        }
    };
}

define_id_type!(Uid, "uid", validate_uid);
define_id_type!(ObjectName, "object name", validate_object_name);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_follow_dns_subdomain_rules() {
        ObjectName::parse("mycronjob").expect("plain");
        ObjectName::parse("hello-world.v1").expect("dots and dashes");
        ObjectName::parse("").expect_err("empty");
        ObjectName::parse("MyCronJob").expect_err("uppercase");
        ObjectName::parse("-leading").expect_err("leading dash");
        ObjectName::parse("trailing.").expect_err("trailing dot");
        ObjectName::parse(&"a".repeat(254)).expect_err("too long");
    }

    #[test]
    fn uids_reject_blank_values() {
        assert_eq!(Uid::parse("1a2b3c").expect("uid").as_str(), "1a2b3c");
        Uid::parse("").expect_err("empty");
        Uid::parse("1a 2b").expect_err("whitespace");
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let uid: Uid = serde_json::from_str("\"abc-123\"").expect("uid");
        assert_eq!(uid.to_string(), "abc-123");
        let err = serde_json::from_str::<ObjectName>("\"Bad_Name\"").expect_err("invalid");
        assert!(err.to_string().contains("invalid object name `Bad_Name`"));
    }
}
