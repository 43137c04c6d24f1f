//! Community membership status as reported by the platform.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Status of a user within the verification group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

impl MemberStatus {
    /// Whether this status counts as having joined the community.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            MemberStatus::Creator | MemberStatus::Administrator | MemberStatus::Member
        )
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberStatus::Creator => "creator",
            MemberStatus::Administrator => "administrator",
            MemberStatus::Member => "member",
            MemberStatus::Restricted => "restricted",
            MemberStatus::Left => "left",
            MemberStatus::Kicked => "kicked",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_member() {
        assert!(MemberStatus::Member.is_member());
        assert!(MemberStatus::Administrator.is_member());
        assert!(MemberStatus::Creator.is_member());
        assert!(!MemberStatus::Restricted.is_member());
        assert!(!MemberStatus::Left.is_member());
        assert!(!MemberStatus::Kicked.is_member());
    }

    #[test]
    fn test_deserialize_platform_value() {
        let status: MemberStatus = serde_json::from_str("\"administrator\"").unwrap();
        assert_eq!(status, MemberStatus::Administrator);
    }
}
