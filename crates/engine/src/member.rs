//! The module contains `Member` and `Group`.

use serde::{Deserialize, Serialize};

use crate::{GroupId, MemberId, ResultEngine, util::normalize_required_name};

/// A person taking part in a group's shared expenses.
///
/// The engine never mutates members; they are read from the snapshot handed in
/// by the storage collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// New member with a generated id and a validated name.
    pub fn named(name: &str) -> ResultEngine<Self> {
        Ok(Self {
            id: MemberId::generate(),
            name: normalize_required_name(name, "member")?,
        })
    }
}

/// A group partitions members and expenses. One group is one ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

impl Group {
    pub fn named(name: &str) -> ResultEngine<Self> {
        Ok(Self {
            id: GroupId::generate(),
            name: normalize_required_name(name, "group")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_member_gets_fresh_id_and_trimmed_name() {
        let a = Member::named(" Ada ").unwrap();
        let b = Member::named("Ada").unwrap();
        assert_eq!(a.name, "Ada");
        assert_ne!(a.id, b.id);
        assert!(Member::named("").is_err());
        assert!(Group::named("  ").is_err());
    }
}
