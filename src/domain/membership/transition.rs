//! Status transition rules
//!
//! | Actor          | Target current        | Requested        |
//! |----------------|-----------------------|------------------|
//! | admin, creator | pending, blocked, user| user, blocked    |
//! | creator        | user                  | admin            |
//! | creator        | admin                 | user             |
//!
//! Every other combination is rejected. In particular nobody can grant
//! `creator`, an admin can never grant `admin`, and the creator's own
//! membership is immutable.

use thiserror::Error;

use super::entity::MembershipStatus;

/// Why a status change was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("not enough rights to change someone else's status")]
    InsufficientRights,

    #[error("the creator status cannot be assigned")]
    CreatorAssignment,

    #[error("the creator's status cannot be changed")]
    CreatorImmutable,

    #[error("only the creator can grant or revoke admin rights")]
    AdminPromotion,

    #[error("cannot change status from '{from}' to '{to}'")]
    NotAllowed {
        from: MembershipStatus,
        to: MembershipStatus,
    },
}

/// Check whether `actor` may move a member from `current` to `requested`
pub fn authorize_transition(
    actor: MembershipStatus,
    current: MembershipStatus,
    requested: MembershipStatus,
) -> Result<(), TransitionError> {
    use MembershipStatus::*;

    if !actor.can_manage_members() {
        return Err(TransitionError::InsufficientRights);
    }

    if requested == Creator {
        return Err(TransitionError::CreatorAssignment);
    }

    if current == Creator {
        return Err(TransitionError::CreatorImmutable);
    }

    match (actor, current, requested) {
        (Admin | Creator, Pending | Blocked | User, User | Blocked) => Ok(()),
        (Creator, User, Admin) | (Creator, Admin, User) => Ok(()),
        (Admin, _, Admin) | (Admin, Admin, _) => Err(TransitionError::AdminPromotion),
        _ => Err(TransitionError::NotAllowed {
            from: current,
            to: requested,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MembershipStatus::*;

    fn allowed() -> Vec<(MembershipStatus, MembershipStatus, MembershipStatus)> {
        let mut triples = Vec::new();

        for actor in [Admin, Creator] {
            for current in [Pending, Blocked, User] {
                for requested in [User, Blocked] {
                    triples.push((actor, current, requested));
                }
            }
        }

        triples.push((Creator, User, Admin));
        triples.push((Creator, Admin, User));
        triples
    }

    #[test]
    fn test_transition_table_is_exhaustive() {
        let allowed = allowed();

        for actor in MembershipStatus::ALL {
            for current in MembershipStatus::ALL {
                for requested in MembershipStatus::ALL {
                    let result = authorize_transition(actor, current, requested);
                    let expected = allowed.contains(&(actor, current, requested));

                    assert_eq!(
                        result.is_ok(),
                        expected,
                        "actor={} current={} requested={}",
                        actor,
                        current,
                        requested
                    );
                }
            }
        }
    }

    #[test]
    fn test_approve_pending() {
        assert!(authorize_transition(Admin, Pending, User).is_ok());
        assert!(authorize_transition(Creator, Pending, User).is_ok());
    }

    #[test]
    fn test_pending_cannot_be_promoted_directly_to_admin() {
        assert!(authorize_transition(Creator, Pending, Admin).is_err());
    }

    #[test]
    fn test_admin_cannot_promote() {
        assert_eq!(
            authorize_transition(Admin, User, Admin),
            Err(TransitionError::AdminPromotion)
        );
    }

    #[test]
    fn test_admin_cannot_demote_other_admin() {
        assert_eq!(
            authorize_transition(Admin, Admin, User),
            Err(TransitionError::AdminPromotion)
        );
    }

    #[test]
    fn test_creator_cannot_be_reassigned() {
        assert_eq!(
            authorize_transition(Creator, User, Creator),
            Err(TransitionError::CreatorAssignment)
        );
        assert_eq!(
            authorize_transition(Creator, Creator, User),
            Err(TransitionError::CreatorImmutable)
        );
    }

    #[test]
    fn test_regular_members_cannot_change_anything() {
        for actor in [User, Pending, Blocked] {
            assert_eq!(
                authorize_transition(actor, Pending, User),
                Err(TransitionError::InsufficientRights)
            );
        }
    }

    #[test]
    fn test_creator_cannot_block_admin_directly() {
        assert_eq!(
            authorize_transition(Creator, Admin, Blocked),
            Err(TransitionError::NotAllowed {
                from: Admin,
                to: Blocked
            })
        );
    }
}
