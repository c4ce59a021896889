//! Domain layer - Core business logic and entities

pub mod chat;
pub mod error;
pub mod group;
pub mod ledger;
pub mod membership;
pub mod storage;
pub mod user;

pub use chat::{ChatMessage, Message, MessageId, MessageRepository, NewMessage};
pub use error::DomainError;
pub use group::{Group, GroupId, GroupRepository, GroupView, UserGroupSummary};
pub use ledger::{
    Amount, BalanceReport, LedgerRepository, NewOperation, Operation, OperationId, OperationKind,
    OperationRecord, RecordedOperation,
};
pub use membership::{
    authorize_transition, JoinOutcome, Member, Membership, MembershipId, MembershipRepository,
    MembershipStatus, TransitionError,
};
pub use storage::{Page, StoreProbe, PAGE_SIZE};
pub use user::{NewUser, User, UserId, UserRef, UserRepository};
