pub mod group;
pub mod invitation;
pub mod message;
pub mod user;

pub use group::{Group, GroupMember, GroupMemberView, GroupRole};
pub use invitation::{GroupInvitation, InvitationStatus, InvitationView};
pub use message::{Message, MessageTarget, MessageType, MessageView};
pub use user::{LoginMethod, NewUser, PublicUser, User};
