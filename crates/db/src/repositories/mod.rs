//! Repository layer: one zero-sized struct per table.

pub mod application_repo;
pub mod conversation_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod review_repo;
pub mod user_role_repo;

pub use application_repo::ApplicationRepo;
pub use conversation_repo::ConversationRepo;
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use review_repo::ReviewRepo;
pub use user_role_repo::UserRoleRepo;
