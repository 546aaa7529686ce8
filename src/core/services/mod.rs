//! Services composing one or more repositories on a shared pool.
//!
//! Each service can be built explicitly with `new`, choosing which
//! collaborators it gets, or by the DI container, which wires all of them.

pub mod chats;
pub mod classes;
pub mod debug;
pub mod feedback;
pub mod membership;
pub mod scenarios;
pub mod users;

pub use chats::ChatsService;
pub use classes::ClassesService;
pub use debug::DebugService;
pub use feedback::{Coverage, FeedbackService, MarkingSummary};
pub use scenarios::{ScenarioSummary, ScenariosService};
pub use users::UsersService;
