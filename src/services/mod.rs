pub mod grading_service;
pub mod leaderboard_service;
pub mod module_service;
pub mod quiz_service;
pub mod scoring;
pub mod user_service;

pub use grading_service::GradingService;
pub use leaderboard_service::LeaderboardService;
pub use module_service::ModuleService;
pub use quiz_service::QuizService;
pub use user_service::UserService;
