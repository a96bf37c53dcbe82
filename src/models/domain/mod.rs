pub mod module;
pub mod question;
pub mod quiz;
pub mod quiz_result;
pub mod user;
pub use module::Module;
pub use question::Question;
pub use quiz::Quiz;
pub use quiz_result::QuizResult;
pub use user::{Role, User};
