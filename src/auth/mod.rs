pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use password::{hash_password, verify_password};
pub use utils::{
    extract_claims_from_context, require_module_member, require_module_owner, require_role,
    require_student, require_teacher,
};
