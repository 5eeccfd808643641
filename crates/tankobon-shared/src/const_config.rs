//! Stores settings that are not expected to need to change but grouped
//! together for discoverability and reuse

pub mod server {
    /// Timeout in seconds for acquiring a DB connection from the pool
    pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 2;
}

pub mod session {
    /// Name of the session cookie handed to clients
    pub const SESSION_COOKIE_NAME: &str = "session";
}

pub mod path {
    pub const PATH_HEALTH_CHECK: &str = "/health_check";
    pub const PATH_AUTH_REGISTER: &str = "/auth/register";
    pub const PATH_AUTH_LOGIN: &str = "/auth/login";
    pub const PATH_AUTH_LOGOUT: &str = "/auth/logout";
    pub const PATH_AUTH_ME: &str = "/auth/me";
    pub const PATH_CONTENT_LIST: &str = "/content";
    pub const PATH_CONTENT_LOOKUP: &str = "/content/lookup";
    pub const PATH_API_ADMIN_USER_LIST: &str = "/api/admin/user/list";
    pub const PATH_API_ADMIN_USER_ROLE: &str = "/api/admin/user/role";
    pub const PATH_API_ADMIN_USER_PERMISSION: &str = "/api/admin/user/permission";
    pub const PATH_API_TEAM_CREATE: &str = "/api/teams/create";
    pub const PATH_API_TEAM_MINE: &str = "/api/teams/mine";
    pub const PATH_API_TEAM_MEMBER_ADD: &str = "/api/teams/member/add";
    pub const PATH_API_TEAM_MEMBER_REMOVE: &str = "/api/teams/member/remove";
    pub const PATH_API_CONTENT_CREATE: &str = "/api/content/create";
    pub const PATH_API_CONTENT_CHAPTER_CREATE: &str = "/api/content/chapter/create";
    pub const PATH_API_UPLOAD_STORE: &str = "/api/uploads/store";
    pub const PATH_API_UPLOAD_DELETE: &str = "/api/uploads/delete";
}
