pub mod roles;

pub use roles::{Role, UnknownRole};

/// 会话上下文：Session 中间件解析出的已认证身份，向下游 handler 显式传递。
///
/// 只包含稳定的最小视图，不含口令哈希。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub school_id: Option<i64>,
}

impl SessionUser {
    /// 显示名：姓名拼接，缺省时回退到 email/用户名。
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }

    /// 是否具备给定角色之一。
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    /// 是否与给定学校归属一致（双方都未归属学校时也视为一致）。
    pub fn same_school(&self, school_id: Option<i64>) -> bool {
        self.school_id == school_id
    }
}
