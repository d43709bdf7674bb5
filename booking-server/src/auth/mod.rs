//! 调用者身份
//!
//! 用户认证/角色是外部协作方：上游认证网关完成令牌校验后，
//! 以请求头把调用者身份传给本服务：
//!
//! | 请求头 | 含义 | 必填 |
//! |--------|------|------|
//! | x-user-id | 用户 ID | 是 |
//! | x-user-name | 显示名 | 否（缺省取用户 ID） |
//! | x-user-email | 通知地址 | 否（缺失则跳过确认通知） |
//!
//! 需要身份的处理器直接用 [`CurrentUser`] 提取器；
//! [`require_auth`] 中间件供整组路由统一挂认证。

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::utils::AppError;

/// 当前用户上下文（来自上游网关）
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: String,
    /// 显示名
    pub username: String,
    /// 通知地址
    pub email: Option<String>,
}

impl CurrentUser {
    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let id = header("x-user-id").ok_or(AppError::Unauthorized)?;
        let username = header("x-user-name").unwrap_or_else(|| id.clone());
        let email = header("x-user-email");

        Ok(Self {
            id,
            username,
            email,
        })
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = Self::from_parts(parts)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// 认证中间件 — 要求网关身份头存在
///
/// 校验成功后把 [`CurrentUser`] 注入请求扩展，缺失返回 401。
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let user = CurrentUser::from_parts(&parts)?;
    parts.extensions.insert(user);
    req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = HttpRequest::builder().uri("/api/bookings");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn requires_user_id() {
        let parts = parts_with(&[]);
        assert!(CurrentUser::from_parts(&parts).is_err());
    }

    #[test]
    fn username_falls_back_to_id() {
        let parts = parts_with(&[("x-user-id", "u-42")]);
        let user = CurrentUser::from_parts(&parts).unwrap();
        assert_eq!(user.username, "u-42");
        assert!(user.email.is_none());
    }

    #[test]
    fn full_identity() {
        let parts = parts_with(&[
            ("x-user-id", "u-42"),
            ("x-user-name", "Ada"),
            ("x-user-email", "ada@example.com"),
        ]);
        let user = CurrentUser::from_parts(&parts).unwrap();
        assert_eq!(user.username, "Ada");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }
}
