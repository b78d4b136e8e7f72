// Auth service: registration and login

use std::sync::Arc;

use convene_contracts::{AuthResponse, LoginRequest, RegisterRequest, User};
use convene_core::{AppError, Result};
use convene_storage::{models::CreateUser, Database};

use crate::auth::jwt::JwtKeys;
use crate::auth::password;

const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService {
    db: Arc<Database>,
    jwt: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtKeys>) -> Self {
        Self { db, jwt }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        let email = normalize_email(&req.email)?;

        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }

        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                "password must be at least 8 characters",
            ));
        }

        let password_hash = password::hash_password(&req.password)?;

        let row = self
            .db
            .create_user(CreateUser {
                email,
                name: name.to_string(),
                password_hash,
            })
            .await?;

        let token = self.jwt.issue(row.id, &row.email, &row.name)?;

        Ok(AuthResponse {
            token,
            user: row_to_user(row),
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let email = req.email.trim().to_lowercase();

        // Same message for unknown email and wrong password
        let row = self
            .db
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication("invalid email or password"))?;

        if !password::verify_password(&req.password, &row.password_hash)? {
            return Err(AppError::authentication("invalid email or password"));
        }

        let token = self.jwt.issue(row.id, &row.email, &row.name)?;

        Ok(AuthResponse {
            token,
            user: row_to_user(row),
        })
    }
}

fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();

    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::validation("a valid email is required"));
    }

    Ok(email)
}

fn row_to_user(row: convene_storage::models::UserRow) -> User {
    User {
        id: row.id,
        email: row.email,
        name: row.name,
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_accepts_and_lowercases() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_garbage() {
        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ada@nodot").is_err());
    }
}
