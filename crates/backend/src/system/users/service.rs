use anyhow::Result;
use chrono::Utc;
use contracts::system::auth::RegisterRequest;
use contracts::system::users::User;

use super::repository;
use crate::system::auth::password;

/// Register a new user account
pub async fn register(req: RegisterRequest) -> Result<String> {
    let email = req.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(anyhow::anyhow!("Invalid email format"));
    }

    if repository::get_by_email(&email).await?.is_some() {
        return Err(anyhow::anyhow!("Email already registered"));
    }

    password::validate_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        email,
        name: req.name.filter(|n| !n.trim().is_empty()),
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(&user, &password_hash).await?;

    Ok(user_id)
}

/// Get user by ID
pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// Verify user credentials (for login)
pub async fn verify_credentials(email: &str, password: &str) -> Result<Option<User>> {
    let email = email.trim().to_lowercase();

    let user = match repository::get_by_email(&email).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    let _ = repository::update_last_login(&user.id).await;

    Ok(Some(user))
}

fn is_valid_email(email: &str) -> bool {
    // Local part, @, domain with at least one dot
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
    }
}
