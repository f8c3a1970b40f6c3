use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

impl User {
    pub async fn find_by_username(
        username: &str,
        db: &crate::database::Database,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&db.pool)
        .await
    }

    /// Inserts a user with an already hashed password. `None` when the
    /// username is taken.
    pub async fn create(
        username: &str,
        password_hash: &str,
        db: &crate::database::Database,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             ON CONFLICT (username) DO NOTHING
             RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&db.pool)
        .await
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_only_the_original_password() {
        let user = User {
            id: 1,
            username: "kim".to_string(),
            password_hash: bcrypt::hash("pw1234", 4).unwrap(),
        };
        assert!(user.verify_password("pw1234"));
        assert!(!user.verify_password("pw12345"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let user = User {
            id: 1,
            username: "kim".to_string(),
            password_hash: "plaintext".to_string(),
        };
        assert!(!user.verify_password("plaintext"));
    }
}
