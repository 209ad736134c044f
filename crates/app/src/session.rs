//! Login flag for the single dashboard user.
//!
//! The flag is stored next to the ledger as `isAuthenticated = "true"` and
//! removed on logout. It gates the command line, nothing more.

use engine::Store;

use crate::{error::Result, settings::Auth};

pub const AUTH_KEY: &str = "isAuthenticated";

/// Checks the credential pair and records the session on success.
pub async fn login(store: &dyn Store, auth: &Auth, username: &str, password: &str) -> Result<bool> {
    if username != auth.username || password != auth.password {
        tracing::info!(username, "login rejected");
        return Ok(false);
    }
    store.set(AUTH_KEY, "true").await?;
    tracing::info!(username, "logged in");
    Ok(true)
}

pub async fn logout(store: &dyn Store) -> Result<()> {
    store.remove(AUTH_KEY).await?;
    tracing::info!("logged out");
    Ok(())
}

pub async fn is_authenticated(store: &dyn Store) -> Result<bool> {
    Ok(store.get(AUTH_KEY).await?.as_deref() == Some("true"))
}

#[cfg(test)]
mod tests {
    use engine::MemoryStore;

    use super::*;

    fn auth() -> Auth {
        Auth {
            username: "owner".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn login_then_logout() {
        let store = MemoryStore::new();
        assert!(!is_authenticated(&store).await.unwrap());

        assert!(login(&store, &auth(), "owner", "hunter2").await.unwrap());
        assert!(is_authenticated(&store).await.unwrap());
        assert_eq!(
            store.get(AUTH_KEY).await.unwrap(),
            Some("true".to_string())
        );

        logout(&store).await.unwrap();
        assert!(!is_authenticated(&store).await.unwrap());
        assert_eq!(store.get(AUTH_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let store = MemoryStore::new();

        assert!(!login(&store, &auth(), "owner", "hunter3").await.unwrap());
        assert!(!is_authenticated(&store).await.unwrap());
    }

    #[tokio::test]
    async fn only_literal_true_counts() {
        let store = MemoryStore::with_entries([(AUTH_KEY, "yes")]);
        assert!(!is_authenticated(&store).await.unwrap());
    }
}
