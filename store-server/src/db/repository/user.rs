//! User repository (credential store)
//!
//! Every mutation runs inside a single write transaction, so the
//! uniqueness check and the insert (or the read and the update) commit
//! as one atomic unit.

use rand::Rng;
use rand::distributions::Alphanumeric;
use redb::ReadableTable;
use sha2::{Digest, Sha256};

use crate::db::storage::{Storage, USERS_TABLE};
use shared::models::User;
use shared::{AppError, AppResult};

/// Length of the temporary password issued by a forced reset
const TEMP_PASSWORD_LEN: usize = 10;

/// Deterministic one-way password hash (SHA-256 hex digest)
pub fn hash_password(pass: &str) -> String {
    hex::encode(Sha256::digest(pass.as_bytes()))
}

/// Create a user
///
/// Login and email uniqueness are checked case-sensitively against all
/// existing records; check and insert commit atomically.
pub fn create(
    storage: &Storage,
    name: &str,
    surname: &str,
    login: &str,
    email: &str,
    pass: &str,
) -> AppResult<User> {
    let txn = storage.begin_write().map_err(AppError::from)?;
    let user = {
        let mut users = txn.open_table(USERS_TABLE).map_err(storage_err)?;

        for entry in users.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            let existing: User = serde_json::from_slice(value.value()).map_err(storage_err)?;
            if existing.login == login {
                return Err(AppError::conflict("Login already taken"));
            }
            if existing.email == email {
                return Err(AppError::conflict("Email already taken"));
            }
        }

        let user = User::new(name, surname, login, email, hash_password(pass));
        let bytes = serde_json::to_vec(&user).map_err(storage_err)?;
        users
            .insert(user.id.as_str(), bytes.as_slice())
            .map_err(storage_err)?;
        user
    };
    txn.commit().map_err(storage_err)?;

    tracing::info!(user_id = %user.id, login = %user.login, "User registered");
    Ok(user)
}

/// Authenticate by login and password
///
/// A banned user fails with a distinct error even when the password is
/// correct.
pub fn authenticate(storage: &Storage, login: &str, pass: &str) -> AppResult<User> {
    let user = find_by_login(storage, login)?;
    let user = match user {
        Some(u) if u.pass_hash == hash_password(pass) => u,
        _ => return Err(AppError::invalid_credentials()),
    };

    if user.banned {
        return Err(AppError::forbidden("Account is banned"));
    }

    Ok(user)
}

pub fn find_by_id(storage: &Storage, id: &str) -> AppResult<Option<User>> {
    Ok(storage.read_one(USERS_TABLE, id)?)
}

pub fn find_by_login(storage: &Storage, login: &str) -> AppResult<Option<User>> {
    let users: Vec<User> = storage.read_all(USERS_TABLE)?;
    Ok(users.into_iter().find(|u| u.login == login))
}

/// List all users, ordered by creation time
pub fn list(storage: &Storage) -> AppResult<Vec<User>> {
    let mut users: Vec<User> = storage.read_all(USERS_TABLE)?;
    users.sort_by_key(|u| u.created_at);
    Ok(users)
}

/// Change a user's password after verifying the old one
pub fn change_password(
    storage: &Storage,
    id: &str,
    old_pass: &str,
    new_pass: &str,
) -> AppResult<()> {
    update(storage, id, |user| {
        if user.pass_hash != hash_password(old_pass) {
            return Err(AppError::invalid_credentials());
        }
        user.pass_hash = hash_password(new_pass);
        Ok(())
    })?;
    Ok(())
}

/// Set the ban flag, returning the updated record
pub fn set_banned(storage: &Storage, id: &str, banned: bool) -> AppResult<User> {
    let user = update(storage, id, |user| {
        user.banned = banned;
        Ok(())
    })?;
    tracing::info!(user_id = %id, banned = banned, "User ban flag updated");
    Ok(user)
}

/// Replace the password with a random temporary one, returned in plain
/// text so the administrator can hand it to the user
pub fn force_reset_password(storage: &Storage, id: &str) -> AppResult<String> {
    let new_pass: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect();

    update(storage, id, |user| {
        user.pass_hash = hash_password(&new_pass);
        Ok(())
    })?;

    tracing::info!(user_id = %id, "Password force-reset by admin");
    Ok(new_pass)
}

/// Delete a user record
pub fn delete(storage: &Storage, id: &str) -> AppResult<()> {
    let txn = storage.begin_write().map_err(AppError::from)?;
    let removed = {
        let mut users = txn.open_table(USERS_TABLE).map_err(storage_err)?;
        users.remove(id).map_err(storage_err)?.is_some()
    };
    txn.commit().map_err(storage_err)?;

    if !removed {
        return Err(AppError::not_found(format!("User {}", id)));
    }
    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}

/// Read-modify-write of a single user record in one transaction
fn update(
    storage: &Storage,
    id: &str,
    mutate: impl FnOnce(&mut User) -> AppResult<()>,
) -> AppResult<User> {
    let txn = storage.begin_write().map_err(AppError::from)?;
    let user = {
        let mut users = txn.open_table(USERS_TABLE).map_err(storage_err)?;

        let bytes = users
            .get(id)
            .map_err(storage_err)?
            .map(|g| g.value().to_vec())
            .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
        let mut user: User = serde_json::from_slice(&bytes).map_err(storage_err)?;

        mutate(&mut user)?;

        let bytes = serde_json::to_vec(&user).map_err(storage_err)?;
        users
            .insert(id, bytes.as_slice())
            .map_err(storage_err)?;
        user
    };
    txn.commit().map_err(storage_err)?;
    Ok(user)
}

fn storage_err(e: impl std::fmt::Display) -> AppError {
    AppError::storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    fn register_alice(storage: &Storage) -> User {
        create(
            storage,
            "Alice",
            "Smith",
            "alice",
            "alice@example.com",
            "pw123",
        )
        .unwrap()
    }

    #[test]
    fn register_and_authenticate() {
        let storage = storage();
        let user = register_alice(&storage);

        assert!(!user.banned);
        assert_eq!(user.pass_hash, hash_password("pw123"));

        let authed = authenticate(&storage, "alice", "pw123").unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[test]
    fn duplicate_login_conflicts() {
        let storage = storage();
        register_alice(&storage);

        let err = create(
            &storage,
            "Other",
            "Person",
            "alice",
            "other@example.com",
            "pw",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let storage = storage();
        register_alice(&storage);

        let err = create(
            &storage,
            "Other",
            "Person",
            "bob",
            "alice@example.com",
            "pw",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn concurrent_registration_single_winner() {
        let storage = storage();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    create(
                        &storage,
                        "Alice",
                        "Smith",
                        "alice",
                        &format!("alice{}@example.com", i),
                        "pw",
                    )
                    .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }

    #[test]
    fn wrong_password_rejected() {
        let storage = storage();
        register_alice(&storage);

        let err = authenticate(&storage, "alice", "nope").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn banned_user_fails_distinctly() {
        let storage = storage();
        let user = register_alice(&storage);
        set_banned(&storage, &user.id, true).unwrap();

        // Correct password, distinct error
        let err = authenticate(&storage, "alice", "pw123").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn change_password_verifies_old() {
        let storage = storage();
        let user = register_alice(&storage);

        let err = change_password(&storage, &user.id, "wrong", "new").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        change_password(&storage, &user.id, "pw123", "new").unwrap();
        authenticate(&storage, "alice", "new").unwrap();
    }

    #[test]
    fn force_reset_issues_working_password() {
        let storage = storage();
        let user = register_alice(&storage);

        let temp = force_reset_password(&storage, &user.id).unwrap();
        assert_eq!(temp.len(), TEMP_PASSWORD_LEN);
        authenticate(&storage, "alice", &temp).unwrap();
    }

    #[test]
    fn delete_removes_record() {
        let storage = storage();
        let user = register_alice(&storage);

        delete(&storage, &user.id).unwrap();
        assert!(find_by_id(&storage, &user.id).unwrap().is_none());
        assert!(matches!(
            delete(&storage, &user.id).unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
