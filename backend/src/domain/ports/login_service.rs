//! Driving port for login use-cases.
//!
//! Inbound adapters call this port to turn credentials into a user id without
//! knowing which identity provider backs it.

use async_trait::async_trait;

use crate::domain::{Email, Error, LoginCredentials, User, UserId, UserRole};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

struct FixtureAccount {
    username: &'static str,
    password: &'static str,
    id: &'static str,
    email: &'static str,
    display_name: &'static str,
    role: UserRole,
}

const FIXTURE_ACCOUNTS: [FixtureAccount; 2] = [
    FixtureAccount {
        username: "admin",
        password: "password",
        id: "123e4567-e89b-12d3-a456-426614174000",
        email: "admin@example.com",
        display_name: "Console Admin",
        role: UserRole::Admin,
    },
    FixtureAccount {
        username: "employee",
        password: "password",
        id: "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        email: "employee@example.com",
        display_name: "Sample Employee",
        role: UserRole::Employee,
    },
];

/// Development authenticator with two fixed accounts.
///
/// `admin` / `password` signs in as an administrator and `employee` /
/// `password` as a regular employee. [`FixtureLoginService::seed_users`]
/// returns the matching user records so the directory can be primed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    /// User records backing the fixture accounts.
    pub fn seed_users() -> Result<Vec<User>, Error> {
        FIXTURE_ACCOUNTS
            .iter()
            .map(|account| {
                let id = UserId::new(account.id)
                    .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
                let email = Email::new(account.email)
                    .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
                Ok(User::new(id, email, account.role).with_display_name(account.display_name))
            })
            .collect()
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = FIXTURE_ACCOUNTS.iter().find(|account| {
            account.username == credentials.username() && account.password == credentials.password()
        });
        match account {
            Some(account) => UserId::new(account.id)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}"))),
            None => Err(Error::unauthorized("invalid credentials")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", Some("123e4567-e89b-12d3-a456-426614174000"))]
    #[case("employee", "password", Some("3fa85f64-5717-4562-b3fc-2c963f66afa6"))]
    #[case("admin", "wrong", None)]
    #[case("stranger", "password", None)]
    #[tokio::test]
    async fn authenticates_fixture_accounts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Option<&str>,
    ) {
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (expected, result) {
            (Some(id), Ok(actual)) => assert_eq!(actual.as_ref(), id),
            (None, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (expected, actual) => panic!("expected {expected:?}, got {actual:?}"),
        }
    }

    #[rstest]
    fn seed_users_cover_both_roles() {
        let users = FixtureLoginService::seed_users().expect("fixture users");
        let roles: Vec<_> = users.iter().map(User::role).collect();
        assert_eq!(roles, vec![UserRole::Admin, UserRole::Employee]);
        assert!(users.iter().all(|user| user.display_name().is_some()));
    }
}
