use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::config_model::AuthSecret,
    domain::{
        entities::users::InsertUserEntity,
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, RegisterUserModel, TokenResponseModel, UserModel},
    },
    infrastructure::{axum_http::auth, notifications::email::MailNotifier},
};

pub const ROLE_USER: &str = "user";

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("{0} is already taken")]
    Conflict(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account is blocked")]
    Blocked,
    #[error("not allowed")]
    Forbidden,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserError::Validation { .. } => StatusCode::BAD_REQUEST,
            UserError::Conflict(_) => StatusCode::CONFLICT,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::Blocked | UserError::Forbidden => StatusCode::FORBIDDEN,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct UserUseCase<User, Mail>
where
    User: UserRepository + Send + Sync + 'static,
    Mail: MailNotifier + ?Sized + 'static,
{
    user_repo: Arc<User>,
    mailer: Arc<Mail>,
    auth_secret: AuthSecret,
}

impl<User, Mail> UserUseCase<User, Mail>
where
    User: UserRepository + Send + Sync + 'static,
    Mail: MailNotifier + ?Sized + 'static,
{
    pub fn new(user_repo: Arc<User>, mailer: Arc<Mail>, auth_secret: AuthSecret) -> Self {
        Self {
            user_repo,
            mailer,
            auth_secret,
        }
    }

    /// Registers a new account with the `user` role. The welcome email is
    /// best-effort: a gateway failure is logged and the registration still
    /// succeeds.
    pub async fn register(&self, model: RegisterUserModel) -> Result<Uuid, UserError> {
        let phone_number = model.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err(UserError::Validation {
                field: "phone_number",
                message: "must not be empty".to_string(),
            });
        }
        if !model.email.contains('@') {
            return Err(UserError::Validation {
                field: "email",
                message: "must be a valid address".to_string(),
            });
        }
        if model.password.len() < MIN_PASSWORD_LEN {
            return Err(UserError::Validation {
                field: "password",
                message: format!("must be at least {MIN_PASSWORD_LEN} characters"),
            });
        }

        if self
            .user_repo
            .find_by_phone_number(&phone_number)
            .await
            .map_err(UserError::Internal)?
            .is_some()
        {
            warn!(%phone_number, "users: registration with taken phone number");
            return Err(UserError::Conflict("phone_number"));
        }
        if self
            .user_repo
            .find_by_email(&model.email)
            .await
            .map_err(UserError::Internal)?
            .is_some()
        {
            warn!(email = %model.email, "users: registration with taken email");
            return Err(UserError::Conflict("email"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(model.password.as_bytes(), &salt)
            .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?
            .to_string();

        let user_id = self
            .user_repo
            .create(InsertUserEntity {
                phone_number: phone_number.clone(),
                email: model.email.clone(),
                password_hash,
                country: model.country.clone(),
                role: ROLE_USER.to_string(),
            })
            .await
            .map_err(|err| {
                error!(%phone_number, db_error = ?err, "users: registration insert failed");
                UserError::Internal(err)
            })?;

        info!(%user_id, "users: registered");

        if let Err(err) = self
            .mailer
            .send(
                &model.email,
                "Welcome",
                "Your account has been created. Browse the catalog and pick a plan when you are ready.",
            )
            .await
        {
            warn!(%user_id, error = ?err, "users: welcome email failed, continuing");
        }

        Ok(user_id)
    }

    /// Authenticates by phone number and mints a bearer token carrying the
    /// user's role. Missing accounts and wrong passwords are reported the
    /// same way.
    pub async fn login(&self, model: LoginModel) -> Result<TokenResponseModel, UserError> {
        let phone_number = model.phone_number.trim();

        let user = self
            .user_repo
            .find_by_phone_number(phone_number)
            .await
            .map_err(UserError::Internal)?
            .ok_or_else(|| {
                warn!(phone_number, "users: login for unknown phone number");
                UserError::InvalidCredentials
            })?;

        if user.is_blocked {
            warn!(user_id = %user.id, "users: login attempt on blocked account");
            return Err(UserError::Blocked);
        }

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|err| anyhow::anyhow!("stored password hash is unreadable: {err}"))?;
        if Argon2::default()
            .verify_password(model.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!(user_id = %user.id, "users: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let access_token = auth::generate_token(&self.auth_secret.jwt_secret, user.id, &user.role)
            .map_err(UserError::Internal)?;

        self.user_repo
            .touch_last_login(user.id)
            .await
            .map_err(|err| {
                error!(user_id = %user.id, db_error = ?err, "users: failed to record login time");
                UserError::Internal(err)
            })?;

        info!(user_id = %user.id, "users: logged in");
        Ok(TokenResponseModel { access_token })
    }

    /// Moderator-only toggle of the blocked flag.
    pub async fn set_blocked(
        &self,
        actor_is_moderator: bool,
        user_id: Uuid,
        blocked: bool,
    ) -> Result<(), UserError> {
        if !actor_is_moderator {
            return Err(UserError::Forbidden);
        }

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(UserError::Internal)?
            .ok_or(UserError::NotFound)?;

        self.user_repo
            .set_blocked(user_id, blocked)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to toggle blocked flag");
                UserError::Internal(err)
            })?;

        info!(%user_id, blocked, "users: blocked flag changed");
        Ok(())
    }

    /// Moderator-only listing; moderators themselves are excluded.
    pub async fn list_users(&self, actor_is_moderator: bool) -> Result<Vec<UserModel>, UserError> {
        if !actor_is_moderator {
            return Err(UserError::Forbidden);
        }

        let users = self
            .user_repo
            .list_regular()
            .await
            .map_err(UserError::Internal)?;
        Ok(users.into_iter().map(UserModel::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{entities::users::UserEntity, repositories::users::MockUserRepository},
        infrastructure::notifications::email::MockMailNotifier,
    };
    use chrono::Utc;

    const JWT_SECRET: &str = "unit-test-secret-please-keep-long";

    fn usecase(
        user_repo: MockUserRepository,
        mailer: MockMailNotifier,
    ) -> UserUseCase<MockUserRepository, MockMailNotifier> {
        UserUseCase::new(
            Arc::new(user_repo),
            Arc::new(mailer),
            AuthSecret {
                jwt_secret: JWT_SECRET.to_string(),
            },
        )
    }

    fn register_model() -> RegisterUserModel {
        RegisterUserModel {
            phone_number: " +15550001111 ".to_string(),
            email: "student@example.com".to_string(),
            password: "correct horse battery".to_string(),
            country: Some("US".to_string()),
        }
    }

    fn stored_user(password: &str) -> UserEntity {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();
        UserEntity {
            id: Uuid::new_v4(),
            phone_number: "+15550001111".to_string(),
            email: "student@example.com".to_string(),
            password_hash,
            country: None,
            role: ROLE_USER.to_string(),
            is_blocked: false,
            has_paid_subscription: false,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn registration_trims_the_phone_number_and_hashes_the_password() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .withf(|phone| phone == "+15550001111")
            .returning(|_| Ok(None));
        user_repo.expect_find_by_email().returning(|_| Ok(None));
        user_repo
            .expect_create()
            .withf(|entity| {
                entity.phone_number == "+15550001111"
                    && entity.role == "user"
                    && entity.password_hash.starts_with("$argon2")
            })
            .returning(|_| Ok(Uuid::new_v4()));

        let mut mailer = MockMailNotifier::new();
        mailer
            .expect_send()
            .withf(|to, _, _| to == "student@example.com")
            .times(1)
            .returning(|_, _, _| Ok(()));

        usecase(user_repo, mailer)
            .register(register_model())
            .await
            .expect("registration should succeed");
    }

    #[tokio::test]
    async fn failed_welcome_email_does_not_abort_registration() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .returning(|_| Ok(None));
        user_repo.expect_find_by_email().returning(|_| Ok(None));
        user_repo.expect_create().returning(|_| Ok(Uuid::new_v4()));

        let mut mailer = MockMailNotifier::new();
        mailer
            .expect_send()
            .returning(|_, _, _| Err(anyhow::anyhow!("gateway timeout")));

        usecase(user_repo, mailer)
            .register(register_model())
            .await
            .expect("registration should survive a mail failure");
    }

    #[tokio::test]
    async fn taken_phone_number_is_a_conflict() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .returning(|_| Ok(Some(stored_user("irrelevant-password"))));

        let result = usecase(user_repo, MockMailNotifier::new())
            .register(register_model())
            .await;
        assert!(matches!(result, Err(UserError::Conflict("phone_number"))));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let mut model = register_model();
        model.password = "short".to_string();

        let result = usecase(MockUserRepository::new(), MockMailNotifier::new())
            .register(model)
            .await;
        assert!(matches!(
            result,
            Err(UserError::Validation {
                field: "password",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn login_with_the_right_password_mints_a_token() {
        let user = stored_user("correct horse battery");
        let user_id = user.id;

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .returning(move |_| Ok(Some(user.clone())));
        user_repo
            .expect_touch_last_login()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let token = usecase(user_repo, MockMailNotifier::new())
            .login(LoginModel {
                phone_number: "+15550001111".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await
            .expect("login should succeed");

        let claims = auth::validate_token(JWT_SECRET, &token.access_token)
            .expect("minted token should validate");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let user = stored_user("correct horse battery");
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .returning(move |_| Ok(Some(user.clone())));

        let result = usecase(user_repo, MockMailNotifier::new())
            .login(LoginModel {
                phone_number: "+15550001111".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn blocked_account_cannot_log_in() {
        let mut user = stored_user("correct horse battery");
        user.is_blocked = true;

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .returning(move |_| Ok(Some(user.clone())));

        let result = usecase(user_repo, MockMailNotifier::new())
            .login(LoginModel {
                phone_number: "+15550001111".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::Blocked)));
    }

    #[tokio::test]
    async fn unknown_account_reads_the_same_as_a_wrong_password() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_phone_number()
            .returning(|_| Ok(None));

        let result = usecase(user_repo, MockMailNotifier::new())
            .login(LoginModel {
                phone_number: "+15550009999".to_string(),
                password: "whatever-it-is".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn blocking_requires_the_moderator_role() {
        let result = usecase(MockUserRepository::new(), MockMailNotifier::new())
            .set_blocked(false, Uuid::new_v4(), true)
            .await;
        assert!(matches!(result, Err(UserError::Forbidden)));
    }

    #[tokio::test]
    async fn moderator_can_block_an_existing_user() {
        let user = stored_user("correct horse battery");
        let user_id = user.id;

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        user_repo
            .expect_set_blocked()
            .withf(move |id, blocked| *id == user_id && *blocked)
            .times(1)
            .returning(|_, _| Ok(()));

        usecase(user_repo, MockMailNotifier::new())
            .set_blocked(true, user_id, true)
            .await
            .expect("block should succeed");
    }

    #[tokio::test]
    async fn user_listing_is_moderator_only() {
        let result = usecase(MockUserRepository::new(), MockMailNotifier::new())
            .list_users(false)
            .await;
        assert!(matches!(result, Err(UserError::Forbidden)));
    }
}
