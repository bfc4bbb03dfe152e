//! User directory domain service.
//!
//! Implements [`UserDirectory`] on top of the user repository, a credential
//! hasher and the notification transport used for confirmation mail.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CredentialHasher, NotificationPublisher, RegisterUserRequest, UpdateUserRequest,
    UserDirectory, UserRepository,
};
use crate::domain::{
    Email, Error, NewUser, Notification, Password, RegistrationNotification, User, UserChanges,
    UserId, VerificationToken,
};

/// User directory backed by a repository.
#[derive(Clone)]
pub struct UserDirectoryService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    publisher: Arc<dyn NotificationPublisher>,
    frontend_url: Option<String>,
}

impl UserDirectoryService {
    /// Create a service; `frontend_url` prefixes confirmation links.
    ///
    /// Without a frontend URL no confirmation mail is sent.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        publisher: Arc<dyn NotificationPublisher>,
        frontend_url: Option<String>,
    ) -> Self {
        Self {
            users,
            hasher,
            publisher,
            frontend_url,
        }
    }

    async fn require(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn send_confirmation(&self, user: &User) {
        let Some(frontend_url) = self.frontend_url.as_deref() else {
            error!(user_id = %user.id(), "frontend URL not configured; registration notice skipped");
            return;
        };
        let notification =
            Notification::Registration(RegistrationNotification::new(user, frontend_url));
        match self.publisher.publish(&notification).await {
            Ok(()) => info!(user_id = %user.id(), "registration notice published"),
            Err(error) => warn!(user_id = %user.id(), %error, "registration notice not delivered"),
        }
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryService {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let RegisterUserRequest {
            email,
            firstname,
            lastname,
            age,
            password,
        } = request;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::conflict(format!("email {email} is already registered")));
        }
        let new_user = NewUser {
            email,
            firstname,
            lastname,
            age,
            credential: self.hasher.hash(&password)?,
            verified: false,
            verification_token: VerificationToken::generate(),
        };
        let user = self.users.insert(&new_user).await?;
        self.send_confirmation(&user).await;
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list().await?)
    }

    async fn find_one(&self, id: UserId) -> Result<User, Error> {
        self.require(id).await
    }

    async fn find_many_by_id(&self, ids: &[UserId]) -> Result<Vec<User>, Error> {
        Ok(self.users.find_many_by_id(ids).await?)
    }

    async fn find_by_email(&self, email: &Email, must_be_verified: bool) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::not_found(format!("no user registered as {email}")))?;
        if must_be_verified && !user.is_verified() {
            return Err(Error::forbidden("email address has not been confirmed"));
        }
        Ok(user)
    }

    async fn verify(&self, token: &VerificationToken) -> Result<User, Error> {
        let mut user = self
            .users
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| Error::not_found("unknown verification token"))?;
        if user.is_verified() {
            return Err(Error::forbidden("email address is already confirmed"));
        }
        user.mark_verified();
        self.users.save(&user).await?;
        Ok(user)
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, Error> {
        let mut user = self.require(id).await?;
        let UpdateUserRequest {
            firstname,
            lastname,
            age,
            password,
        } = request;
        let credential = password
            .as_ref()
            .map(|password| self.hasher.hash(password))
            .transpose()?;
        user.apply(UserChanges {
            firstname,
            lastname,
            age,
            credential,
        });
        self.users.save(&user).await?;
        Ok(user)
    }

    async fn delete(&self, acting: UserId, target: UserId) -> Result<User, Error> {
        if acting == target {
            return Err(Error::forbidden("users cannot delete their own account"));
        }
        let user = self.require(target).await?;
        if !self.users.delete(target).await? {
            return Err(Error::not_found(format!("user {target} not found")));
        }
        Ok(user)
    }

    async fn authenticate(&self, email: &Email, password: &Password) -> Result<User, Error> {
        let rejected = || Error::unauthorized("invalid credentials");
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(rejected());
        };
        if !self.hasher.verify(password, user.credential())? {
            return Err(rejected());
        }
        if !user.is_verified() {
            return Err(Error::forbidden("email address has not been confirmed"));
        }
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
