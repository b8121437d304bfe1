//! Behaviour coverage for the user service against a stub repository.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rstest::rstest;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    EmailAddress, ErrorCode, FullName, NewUser, Page, User, UserChanges, UserId, UserService,
};

#[derive(Clone, Copy)]
enum StubFailure {
    Connection,
    Query,
    DuplicateEmail,
}

impl StubFailure {
    fn to_error(self, email: &str) -> UserPersistenceError {
        match self {
            Self::Connection => UserPersistenceError::connection("database unavailable"),
            Self::Query => UserPersistenceError::query("database query failed"),
            Self::DuplicateEmail => UserPersistenceError::duplicate_email(email),
        }
    }
}

#[derive(Default)]
struct StubState {
    rows: Vec<User>,
    next_failure: Option<StubFailure>,
}

/// In-memory repository honouring the port contract, including the unique
/// constraint on email.
#[derive(Default)]
struct StubUserRepository {
    state: Mutex<StubState>,
}

impl StubUserRepository {
    fn set_failure(&self, failure: StubFailure) {
        self.state.lock().expect("state lock").next_failure = Some(failure);
    }

    fn take_failure(&self, email: &str) -> Option<UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        state.next_failure.take().map(|f| f.to_error(email))
    }

    fn row_count(&self) -> usize {
        self.state.lock().expect("state lock").rows.len()
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn create(&self, candidate: &NewUser) -> Result<User, UserPersistenceError> {
        if let Some(error) = self.take_failure(candidate.email().as_ref()) {
            return Err(error);
        }
        let mut state = self.state.lock().expect("state lock");
        if state.rows.iter().any(|u| u.email() == candidate.email()) {
            return Err(UserPersistenceError::duplicate_email(
                candidate.email().as_ref(),
            ));
        }
        let now = Utc::now();
        let user = User::new(
            UserId::random(),
            candidate.email().clone(),
            candidate.full_name().cloned(),
            candidate.is_active(),
            now,
            now,
        );
        state.rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        if let Some(error) = self.take_failure("") {
            return Err(error);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state.rows.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        Ok(state.rows.iter().find(|u| u.email() == email).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state.lock().expect("state lock");
        // Rows are pushed in creation order, matching the adapter's ordering.
        Ok(state
            .rows
            .clone()
            .into_iter()
            .skip(usize::try_from(page.offset()).expect("validated offset"))
            .take(usize::try_from(page.limit()).expect("validated limit"))
            .collect())
    }

    async fn update(
        &self,
        existing: &User,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        if let Some(error) =
            self.take_failure(changes.email().map_or("", |email| email.as_ref()))
        {
            return Err(error);
        }
        let mut state = self.state.lock().expect("state lock");
        let updated = existing.with_changes(changes, Utc::now() + Duration::milliseconds(1));
        let slot = state
            .rows
            .iter_mut()
            .find(|u| u.id() == existing.id())
            .expect("updated user exists");
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, existing: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        state.rows.retain(|u| u.id() != existing.id());
        Ok(())
    }
}

fn service() -> (UserService<StubUserRepository>, Arc<StubUserRepository>) {
    let repository = Arc::new(StubUserRepository::default());
    (UserService::new(repository.clone()), repository)
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("valid email")
}

fn candidate(raw_email: &str, name: &str) -> NewUser {
    NewUser::new(
        email(raw_email),
        Some(FullName::new(name).expect("valid name")),
    )
}

fn missing_id() -> UserId {
    UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id")
}

#[tokio::test]
async fn created_user_round_trips_through_get() {
    let (service, _repo) = service();

    let created = service
        .create_user(candidate("a@b.com", "A"))
        .await
        .expect("create succeeds");

    let fetched = service.get_user(created.id()).await.expect("get succeeds");
    assert_eq!(fetched, created);
    assert_eq!(fetched.email().as_ref(), "a@b.com");
    assert_eq!(fetched.full_name().map(AsRef::as_ref), Some("A"));
    assert!(fetched.is_active());
    assert_eq!(fetched.created_at(), fetched.updated_at());
}

#[tokio::test]
async fn created_users_receive_distinct_identifiers() {
    let (service, _repo) = service();
    let first = service
        .create_user(candidate("one@example.com", "One"))
        .await
        .expect("create succeeds");
    let second = service
        .create_user(candidate("two@example.com", "Two"))
        .await
        .expect("create succeeds");
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn duplicate_email_create_conflicts_and_first_write_wins() {
    let (service, repo) = service();

    let first = service
        .create_user(candidate("x@y.com", "X"))
        .await
        .expect("first create succeeds");

    let err = service
        .create_user(candidate("x@y.com", "Y"))
        .await
        .expect_err("second create conflicts");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.message().contains("x@y.com"));
    assert_eq!(repo.row_count(), 1);

    let fetched = service.get_user(first.id()).await.expect("get succeeds");
    assert_eq!(fetched.full_name().map(AsRef::as_ref), Some("X"));
}

#[tokio::test]
async fn constraint_violation_racing_past_the_precheck_still_conflicts() {
    let (service, repo) = service();
    repo.set_failure(StubFailure::DuplicateEmail);

    let err = service
        .create_user(candidate("race@example.com", "Racer"))
        .await
        .expect_err("constraint violation maps to conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.message().contains("race@example.com"));
}

#[tokio::test]
async fn missing_identifier_is_always_not_found() {
    let (service, _repo) = service();
    let id = missing_id();

    let get_err = service.get_user(&id).await.expect_err("get fails");
    assert_eq!(get_err.code(), ErrorCode::NotFound);
    assert!(get_err.message().contains(&id.to_string()));

    let update_err = service
        .update_user(&id, UserChanges::none().with_active(false))
        .await
        .expect_err("update fails");
    assert_eq!(update_err.code(), ErrorCode::NotFound);

    let delete_err = service.delete_user(&id).await.expect_err("delete fails");
    assert_eq!(delete_err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_is_idempotent_under_repetition() {
    let (service, _repo) = service();
    let created = service
        .create_user(candidate("ada@example.com", "Ada"))
        .await
        .expect("create succeeds");

    let changes = UserChanges::none()
        .with_full_name(Some(FullName::new("Countess").expect("valid name")))
        .with_active(false);

    let once = service
        .update_user(created.id(), changes.clone())
        .await
        .expect("first update succeeds");
    let twice = service
        .update_user(created.id(), changes)
        .await
        .expect("second update succeeds");

    assert_eq!(once.full_name(), twice.full_name());
    assert_eq!(once.is_active(), twice.is_active());
    assert_eq!(once.email(), twice.email());
    assert!(twice.updated_at() >= once.updated_at());
    assert!(once.updated_at() >= created.created_at());
}

#[tokio::test]
async fn update_to_a_taken_email_conflicts() {
    let (service, _repo) = service();
    service
        .create_user(candidate("taken@example.com", "Holder"))
        .await
        .expect("create succeeds");
    let target = service
        .create_user(candidate("mover@example.com", "Mover"))
        .await
        .expect("create succeeds");

    let err = service
        .update_user(
            target.id(),
            UserChanges::none().with_email(email("taken@example.com")),
        )
        .await
        .expect_err("email collision conflicts");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.message().contains("taken@example.com"));
}

#[tokio::test]
async fn update_keeping_the_same_email_is_not_a_conflict() {
    let (service, _repo) = service();
    let created = service
        .create_user(candidate("same@example.com", "Same"))
        .await
        .expect("create succeeds");

    let updated = service
        .update_user(
            created.id(),
            UserChanges::none()
                .with_email(email("same@example.com"))
                .with_active(false),
        )
        .await
        .expect("no-op email change succeeds");
    assert!(!updated.is_active());
}

#[tokio::test]
async fn list_applies_the_window_in_creation_order() {
    let (service, _repo) = service();
    let mut created_ids = Vec::new();
    for index in 0..5 {
        let user = service
            .create_user(candidate(&format!("user{index}@example.com"), "User"))
            .await
            .expect("create succeeds");
        created_ids.push(*user.id());
    }

    let first_two = service
        .list_users(Page::new(0, 2).expect("valid window"))
        .await
        .expect("list succeeds");
    assert_eq!(first_two.len(), 2);

    let skipped = service
        .list_users(Page::new(3, 10).expect("valid window"))
        .await
        .expect("list succeeds");
    assert_eq!(skipped.len(), 2);

    let all = service
        .list_users(Page::default())
        .await
        .expect("list succeeds");
    assert_eq!(
        all.iter().map(|u| *u.id()).collect::<Vec<_>>(),
        created_ids,
        "stable creation order"
    );
}

#[tokio::test]
async fn deleted_user_is_gone_on_subsequent_get() {
    let (service, repo) = service();
    let created = service
        .create_user(candidate("gone@example.com", "Gone"))
        .await
        .expect("create succeeds");

    service
        .delete_user(created.id())
        .await
        .expect("delete succeeds");
    assert_eq!(repo.row_count(), 0);

    let err = service
        .get_user(created.id())
        .await
        .expect_err("get after delete fails");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(StubFailure::Connection, ErrorCode::ServiceUnavailable)]
#[case(StubFailure::Query, ErrorCode::InternalError)]
#[tokio::test]
async fn persistence_failures_map_to_transport_agnostic_codes(
    #[case] failure: StubFailure,
    #[case] expected_code: ErrorCode,
) {
    let (service, repo) = service();
    repo.set_failure(failure);

    let err = service
        .get_user(&missing_id())
        .await
        .expect_err("repository failure propagates");
    assert_eq!(err.code(), expected_code);
}
