//! Row structs for the `users` table. Internal to the persistence adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    DisplayName, EmailAddress, PasswordHash, User, UserId, UserParts, UserRecord,
    UserValidationError,
};

use super::schema::users;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user = User::new(UserParts {
            id: UserId::from_uuid(row.id),
            email: EmailAddress::new(row.email)?,
            name: DisplayName::new(row.display_name)?,
            is_active: row.is_active,
            created_at: row.created_at,
        });
        Ok(UserRecord::new(user, PasswordHash::new(row.password_hash)?))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a UserRecord> for NewUserRow<'a> {
    fn from(record: &'a UserRecord) -> Self {
        let user = record.user();
        Self {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            display_name: user.name().as_ref(),
            password_hash: record.password_hash().expose(),
            is_active: user.is_active(),
            created_at: user.created_at(),
        }
    }
}
