use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User entity - the document stored in MongoDB
///
/// `password` always holds an Argon2 PHC string. This type is never returned
/// to clients; see [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier, stored as `_id` in BSON binary subtype 4
    #[serde(rename = "_id", with = "bson::serde_helpers::uuid_1_as_binary")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned by the API (no password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub skills: Vec<String>,
    pub dob: Option<NaiveDate>,
    pub profile_image: Option<String>,
    pub social_media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            gender: user.gender,
            city: user.city,
            skills: user.skills,
            dob: user.dob,
            profile_image: user.profile_image,
            social_media_url: user.social_media_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: Option<String>,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Date of birth: `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept
    #[serde(default, deserialize_with = "date_input::optional")]
    #[schema(value_type = Option<String>, example = "1994-02-11")]
    pub dob: Option<NaiveDate>,
    pub profile_image: Option<String>,
    /// Plaintext password, hashed before it is stored
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub social_media_url: Option<String>,
}

/// DTO for updating an existing user
///
/// Only the fields listed here can change. Anything else in the request body,
/// `_id` included, is ignored. For the optional profile fields an absent key
/// keeps the stored value and an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub name: Option<Option<String>>,
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub mobile: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub city: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; `null` clears it
    #[serde(default, deserialize_with = "date_input::nullable")]
    #[schema(value_type = Option<String>, nullable, example = "1994-02-11")]
    pub dob: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub profile_image: Option<Option<String>>,
    /// New plaintext password, hashed before it is stored
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub social_media_url: Option<Option<String>>,
}

/// Present key (value or `null`) becomes `Some`; `#[serde(default)]` covers absence.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Lenient date parsing for request bodies
mod date_input {
    use super::*;

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub(super) fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                de::Error::custom(format!(
                    "invalid date '{raw}', expected YYYY-MM-DD or an RFC 3339 timestamp"
                ))
            }),
        }
    }

    pub(super) fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        optional(deserializer).map(Some)
    }
}

/// Body of `POST /filter`: field name to substring
///
/// Each non-empty value must appear (case-insensitively) in the matching
/// field. Empty or missing values do not filter.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub skills: Option<String>,
    pub profile_image: Option<String>,
    pub social_media_url: Option<String>,
}

/// A page of users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub page: i64,
    pub limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_users: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    pub users: Vec<UserResponse>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl User {
    /// Create a new user from CreateUser DTO and an already hashed password
    pub fn new(input: CreateUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            mobile: input.mobile,
            gender: input.gender,
            city: input.city,
            skills: input.skills,
            dob: input.dob,
            profile_image: input.profile_image,
            password: password_hash,
            social_media_url: input.social_media_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateUser DTO
    ///
    /// `Some(None)` on a profile field clears it. `password_hash` replaces the stored hash when present; the plaintext in
    /// `update.password` is never copied.
    pub fn apply_update(&mut self, update: UpdateUser, password_hash: Option<String>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(mobile) = update.mobile {
            self.mobile = mobile;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(dob) = update.dob {
            self.dob = dob;
        }
        if let Some(profile_image) = update.profile_image {
            self.profile_image = profile_image;
        }
        if let Some(hash) = password_hash {
            self.password = hash;
        }
        if let Some(url) = update.social_media_url {
            self.social_media_url = url;
        }
        self.updated_at = Utc::now();
    }
}
