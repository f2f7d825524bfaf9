//! Query builder: client filters and search terms to store predicates
//!
//! Every term is a case-insensitive substring match. Terms are escaped before
//! they reach MongoDB, so `.` or `(` in user input match literally.

use mongodb::bson::{Document, doc};

use crate::models::{User, UserFilter};

/// Text fields a predicate can address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
    Mobile,
    Gender,
    City,
    Skills,
    SocialMediaUrl,
    ProfileImage,
}

impl UserField {
    /// Fields covered by free-text search
    pub const SEARCHABLE: [UserField; 7] = [
        UserField::Name,
        UserField::Email,
        UserField::Mobile,
        UserField::Gender,
        UserField::City,
        UserField::Skills,
        UserField::SocialMediaUrl,
    ];

    /// Field name in the stored document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Mobile => "mobile",
            Self::Gender => "gender",
            Self::City => "city",
            Self::Skills => "skills",
            Self::SocialMediaUrl => "socialMediaUrl",
            Self::ProfileImage => "profileImage",
        }
    }

    fn values<'a>(&self, user: &'a User) -> Vec<&'a str> {
        match self {
            Self::Name => user.name.as_deref().into_iter().collect(),
            Self::Email => vec![user.email.as_str()],
            Self::Mobile => user.mobile.as_deref().into_iter().collect(),
            Self::Gender => user.gender.as_deref().into_iter().collect(),
            Self::City => user.city.as_deref().into_iter().collect(),
            Self::Skills => user.skills.iter().map(String::as_str).collect(),
            Self::SocialMediaUrl => user.social_media_url.as_deref().into_iter().collect(),
            Self::ProfileImage => user.profile_image.as_deref().into_iter().collect(),
        }
    }
}

/// Case-insensitive "field contains term"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    pub field: UserField,
    pub term: String,
}

impl Contains {
    pub fn new(field: UserField, term: impl Into<String>) -> Self {
        Self {
            field,
            term: term.into(),
        }
    }

    /// `{ <field>: { "$regex": <escaped term>, "$options": "i" } }`
    fn clause(&self) -> Document {
        let mut clause = Document::new();
        clause.insert(
            self.field.as_str(),
            doc! { "$regex": regex::escape(&self.term), "$options": "i" },
        );
        clause
    }

    fn matches(&self, user: &User) -> bool {
        let needle = self.term.to_lowercase();
        self.field
            .values(user)
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Store-agnostic predicate over users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// Matches every user
    All,
    /// Matches when any condition holds
    Any(Vec<Contains>),
    /// Matches when every condition holds
    Every(Vec<Contains>),
}

impl UserQuery {
    /// Free-text search across [`UserField::SEARCHABLE`]
    ///
    /// An empty term matches everything.
    pub fn search(term: &str) -> Self {
        if term.is_empty() {
            return Self::All;
        }

        Self::Any(
            UserField::SEARCHABLE
                .iter()
                .map(|field| Contains::new(*field, term))
                .collect(),
        )
    }

    /// Per-field filter; empty values are skipped
    pub fn filter(filter: &UserFilter) -> Self {
        let candidates = [
            (UserField::Name, &filter.name),
            (UserField::Email, &filter.email),
            (UserField::Mobile, &filter.mobile),
            (UserField::Gender, &filter.gender),
            (UserField::City, &filter.city),
            (UserField::Skills, &filter.skills),
            (UserField::ProfileImage, &filter.profile_image),
            (UserField::SocialMediaUrl, &filter.social_media_url),
        ];

        let conditions: Vec<Contains> = candidates
            .into_iter()
            .filter_map(|(field, value)| match value.as_deref() {
                Some(term) if !term.is_empty() => Some(Contains::new(field, term)),
                _ => None,
            })
            .collect();

        if conditions.is_empty() {
            Self::All
        } else {
            Self::Every(conditions)
        }
    }

    /// Build the MongoDB filter document
    pub fn to_document(&self) -> Document {
        match self {
            Self::All => doc! {},
            Self::Any(conditions) => {
                let clauses: Vec<Document> = conditions.iter().map(Contains::clause).collect();
                doc! { "$or": clauses }
            }
            Self::Every(conditions) => {
                let mut doc = Document::new();
                for c in conditions {
                    doc.extend(c.clause());
                }
                doc
            }
        }
    }

    /// Evaluate the predicate in memory, with the same semantics as the store
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Any(conditions) => conditions.iter().any(|c| c.matches(user)),
            Self::Every(conditions) => conditions.iter().all(|c| c.matches(user)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use mongodb::bson::Bson;

    fn user(name: &str, city: Option<&str>, skills: &[&str]) -> User {
        let input = CreateUser {
            name: Some(name.to_string()),
            email: format!("{}@example.com", name.to_lowercase()),
            mobile: None,
            gender: None,
            city: city.map(str::to_string),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            dob: None,
            profile_image: None,
            password: "x".to_string(),
            social_media_url: None,
        };
        User::new(input, "hash".to_string())
    }

    #[test]
    fn test_empty_search_matches_all() {
        assert_eq!(UserQuery::search(""), UserQuery::All);
        assert!(UserQuery::search("").to_document().is_empty());
    }

    #[test]
    fn test_search_covers_seven_fields() {
        let doc = UserQuery::search("john").to_document();
        let clauses = doc.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 7);

        let fields: Vec<String> = clauses
            .iter()
            .filter_map(Bson::as_document)
            .flat_map(|d| d.keys().cloned().collect::<Vec<_>>())
            .collect();
        assert!(fields.contains(&"socialMediaUrl".to_string()));
        assert!(!fields.contains(&"profileImage".to_string()));
        assert!(!fields.contains(&"password".to_string()));
    }

    #[test]
    fn test_search_term_is_escaped() {
        let doc = UserQuery::search("a.b(").to_document();
        let first = doc.get_array("$or").unwrap()[0].as_document().unwrap();
        let condition = first.get_document("name").unwrap();
        assert_eq!(condition.get_str("$regex").unwrap(), r"a\.b\(");
        assert_eq!(condition.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_filter_skips_empty_values() {
        let filter = UserFilter {
            city: Some("pune".to_string()),
            name: Some(String::new()),
            ..Default::default()
        };
        let doc = UserQuery::filter(&filter).to_document();
        assert_eq!(doc.len(), 1);
        assert!(doc.contains_key("city"));
    }

    #[test]
    fn test_filter_without_values_matches_all() {
        assert_eq!(UserQuery::filter(&UserFilter::default()), UserQuery::All);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = UserFilter {
            city: Some("PUNE".to_string()),
            ..Default::default()
        };
        let query = UserQuery::filter(&filter);
        assert!(query.matches(&user("Asha", Some("Pune"), &[])));
        assert!(query.matches(&user("Ravi", Some("pune camp"), &[])));
        assert!(!query.matches(&user("Mina", Some("Mumbai"), &[])));
        assert!(!query.matches(&user("Omar", None, &[])));
    }

    #[test]
    fn test_filter_requires_every_field() {
        let filter = UserFilter {
            city: Some("pune".to_string()),
            name: Some("ash".to_string()),
            ..Default::default()
        };
        let query = UserQuery::filter(&filter);
        assert!(query.matches(&user("Asha", Some("Pune"), &[])));
        assert!(!query.matches(&user("Ravi", Some("Pune"), &[])));
    }

    #[test]
    fn test_search_matches_array_elements() {
        let query = UserQuery::search("RUST");
        assert!(query.matches(&user("Asha", None, &["go", "rust"])));
        assert!(!query.matches(&user("Ravi", None, &["go"])));
    }

    #[test]
    fn test_escaped_metacharacters_match_literally() {
        let query = UserQuery::search("c++");
        assert!(query.matches(&user("Asha", None, &["C++"])));
        assert!(!query.matches(&user("Ravi", None, &["c"])));
    }
}
