use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewBlog<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub excerpt: Option<&'a str>,
    pub image: Option<&'a str>,
    pub tags: &'a [String],
    pub author_id: Uuid,
    pub author_name: &'a str,
}

/// Patch applied to an owned post; `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
}

const BLOG_COLUMNS: &str =
    "id, title, content, excerpt, image, tags, author_id, author_name, created_at, updated_at";

impl Blog {
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Blog>> {
        sqlx::query_as::<_, Blog>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_by_author(db: &PgPool, author_id: Uuid) -> sqlx::Result<Vec<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE author_id = $1 ORDER BY created_at DESC"
        ))
        .bind(author_id)
        .fetch_all(db)
        .await
    }

    pub async fn create(db: &PgPool, new: NewBlog<'_>) -> sqlx::Result<Blog> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            INSERT INTO blogs (title, content, excerpt, image, tags, author_id, author_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(new.title)
        .bind(new.content)
        .bind(new.excerpt)
        .bind(new.image)
        .bind(new.tags)
        .bind(new.author_id)
        .bind(new.author_name)
        .fetch_one(db)
        .await
    }

    /// Atomic find-and-modify: the filter carries both the id and the
    /// owner, so "absent" and "owned by someone else" are one outcome
    /// (`None`) and there is no check-then-act window.
    pub async fn update_owned(
        db: &PgPool,
        id: Uuid,
        author_id: Uuid,
        changes: &BlogChanges,
    ) -> sqlx::Result<Option<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                excerpt = COALESCE($5, excerpt),
                image = COALESCE($6, image),
                tags = COALESCE($7, tags),
                updated_at = now()
            WHERE id = $1 AND author_id = $2
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(author_id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.excerpt.as_deref())
        .bind(changes.image.as_deref())
        .bind(changes.tags.as_deref())
        .fetch_optional(db)
        .await
    }

    /// Atomic find-and-delete with the same combined filter.
    pub async fn delete_owned(db: &PgPool, id: Uuid, author_id: Uuid) -> sqlx::Result<bool> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM blogs WHERE id = $1 AND author_id = $2 RETURNING id",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(db)
        .await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;

    async fn seed_user(pool: &PgPool, name: &str, email: &str) -> User {
        User::create(pool, name, email, "hash")
            .await
            .expect("seed user")
    }

    async fn seed_post(pool: &PgPool, author: &User) -> Blog {
        Blog::create(
            pool,
            NewBlog {
                title: "first post",
                content: "hello",
                excerpt: None,
                image: None,
                tags: &["rust".to_string()],
                author_id: author.id,
                author_name: &author.name,
            },
        )
        .await
        .expect("seed post")
    }

    #[sqlx::test]
    async fn update_owned_denies_non_owners_without_touching_the_row(pool: PgPool) {
        let owner = seed_user(&pool, "Alice", "alice@example.com").await;
        let other = seed_user(&pool, "Bob", "bob@example.com").await;
        let post = seed_post(&pool, &owner).await;

        let changes = BlogChanges {
            title: Some("hijacked".into()),
            ..Default::default()
        };
        let denied = Blog::update_owned(&pool, post.id, other.id, &changes)
            .await
            .expect("query runs");
        assert!(denied.is_none());

        let stored = Blog::find_by_id(&pool, post.id)
            .await
            .expect("fetch")
            .expect("still present");
        assert_eq!(stored.title, "first post");

        let updated = Blog::update_owned(&pool, post.id, owner.id, &changes)
            .await
            .expect("query runs")
            .expect("owner may update");
        assert_eq!(updated.title, "hijacked");
        assert_eq!(updated.content, "hello");
        assert_eq!(updated.author_id, owner.id);
    }

    #[sqlx::test]
    async fn update_owned_collapses_absent_and_foreign_into_one_outcome(pool: PgPool) {
        let owner = seed_user(&pool, "Alice", "alice@example.com").await;
        let other = seed_user(&pool, "Bob", "bob@example.com").await;
        let post = seed_post(&pool, &owner).await;

        let changes = BlogChanges {
            title: Some("x".into()),
            ..Default::default()
        };
        let absent = Blog::update_owned(&pool, Uuid::new_v4(), owner.id, &changes)
            .await
            .expect("query runs");
        let foreign = Blog::update_owned(&pool, post.id, other.id, &changes)
            .await
            .expect("query runs");
        assert!(absent.is_none());
        assert!(foreign.is_none());
    }

    #[sqlx::test]
    async fn update_owned_keeps_fields_not_in_the_patch(pool: PgPool) {
        let owner = seed_user(&pool, "Alice", "alice@example.com").await;
        let post = seed_post(&pool, &owner).await;

        let changes = BlogChanges {
            excerpt: Some("a teaser".into()),
            ..Default::default()
        };
        let updated = Blog::update_owned(&pool, post.id, owner.id, &changes)
            .await
            .expect("query runs")
            .expect("owner may update");
        assert_eq!(updated.title, "first post");
        assert_eq!(updated.excerpt.as_deref(), Some("a teaser"));
        assert_eq!(updated.tags, vec!["rust".to_string()]);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[sqlx::test]
    async fn delete_owned_denies_non_owners_and_removes_for_the_owner(pool: PgPool) {
        let owner = seed_user(&pool, "Alice", "alice@example.com").await;
        let other = seed_user(&pool, "Bob", "bob@example.com").await;
        let post = seed_post(&pool, &owner).await;

        assert!(!Blog::delete_owned(&pool, post.id, other.id)
            .await
            .expect("query runs"));
        assert!(Blog::find_by_id(&pool, post.id)
            .await
            .expect("fetch")
            .is_some());

        assert!(Blog::delete_owned(&pool, post.id, owner.id)
            .await
            .expect("query runs"));
        assert!(Blog::find_by_id(&pool, post.id)
            .await
            .expect("fetch")
            .is_none());

        // A repeat delete is the same miss as a never-existing id
        assert!(!Blog::delete_owned(&pool, post.id, owner.id)
            .await
            .expect("query runs"));
    }
}
