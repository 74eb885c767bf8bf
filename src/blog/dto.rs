use serde::{Deserialize, Serialize};

use crate::blog::repo::{Blog, BlogChanges};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    pub blogs: Vec<Blog>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub blog: Blog,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

const MAX_TITLE: usize = 200;
const MAX_EXCERPT: usize = 500;

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("please provide a blog title".into()));
    }
    if title.chars().count() > MAX_TITLE {
        return Err(ApiError::Validation(
            "title must be at most 200 characters".into(),
        ));
    }
    Ok(())
}

fn check_excerpt(excerpt: &str) -> Result<(), ApiError> {
    if excerpt.chars().count() > MAX_EXCERPT {
        return Err(ApiError::Validation(
            "excerpt must be at most 500 characters".into(),
        ));
    }
    Ok(())
}

impl CreateBlogRequest {
    /// Validate the payload, yielding the required fields.
    pub fn validate(&self) -> Result<(&str, &str), ApiError> {
        let title = self
            .title
            .as_deref()
            .ok_or_else(|| ApiError::Validation("please provide a blog title".into()))?;
        check_title(title)?;
        let content = self
            .content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("please provide blog content".into()))?;
        if let Some(excerpt) = self.excerpt.as_deref() {
            check_excerpt(excerpt)?;
        }
        Ok((title, content))
    }
}

impl UpdateBlogRequest {
    /// Validate present fields and convert into a repo patch.
    pub fn into_changes(self) -> Result<BlogChanges, ApiError> {
        if let Some(title) = self.title.as_deref() {
            check_title(title)?;
        }
        if let Some(content) = self.content.as_deref() {
            if content.trim().is_empty() {
                return Err(ApiError::Validation("please provide blog content".into()));
            }
        }
        if let Some(excerpt) = self.excerpt.as_deref() {
            check_excerpt(excerpt)?;
        }
        Ok(BlogChanges {
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            image: self.image,
            tags: self.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(title: Option<&str>, content: Option<&str>) -> CreateBlogRequest {
        CreateBlogRequest {
            title: title.map(String::from),
            content: content.map(String::from),
            excerpt: None,
            image: None,
            tags: vec![],
        }
    }

    #[test]
    fn create_requires_title_and_content() {
        assert!(create_req(None, Some("body")).validate().is_err());
        assert!(create_req(Some("t"), None).validate().is_err());
        assert!(create_req(Some("   "), Some("body")).validate().is_err());
        assert!(create_req(Some("hello"), Some("body")).validate().is_ok());
    }

    #[test]
    fn create_enforces_length_limits() {
        let long_title = "x".repeat(201);
        assert!(create_req(Some(&long_title), Some("body")).validate().is_err());

        let mut req = create_req(Some("ok"), Some("body"));
        req.excerpt = Some("y".repeat(501));
        assert!(req.validate().is_err());
        req.excerpt = Some("y".repeat(500));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let empty = UpdateBlogRequest {
            title: None,
            content: None,
            excerpt: None,
            image: None,
            tags: None,
        };
        assert!(empty.into_changes().is_ok());

        let bad_title = UpdateBlogRequest {
            title: Some("x".repeat(201)),
            content: None,
            excerpt: None,
            image: None,
            tags: None,
        };
        assert!(bad_title.into_changes().is_err());

        let ok = UpdateBlogRequest {
            title: Some("new title".into()),
            content: None,
            excerpt: None,
            image: None,
            tags: Some(vec!["rust".into()]),
        };
        let changes = ok.into_changes().unwrap();
        assert_eq!(changes.title.as_deref(), Some("new title"));
        assert!(changes.content.is_none());
        assert_eq!(changes.tags.as_deref(), Some(&["rust".to_string()][..]));
    }
}
