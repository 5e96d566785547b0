//! Unique slug allocation.

use std::future::Future;

use verrou_core::error::AppError;
use verrou_core::text::{create_slug, slug_candidates};

/// Slugify `text` and return the first of `slug`, `slug-1`, `slug-2`, ...
/// for which `exists` answers false.
pub async fn unique_slug<F, Fut>(text: &str, mut exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    let base = create_slug(text);
    if !base.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::validation(
            "The name must contain at least one letter or digit",
        ));
    }

    for candidate in slug_candidates(&base) {
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::internal("No free slug found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use verrou_core::error::ErrorKind;

    #[tokio::test]
    async fn first_free_candidate_wins() {
        let taken: HashSet<String> = ["mon-velo", "mon-velo-1"]
            .into_iter()
            .map(String::from)
            .collect();
        let slug = unique_slug("Mon Vélo", |s| {
            let hit = taken.contains(&s);
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "mon-velo-2");
    }

    #[tokio::test]
    async fn free_base_is_kept() {
        let slug = unique_slug("Astuces", |_| async { Ok(false) }).await.unwrap();
        assert_eq!(slug, "astuces");
    }

    #[tokio::test]
    async fn unsluggable_text_is_rejected() {
        let err = unique_slug("?!", |_| async { Ok(false) }).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = unique_slug("? !", |_| async { Ok(false) }).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn lookup_errors_propagate() {
        let err = unique_slug("post", |_| async { Err(AppError::database("down")) })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
