//! Slug, pseudo and password generators.

use rand::Rng;
use rand::distr::Alphanumeric;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Prefix of the handles assigned at registration.
pub const PSEUDO_PREFIX: &str = "verrou";
/// Length of the random part of a pseudo.
pub const PSEUDO_SUFFIX_LEN: usize = 6;
/// Length of the passwords generated for admin-created accounts.
pub const GENERATED_PASSWORD_LEN: usize = 8;

const PSEUDO_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Turn arbitrary text into a URL slug.
///
/// Accents are stripped through NFD decomposition, the result is
/// lowercased and trimmed, everything outside `[a-z0-9]`, whitespace and
/// `-` is dropped, and runs of whitespace/hyphens become a single `-`.
/// Separators left at the ends by dropped punctuation are kept.
pub fn create_slug(text: &str) -> String {
    let lowered = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut in_separator = false;
    for c in lowered.trim().chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_separator = false;
        }
    }
    slug
}

/// Candidate slugs for uniqueness probing: `base`, `base-1`, `base-2`, ...
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1u32..).map(move |n| format!("{base}-{n}")))
}

/// Generate a registration handle: `verrou_` plus six `[a-z0-9]` characters.
pub fn generate_pseudo() -> String {
    generate_custom_pseudo(PSEUDO_PREFIX, PSEUDO_SUFFIX_LEN)
}

/// Generate `<prefix>_<length random [a-z0-9]>`.
pub fn generate_custom_pseudo(prefix: &str, length: usize) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..length)
        .map(|_| PSEUDO_CHARSET[rng.random_range(0..PSEUDO_CHARSET.len())] as char)
        .collect();
    format!("{prefix}_{suffix}")
}

/// Generate a random alphanumeric password.
pub fn generate_password(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_accents_and_spaces() {
        assert_eq!(create_slug("Développement Web"), "developpement-web");
        assert_eq!(create_slug("Cybersécurité"), "cybersecurite");
        assert_eq!(create_slug("  Intelligence   Artificielle "), "intelligence-artificielle");
    }

    #[test]
    fn slug_drops_punctuation_and_collapses_hyphens() {
        assert_eq!(create_slug("a -- b"), "a-b");
        assert_eq!(create_slug("Top 10 des vélos!"), "top-10-des-velos");
        assert_eq!(create_slug("!!!"), "");
    }

    #[test]
    fn slug_keeps_separators_left_by_punctuation() {
        assert_eq!(create_slug("Hello -"), "hello-");
        assert_eq!(create_slug("- Bonjour"), "-bonjour");
        assert_eq!(
            create_slug("TypeScript vs JavaScript : Quel choisir ?"),
            "typescript-vs-javascript-quel-choisir-"
        );
    }

    #[test]
    fn slug_candidates_append_counters() {
        let first: Vec<String> = slug_candidates("mon-post").take(3).collect();
        assert_eq!(first, vec!["mon-post", "mon-post-1", "mon-post-2"]);
    }

    #[test]
    fn pseudo_has_expected_shape() {
        let pseudo = generate_pseudo();
        assert!(pseudo.starts_with("verrou_"));
        let suffix = &pseudo["verrou_".len()..];
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn custom_pseudo_respects_prefix_and_length() {
        let pseudo = generate_custom_pseudo("user", 10);
        assert!(pseudo.starts_with("user_"));
        assert_eq!(pseudo.len(), 15);
        assert!(pseudo[5..].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn generated_password_is_alphanumeric() {
        let password = generate_password(GENERATED_PASSWORD_LEN);
        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
