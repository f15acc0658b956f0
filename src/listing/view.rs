use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::schema::Post;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [Self::Newest, Self::Oldest, Self::TitleAsc, Self::TitleDesc];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::TitleAsc => "Title (A-Z)",
            Self::TitleDesc => "Title (Z-A)",
        }
    }

    fn compare(self, a: &Post, b: &Post) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Oldest => a.created_at.cmp(&b.created_at),
            Self::TitleAsc => collate(&a.title, &b.title),
            Self::TitleDesc => collate(&b.title, &a.title),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newest => f.write_str("newest"),
            Self::Oldest => f.write_str("oldest"),
            Self::TitleAsc => f.write_str("titleAsc"),
            Self::TitleDesc => f.write_str("titleDesc"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} sort key")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "titleasc" => Ok(Self::TitleAsc),
            "titledesc" => Ok(Self::TitleDesc),
            _ => Err(ParseSortKeyError(s.to_string())),
        }
    }
}

/// Whether a post matches a free-text search term.
///
/// The term matches if it is empty or appears case-insensitively in the
/// title, content or author name of the post.
#[must_use]
pub fn matches_search(post: &Post, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let term = term.to_lowercase();
    [&post.title, &post.content, &post.author.name]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Filters and sorts the accumulated posts.
///
/// The sort is stable: posts that compare equal keep their relative
/// order from `posts`.
#[must_use]
pub fn derive<'a>(posts: &'a [Post], search_term: &str, sort_key: SortKey) -> Vec<&'a Post> {
    let mut derived = posts
        .iter()
        .filter(|post| matches_search(post, search_term))
        .collect::<Vec<_>>();

    derived.sort_by(|a, b| sort_key.compare(a, b));
    derived
}

// Base letters first, then accents, then case (lowercase first).
fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PostAuthor;
    use crate::types::{PostId, Timestamp, UserId};

    fn post(id: &str, title: &str, day: u32) -> Post {
        Post {
            id: PostId::new(id),
            title: title.into(),
            content: format!("Thoughts about {}", title.to_lowercase()),
            author: PostAuthor {
                id: UserId::new("user1"),
                name: "Eddie Tor".into(),
            },
            created_at: Timestamp::from_ymd(2024, 7, day).unwrap(),
            image_url: None,
        }
    }

    fn titles(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.title.clone()).collect()
    }

    fn sample() -> Vec<Post> {
        let mut jane = post("5", "Rust ownership", 4);
        jane.author.name = "Jane Doe".into();

        vec![
            post("1", "beta testing", 3),
            post("2", "Alpha release", 1),
            post("3", "Gamma rays", 5),
            post("4", "alpha particles", 2),
            jane,
            post("6", "Same Day A", 6),
            post("7", "Same Day B", 6),
        ]
    }

    #[test]
    fn alpha_beta_example() {
        let posts = vec![post("1", "Alpha", 1), post("2", "Beta", 2)];
        assert_eq!(titles(&derive(&posts, "", SortKey::Newest)), ["Beta", "Alpha"]);
        assert_eq!(titles(&derive(&posts, "", SortKey::TitleAsc)), ["Alpha", "Beta"]);
        assert_eq!(titles(&derive(&posts, "", SortKey::TitleDesc)), ["Beta", "Alpha"]);
        assert_eq!(titles(&derive(&posts, "", SortKey::Oldest)), ["Alpha", "Beta"]);
    }

    #[test]
    fn empty_term_keeps_everything() {
        let posts = sample();
        for key in SortKey::ALL {
            assert_eq!(derive(&posts, "", key).len(), posts.len());
        }
    }

    #[test]
    fn filter_matches_title_content_or_author() {
        let posts = sample();

        // title, any case
        assert_eq!(titles(&derive(&posts, "GAMMA", SortKey::Newest)), ["Gamma rays"]);
        // content only
        assert_eq!(
            titles(&derive(&posts, "thoughts about beta", SortKey::Newest)),
            ["beta testing"]
        );
        // author name
        assert_eq!(
            titles(&derive(&posts, "jane", SortKey::Newest)),
            ["Rust ownership"]
        );
        assert!(derive(&posts, "nothing like this", SortKey::Newest).is_empty());
    }

    #[test]
    fn filtered_output_only_holds_matching_posts() {
        let posts = sample();
        let terms = ["a", "ALPHA", "day", "e", "eddie", "rays", "xyz", " "];

        for term in terms {
            for key in SortKey::ALL {
                let derived = derive(&posts, term, key);
                let expected = posts.iter().filter(|p| matches_search(p, term)).count();
                assert_eq!(derived.len(), expected, "term {term:?} with {key}");

                let lowered = term.to_lowercase();
                for post in derived {
                    assert!(
                        post.title.to_lowercase().contains(&lowered)
                            || post.content.to_lowercase().contains(&lowered)
                            || post.author.name.to_lowercase().contains(&lowered)
                    );
                }
            }
        }
    }

    #[test]
    fn output_is_a_sorted_permutation() {
        let posts = sample();
        for key in SortKey::ALL {
            let derived = derive(&posts, "", key);

            let mut ids = derived.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
            ids.sort();
            let mut expected = posts.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
            expected.sort();
            assert_eq!(ids, expected);

            for pair in derived.windows(2) {
                assert_ne!(key.compare(pair[0], pair[1]), Ordering::Greater, "{key}");
            }
        }
    }

    #[test]
    fn sort_orders() {
        let posts = sample();
        assert_eq!(
            titles(&derive(&posts, "", SortKey::Newest)),
            [
                "Same Day A",
                "Same Day B",
                "Gamma rays",
                "Rust ownership",
                "beta testing",
                "alpha particles",
                "Alpha release",
            ]
        );
        assert_eq!(
            titles(&derive(&posts, "", SortKey::TitleAsc)),
            [
                "alpha particles",
                "Alpha release",
                "beta testing",
                "Gamma rays",
                "Rust ownership",
                "Same Day A",
                "Same Day B",
            ]
        );
        assert_eq!(
            titles(&derive(&posts, "", SortKey::TitleDesc)),
            [
                "Same Day B",
                "Same Day A",
                "Rust ownership",
                "Gamma rays",
                "beta testing",
                "Alpha release",
                "alpha particles",
            ]
        );
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        let posts = vec![
            post("1", "Zebra", 1),
            post("2", "Émile", 2),
            post("3", "apple", 3),
        ];
        assert_eq!(
            titles(&derive(&posts, "", SortKey::TitleAsc)),
            ["apple", "Émile", "Zebra"]
        );
        assert_eq!(
            titles(&derive(&posts, "", SortKey::TitleDesc)),
            ["Zebra", "Émile", "apple"]
        );

        // accents outrank case, both only break ties
        let posts = vec![
            post("1", "éclair", 1),
            post("2", "Eclair", 2),
            post("3", "eclair", 3),
        ];
        assert_eq!(
            titles(&derive(&posts, "", SortKey::TitleAsc)),
            ["eclair", "Eclair", "éclair"]
        );
    }

    #[test]
    fn equal_keys_keep_their_relative_order() {
        let posts = sample();

        // "Same Day A" and "Same Day B" share a creation time
        let oldest = titles(&derive(&posts, "same day", SortKey::Oldest));
        assert_eq!(oldest, ["Same Day A", "Same Day B"]);

        let mut reversed = posts.clone();
        reversed.reverse();
        let oldest = titles(&derive(&reversed, "same day", SortKey::Oldest));
        assert_eq!(oldest, ["Same Day B", "Same Day A"]);
    }

    #[test]
    fn lowercase_sorts_before_uppercase_on_equal_titles() {
        let posts = vec![post("1", "Alpha", 1), post("2", "alpha", 1)];
        assert_eq!(titles(&derive(&posts, "", SortKey::TitleAsc)), ["alpha", "Alpha"]);
    }

    #[test]
    fn derive_is_deterministic() {
        let posts = sample();
        for key in SortKey::ALL {
            for term in ["", "a", "same"] {
                assert_eq!(derive(&posts, term, key), derive(&posts, term, key));
            }
        }
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("title-asc".parse::<SortKey>().unwrap(), SortKey::TitleAsc);
        assert_eq!("titleDesc".parse::<SortKey>().unwrap(), SortKey::TitleDesc);
        assert_eq!("OLDEST".parse::<SortKey>().unwrap(), SortKey::Oldest);
        assert!("random".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_key_serde_impl() {
        use serde_test::Token;
        serde_test::assert_tokens(
            &SortKey::TitleAsc,
            &[Token::UnitVariant {
                name: "SortKey",
                variant: "titleAsc",
            }],
        );
    }
}
