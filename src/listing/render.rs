//! Plain text rendering of list frames and single posts.
use std::io::{self, Write};

use super::list::{Frame, ListView};
use crate::schema::Post;

/// Roughly three terminal lines worth of content.
pub const EXCERPT_CHARS: usize = 180;

pub fn write_frame(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    match frame {
        Frame::Skeleton { placeholders } => {
            writeln!(out, "Loading posts...")?;
            for _ in 0..*placeholders {
                writeln!(out, "  [ ░░░░░░░░░░░░░░░░░░░░ ]")?;
            }
            Ok(())
        }
        Frame::Listing(view) => write_listing(out, view),
    }
}

fn write_listing(out: &mut impl Write, view: &ListView) -> io::Result<()> {
    write!(out, "Sort: {}", view.sort.label())?;
    if !view.search_term.is_empty() {
        write!(out, " | Search: {:?}", view.search_term)?;
    }
    writeln!(out)?;
    writeln!(out)?;

    if let Some(reason) = view.empty {
        writeln!(out, "No Posts Found")?;
        writeln!(out, "{}", reason.message())?;
    }

    for (index, post) in view.posts.iter().enumerate() {
        write_card(out, index + 1, post)?;
    }

    if let Some(error) = &view.error {
        writeln!(out, "! {error}")?;
    }

    if view.loading {
        writeln!(out, "Loading more posts...")?;
    } else if view.show_load_more {
        writeln!(out, "-- type `more` to load more posts --")?;
    }
    Ok(())
}

fn write_card(out: &mut impl Write, number: usize, post: &Post) -> io::Result<()> {
    writeln!(out, "[{number}] {}", post.title)?;
    writeln!(
        out,
        "    by {} on {}",
        post.author.name,
        post.created_at.calendar_date()
    )?;
    writeln!(out, "    {}", excerpt(&post.content, EXCERPT_CHARS))?;
    writeln!(out, "    id: {}", post.id)?;
    writeln!(out)
}

/// Full view of a single post, one paragraph per content line.
pub fn write_post(out: &mut impl Write, post: &Post) -> io::Result<()> {
    writeln!(out, "{}", post.title)?;
    writeln!(
        out,
        "{} | Published on {}",
        post.author.name,
        post.created_at.calendar_date()
    )?;
    if let Some(url) = &post.image_url {
        writeln!(out, "Image: {url}")?;
    }
    writeln!(out, "{}", "-".repeat(40))?;

    for paragraph in post.content.split('\n') {
        writeln!(out, "{paragraph}")?;
        writeln!(out)?;
    }
    writeln!(out, "<- Back to Posts (type `list`)")
}

pub fn write_not_found(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Post Not Found")?;
    writeln!(
        out,
        "The post you are looking for does not exist or may have been removed."
    )?;
    writeln!(out, "<- Back to All Posts (type `list`)")
}

/// Content flattened to one line and cut at `max` characters.
#[must_use]
pub fn excerpt(content: &str, max: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }

    let mut cut = flat.chars().take(max).collect::<String>();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{EmptyReason, SortKey, PAGE_SIZE};
    use crate::schema::PostAuthor;
    use crate::types::{PostId, Timestamp, UserId};

    fn post(content: &str) -> Post {
        Post {
            id: PostId::new("abc"),
            title: "Hello".into(),
            content: content.into(),
            author: PostAuthor {
                id: UserId::new("1"),
                name: "Eddie Tor".into(),
            },
            created_at: Timestamp::from_ymd(2024, 7, 20).unwrap(),
            image_url: None,
        }
    }

    fn render(frame: &Frame) -> String {
        let mut out = Vec::new();
        write_frame(&mut out, frame).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn view(posts: Vec<Post>) -> ListView {
        ListView {
            posts,
            search_term: String::new(),
            sort: SortKey::Newest,
            show_load_more: false,
            loading: false,
            empty: None,
            error: None,
        }
    }

    #[test]
    fn test_skeleton() {
        let text = render(&Frame::Skeleton {
            placeholders: PAGE_SIZE,
        });
        assert_eq!(text.lines().count(), PAGE_SIZE + 1);
    }

    #[test]
    fn test_cards() {
        let mut listing = view(vec![post("First line\nsecond line")]);
        listing.show_load_more = true;

        let text = render(&Frame::Listing(listing));
        assert!(text.contains("[1] Hello"));
        assert!(text.contains("by Eddie Tor on July 20, 2024"));
        assert!(text.contains("First line second line"));
        assert!(text.contains("id: abc"));
        assert!(text.contains("type `more`"));
    }

    #[test]
    fn test_empty_listing() {
        let mut listing = view(Vec::new());
        listing.search_term = "rust".into();
        listing.empty = Some(EmptyReason::NoMatches);
        listing.error = Some("Failed to fetch posts".into());

        let text = render(&Frame::Listing(listing));
        assert!(text.contains("Search: \"rust\""));
        assert!(text.contains("No Posts Found"));
        assert!(text.contains("Try adjusting your search or sort criteria."));
        assert!(text.contains("! Failed to fetch posts"));
        assert!(!text.contains("type `more`"));
    }

    #[test]
    fn test_post_paragraphs() {
        let mut out = Vec::new();
        write_post(&mut out, &post("One.\nTwo.")).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Published on July 20, 2024"));
        assert!(text.contains("One.\n\nTwo.\n\n"));
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short\ntext", 20), "short text");
        assert_eq!(excerpt("abcdef ghij", 7), "abcdef...");
        assert_eq!(excerpt("ééééé", 3), "ééé...");
    }
}
