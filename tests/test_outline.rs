//! Integration tests for outline extraction.

mod common;

use common::{MemoryExtractor, open};
use pdf_pager::extractors::Bookmark;
use pdf_pager::OutlineSource;

fn manual() -> MemoryExtractor {
    MemoryExtractor::new([
        "Getting Started\n\
         this line is lowercase body text\n\
         Installation Guide For Linux\n\
         Reference",
        "A very long heading that has many words in it\nbody",
        "nothing but body text here",
    ])
}

mod from_bookmarks {
    use super::*;

    #[test]
    fn test_bookmarks_take_precedence() {
        let bookmarks = vec![
            Bookmark::new("Preface", 1),
            Bookmark::new("Usage", 2).with_children(vec![Bookmark::new("Options", 3)]),
        ];
        let (doc, extractor) = open(manual().with_bookmarks(bookmarks));

        let outline = doc.extract_outline().unwrap();
        assert_eq!(outline.source, OutlineSource::Metadata);
        assert_eq!(outline.entries.len(), 2);
        assert_eq!(outline.entries[1].children[0].title, "Options");
        assert_eq!(outline.entries[1].children[0].level, 2);
        // No page text is needed when bookmarks exist
        assert_eq!(extractor.calls(), 0);
    }

    #[test]
    fn test_format_nests_children() {
        let bookmarks =
            vec![Bookmark::new("Usage", 2).with_children(vec![Bookmark::new("Options", 3)])];
        let (doc, _) = open(manual().with_bookmarks(bookmarks));

        let text = doc.extract_outline().unwrap().format();
        assert_eq!(
            text,
            "Table of Contents (from metadata)\n\n• Usage (page 2)\n  • Options (page 3)\n"
        );
    }
}

mod from_headings {
    use super::*;

    #[test]
    fn test_headings_are_flat_in_page_order() {
        let (doc, _) = open(manual());
        let outline = doc.extract_outline().unwrap();
        assert_eq!(outline.source, OutlineSource::Headings);

        let entries: Vec<(&str, usize, usize)> = outline
            .entries
            .iter()
            .map(|e| (e.title.as_str(), e.page, e.level))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("Getting Started", 1, 1),
                ("Installation Guide For Linux", 1, 2),
                ("A very long heading that has many words in it", 2, 3),
            ]
        );
        assert!(outline.entries.iter().all(|e| e.children.is_empty()));
    }

    #[test]
    fn test_hierarchy_nests_under_level_one() {
        let (doc, _) = open(manual());
        let nested = doc.extract_outline().unwrap().build_hierarchy();

        assert_eq!(nested.source, OutlineSource::Headings);
        assert_eq!(nested.entries.len(), 1);
        assert_eq!(nested.entries[0].children.len(), 2);
        assert_eq!(nested.find_entries_by_page(2).len(), 1);
    }

    #[test]
    fn test_find_headings_on_one_page() {
        let (doc, _) = open(manual());
        assert_eq!(doc.find_headings(2).len(), 1);
        assert!(doc.find_headings(3).is_empty());
        assert!(doc.find_headings(99).is_empty());
    }

    #[test]
    fn test_only_first_ten_pages_scanned() {
        let mut pages = vec!["plain body".to_string(); 10];
        pages.push("Late Chapter".to_string());
        let (doc, extractor) = open(MemoryExtractor::new(pages));

        let outline = doc.extract_outline().unwrap();
        assert!(outline.is_empty());
        assert_eq!(outline.source, OutlineSource::None);
        assert_eq!(extractor.calls(), 10);
    }

    #[test]
    fn test_failing_page_contributes_nothing() {
        let (doc, _) = open(manual().failing_on(1));
        let outline = doc.extract_outline().unwrap();
        assert_eq!(outline.entries.len(), 1);
        assert_eq!(outline.entries[0].page, 2);
    }
}

#[test]
fn test_no_outline() {
    let (doc, _) = open(MemoryExtractor::new(["just some body text", "more of it"]));
    let outline = doc.extract_outline().unwrap();
    assert!(outline.is_empty());
    assert_eq!(outline.source, OutlineSource::None);
    assert_eq!(outline.format(), "Table of Contents (from none)\n\n");
}
