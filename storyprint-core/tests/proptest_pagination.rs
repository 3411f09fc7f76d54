//! Property-based tests for pagination
//!
//! Checks layout invariants over arbitrary documents and page geometries.

use proptest::prelude::*;
use storyprint::units::PageSize;
use storyprint::layout::wrap_line;
use storyprint::{paginate, paginate_with, reconstruct, Document, PageGeometry, WrapMode};

// Lines mixing blanks, short text and lines long enough to be sliced
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zæøå ]{1,12}",
        "[A-Za-z0-9 .,!?]{13,60}",
    ]
}

// Blank lines, whitespace runs, short text and lines long enough to be wrapped
fn spaced_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        " {1,20}",
        "[a-z ]{1,12}",
        "[a-z ]{13,60}",
    ]
}

// A blank line takes one slot, any other line one slot per chunk
fn slots_for_line(line: &str, max_chars: usize, mode: WrapMode) -> usize {
    if line.is_empty() {
        1
    } else {
        wrap_line(line, max_chars, mode).len()
    }
}

prop_compose! {
    fn document_strategy()(lines in prop::collection::vec(line_strategy(), 0..120)) -> Document {
        Document::from_lines(lines)
    }
}

// Geometries whose usable height is a whole number of lines
prop_compose! {
    fn geometry_strategy()(
        slots in 1usize..30,
        line_height in 6.0..24.0f64,
        top in 10.0..80.0f64,
        bottom in 10.0..80.0f64,
        max_chars in 1usize..40,
    ) -> PageGeometry {
        let height = top + bottom + slots as f64 * line_height;
        PageGeometry::default()
            .with_page_size(PageSize::new(300.0, height))
            .with_margins(top, bottom, 20.0)
            .with_line_height(line_height)
            .with_max_chars_per_line(max_chars)
    }
}

proptest! {
    #[test]
    fn test_pagination_deterministic(doc in document_strategy(), geometry in geometry_strategy()) {
        let first = paginate(&doc, &geometry).unwrap();
        let second = paginate(&doc, &geometry).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_at_least_one_page(doc in document_strategy(), geometry in geometry_strategy()) {
        let pages = paginate(&doc, &geometry).unwrap();
        prop_assert!(!pages.is_empty());
        for (i, page) in pages.iter().enumerate() {
            prop_assert_eq!(page.index(), i);
        }
    }

    #[test]
    fn test_fragments_stay_inside_margins(doc in document_strategy(), geometry in geometry_strategy()) {
        let pages = paginate(&doc, &geometry).unwrap();
        for page in &pages {
            prop_assert!(page.lines_used() <= geometry.lines_per_page());
            for fragment in page.fragments() {
                prop_assert!(fragment.y <= geometry.top_y() + 1e-9);
                prop_assert!(fragment.y - geometry.line_height() >= geometry.bottom_margin() - 1e-6);
                prop_assert!(fragment.text.chars().count() <= geometry.max_chars_per_line());
                prop_assert!(!fragment.text.is_empty());
            }
        }
    }

    #[test]
    fn test_every_slot_accounted_for(doc in document_strategy(), geometry in geometry_strategy()) {
        let pages = paginate(&doc, &geometry).unwrap();
        let expected: usize = doc
            .lines()
            .iter()
            .map(|line| slots_for_line(line, geometry.max_chars_per_line(), WrapMode::Naive))
            .sum();
        let used: usize = pages.iter().map(|p| p.lines_used()).sum();
        prop_assert_eq!(used, expected);
    }

    #[test]
    fn test_word_aware_every_line_takes_a_slot(
        lines in prop::collection::vec(spaced_line_strategy(), 0..80),
        geometry in geometry_strategy(),
    ) {
        let doc = Document::from_lines(lines);
        let max_chars = geometry.max_chars_per_line();
        let pages = paginate_with(&doc, &geometry, WrapMode::WordAware).unwrap();
        let used: usize = pages.iter().map(|p| p.lines_used()).sum();

        for line in doc.lines() {
            prop_assert!(slots_for_line(line, max_chars, WrapMode::WordAware) >= 1);
        }
        let expected: usize = doc
            .lines()
            .iter()
            .map(|line| slots_for_line(line, max_chars, WrapMode::WordAware))
            .sum();
        prop_assert_eq!(used, expected);
    }

    #[test]
    fn test_reconstruction_when_nothing_sliced(
        lines in prop::collection::vec(prop_oneof![Just(String::new()), "[a-z]{1,8}"], 0..80),
        geometry in geometry_strategy(),
    ) {
        let geometry = geometry.with_max_chars_per_line(8);
        let doc = Document::from_lines(lines.clone());
        let pages = paginate(&doc, &geometry).unwrap();
        prop_assert_eq!(reconstruct(&pages), lines);
    }

    #[test]
    fn test_naive_slices_concatenate_to_line(line in "[a-zA-Z ]{1,200}", max_chars in 1usize..50) {
        let geometry = PageGeometry::default().with_max_chars_per_line(max_chars);
        let pages = paginate(&Document::from_lines([line.as_str()]), &geometry).unwrap();
        let joined: String = pages
            .iter()
            .flat_map(|p| p.fragments())
            .map(|f| f.text.as_str())
            .collect();
        prop_assert_eq!(joined, line);
    }

    #[test]
    fn test_word_aware_never_exceeds_budget(line in "[a-z ]{1,200}", max_chars in 1usize..30) {
        let geometry = PageGeometry::default().with_max_chars_per_line(max_chars);
        let pages = paginate_with(&Document::from_lines([line.as_str()]), &geometry, WrapMode::WordAware).unwrap();
        for fragment in pages.iter().flat_map(|p| p.fragments()) {
            prop_assert!(fragment.text.chars().count() <= max_chars);
        }
    }
}
