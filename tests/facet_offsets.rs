use moonbot::facet::{locate_hashtag, FacetSpan};

#[test]
fn span_counts_utf8_bytes_not_chars() {
    let text = "🌕 abc #FullMoon";
    let span = locate_hashtag(text, "#FullMoon").unwrap();

    // The emoji is 4 bytes, so the byte offset diverges from the char index.
    assert_eq!(span.byte_start, "🌕 abc ".len());
    assert_eq!(span.byte_end - span.byte_start, "#FullMoon".len());
    assert_eq!(&text[span.byte_start..span.byte_end], "#FullMoon");
}

#[test]
fn missing_hashtag_yields_none() {
    assert_eq!(locate_hashtag("no hashtag here", "#FullMoon"), None);
}

#[test]
fn last_occurrence_wins() {
    let text = "#FullMoon party under the #FullMoon";
    let span = locate_hashtag(text, "#FullMoon").unwrap();

    assert_eq!(
        span,
        FacetSpan {
            byte_start: text.len() - "#FullMoon".len(),
            byte_end: text.len(),
        }
    );
}

#[test]
fn hashtag_gains_a_leading_hash_when_missing() {
    let text = "🌑 quiet night #NewMoon";
    let with_hash = locate_hashtag(text, "#NewMoon").unwrap();
    let without_hash = locate_hashtag(text, "NewMoon").unwrap();

    assert_eq!(with_hash, without_hash);
}

#[test]
fn truncated_text_without_hashtag_is_handled() {
    // A hard cut can leave only a prefix of the hashtag behind.
    let text = "🌖 Waning Gibbous gracefully fading, 63.0% illuminated. #Wan...";
    assert_eq!(locate_hashtag(text, "#WaningGibbous"), None);
}
