/// Half-open byte range into the UTF-8 encoding of a post's text. The
/// annotation format indexes by byte, not by character, so these offsets
/// must count encoded bytes even when the text carries emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetSpan {
    pub byte_start: usize,
    pub byte_end: usize,
}

/// Locates the hashtag inside a finished message. The hashtag is appended
/// at the end of composition but may also show up inside a random phrase,
/// so the last occurrence is the one that gets annotated. Returns `None`
/// when truncation (or anything else) removed the hashtag entirely.
pub fn locate_hashtag(text: &str, hashtag: &str) -> Option<FacetSpan> {
    let needle = format!("#{}", hashtag.trim_start_matches('#'));
    let byte_start = text.rfind(&needle)?;
    Some(FacetSpan {
        byte_start,
        byte_end: byte_start + needle.len(),
    })
}
