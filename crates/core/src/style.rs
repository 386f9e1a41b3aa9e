use danmaku_protocol::{CommentRecord, Palette, RoleStyle};

/// Pick the banner style for a comment.
///
/// The viewer's own messages win over paid messages, which win over the
/// author's role.
pub fn resolve_style<'a>(record: &CommentRecord, palette: &'a Palette) -> &'a RoleStyle {
    if record.is_self {
        &palette.own
    } else if record.is_paid {
        &palette.paid
    } else {
        palette.for_author(record.author_type)
    }
}

/// Whether the comment is drawn with an avatar badge and so skips depth
/// fading.
pub fn is_exempt(record: &CommentRecord, palette: &Palette) -> bool {
    resolve_style(record, palette).avatar
}
