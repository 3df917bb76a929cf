pub(crate) mod text;

pub(crate) use text::{sanitize_for_tui, sanitize_inline};
