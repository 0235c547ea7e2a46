/// `:LOGBOOK:` ... `:END:` region; every line inside is kept verbatim as
/// one entry.
pub struct Logbook;

impl Logbook {
    pub const OPEN: &'static str = ":LOGBOOK:";
    pub const CLOSE: &'static str = ":END:";

    pub fn opens(rest: &str) -> bool {
        rest.strip_prefix(Self::OPEN)
            .is_some_and(|tail| tail.trim().is_empty())
    }

    pub fn closes(rest: &str) -> bool {
        rest.strip_prefix(Self::CLOSE)
            .is_some_and(|tail| tail.trim().is_empty())
    }
}
