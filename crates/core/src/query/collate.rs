use feruca::{Collator, Locale, Tailoring};
use std::cell::RefCell;
use std::cmp::Ordering;

thread_local! {
    // Unicode Collation Algorithm with the CLDR root order. Spaces and
    // punctuation keep their weight, as in a browser's default collation.
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::Cldr(Locale::Root), false, true));
}

/// Name ordering for the ward list, matching a browser's default
/// `localeCompare`: accents and case only break ties between otherwise equal
/// names, and lowercase sorts before its uppercase twin.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|c| c.borrow_mut().collate(a, b))
}
