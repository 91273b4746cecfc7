//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One `impl HTMLParser` block per group of insertion modes.

/// "after body", "in frameset", "after frameset", "after after body" and
/// "after after frameset".
mod after;
/// "in body".
mod body;
/// "initial" through "after head", plus "text".
mod head;
/// "in select" and "in select in table".
mod select;
/// The table modes: "in table" through "in cell".
mod table;
/// "in template".
mod template;
