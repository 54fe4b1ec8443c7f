//! Closing brackets whose direction depends on their opening partner.

/// Code points with `Bidi_Paired_Bracket_Type=Close` (BidiBrackets.txt),
/// sorted for binary search.
const CLOSING_BRACKETS: &[char] = &[
    '\u{0029}', '\u{005D}', '\u{007D}', '\u{0F3B}', '\u{0F3D}', '\u{169C}',
    '\u{2046}', '\u{207E}', '\u{208E}', '\u{2309}', '\u{230B}', '\u{232A}',
    '\u{2769}', '\u{276B}', '\u{276D}', '\u{276F}', '\u{2771}', '\u{2773}',
    '\u{2775}', '\u{27C6}', '\u{27E7}', '\u{27E9}', '\u{27EB}', '\u{27ED}',
    '\u{27EF}', '\u{2984}', '\u{2986}', '\u{2988}', '\u{298A}', '\u{298C}',
    '\u{298E}', '\u{2990}', '\u{2992}', '\u{2994}', '\u{2996}', '\u{2998}',
    '\u{29D9}', '\u{29DB}', '\u{29FD}', '\u{2E23}', '\u{2E25}', '\u{2E27}',
    '\u{2E29}', '\u{2E56}', '\u{2E58}', '\u{2E5A}', '\u{2E5C}', '\u{3009}',
    '\u{300B}', '\u{300D}', '\u{300F}', '\u{3011}', '\u{3015}', '\u{3017}',
    '\u{3019}', '\u{301B}', '\u{FE5A}', '\u{FE5C}', '\u{FE5E}', '\u{FF09}',
    '\u{FF3D}', '\u{FF5D}', '\u{FF60}', '\u{FF63}',
];

pub fn is_closing_bracket(c: char) -> bool {
    CLOSING_BRACKETS.binary_search(&c).is_ok()
}
