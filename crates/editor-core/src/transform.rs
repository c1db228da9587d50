/// Text rewrites offered on a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConversion {
    Upper,
    Lower,
    /// Lowercases, then capitalises the first letter of every word.
    Title,
    /// ASCII `!`..=`}` to the matching full-width forms.
    FullWidth,
    /// Full-width `！`..=`｝` back to ASCII.
    HalfWidth,
}

/// Distance between an ASCII character and its full-width form.
const FULL_WIDTH_OFFSET: u32 = 'Ａ' as u32 - 'A' as u32;

impl CaseConversion {
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            CaseConversion::Upper => text.to_uppercase(),
            CaseConversion::Lower => text.to_lowercase(),
            CaseConversion::Title => title_case(text),
            CaseConversion::FullWidth => text
                .chars()
                .map(|c| match c {
                    '!'..='}' => shift_char(c, FULL_WIDTH_OFFSET, true),
                    _ => c,
                })
                .collect(),
            CaseConversion::HalfWidth => text
                .chars()
                .map(|c| match c {
                    '！'..='｝' => shift_char(c, FULL_WIDTH_OFFSET, false),
                    _ => c,
                })
                .collect(),
        }
    }
}

fn shift_char(c: char, offset: u32, up: bool) -> char {
    let code = if up {
        (c as u32).checked_add(offset)
    } else {
        (c as u32).checked_sub(offset)
    };
    code.and_then(char::from_u32).unwrap_or(c)
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upper_lower() {
        assert_eq!(CaseConversion::Upper.apply("Call foo"), "CALL FOO");
        assert_eq!(CaseConversion::Lower.apply("END SUB"), "end sub");
    }

    #[test]
    fn test_title() {
        assert_eq!(
            CaseConversion::Title.apply("end FUNCTION\nprivate sub_main"),
            "End Function\nPrivate Sub_Main"
        );
    }

    #[test]
    fn test_full_width_round_trip() {
        let full = CaseConversion::FullWidth.apply("Ab1! ~");
        // Space and '~' are outside the converted range.
        assert_eq!(full, "Ａｂ１！ ~");
        assert_eq!(CaseConversion::HalfWidth.apply(&full), "Ab1! ~");
    }

    #[test]
    fn test_half_width_leaves_kana_alone() {
        assert_eq!(CaseConversion::HalfWidth.apply("ｶﾅ あ"), "ｶﾅ あ");
    }
}
