/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2000-2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

pub mod predefined {
    pub const LT: &str = "&lt;";
    pub const GT: &str = "&gt;";
    pub const AMP: &str = "&amp;";
    pub const QUOT: &str = "&quot;";
}

/// Appends character data with markup characters escaped.
pub fn push_text(markup: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => markup.push_str(predefined::LT),
            '>' => markup.push_str(predefined::GT),
            '&' => markup.push_str(predefined::AMP),
            _ => markup.push(c),
        }
    }
}

/// Appends a double quoted attribute value.
pub fn push_attribute_value(markup: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => markup.push_str(predefined::AMP),
            '"' => markup.push_str(predefined::QUOT),
            _ => markup.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> String {
        let mut markup = String::new();
        push_text(&mut markup, s);
        markup
    }

    fn attribute(s: &str) -> String {
        let mut markup = String::new();
        push_attribute_value(&mut markup, s);
        markup
    }

    #[test]
    fn no_escape() {
        const NOESCAPE: &str = "abc$#@!%^*(){}[]=-+/.,;:FDSF3443\u{1f600}";
        assert_eq!(text(NOESCAPE), NOESCAPE);
        assert_eq!(attribute(NOESCAPE), NOESCAPE);
    }

    #[test]
    fn escapes() {
        assert_eq!(text("a<b>&'\"c"), "a&lt;b&gt;&amp;'\"c");
        assert_eq!(attribute("a<b>&'\"c"), "a<b>&amp;'&quot;c");
    }
}
