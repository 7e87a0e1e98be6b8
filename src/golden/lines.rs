/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// Splits decoded text into lines.
///
/// A line ends at `\n`, `\r`, or `\r\n`. Terminators are dropped and a
/// trailing terminator does not start an empty last line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(end) => {
                lines.push(rest[..end].to_string());
                let len = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + len..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminators() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a"), ["a"]);
        assert_eq!(split_lines("a\n"), ["a"]);
        assert_eq!(split_lines("a\nb\rc\r\nd"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\n"), ["a", ""]);
        assert_eq!(split_lines("\r\n\r\n"), ["", ""]);
        assert_eq!(split_lines("a\n\rb"), ["a", "", "b"]);
    }

    #[test]
    fn keeps_content() {
        assert_eq!(split_lines("\u{feff}x \t\n\u{1f600}"), ["\u{feff}x \t", "\u{1f600}"]);
    }
}
