//! Naming and literal helpers for code generation

use inflector::Inflector;

/// Template helpers shared by all artifact kinds
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to `PascalCase`
    ///
    /// # Examples
    ///
    /// ```
    /// # use querysmith::codegen::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_pascal_case("users"), "Users");
    /// assert_eq!(TemplateHelpers::to_pascal_case("userProfiles"), "UserProfiles");
    /// assert_eq!(TemplateHelpers::to_pascal_case("order_items"), "OrderItems");
    /// ```
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Upper-case the first character and keep the rest
    ///
    /// # Examples
    ///
    /// ```
    /// # use querysmith::codegen::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::capitalize("firstName"), "FirstName");
    /// assert_eq!(TemplateHelpers::capitalize(""), "");
    /// ```
    #[must_use]
    pub fn capitalize(input: &str) -> String {
        let mut chars = input.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Whether literal text is emitted as a bare number
    ///
    /// The trimmed text must parse as a finite number, or be an unsigned
    /// `0x`, `0b` or `0o` integer literal.
    #[must_use]
    pub fn is_numeric(value: &str) -> bool {
        let value = value.trim();
        if let Some(digits) = Self::radix_digits(value) {
            return digits;
        }
        value.parse::<f64>().is_ok_and(f64::is_finite)
    }

    /// `Some(valid)` when `value` carries a radix prefix
    fn radix_digits(value: &str) -> Option<bool> {
        let prefix = value.get(..2)?.to_ascii_lowercase();
        let radix = match prefix.as_str() {
            "0x" => 16,
            "0b" => 2,
            "0o" => 8,
            _ => return None,
        };
        let digits = &value[2..];
        Some(!digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
    }

    /// Render user-entered text as a source literal
    ///
    /// Numbers are emitted bare and trimmed; anything else is wrapped in
    /// double quotes, with `"` and `\` escaped only when `escape` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use querysmith::codegen::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::literal("42", false), "42");
    /// assert_eq!(TemplateHelpers::literal("42a", false), r#""42a""#);
    /// assert_eq!(TemplateHelpers::literal(r#"say "hi""#, true), r#""say \"hi\"""#);
    /// ```
    #[must_use]
    pub fn literal(value: &str, escape: bool) -> String {
        if Self::is_numeric(value) {
            return value.trim().to_string();
        }

        if escape {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        } else {
            format!("\"{value}\"")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_detection() {
        assert!(TemplateHelpers::is_numeric("42"));
        assert!(TemplateHelpers::is_numeric(" -3.5 "));
        assert!(TemplateHelpers::is_numeric("1e3"));
        assert!(!TemplateHelpers::is_numeric("42a"));
        assert!(!TemplateHelpers::is_numeric(""));
        assert!(!TemplateHelpers::is_numeric("inf"));
        assert!(!TemplateHelpers::is_numeric("NaN"));
    }

    #[test]
    fn test_radix_literals_are_numeric() {
        assert!(TemplateHelpers::is_numeric("0x1F"));
        assert!(TemplateHelpers::is_numeric("0b101"));
        assert!(TemplateHelpers::is_numeric(" 0o7 "));
        assert!(TemplateHelpers::is_numeric("0XfF"));
        assert!(!TemplateHelpers::is_numeric("0x"));
        assert!(!TemplateHelpers::is_numeric("0b102"));
        assert!(!TemplateHelpers::is_numeric("0o8"));
        assert!(!TemplateHelpers::is_numeric("-0x1F"));
        assert_eq!(TemplateHelpers::literal("0x1F", false), "0x1F");
        assert_eq!(TemplateHelpers::literal("0xZZ", false), r#""0xZZ""#);
    }

    #[test]
    fn test_literal_without_escaping_keeps_quotes() {
        assert_eq!(
            TemplateHelpers::literal(r#"a "b" c"#, false),
            r#""a "b" c""#
        );
        assert_eq!(TemplateHelpers::literal(" 7 ", false), "7");
    }

    #[test]
    fn test_literal_with_escaping() {
        assert_eq!(TemplateHelpers::literal(r"C:\tmp", true), r#""C:\\tmp""#);
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(TemplateHelpers::to_pascal_case("posts"), "Posts");
        assert_eq!(TemplateHelpers::capitalize("id"), "Id");
    }
}
