// 🔢 Identifier formatting - CPF, CNPJ and postal codes
// Brazilian identifiers arrive with or without punctuation; these helpers normalize them

use regex::Regex;
use std::sync::LazyLock;

// ASCII digits only, `\d` is Unicode-aware
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

static CPF_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{3})([0-9]{3})([0-9]{3})([0-9]{2})$").unwrap());

static CNPJ_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})([0-9]{3})([0-9]{3})([0-9]{4})([0-9]{2})$").unwrap());

/// Remove every character that is not an ASCII digit
///
/// Works for CPF, CNPJ and CEP alike.
pub fn remove_format(formatted: &str) -> String {
    NON_DIGIT.replace_all(formatted, "").into_owned()
}

/// Format a CPF as XXX.XXX.XXX-XX
///
/// Anything that is not exactly 11 digits comes back as the bare digits.
pub fn format_cpf(cpf: &str) -> String {
    let digits = remove_format(cpf);
    CPF_GROUPS
        .replace(&digits, "${1}.${2}.${3}-${4}")
        .into_owned()
}

/// Format a CNPJ as XX.XXX.XXX/XXXX-XX
///
/// Anything that is not exactly 14 digits comes back as the bare digits.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits = remove_format(cnpj);
    CNPJ_GROUPS
        .replace(&digits, "${1}.${2}.${3}/${4}-${5}")
        .into_owned()
}

/// Normalize a postal code to its digits, used as a directory key
pub fn normalize_postal_code(postal_code: &str) -> String {
    remove_format(postal_code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
        assert_eq!(format_cpf("123.456.789-01"), "123.456.789-01");
        assert_eq!(format_cpf(" 123 456 789 01 "), "123.456.789-01");
    }

    #[test]
    fn test_format_cpf_wrong_length_returns_digits() {
        assert_eq!(format_cpf("1234-5"), "12345");
        assert_eq!(format_cpf("123456789012"), "123456789012");
        assert_eq!(format_cpf(""), "");
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_cnpj("12.345.678/0001-95"), "12.345.678/0001-95");
        assert_eq!(format_cnpj("12345678"), "12345678");
    }

    #[test]
    fn test_remove_format() {
        assert_eq!(remove_format("123.456.789-01"), "12345678901");
        assert_eq!(remove_format("12.345.678/0001-95"), "12345678000195");
        assert_eq!(remove_format("abc"), "");
    }

    #[test]
    fn test_normalize_postal_code() {
        assert_eq!(normalize_postal_code("12345-678"), "12345678");
        assert_eq!(normalize_postal_code(" 12345678 "), "12345678");
    }

    #[test]
    fn test_non_ascii_digits_are_stripped() {
        // Arabic-Indic ١٢٣٤٥٦٧٨٩٠١ (eleven digits, none of them 0-9)
        let arabic = "\u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}\u{668}\u{669}\u{660}\u{661}";

        assert_eq!(remove_format(arabic), "");
        assert_eq!(format_cpf(arabic), "");
        assert_eq!(format_cnpj("\u{FF11}\u{FF12}345678000195"), "345678000195");
        assert_eq!(normalize_postal_code("\u{661}\u{662}\u{663}\u{664}\u{665}-\u{666}\u{667}\u{668}"), "");
        assert_eq!(remove_format("12\u{966}345"), "12345");
    }
}
