/*!
 * Tests for language utility functions
 */

use sheetalign::language_utils::{LanguageCodeType, get_language_name, normalize_to_part2t, validate_language_code};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    // ISO 639-1
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("cs").unwrap(), LanguageCodeType::Part1));

    // ISO 639-2/T
    assert!(matches!(validate_language_code("cat").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("ces").unwrap(), LanguageCodeType::Part2T));

    // ISO 639-2/B
    assert!(matches!(validate_language_code("cze").unwrap(), LanguageCodeType::Part2B));
    assert!(matches!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B));

    // Whitespace and case
    assert!(matches!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1));

    // Invalid codes
    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("cze").unwrap(), "ces");
    assert_eq!(normalize_to_part2t("cat").unwrap(), "cat");
    assert_eq!(normalize_to_part2t("FRE").unwrap(), "fra");
}

/// Test retrieval of language names from codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnCorrectName() {
    assert_eq!(get_language_name("cat").unwrap(), "Catalan");
    assert_eq!(get_language_name("cze").unwrap(), "Czech");
    assert!(get_language_name("zz").is_err());
}
