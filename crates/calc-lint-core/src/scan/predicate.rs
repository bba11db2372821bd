//! Classification of declaration values.

/// Characters that mark a value as arithmetic.
const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Check if a declaration value looks like arithmetic missing `calc()`.
///
/// All three must hold:
///
/// - the value contains one of `+ - * /`;
/// - it does not already contain the literal text `calc(` (case-sensitive);
/// - it is not a standalone variable reference (see [`is_standalone_var`]).
///
/// A lone negative dimension such as `-10px` satisfies the predicate; that
/// imprecision is accepted.
///
/// # Example
///
/// ```
/// use calc_lint_core::scan::needs_calc;
///
/// assert!(needs_calc("100% - 20px"));
/// assert!(!needs_calc("calc(100% - 20px)"));
/// assert!(!needs_calc("var(--gap-1)"));
/// assert!(!needs_calc("10px"));
/// ```
pub fn needs_calc(value: &str) -> bool {
    value.contains(OPERATORS) && !value.contains("calc(") && !is_standalone_var(value)
}

/// Check if the trimmed value is exactly `var(--name)`.
///
/// The name is any non-empty run of characters other than `)`, so names
/// holding arithmetic-looking characters (`--gap-sm`) still count. Fallback
/// arguments (`var(--a, 1px)`) are part of the name under this rule.
pub fn is_standalone_var(value: &str) -> bool {
    value
        .trim()
        .strip_prefix("var(--")
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(|name| !name.is_empty() && !name.contains(')'))
}
