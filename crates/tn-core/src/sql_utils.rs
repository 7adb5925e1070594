//! SQL identifier quoting utilities

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard. The identifier is otherwise
/// rendered as given: legality (length, reserved words) is not checked.
///
/// # Examples
/// ```
/// use tn_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote each identifier and join them as a parenthesized column list.
///
/// # Examples
/// ```
/// use tn_core::sql_utils::quote_ident_list;
/// assert_eq!(quote_ident_list(&["a", "b"]), r#"("a", "b")"#);
/// ```
pub fn quote_ident_list<S: AsRef<str>>(idents: &[S]) -> String {
    let quoted: Vec<String> = idents.iter().map(|i| quote_ident(i.as_ref())).collect();
    format!("({})", quoted.join(", "))
}
